//! Appointment lifecycle manager — booking, state transitions, projections.
//!
//! State machine: `pending → confirmed → concluded`, with `cancelled`
//! reachable from `pending` or `confirmed`. Terminal states reject every
//! further transition.
//!
//! The booking-conflict invariant (one live appointment per instant) is
//! enforced by the partial unique index `idx_appointments_slot`; the
//! pre-insert lookup here only exists to fail fast with a typed error
//! before touching the table. Reschedule commits the appointment move and
//! the notification to the new psychologist in one transaction, so a
//! failed notification rolls the move back instead of being lost.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use crate::availability;
use crate::billing;
use crate::config;
use crate::db::{self, DatabaseError};
use crate::models::enums::AppointmentStatus;
use crate::models::Appointment;
use crate::notifications;

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("slot {0} is already booked")]
    SlotConflict(NaiveDateTime),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("appointment is {status}; no further transition allowed")]
    InvalidStateTransition { status: AppointmentStatus },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

fn not_found(entity: &'static str, id: impl ToString) -> SchedulingError {
    SchedulingError::NotFound {
        entity,
        id: id.to_string(),
    }
}

/// Book a new appointment at the given instant.
///
/// The patient's assigned psychologist becomes the appointment's
/// psychologist; price and capture line come from the billing generator
/// and are never reassigned afterwards.
pub fn create_appointment(
    conn: &Connection,
    patient_id: Uuid,
    scheduled_at: NaiveDateTime,
    motive: Option<&str>,
) -> Result<Appointment, SchedulingError> {
    let now = Local::now().naive_local();
    if scheduled_at < now {
        return Err(SchedulingError::InvalidInput(format!(
            "cannot book {scheduled_at} in the past"
        )));
    }

    let patient =
        db::get_patient(conn, &patient_id)?.ok_or_else(|| not_found("Patient", patient_id))?;
    let psychologist_id = patient.psychologist_id.ok_or_else(|| {
        SchedulingError::InvalidInput(format!(
            "patient {} has no assigned psychologist",
            patient.username
        ))
    })?;

    // Fail fast; the unique index is the authoritative check below.
    if db::live_appointment_at(conn, scheduled_at)?.is_some() {
        return Err(SchedulingError::SlotConflict(scheduled_at));
    }

    let artifact = billing::generate_artifact();
    let appointment = Appointment {
        id: Uuid::new_v4(),
        patient_id,
        psychologist_id,
        scheduled_at,
        status: AppointmentStatus::Pending,
        motive: motive.map(str::to_string),
        cancel_reason: None,
        session_note: None,
        price_cents: artifact.price_cents,
        capture_line: artifact.capture_line,
        capture_due_date: (now + chrono::Duration::days(config::CAPTURE_LINE_DUE_DAYS)).date(),
        created_at: now,
    };

    db::insert_appointment(conn, &appointment).map_err(|e| {
        if e.is_slot_taken() {
            // A concurrent writer won the slot between the check and the insert.
            SchedulingError::SlotConflict(scheduled_at)
        } else {
            e.into()
        }
    })?;

    tracing::info!(appointment = %appointment.id, at = %scheduled_at, "appointment booked");
    Ok(appointment)
}

/// Confirm a pending appointment.
pub fn confirm_appointment(conn: &Connection, id: Uuid) -> Result<(), SchedulingError> {
    let appointment = load(conn, id)?;
    if appointment.status != AppointmentStatus::Pending {
        return Err(SchedulingError::InvalidStateTransition {
            status: appointment.status,
        });
    }
    db::mark_confirmed(conn, &id)?;
    Ok(())
}

/// Move an appointment to a new date/hour and reassign its psychologist.
///
/// The hour arrives as a zero-padded "HH" token (presentation-layer
/// contract); minutes are fixed at zero. The destination slot is
/// re-validated against the conflict invariant, and the stored update plus
/// the notification to the new psychologist commit atomically.
pub fn reschedule_appointment(
    conn: &Connection,
    id: Uuid,
    new_date: NaiveDate,
    hour_token: &str,
    new_psychologist_id: Uuid,
) -> Result<(), SchedulingError> {
    let appointment = load(conn, id)?;
    if appointment.status.is_terminal() {
        return Err(SchedulingError::InvalidStateTransition {
            status: appointment.status,
        });
    }

    let hour = parse_hour_token(hour_token)?;
    let new_at = new_date
        .and_hms_opt(hour, 0, 0)
        .ok_or_else(|| SchedulingError::InvalidInput(format!("invalid hour {hour}")))?;

    match db::live_appointment_at(conn, new_at)? {
        Some(existing) if existing != id => return Err(SchedulingError::SlotConflict(new_at)),
        _ => {}
    }

    let psychologist = db::get_psychologist(conn, &new_psychologist_id)?
        .ok_or_else(|| not_found("Psychologist", new_psychologist_id))?;

    let patient = db::get_patient(conn, &appointment.patient_id)?;
    let message =
        notifications::reschedule_message(patient.as_ref().map(|p| p.name.as_str()), new_at);

    let tx = conn.unchecked_transaction().map_err(DatabaseError::from)?;
    db::update_schedule(&tx, &id, new_at, &psychologist.id).map_err(|e| {
        if e.is_slot_taken() {
            SchedulingError::SlotConflict(new_at)
        } else {
            e.into()
        }
    })?;
    notifications::notify(&tx, psychologist.id, &message)?;
    tx.commit().map_err(DatabaseError::from)?;

    tracing::info!(appointment = %id, at = %new_at, psychologist = %psychologist.id, "appointment rescheduled");
    Ok(())
}

/// Cancel a pending or confirmed appointment, recording the reason.
/// The slot becomes bookable again: cancelled rows leave the live index.
pub fn cancel_appointment(
    conn: &Connection,
    id: Uuid,
    reason: &str,
) -> Result<(), SchedulingError> {
    let appointment = load(conn, id)?;
    if appointment.status.is_terminal() {
        return Err(SchedulingError::InvalidStateTransition {
            status: appointment.status,
        });
    }
    db::mark_cancelled(conn, &id, reason)?;
    tracing::info!(appointment = %id, "appointment cancelled");
    Ok(())
}

/// Conclude a pending or confirmed appointment with a post-session note.
pub fn conclude_appointment(
    conn: &Connection,
    id: Uuid,
    note: &str,
) -> Result<(), SchedulingError> {
    let appointment = load(conn, id)?;
    if appointment.status.is_terminal() {
        return Err(SchedulingError::InvalidStateTransition {
            status: appointment.status,
        });
    }
    db::mark_concluded(conn, &id, note)?;
    tracing::info!(appointment = %id, "appointment concluded");
    Ok(())
}

/// Template slots for the date minus those held by live appointments.
pub fn open_slots(
    conn: &Connection,
    date: NaiveDate,
) -> Result<Vec<NaiveTime>, SchedulingError> {
    let booked = db::booked_times_on(conn, date)?;
    Ok(availability::compute_slots(Some(date))
        .into_iter()
        .filter(|slot| !booked.contains(slot))
        .collect())
}

// Read-only projections for calendar and history views.

pub fn appointments_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Appointment>, SchedulingError> {
    Ok(db::appointments_by_patient(conn, patient_id)?)
}

pub fn appointments_for_psychologist(
    conn: &Connection,
    psychologist_id: &Uuid,
) -> Result<Vec<Appointment>, SchedulingError> {
    Ok(db::appointments_by_psychologist(conn, psychologist_id)?)
}

pub fn appointments_with_status(
    conn: &Connection,
    status: AppointmentStatus,
) -> Result<Vec<Appointment>, SchedulingError> {
    Ok(db::appointments_by_status(conn, status)?)
}

pub fn appointments_on_date(
    conn: &Connection,
    date: NaiveDate,
) -> Result<Vec<Appointment>, SchedulingError> {
    Ok(db::appointments_on_date(conn, date)?)
}

fn load(conn: &Connection, id: Uuid) -> Result<Appointment, SchedulingError> {
    db::get_appointment(conn, &id)?.ok_or_else(|| not_found("Appointment", id))
}

/// Parse a zero-padded "HH" hour token into 0..=23.
fn parse_hour_token(token: &str) -> Result<u32, SchedulingError> {
    let bad = || SchedulingError::InvalidInput(format!("invalid hour token {token:?}"));
    if token.len() != 2 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }
    let hour: u32 = token.parse().map_err(|_| bad())?;
    if hour > 23 {
        return Err(bad());
    }
    Ok(hour)
}
