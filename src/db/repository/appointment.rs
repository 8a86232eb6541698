use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{DATETIME_FMT, DATE_FMT};
use crate::db::DatabaseError;
use crate::models::enums::AppointmentStatus;
use crate::models::Appointment;

const APPOINTMENT_COLUMNS: &str =
    "id, patient_id, psychologist_id, scheduled_at, status, motive, cancel_reason,
     session_note, price_cents, capture_line, capture_due_date, created_at";

/// Raw row before uuid/date/enum parsing.
struct AppointmentRow {
    id: String,
    patient_id: String,
    psychologist_id: String,
    scheduled_at: String,
    status: String,
    motive: Option<String>,
    cancel_reason: Option<String>,
    session_note: Option<String>,
    price_cents: i64,
    capture_line: String,
    capture_due_date: String,
    created_at: String,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        psychologist_id: row.get(2)?,
        scheduled_at: row.get(3)?,
        status: row.get(4)?,
        motive: row.get(5)?,
        cancel_reason: row.get(6)?,
        session_note: row.get(7)?,
        price_cents: row.get(8)?,
        capture_line: row.get(9)?,
        capture_due_date: row.get(10)?,
        created_at: row.get(11)?,
    })
}

fn parse_uuid(s: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("bad datetime {s}: {e}")))
}

fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, DATE_FMT)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("bad date {s}: {e}")))
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DatabaseError;

    fn try_from(raw: AppointmentRow) -> Result<Self, Self::Error> {
        Ok(Appointment {
            id: parse_uuid(&raw.id)?,
            patient_id: parse_uuid(&raw.patient_id)?,
            psychologist_id: parse_uuid(&raw.psychologist_id)?,
            scheduled_at: parse_datetime(&raw.scheduled_at)?,
            status: AppointmentStatus::from_str(&raw.status)?,
            motive: raw.motive,
            cancel_reason: raw.cancel_reason,
            session_note: raw.session_note,
            price_cents: raw.price_cents,
            capture_line: raw.capture_line,
            capture_due_date: parse_date(&raw.capture_due_date)?,
            created_at: parse_datetime(&raw.created_at)?,
        })
    }
}

fn select_appointments<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, read_row)?;

    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(row?.try_into()?);
    }
    Ok(appointments)
}

pub fn insert_appointment(conn: &Connection, apt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments
         (id, patient_id, psychologist_id, scheduled_at, status, motive, cancel_reason,
          session_note, price_cents, capture_line, capture_due_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            apt.id.to_string(),
            apt.patient_id.to_string(),
            apt.psychologist_id.to_string(),
            apt.scheduled_at.format(DATETIME_FMT).to_string(),
            apt.status.as_str(),
            apt.motive,
            apt.cancel_reason,
            apt.session_note,
            apt.price_cents,
            apt.capture_line,
            apt.capture_due_date.format(DATE_FMT).to_string(),
            apt.created_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_appointment(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"
    ))?;

    match stmt.query_row(params![id.to_string()], read_row) {
        Ok(raw) => Ok(Some(raw.try_into()?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Id of the live (non-cancelled) appointment at the given instant, if any.
pub fn live_appointment_at(
    conn: &Connection,
    at: NaiveDateTime,
) -> Result<Option<Uuid>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id FROM appointments WHERE scheduled_at = ?1 AND status != 'cancelled'",
        params![at.format(DATETIME_FMT).to_string()],
        |row| row.get::<_, String>(0),
    );

    match result {
        Ok(id) => Ok(Some(parse_uuid(&id)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Move an appointment to a new instant and psychologist.
pub fn update_schedule(
    conn: &Connection,
    id: &Uuid,
    scheduled_at: NaiveDateTime,
    psychologist_id: &Uuid,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments SET scheduled_at = ?1, psychologist_id = ?2 WHERE id = ?3",
        params![
            scheduled_at.format(DATETIME_FMT).to_string(),
            psychologist_id.to_string(),
            id.to_string(),
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn mark_confirmed(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    set_status(conn, id, AppointmentStatus::Confirmed, None, None)
}

pub fn mark_cancelled(conn: &Connection, id: &Uuid, reason: &str) -> Result<(), DatabaseError> {
    set_status(conn, id, AppointmentStatus::Cancelled, Some(reason), None)
}

pub fn mark_concluded(conn: &Connection, id: &Uuid, note: &str) -> Result<(), DatabaseError> {
    set_status(conn, id, AppointmentStatus::Concluded, None, Some(note))
}

fn set_status(
    conn: &Connection,
    id: &Uuid,
    status: AppointmentStatus,
    cancel_reason: Option<&str>,
    session_note: Option<&str>,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments
         SET status = ?1,
             cancel_reason = COALESCE(?2, cancel_reason),
             session_note = COALESCE(?3, session_note)
         WHERE id = ?4",
        params![status.as_str(), cancel_reason, session_note, id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn appointments_by_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    select_appointments(
        conn,
        &format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE patient_id = ?1 ORDER BY scheduled_at"
        ),
        params![patient_id.to_string()],
    )
}

pub fn appointments_by_psychologist(
    conn: &Connection,
    psychologist_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    select_appointments(
        conn,
        &format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE psychologist_id = ?1 ORDER BY scheduled_at"
        ),
        params![psychologist_id.to_string()],
    )
}

pub fn appointments_by_status(
    conn: &Connection,
    status: AppointmentStatus,
) -> Result<Vec<Appointment>, DatabaseError> {
    select_appointments(
        conn,
        &format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE status = ?1 ORDER BY scheduled_at"
        ),
        params![status.as_str()],
    )
}

pub fn appointments_on_date(
    conn: &Connection,
    date: NaiveDate,
) -> Result<Vec<Appointment>, DatabaseError> {
    select_appointments(
        conn,
        &format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE date(scheduled_at) = ?1 ORDER BY scheduled_at"
        ),
        params![date.format(DATE_FMT).to_string()],
    )
}

/// Start times already held by live appointments on the given date.
pub fn booked_times_on(
    conn: &Connection,
    date: NaiveDate,
) -> Result<Vec<NaiveTime>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT time(scheduled_at) FROM appointments
         WHERE date(scheduled_at) = ?1 AND status != 'cancelled'
         ORDER BY scheduled_at",
    )?;

    let rows = stmt.query_map(params![date.format(DATE_FMT).to_string()], |row| {
        row.get::<_, String>(0)
    })?;

    let mut times = Vec::new();
    for row in rows {
        let s = row?;
        let t = NaiveTime::parse_from_str(&s, "%H:%M:%S")
            .map_err(|e| DatabaseError::ConstraintViolation(format!("bad time {s}: {e}")))?;
        times.push(t);
    }
    Ok(times)
}
