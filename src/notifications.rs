//! Notification emitter — messages addressed to psychologists with a
//! read/unread workflow.
//!
//! Emitted synchronously by the scheduling module on reschedule; the
//! caller decides the transactional boundary (see `scheduling`).

use chrono::{Local, NaiveDateTime};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::Notification;

/// Record a message for the psychologist, timestamped now, unread.
pub fn notify(
    conn: &Connection,
    psychologist_id: Uuid,
    message: &str,
) -> Result<Notification, DatabaseError> {
    let notification = Notification {
        id: Uuid::new_v4(),
        psychologist_id,
        message: message.to_string(),
        created_at: Local::now().naive_local(),
        read: false,
    };
    db::insert_notification(conn, &notification)?;
    tracing::debug!(psychologist = %psychologist_id, "notification emitted");
    Ok(notification)
}

pub fn unread_for(
    conn: &Connection,
    psychologist_id: &Uuid,
) -> Result<Vec<Notification>, DatabaseError> {
    db::unread_notifications(conn, psychologist_id)
}

pub fn count_unread(conn: &Connection, psychologist_id: &Uuid) -> Result<i64, DatabaseError> {
    db::count_unread_notifications(conn, psychologist_id)
}

/// Idempotent: a second call finds nothing unread and changes nothing.
pub fn mark_all_read(conn: &Connection, psychologist_id: &Uuid) -> Result<(), DatabaseError> {
    db::mark_notifications_read(conn, psychologist_id)
}

/// Message shown to the newly assigned psychologist after a reschedule.
/// Falls back to a generic subject when the patient row is missing.
pub fn reschedule_message(patient_name: Option<&str>, new_time: NaiveDateTime) -> String {
    format!(
        "Appointment with {} rescheduled to {}",
        patient_name.unwrap_or("a patient"),
        new_time.format("%Y-%m-%d %H:%M")
    )
}
