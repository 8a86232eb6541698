use rusqlite::{params, Connection};
use uuid::Uuid;

use super::DATETIME_FMT;
use crate::db::DatabaseError;
use crate::models::Notification;

pub fn insert_notification(
    conn: &Connection,
    notification: &Notification,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO notifications (id, psychologist_id, message, created_at, read)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            notification.id.to_string(),
            notification.psychologist_id.to_string(),
            notification.message,
            notification.created_at.format(DATETIME_FMT).to_string(),
            notification.read as i32,
        ],
    )?;
    Ok(())
}

pub fn unread_notifications(
    conn: &Connection,
    psychologist_id: &Uuid,
) -> Result<Vec<Notification>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, psychologist_id, message, created_at, read
         FROM notifications
         WHERE psychologist_id = ?1 AND read = 0
         ORDER BY created_at DESC",
    )?;

    let rows = stmt.query_map(params![psychologist_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, i32>(4)?,
        ))
    })?;

    let mut notifications = Vec::new();
    for row in rows {
        let (id, psychologist_id, message, created_at, read) = row?;
        notifications.push(Notification {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            psychologist_id: Uuid::parse_str(&psychologist_id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            message,
            created_at: chrono::NaiveDateTime::parse_from_str(&created_at, DATETIME_FMT)
                .map_err(|e| {
                    DatabaseError::ConstraintViolation(format!("bad datetime {created_at}: {e}"))
                })?,
            read: read != 0,
        });
    }
    Ok(notifications)
}

pub fn count_unread_notifications(
    conn: &Connection,
    psychologist_id: &Uuid,
) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM notifications WHERE psychologist_id = ?1 AND read = 0",
        params![psychologist_id.to_string()],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

/// Mark every notification for the psychologist as read. Idempotent: rows
/// already read match nothing, so a second call is a no-op.
pub fn mark_notifications_read(
    conn: &Connection,
    psychologist_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE notifications SET read = 1 WHERE psychologist_id = ?1 AND read = 0",
        params![psychologist_id.to_string()],
    )?;
    Ok(())
}
