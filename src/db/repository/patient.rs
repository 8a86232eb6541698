use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Patient;

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String, Option<String>)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn to_patient(
    (id, username, name, psychologist_id): (String, String, String, Option<String>),
) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        username,
        name,
        psychologist_id: match psychologist_id {
            Some(p) => Some(
                Uuid::parse_str(&p)
                    .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            ),
            None => None,
        },
    })
}

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, username, name, psychologist_id) VALUES (?1, ?2, ?3, ?4)",
        params![
            patient.id.to_string(),
            patient.username,
            patient.name,
            patient.psychologist_id.map(|id| id.to_string()),
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    let raw = conn
        .query_row(
            "SELECT id, username, name, psychologist_id FROM patients WHERE id = ?1",
            params![id.to_string()],
            read_row,
        )
        .optional()?;
    raw.map(to_patient).transpose()
}

pub fn get_patient_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<Patient>, DatabaseError> {
    let raw = conn
        .query_row(
            "SELECT id, username, name, psychologist_id FROM patients WHERE username = ?1",
            params![username],
            read_row,
        )
        .optional()?;
    raw.map(to_patient).transpose()
}
