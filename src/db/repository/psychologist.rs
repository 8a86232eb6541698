use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Psychologist;

pub fn insert_psychologist(
    conn: &Connection,
    psychologist: &Psychologist,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO psychologists (id, name) VALUES (?1, ?2)",
        params![psychologist.id.to_string(), psychologist.name],
    )?;
    Ok(())
}

pub fn get_psychologist(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<Psychologist>, DatabaseError> {
    let raw = conn
        .query_row(
            "SELECT id, name FROM psychologists WHERE id = ?1",
            params![id.to_string()],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;

    raw.map(|(id, name)| {
        Ok(Psychologist {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            name,
        })
    })
    .transpose()
}
