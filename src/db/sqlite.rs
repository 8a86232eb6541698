use std::path::Path;

use rusqlite::Connection;
use tracing;

use super::DatabaseError;

/// Open a SQLite connection to the given path and run migrations
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> = vec![(
        1,
        include_str!("../../resources/migrations/001_initial.sql"),
    )];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql).map_err(|e| DatabaseError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row(
        "SELECT MAX(version) FROM schema_version",
        [],
        |row| row.get::<_, i64>(0),
    )
    .unwrap_or(0)
}

/// Count tables in the database (for verification)
pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_initializes_all_tables() {
        let conn = open_memory_database().unwrap();
        // schema_version + psychologists + patients + appointments + notifications = 5
        let count = count_tables(&conn).unwrap();
        assert_eq!(count, 5, "Expected 5 tables, got {count}");
    }

    #[test]
    fn schema_version_is_current() {
        let conn = open_memory_database().unwrap();
        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn migration_idempotent() {
        let conn = open_memory_database().unwrap();
        // Run migrations again — should not error
        let result = run_migrations(&conn);
        assert!(result.is_ok());
    }

    #[test]
    fn foreign_keys_enabled() {
        let conn = open_memory_database().unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn database_opens_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_database(&dir.path().join("consulta.db")).unwrap();
        assert_eq!(count_tables(&conn).unwrap(), 5);

        // Re-open — should be idempotent
        let conn2 = open_database(&dir.path().join("consulta.db")).unwrap();
        assert_eq!(count_tables(&conn2).unwrap(), 5);
    }

    #[test]
    fn live_slot_index_rejects_duplicates() {
        let conn = open_memory_database().unwrap();
        conn.execute(
            "INSERT INTO psychologists (id, name) VALUES ('psy-1', 'Dr. Reyes')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO patients (id, username, name, psychologist_id)
             VALUES ('pat-1', 'ana', 'Ana', 'psy-1')",
            [],
        )
        .unwrap();

        let insert = "INSERT INTO appointments
             (id, patient_id, psychologist_id, scheduled_at, status,
              price_cents, capture_line, capture_due_date, created_at)
             VALUES (?1, 'pat-1', 'psy-1', '2030-03-11 09:00:00', ?2,
                     50000, '0123456789', '2030-03-11', '2030-03-01 10:00:00')";

        conn.execute(insert, ["apt-1", "pending"]).unwrap();
        // Same instant, live status — must hit the partial unique index
        let dup = conn.execute(insert, ["apt-2", "confirmed"]);
        assert!(dup.is_err());

        // Cancelled rows are outside the index, so the slot frees up
        conn.execute(
            "UPDATE appointments SET status = 'cancelled' WHERE id = 'apt-1'",
            [],
        )
        .unwrap();
        conn.execute(insert, ["apt-3", "pending"]).unwrap();
    }
}
