use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

/// Applies pending schema versions. Safe to call on every open.
pub fn run_migrations(conn: &Connection) -> Result<(), rusqlite::Error> {
    fn is_applied(conn: &Connection, version: i64) -> Result<bool, rusqlite::Error> {
        let row = conn
            .query_row(
                "SELECT 1 FROM schema_migrations WHERE version = ?1",
                params![version],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(row.is_some())
    }

    conn.execute_batch(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
        ",
    )?;

    // Version 1: key-value entries.
    if !is_applied(conn, 1)? {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(
            r"
                CREATE TABLE IF NOT EXISTS kv_entries (
                    key TEXT PRIMARY KEY NOT NULL,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
            ",
        )?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            params![1_i64, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;
    }

    Ok(())
}
