//! Write path — inserting memory entries.
//!
//! The caller is responsible for holding the process-wide store lock for the
//! duration of the call (the connection itself lives behind a mutex at the
//! server layer). Entries are never updated or deleted once written.

use anyhow::Result;
use rusqlite::{params, Connection};

/// Insert one memory entry with a server-assigned RFC 3339 timestamp.
///
/// Returns the auto-incremented row id. Content validation (non-empty) is an
/// API-boundary concern and is not enforced here.
pub fn insert_entry(conn: &Connection, category: &str, content: &str) -> Result<i64> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO memory (timestamp, category, content) VALUES (?1, ?2, ?3)",
        params![now, category, content],
    )?;
    Ok(conn.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn insert_assigns_timestamp_and_id() {
        let conn = db::open_memory_database().unwrap();

        let id = insert_entry(&conn, "test", "hello world").unwrap();
        assert!(id > 0);

        let (timestamp, category, content): (String, String, String) = conn
            .query_row(
                "SELECT timestamp, category, content FROM memory WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(category, "test");
        assert_eq!(content, "hello world");
        // RFC 3339 timestamps parse back
        assert!(chrono::DateTime::parse_from_rfc3339(&timestamp).is_ok());
    }

    #[test]
    fn ids_increase_monotonically() {
        let conn = db::open_memory_database().unwrap();

        let first = insert_entry(&conn, "a", "one").unwrap();
        let second = insert_entry(&conn, "b", "two").unwrap();
        assert!(second > first);
    }
}
