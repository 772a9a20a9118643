//! Read path — substring search over entry content.

use anyhow::Result;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

/// A single search hit, as returned over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryMatch {
    pub timestamp: String,
    pub category: String,
    pub content: String,
}

/// Find all entries whose content contains `keyword` as a substring.
///
/// Only the `content` column is searched; category and timestamp are not.
/// Results come back in storage order — an artifact of the full scan, not a
/// contractual ordering. No keyword is an error: an unmatched keyword simply
/// yields an empty vec.
pub fn search_content(conn: &Connection, keyword: &str) -> Result<Vec<MemoryMatch>> {
    let pattern = format!("%{keyword}%");
    let mut stmt =
        conn.prepare("SELECT timestamp, category, content FROM memory WHERE content LIKE ?1")?;
    let matches = stmt
        .query_map(params![pattern], |row| {
            Ok(MemoryMatch {
                timestamp: row.get(0)?,
                category: row.get(1)?,
                content: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(matches)
}
