//! Distribution record queue query functions.
//!
//! Rows are keyed by the period's start slot, so primary-key order is queue
//! order.

use guild_types::{BlockTimestamp, DistributionRecord};
use rusqlite::{Connection, OptionalExtension};

use crate::{DbError, Result};

fn decode(value: &str) -> Result<DistributionRecord> {
    serde_json::from_str(value).map_err(|e| DbError::Serialization(e.to_string()))
}

/// Insert or replace a record.
pub fn put(conn: &Connection, record: &DistributionRecord) -> Result<()> {
    let value =
        serde_json::to_string(record).map_err(|e| DbError::Serialization(e.to_string()))?;
    conn.execute(
        "INSERT OR REPLACE INTO distributions (distribution_time, kind, value)
         VALUES (?1, ?2, ?3)",
        rusqlite::params![
            i64::from(record.distribution_time().slot),
            record.kind(),
            value,
        ],
    )?;
    Ok(())
}

/// All records, oldest first.
pub fn list(conn: &Connection) -> Result<Vec<DistributionRecord>> {
    let mut stmt =
        conn.prepare("SELECT value FROM distributions ORDER BY distribution_time ASC")?;

    let values = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    values.iter().map(|value| decode(value)).collect()
}

/// The newest record.
pub fn last(conn: &Connection) -> Result<Option<DistributionRecord>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM distributions ORDER BY distribution_time DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    value.as_deref().map(decode).transpose()
}

/// Delete the record of one period.
pub fn erase(conn: &Connection, distribution_time: BlockTimestamp) -> Result<()> {
    conn.execute(
        "DELETE FROM distributions WHERE distribution_time = ?1",
        [i64::from(distribution_time.slot)],
    )?;
    Ok(())
}

/// Delete every record.
pub fn clear(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM distributions", [])?;
    Ok(())
}
