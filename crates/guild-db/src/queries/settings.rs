//! Settings query functions.

use rusqlite::Connection;

use crate::{DbError, Result};

/// Slot of the next scheduled election. Absent while an election runs.
pub const NEXT_ELECTION_TIME: &str = "next_election_time";

/// Number of rank levels the membership histogram reports.
pub const RANK_LEVELS: &str = "rank_levels";

/// Get a setting value by key.
pub fn get(conn: &Connection, key: &str) -> Result<String> {
    conn.query_row(
        "SELECT value FROM settings WHERE key = ?1",
        [key],
        |row| row.get(0),
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => {
            DbError::NotFound(format!("setting '{key}'"))
        }
        other => DbError::Sqlite(other),
    })
}

/// Set a setting value.
pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
        rusqlite::params![key, value],
    )?;
    Ok(())
}

/// Remove a setting.
pub fn remove(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key = ?1", [key])?;
    Ok(())
}

/// Get a setting as u64, `None` if not set.
pub fn get_opt_u64(conn: &Connection, key: &str) -> Result<Option<u64>> {
    match get(conn, key) {
        Ok(v) => v
            .parse()
            .map(Some)
            .map_err(|e: std::num::ParseIntError| DbError::Serialization(e.to_string())),
        Err(DbError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Get a setting as u64, defaulting to `default` if not found.
pub fn get_u64(conn: &Connection, key: &str, default: u64) -> Result<u64> {
    Ok(get_opt_u64(conn, key)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    #[test]
    fn test_get_default_setting() {
        let conn = test_db();
        assert_eq!(get(&conn, RANK_LEVELS).expect("get"), "0");
    }

    #[test]
    fn test_set_and_get() {
        let conn = test_db();
        set(&conn, RANK_LEVELS, "4").expect("set");
        assert_eq!(get_u64(&conn, RANK_LEVELS, 0).expect("get"), 4);
    }

    #[test]
    fn test_get_nonexistent() {
        let conn = test_db();
        let result = get(&conn, "nonexistent");
        assert!(matches!(result, Err(DbError::NotFound(_))));
        assert_eq!(get_opt_u64(&conn, NEXT_ELECTION_TIME).expect("get"), None);
    }

    #[test]
    fn test_remove() {
        let conn = test_db();
        set(&conn, NEXT_ELECTION_TIME, "1234").expect("set");
        assert_eq!(get_opt_u64(&conn, NEXT_ELECTION_TIME).expect("get"), Some(1234));
        remove(&conn, NEXT_ELECTION_TIME).expect("remove");
        assert_eq!(get_opt_u64(&conn, NEXT_ELECTION_TIME).expect("get"), None);
    }

    #[test]
    fn test_garbage_is_a_serialization_error() {
        let conn = test_db();
        set(&conn, RANK_LEVELS, "many").expect("set");
        assert!(matches!(
            get_u64(&conn, RANK_LEVELS, 0),
            Err(DbError::Serialization(_))
        ));
    }
}
