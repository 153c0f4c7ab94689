//! Pool registry query functions.

use guild_types::{Name, Pool};
use rusqlite::Connection;

use crate::{DbError, Result};

/// Insert a pool.
pub fn insert(conn: &Connection, pool: &Pool) -> Result<()> {
    conn.execute(
        "INSERT INTO pools (name, monthly_distribution_pct) VALUES (?1, ?2)",
        rusqlite::params![
            pool.name.as_str(),
            i64::from(pool.monthly_distribution_pct)
        ],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DbError::Constraint(format!("pool '{}'", pool.name))
        }
        other => DbError::Sqlite(other),
    })?;
    Ok(())
}

/// List all pools by name.
pub fn list(conn: &Connection) -> Result<Vec<Pool>> {
    let mut stmt =
        conn.prepare("SELECT name, monthly_distribution_pct FROM pools ORDER BY name ASC")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(Pool {
                name: Name::new(row.get::<_, String>(0)?),
                monthly_distribution_pct: row.get::<_, i64>(1)? as u8,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Delete every pool.
pub fn clear(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM pools", [])?;
    Ok(())
}
