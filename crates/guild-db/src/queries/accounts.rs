//! Ledger and distribution point query functions.

use guild_types::{AccountScope, Amount, BlockTimestamp, Name};
use rusqlite::{Connection, OptionalExtension};

use crate::{DbError, Result};

/// Balance of one account, `None` if it does not exist.
pub fn balance(conn: &Connection, scope: AccountScope, owner: &Name) -> Result<Option<Amount>> {
    let balance: Option<i64> = conn
        .query_row(
            "SELECT balance FROM accounts WHERE scope = ?1 AND owner = ?2",
            rusqlite::params![scope.to_string(), owner.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(balance.map(|b| b as u64))
}

/// Add to an account, creating it if needed.
pub fn add(conn: &Connection, scope: AccountScope, owner: &Name, amount: Amount) -> Result<()> {
    let current = balance(conn, scope, owner)?.unwrap_or(0);
    let updated = current
        .checked_add(amount)
        .filter(|b| i64::try_from(*b).is_ok())
        .ok_or_else(|| DbError::Constraint(format!("balance overflow for {owner} in {scope}")))?;
    if updated == 0 {
        return Ok(());
    }
    conn.execute(
        "INSERT OR REPLACE INTO accounts (scope, owner, balance) VALUES (?1, ?2, ?3)",
        rusqlite::params![scope.to_string(), owner.as_str(), updated as i64],
    )?;
    Ok(())
}

/// Subtract from an account, deleting it when it reaches zero.
pub fn subtract(conn: &Connection, scope: AccountScope, owner: &Name, amount: Amount) -> Result<()> {
    let current = balance(conn, scope, owner)?.unwrap_or(0);
    let updated = current.checked_sub(amount).ok_or_else(|| {
        DbError::Constraint(format!(
            "overdraw of {owner} in {scope}: need {amount}, have {current}"
        ))
    })?;
    if updated == 0 {
        conn.execute(
            "DELETE FROM accounts WHERE scope = ?1 AND owner = ?2",
            rusqlite::params![scope.to_string(), owner.as_str()],
        )?;
    } else {
        conn.execute(
            "UPDATE accounts SET balance = ?1 WHERE scope = ?2 AND owner = ?3",
            rusqlite::params![updated as i64, scope.to_string(), owner.as_str()],
        )?;
    }
    Ok(())
}

/// Every account under `scope`, by owner.
pub fn list_scope(conn: &Connection, scope: AccountScope) -> Result<Vec<(Name, Amount)>> {
    let mut stmt =
        conn.prepare("SELECT owner, balance FROM accounts WHERE scope = ?1 ORDER BY owner ASC")?;

    let rows = stmt
        .query_map([scope.to_string()], |row| {
            Ok((
                Name::new(row.get::<_, String>(0)?),
                row.get::<_, i64>(1)? as u64,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Whether `scope` holds no accounts.
pub fn scope_is_empty(conn: &Connection, scope: AccountScope) -> Result<bool> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM accounts WHERE scope = ?1 LIMIT 1",
            [scope.to_string()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(exists.is_none())
}

/// Delete every account under `scope`.
pub fn clear_scope(conn: &Connection, scope: AccountScope) -> Result<()> {
    conn.execute("DELETE FROM accounts WHERE scope = ?1", [scope.to_string()])?;
    Ok(())
}

/// Register a distribution point. Already known points are left alone.
pub fn register_point(conn: &Connection, time: BlockTimestamp, rank: u8) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO distribution_points (distribution_time, rank) VALUES (?1, ?2)",
        rusqlite::params![i64::from(time.slot), i64::from(rank)],
    )?;
    Ok(())
}

/// Up to `limit` distribution points, oldest first.
pub fn points(conn: &Connection, limit: usize) -> Result<Vec<AccountScope>> {
    let mut stmt = conn.prepare(
        "SELECT distribution_time, rank FROM distribution_points
         ORDER BY distribution_time ASC, rank ASC LIMIT ?1",
    )?;

    let rows = stmt
        .query_map([i64::try_from(limit).unwrap_or(i64::MAX)], |row| {
            Ok(AccountScope::distribution(
                BlockTimestamp::from_slot(row.get::<_, i64>(0)? as u32),
                row.get::<_, i64>(1)? as u8,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Forget a distribution point.
pub fn erase_point(conn: &Connection, time: BlockTimestamp, rank: u8) -> Result<()> {
    conn.execute(
        "DELETE FROM distribution_points WHERE distribution_time = ?1 AND rank = ?2",
        rusqlite::params![i64::from(time.slot), i64::from(rank)],
    )?;
    Ok(())
}
