//! # guild-db
//!
//! SQLite persistence for the guild distribution engine.
//! Manages the single database at `$GUILD_DATA_DIR/guild.db`.
//!
//! ## Schema
//!
//! - WAL mode mandatory
//! - Foreign keys enforced
//! - Distribution times are block slots, other timestamps Unix seconds
//! - Schema version stored in `PRAGMA user_version`
//!
//! Every engine entry point runs through [`transact`], so a call that fails
//! leaves no trace.

pub mod host;
pub mod migrations;
pub mod queries;
pub mod schema;

use guild_distribution::DistributionError;
use guild_types::{BlockTimestamp, Name};
use rusqlite::Connection;
use std::path::Path;

pub use host::SqliteHost;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Distribution(#[from] DistributionError),
}

impl From<DbError> for DistributionError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Distribution(inner) => inner,
            other => DistributionError::Storage(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Open or create the guild database at the given path.
///
/// Configures WAL mode, foreign keys, and runs any pending migrations.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing).
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Configure SQLite pragmas.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;
         PRAGMA cache_size = -8000;",
    )?;
    Ok(())
}

/// Run one engine call inside a transaction.
///
/// The transaction commits only if `f` succeeds; any error rolls back every
/// write the call made.
pub fn transact<T>(
    conn: &mut Connection,
    contract: &Name,
    now: BlockTimestamp,
    f: impl FnOnce(&mut SqliteHost<'_>) -> guild_distribution::Result<T>,
) -> Result<T> {
    let tx = conn.transaction()?;
    let value = {
        let mut host = SqliteHost::new(&tx, contract.clone(), now);
        f(&mut host)?
    };
    tx.commit()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use guild_distribution::Ledger;
    use guild_types::AccountScope;

    #[test]
    fn test_open_memory() {
        let conn = open_memory().expect("open in-memory db");
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("get user_version");
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_wal_mode() {
        let conn = open_memory().expect("open");
        let mode: String = conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .expect("get journal_mode");
        // In-memory databases use "memory" mode, not WAL
        assert!(mode == "wal" || mode == "memory");
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = open_memory().expect("open");
        let fk: i32 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .expect("get foreign_keys");
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_transact_commits_on_success() {
        let mut conn = open_memory().expect("open");
        let contract = Name::from("guild");
        transact(&mut conn, &contract, BlockTimestamp::default(), |host| {
            host.credit(AccountScope::Owned, &Name::from("master"), 10)
        })
        .expect("commit");
        let balance = queries::accounts::balance(&conn, AccountScope::Owned, &Name::from("master"))
            .expect("balance");
        assert_eq!(balance, Some(10));
    }

    #[test]
    fn test_transact_rolls_back_on_error() {
        let mut conn = open_memory().expect("open");
        let contract = Name::from("guild");
        let result = transact(&mut conn, &contract, BlockTimestamp::default(), |host| {
            host.credit(AccountScope::Owned, &Name::from("master"), 10)?;
            host.debit(AccountScope::Owned, &Name::from("master"), 11)
        });
        assert!(matches!(
            result,
            Err(DbError::Distribution(DistributionError::InsufficientBalance { .. }))
        ));
        let balance = queries::accounts::balance(&conn, AccountScope::Owned, &Name::from("master"))
            .expect("balance");
        assert_eq!(balance, None);
    }
}
