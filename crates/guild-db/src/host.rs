//! SQLite-backed distribution host.
//!
//! Wraps a connection (normally the transaction opened by
//! [`crate::transact`]) and exposes the tables to the distribution engine.
//! Members, pools and the election schedule are read from the same database.

use guild_distribution::{
    DistributionError, DistributionTables, ElectionOracle, Host, Ledger, MemberRegistry,
};
use guild_types::{AccountScope, Amount, BlockTimestamp, DistributionRecord, Member, Name, Pool};
use rusqlite::Connection;

use crate::queries::{accounts, distributions, members, pools, settings};

type Result<T> = guild_distribution::Result<T>;

/// A [`Host`] over one SQLite connection at a fixed block time.
pub struct SqliteHost<'c> {
    conn: &'c Connection,
    contract: Name,
    now: BlockTimestamp,
}

impl<'c> SqliteHost<'c> {
    pub fn new(conn: &'c Connection, contract: Name, now: BlockTimestamp) -> Self {
        Self {
            conn,
            contract,
            now,
        }
    }
}

impl Ledger for SqliteHost<'_> {
    fn balance(&self, scope: AccountScope, owner: &Name) -> Result<Option<Amount>> {
        Ok(accounts::balance(self.conn, scope, owner)?)
    }

    fn credit(&mut self, scope: AccountScope, owner: &Name, amount: Amount) -> Result<()> {
        accounts::add(self.conn, scope, owner, amount)?;
        if let AccountScope::Distribution { time, rank } = scope {
            accounts::register_point(self.conn, time, rank)?;
        }
        Ok(())
    }

    fn debit(&mut self, scope: AccountScope, owner: &Name, amount: Amount) -> Result<()> {
        let available = accounts::balance(self.conn, scope, owner)?.unwrap_or(0);
        if available < amount {
            return Err(DistributionError::InsufficientBalance {
                scope,
                owner: owner.clone(),
                needed: amount,
                available,
            });
        }
        Ok(accounts::subtract(self.conn, scope, owner, amount)?)
    }

    fn clear_scope(&mut self, scope: AccountScope) -> Result<()> {
        Ok(accounts::clear_scope(self.conn, scope)?)
    }

    fn scope_is_empty(&self, scope: AccountScope) -> Result<bool> {
        Ok(accounts::scope_is_empty(self.conn, scope)?)
    }

    fn distribution_points(&self, limit: usize) -> Result<Vec<AccountScope>> {
        Ok(accounts::points(self.conn, limit)?)
    }

    fn erase_distribution_point(&mut self, scope: AccountScope) -> Result<()> {
        match scope {
            AccountScope::Distribution { time, rank } => {
                Ok(accounts::erase_point(self.conn, time, rank)?)
            }
            AccountScope::Owned => Err(DistributionError::Invariant(
                "owned scope is not a distribution point".to_string(),
            )),
        }
    }
}

impl DistributionTables for SqliteHost<'_> {
    fn pools(&self) -> Result<Vec<Pool>> {
        Ok(pools::list(self.conn)?)
    }

    fn insert_pool(&mut self, pool: &Pool) -> Result<()> {
        Ok(pools::insert(self.conn, pool)?)
    }

    fn clear_pools(&mut self) -> Result<()> {
        Ok(pools::clear(self.conn)?)
    }

    fn records(&self) -> Result<Vec<DistributionRecord>> {
        Ok(distributions::list(self.conn)?)
    }

    fn last_record(&self) -> Result<Option<DistributionRecord>> {
        Ok(distributions::last(self.conn)?)
    }

    fn put_record(&mut self, record: &DistributionRecord) -> Result<()> {
        Ok(distributions::put(self.conn, record)?)
    }

    fn erase_record(&mut self, distribution_time: BlockTimestamp) -> Result<()> {
        Ok(distributions::erase(self.conn, distribution_time)?)
    }

    fn clear_records(&mut self) -> Result<()> {
        Ok(distributions::clear(self.conn)?)
    }
}

impl MemberRegistry for SqliteHost<'_> {
    fn rank_histogram(&self) -> Result<Vec<u16>> {
        let levels = settings::get_u64(self.conn, settings::RANK_LEVELS, 0)?;
        let levels = usize::try_from(levels).unwrap_or(usize::MAX).min(usize::from(u8::MAX));
        Ok(members::rank_histogram(self.conn, levels)?)
    }

    fn members_after(&self, cursor: &Name, limit: usize) -> Result<Vec<Member>> {
        Ok(members::page_after(self.conn, cursor, limit)?)
    }
}

impl ElectionOracle for SqliteHost<'_> {
    fn next_election_time(&self) -> Result<Option<BlockTimestamp>> {
        let slot = settings::get_opt_u64(self.conn, settings::NEXT_ELECTION_TIME)?;
        slot.map(|slot| {
            u32::try_from(slot)
                .map(BlockTimestamp::from_slot)
                .map_err(|_| DistributionError::Storage(format!("election slot {slot} out of range")))
        })
        .transpose()
    }
}

impl Host for SqliteHost<'_> {
    fn now(&self) -> BlockTimestamp {
        self.now
    }

    fn contract(&self) -> &Name {
        &self.contract
    }
}
