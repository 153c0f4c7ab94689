//! Capabilities the distribution engine runs against.
//!
//! The engine never reaches for global state: every operation takes a
//! [`Host`] and reads and writes only through it. The SQLite host lives in
//! `guild-db`; [`crate::memory::MemoryHost`] backs the tests.

use guild_types::{AccountScope, Amount, BlockTimestamp, DistributionRecord, Member, Name, Pool};

use crate::Result;

/// Balances keyed by scope and owner.
pub trait Ledger {
    /// Balance of `owner` under `scope`, `None` if the account does not exist.
    fn balance(&self, scope: AccountScope, owner: &Name) -> Result<Option<Amount>>;

    /// Add to an account, creating it if needed. Crediting a distribution
    /// scope registers its distribution point.
    fn credit(&mut self, scope: AccountScope, owner: &Name, amount: Amount) -> Result<()>;

    /// Subtract from an account. An account that reaches zero is removed.
    ///
    /// # Errors
    ///
    /// - [`crate::DistributionError::InsufficientBalance`] if the balance is short
    fn debit(&mut self, scope: AccountScope, owner: &Name, amount: Amount) -> Result<()>;

    /// Remove every account under `scope`.
    fn clear_scope(&mut self, scope: AccountScope) -> Result<()>;

    /// Whether `scope` holds no accounts.
    fn scope_is_empty(&self, scope: AccountScope) -> Result<bool>;

    /// Up to `limit` registered distribution points, oldest first.
    fn distribution_points(&self, limit: usize) -> Result<Vec<AccountScope>>;

    /// Forget a distribution point. Its accounts are left alone.
    fn erase_distribution_point(&mut self, scope: AccountScope) -> Result<()>;
}

/// The pool table and the distribution record queue.
pub trait DistributionTables {
    fn pools(&self) -> Result<Vec<Pool>>;

    fn insert_pool(&mut self, pool: &Pool) -> Result<()>;

    fn clear_pools(&mut self) -> Result<()>;

    /// Every record, ordered by distribution time.
    fn records(&self) -> Result<Vec<DistributionRecord>>;

    /// The newest record.
    fn last_record(&self) -> Result<Option<DistributionRecord>>;

    /// Insert or replace the record keyed by its distribution time.
    fn put_record(&mut self, record: &DistributionRecord) -> Result<()>;

    fn erase_record(&mut self, distribution_time: BlockTimestamp) -> Result<()>;

    fn clear_records(&mut self) -> Result<()>;
}

/// Read access to the membership.
pub trait MemberRegistry {
    /// Member count per rank; index 0 counts unranked members and the length
    /// is one more than the number of rank levels.
    fn rank_histogram(&self) -> Result<Vec<u16>>;

    /// Up to `limit` members whose account sorts strictly after `cursor`.
    fn members_after(&self, cursor: &Name, limit: usize) -> Result<Vec<Member>>;
}

/// The election subsystem's schedule.
pub trait ElectionOracle {
    /// Start of the next election, `None` while an election is running.
    fn next_election_time(&self) -> Result<Option<BlockTimestamp>>;
}

/// Everything a distribution call needs.
pub trait Host: Ledger + DistributionTables + MemberRegistry + ElectionOracle {
    /// Current block time.
    fn now(&self) -> BlockTimestamp;

    /// Owner of the rank-0 accounts holding swept funds.
    fn contract(&self) -> &Name;
}
