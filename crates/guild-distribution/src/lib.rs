//! # guild-distribution
//!
//! Recurring, resumable fund distribution for a ranked community.
//!
//! Every 30 days a share of each pool is swept into a distribution account
//! for the period, split across election ranks, and paid out to members a
//! bounded number of steps at a time. All progress lives in the host's
//! tables, so any call can stop after any step and the next call picks up
//! from persisted state alone.
//!
//! ## Modules
//!
//! - [`host`] — Capabilities the engine runs against (ledger, tables, members, elections)
//! - [`proration`] — Per-rank payout schedule
//! - [`pools`] — Pool registry bootstrap
//! - [`scheduler`] — Advancing the period queue and sweeping pools
//! - [`payout`] — Checkpointed member walk
//! - [`monthly`] — Metered driver and election hand-off
//! - [`gc`] — Reclaiming drained distribution points, teardown
//! - [`memory`] — In-memory host

pub mod gc;
pub mod host;
pub mod memory;
pub mod monthly;
pub mod payout;
pub mod pools;
pub mod proration;
pub mod scheduler;

pub use gc::{clear_all, gc};
pub use host::{DistributionTables, ElectionOracle, Host, Ledger, MemberRegistry};
pub use monthly::{distribute_monthly, distribution_queue, process_election_distribution};
pub use pools::init_pools;
pub use scheduler::setup_distribution;

use guild_types::{AccountScope, Amount, Name};

/// Error types for distribution operations.
///
/// Every error aborts the call that raised it; the host discards whatever
/// the call wrote.
#[derive(Debug, thiserror::Error)]
pub enum DistributionError {
    /// Persisted state that correct operation can never produce.
    #[error("invariant failure: {0}")]
    Invariant(String),

    /// A debit larger than the account balance.
    #[error("insufficient balance for {owner} in {scope}: need {needed}, have {available}")]
    InsufficientBalance {
        /// Scope of the account.
        scope: AccountScope,
        /// Owner of the account.
        owner: Name,
        /// Amount requested.
        needed: Amount,
        /// Amount held.
        available: Amount,
    },

    /// Arithmetic overflow.
    #[error("arithmetic overflow in distribution calculation")]
    Overflow,

    /// The host's storage failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl DistributionError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }
}

/// Convenience result type for distribution operations.
pub type Result<T> = std::result::Result<T, DistributionError>;
