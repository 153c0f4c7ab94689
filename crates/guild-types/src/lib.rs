//! # guild-types
//!
//! Shared domain types used across the guild workspace: account names,
//! block timestamps, ledger scopes, members, pools and the distribution
//! record queue.

pub mod account;
pub mod distribution;
pub mod member;
pub mod name;
pub mod time;

pub use account::AccountScope;
pub use distribution::{
    CurrentDistribution, DistributionRecord, ElectionDistribution, NextDistribution,
};
pub use member::{Member, Pool};
pub use name::Name;
pub use time::BlockTimestamp;

/// Balances are whole units of the community token.
pub type Amount = u64;

/// Length of a regular distribution period.
pub const DISTRIBUTION_PERIOD_DAYS: u32 = 30;

/// Name of the pool created when the registry is bootstrapped.
pub const DEFAULT_POOL_NAME: &str = "master";

/// Monthly percentage swept out of the bootstrap pool.
pub const DEFAULT_POOL_PCT: u8 = 5;

/// Hundredths of a second in a 30-day month.
///
/// Denominator of a prorated sweep, paired with a numerator expressed in
/// seconds of the shortened period.
pub const PRORATE_DENOMINATOR: u32 = 30 * 24 * 60 * 60 * 100;
