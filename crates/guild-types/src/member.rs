//! Members and pools.

use serde::{Deserialize, Serialize};

use crate::Name;

/// A community member as seen by the distribution engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub account: Name,
    /// 0 = unranked, excluded from payouts.
    pub election_rank: u8,
}

impl Member {
    pub fn new(account: impl Into<Name>, election_rank: u8) -> Self {
        Self {
            account: account.into(),
            election_rank,
        }
    }
}

/// A named fund source swept into every distribution period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub name: Name,
    /// 0-100. Pools need not sum to 100; the rest stays in the pool.
    pub monthly_distribution_pct: u8,
}

impl Pool {
    pub fn new(name: impl Into<Name>, monthly_distribution_pct: u8) -> Self {
        Self {
            name: name.into(),
            monthly_distribution_pct,
        }
    }

    /// The pool created on bootstrap.
    pub fn master() -> Self {
        Self::new(crate::DEFAULT_POOL_NAME, crate::DEFAULT_POOL_PCT)
    }
}
