//! Ledger scopes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::BlockTimestamp;

/// The scope an account balance lives under.
///
/// Pool balances live under [`AccountScope::Owned`]. Every distribution
/// period owns one scope per rank: rank 0 holds the swept total waiting to be
/// split, ranks 1.. hold what members were paid at that rank. Each
/// distribution scope is a "distribution point"; points order by time, then
/// rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountScope {
    Owned,
    Distribution { time: BlockTimestamp, rank: u8 },
}

impl AccountScope {
    pub fn distribution(time: BlockTimestamp, rank: u8) -> Self {
        Self::Distribution { time, rank }
    }

    pub fn is_distribution(&self) -> bool {
        matches!(self, Self::Distribution { .. })
    }
}

impl fmt::Display for AccountScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owned => f.write_str("owned"),
            Self::Distribution { time, rank } => write!(f, "dist.{}.{}", time.slot, rank),
        }
    }
}
