//! The distribution record queue.
//!
//! Records are keyed by the start time of their period and processed oldest
//! first. The newest record is always a [`NextDistribution`] marker.

use serde::{Deserialize, Serialize};

use crate::{Amount, BlockTimestamp, Name};

/// A period that is not due yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextDistribution {
    pub distribution_time: BlockTimestamp,
}

/// Funds swept while an election was running; the rank split waits for the
/// election result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionDistribution {
    pub distribution_time: BlockTimestamp,
    pub amount: Amount,
}

/// A period being paid out to members.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentDistribution {
    pub distribution_time: BlockTimestamp,
    /// Per-member payout of each rank level; index `r - 1` holds level `r`.
    pub rank_distribution: Vec<Amount>,
    /// Last member paid. Empty until the walk starts.
    pub last_processed: Name,
}

impl CurrentDistribution {
    pub fn new(distribution_time: BlockTimestamp, rank_distribution: Vec<Amount>) -> Self {
        Self {
            distribution_time,
            rank_distribution,
            last_processed: Name::empty(),
        }
    }

    /// What a member of `rank` collects over all levels up to and including
    /// their own.
    pub fn member_total(&self, rank: u8) -> Amount {
        self.rank_distribution
            .iter()
            .take(usize::from(rank))
            .sum()
    }
}

/// One row of the distribution queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistributionRecord {
    Next(NextDistribution),
    Election(ElectionDistribution),
    Current(CurrentDistribution),
}

impl DistributionRecord {
    pub fn next(distribution_time: BlockTimestamp) -> Self {
        Self::Next(NextDistribution { distribution_time })
    }

    /// The primary key of the row.
    pub fn distribution_time(&self) -> BlockTimestamp {
        match self {
            Self::Next(next) => next.distribution_time,
            Self::Election(election) => election.distribution_time,
            Self::Current(current) => current.distribution_time,
        }
    }

    /// Short tag, also used as the persisted `kind` column.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Next(_) => "next",
            Self::Election(_) => "election",
            Self::Current(_) => "current",
        }
    }
}
