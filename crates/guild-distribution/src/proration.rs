//! Per-rank payout schedule.
//!
//! The swept amount is cut into one equal slice per rank level. A level is
//! paid to every member at or above it, so the slice of level `r` is divided
//! among the cumulative count of members with rank `>= r`:
//!
//! ```text
//! per_rank   = amount / levels
//! total(r)   = Σ ranks[r..]
//! this_rank  = per_rank / total(r)
//! remaining  = amount - Σ this_rank(r) * total(r)
//! ```
//!
//! A member of rank `k` collects `this_rank(1) + ... + this_rank(k)`. The
//! rounding remainder is spread over the members of the highest populated
//! level; what does not divide evenly among them stays in the period's rank-0
//! account and is returned to the master pool when the period closes.

use guild_types::{Amount, BlockTimestamp, CurrentDistribution};

use crate::host::MemberRegistry;
use crate::Result;

/// Result of splitting an amount across rank levels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankSplit {
    /// Per-member amount of each level before the remainder is folded in;
    /// index `r - 1` holds level `r`.
    pub per_member: Vec<Amount>,
    /// Members paid at each level.
    pub cumulative: Vec<u64>,
    /// What the integer divisions left over.
    pub remainder: Amount,
}

impl RankSplit {
    /// Split `amount` using the member count per rank.
    ///
    /// `ranks[0]` counts unranked members and is ignored. Returns `None` when
    /// there is no rank level or no ranked member to pay.
    pub fn compute(amount: Amount, ranks: &[u16]) -> Option<Self> {
        let levels = ranks.len().checked_sub(1).filter(|levels| *levels > 0)?;
        let per_rank = amount / levels as u64;

        let mut total = 0u64;
        let mut remaining = amount;
        let mut per_member = Vec::with_capacity(levels);
        let mut cumulative = Vec::with_capacity(levels);
        for &count in ranks[1..].iter().rev() {
            total += u64::from(count);
            let this_rank = if total == 0 { 0 } else { per_rank / total };
            remaining -= this_rank * total;
            per_member.push(this_rank);
            cumulative.push(total);
        }
        if total == 0 {
            return None;
        }
        per_member.reverse();
        cumulative.reverse();

        Some(Self {
            per_member,
            cumulative,
            remainder: remaining,
        })
    }

    /// Index of the highest level with at least one member.
    fn top_populated(&self) -> Option<usize> {
        self.cumulative.iter().rposition(|&count| count > 0)
    }

    /// Per-member share of the remainder for the highest populated level.
    fn top_bonus(&self) -> Option<(usize, Amount)> {
        let top = self.top_populated()?;
        Some((top, self.remainder / self.cumulative[top]))
    }

    /// What stays unpaid after the remainder is spread.
    pub fn undistributed(&self) -> Amount {
        match self.top_bonus() {
            Some((top, bonus)) => self.remainder - bonus * self.cumulative[top],
            None => self.remainder,
        }
    }

    /// The payout schedule with the remainder spread over the highest
    /// populated level.
    pub fn into_rank_distribution(self) -> Vec<Amount> {
        let bonus = self.top_bonus();
        let mut rank_distribution = self.per_member;
        if let Some((top, bonus)) = bonus {
            if let Some(slot) = rank_distribution.get_mut(top) {
                *slot += bonus;
            }
        }
        rank_distribution
    }
}

/// Build the active record for a period from the current rank histogram.
///
/// Returns `None` when nobody holds a rank yet; the caller keeps the funds
/// parked until an election produces ranks.
pub fn make_distribution<M: MemberRegistry + ?Sized>(
    members: &M,
    distribution_time: BlockTimestamp,
    amount: Amount,
) -> Result<Option<CurrentDistribution>> {
    let ranks = members.rank_histogram()?;
    let Some(split) = RankSplit::compute(amount, &ranks) else {
        tracing::warn!(
            %distribution_time,
            amount,
            levels = ranks.len().saturating_sub(1),
            "no ranked members, deferring rank split"
        );
        return Ok(None);
    };

    let undistributed = split.undistributed();
    let rank_distribution = split.into_rank_distribution();
    tracing::debug!(
        %distribution_time,
        amount,
        undistributed,
        ?rank_distribution,
        "computed rank distribution"
    );
    Ok(Some(CurrentDistribution::new(distribution_time, rank_distribution)))
}
