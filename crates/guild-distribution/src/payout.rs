//! Checkpointed member walk.
//!
//! One step pays one member: for every level from 1 up to their rank the
//! member is credited that level's per-member amount in the level's scope,
//! and the period's rank-0 account is debited the same. The cursor on the
//! record is the only progress there is; callers persist it between calls.

use guild_types::{AccountScope, Amount, BlockTimestamp, CurrentDistribution, DEFAULT_POOL_NAME};

use crate::host::Host;
use crate::pools::pools_or_default;
use crate::{DistributionError, Result};

/// Pay up to `max_steps` members of `dist`, resuming after its cursor.
///
/// Returns the unused budget. Zero means the walk may not be finished and
/// `dist` must be saved; anything else means every member has been paid.
///
/// # Errors
///
/// - [`DistributionError::Invariant`] if a member's rank exceeds the schedule
/// - [`DistributionError::InsufficientBalance`] if the period account runs dry
pub fn distribute_to_members<H: Host + ?Sized>(
    host: &mut H,
    mut max_steps: u32,
    dist: &mut CurrentDistribution,
) -> Result<u32> {
    let contract = host.contract().clone();
    let pooled = AccountScope::distribution(dist.distribution_time, 0);
    let mut scopes_by_rank: Vec<AccountScope> = Vec::with_capacity(dist.rank_distribution.len());

    while max_steps > 0 {
        let page = host.members_after(&dist.last_processed, max_steps as usize)?;
        let exhausted = page.len() < max_steps as usize;

        for member in page {
            let rank = usize::from(member.election_rank);
            if rank > dist.rank_distribution.len() {
                return Err(DistributionError::invariant(format!(
                    "rank too high: {} has rank {rank}, schedule has {} levels",
                    member.account,
                    dist.rank_distribution.len()
                )));
            }
            while scopes_by_rank.len() < rank {
                let level = u8::try_from(scopes_by_rank.len() + 1)
                    .map_err(|_| DistributionError::invariant("rank level out of range"))?;
                scopes_by_rank.push(AccountScope::distribution(dist.distribution_time, level));
            }
            for (&scope, &amount) in scopes_by_rank.iter().zip(&dist.rank_distribution).take(rank) {
                if amount == 0 {
                    continue;
                }
                host.credit(scope, &member.account, amount)?;
                host.debit(pooled, &contract, amount)?;
            }
            dist.last_processed = member.account;
            max_steps -= 1;
        }

        if exhausted {
            break;
        }
    }

    tracing::debug!(
        distribution_time = %dist.distribution_time,
        cursor = %dist.last_processed,
        remaining_steps = max_steps,
        "payout walk paused"
    );
    Ok(max_steps)
}

/// Move whatever the walk left in the period's rank-0 account back to a
/// registered pool: `master` if it exists, otherwise the first pool. Returns
/// the amount moved.
pub(crate) fn return_undistributed<H: Host + ?Sized>(
    host: &mut H,
    distribution_time: BlockTimestamp,
) -> Result<Amount> {
    let contract = host.contract().clone();
    let pooled = AccountScope::distribution(distribution_time, 0);
    let Some(dust) = host.balance(pooled, &contract)?.filter(|dust| *dust > 0) else {
        return Ok(0);
    };
    let pools = pools_or_default(host)?;
    let pool = pools
        .iter()
        .find(|pool| pool.name.as_str() == DEFAULT_POOL_NAME)
        .or_else(|| pools.first())
        .map(|pool| pool.name.clone())
        .ok_or_else(|| DistributionError::invariant("no pool to take the remainder"))?;
    host.debit(pooled, &contract, dust)?;
    host.credit(AccountScope::Owned, &pool, dust)?;
    tracing::debug!(%distribution_time, %pool, dust, "returned undistributed remainder");
    Ok(dust)
}
