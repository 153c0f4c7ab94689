//! Advancing the period queue.
//!
//! Each due [`NextDistribution`] marker becomes a funded period: every pool
//! gives up its monthly percentage into the period's rank-0 account, the
//! marker is replaced by the period's record, and a new marker is appended
//! 30 days later, or at the next election if that comes first. A period cut
//! short by an election sweeps a prorated share:
//!
//! ```text
//! sweep = (seconds / 2) * pct * balance / (30 * 24 * 60 * 60 * 100)
//! ```

use guild_types::{
    AccountScope, Amount, BlockTimestamp, DistributionRecord, ElectionDistribution,
    NextDistribution, Pool, DISTRIBUTION_PERIOD_DAYS, PRORATE_DENOMINATOR,
};

use crate::host::Host;
use crate::pools::pools_or_default;
use crate::proration::make_distribution;
use crate::{DistributionError, Result};

/// Turn every due marker into a funded period.
///
/// `init` seeds the queue when it is empty; the zero timestamp means "do not
/// seed". Returns whether any period was processed.
///
/// # Errors
///
/// - [`DistributionError::Invariant`] if the newest record is not a marker
/// - [`DistributionError::Overflow`] if a period would start past the last
///   representable block time
pub fn setup_distribution<H: Host + ?Sized>(host: &mut H, init: BlockTimestamp) -> Result<bool> {
    let mut next = match host.last_record()? {
        Some(DistributionRecord::Next(next)) => next,
        Some(_) => {
            return Err(DistributionError::invariant("no next distribution"));
        }
        None if init.is_zero() => return Ok(false),
        None => {
            let next = NextDistribution {
                distribution_time: init,
            };
            host.put_record(&DistributionRecord::Next(next.clone()))?;
            tracing::info!(distribution_time = %init, "seeded distribution queue");
            next
        }
    };

    let next_election_time = host.next_election_time()?;
    let mut progressed = false;
    while next.distribution_time <= host.now() {
        let next_time = advance_period(host, next.distribution_time, next_election_time)?;
        next = NextDistribution {
            distribution_time: next_time,
        };
        host.put_record(&DistributionRecord::Next(next.clone()))?;
        progressed = true;
    }
    Ok(progressed)
}

/// Fund the period starting at `distribution_time` and return when the next
/// one starts.
fn advance_period<H: Host + ?Sized>(
    host: &mut H,
    distribution_time: BlockTimestamp,
    next_election_time: Option<BlockTimestamp>,
) -> Result<BlockTimestamp> {
    let mut next_time = distribution_time.plus_days(DISTRIBUTION_PERIOD_DAYS);
    if next_time <= distribution_time {
        // Block time saturated; the queue can no longer move forward.
        return Err(DistributionError::Overflow);
    }
    let mut prorate_num = None;
    if let Some(election) = next_election_time {
        if election > distribution_time && election < next_time {
            next_time = election;
            prorate_num = Some(u128::from(election.seconds_since(distribution_time)));
        }
    }

    let contract = host.contract().clone();
    let dist_scope = AccountScope::distribution(distribution_time, 0);
    for pool in pools_or_default(host)? {
        let Some(balance) = host.balance(AccountScope::Owned, &pool.name)? else {
            continue;
        };
        let amount = sweep_amount(&pool, balance, prorate_num)?;
        if amount == 0 {
            continue;
        }
        host.debit(AccountScope::Owned, &pool.name, amount)?;
        host.credit(dist_scope, &contract, amount)?;
        tracing::debug!(
            pool = %pool.name,
            amount,
            %distribution_time,
            "swept pool into distribution"
        );
    }

    match host.balance(dist_scope, &contract)? {
        Some(total) if total > 0 => {
            let record = period_record(host, distribution_time, total, next_election_time)?;
            tracing::info!(
                %distribution_time,
                %next_time,
                total,
                kind = record.kind(),
                prorated = prorate_num.is_some(),
                "distribution period funded"
            );
            host.put_record(&record)?;
        }
        _ => {
            tracing::info!(%distribution_time, "nothing to distribute, dropping period");
            host.erase_record(distribution_time)?;
        }
    }
    Ok(next_time)
}

/// The record for a funded period: split now unless an election is running.
fn period_record<H: Host + ?Sized>(
    host: &H,
    distribution_time: BlockTimestamp,
    amount: Amount,
    next_election_time: Option<BlockTimestamp>,
) -> Result<DistributionRecord> {
    let election_running = next_election_time.map_or(true, |t| t <= distribution_time);
    if !election_running {
        if let Some(current) = make_distribution(host, distribution_time, amount)? {
            return Ok(DistributionRecord::Current(current));
        }
    }
    Ok(DistributionRecord::Election(ElectionDistribution {
        distribution_time,
        amount,
    }))
}

/// What `pool` gives up this period.
fn sweep_amount(pool: &Pool, balance: Amount, prorate_num: Option<u128>) -> Result<Amount> {
    let pct = u128::from(pool.monthly_distribution_pct);
    let balance = u128::from(balance);
    let amount = match prorate_num {
        Some(num) => num * pct * balance / u128::from(PRORATE_DENOMINATOR),
        None => pct * balance / 100,
    };
    Amount::try_from(amount).map_err(|_| DistributionError::Overflow)
}
