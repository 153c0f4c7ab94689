//! Metered distribution passes.
//!
//! Each pass runs `distribute_monthly` and then `gc`, each in its own
//! transaction and each with its own step budget from the config. Periods
//! parked by an election are released at the start of a pass once the
//! election is over.

use guild_distribution::{
    distribute_monthly, gc, init_pools, process_election_distribution, setup_distribution,
    ElectionOracle,
};
use guild_types::BlockTimestamp;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::config::DistributionConfig;

/// Current wall-clock time as a block timestamp.
pub fn block_time_now() -> BlockTimestamp {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    BlockTimestamp::from_unix_secs(now)
}

/// Remaining budgets after one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrankReport {
    pub distribute_remaining: u32,
    pub gc_remaining: u32,
}

impl CrankReport {
    /// Whether the pass ran out of budget, i.e. more work is probably waiting.
    pub fn saturated(&self) -> bool {
        self.distribute_remaining == 0 || self.gc_remaining == 0
    }
}

/// Bootstrap the pool registry and seed the queue with the configured start.
///
/// Returns whether any period was processed while seeding.
pub fn seed(
    conn: &mut Connection,
    config: &DistributionConfig,
    now: BlockTimestamp,
) -> guild_db::Result<bool> {
    let start = config.start();
    guild_db::transact(conn, &config.contract(), now, |host| {
        init_pools(host)?;
        setup_distribution(host, start)
    })
}

/// One metered pass.
pub fn run_once(
    conn: &mut Connection,
    config: &DistributionConfig,
    now: BlockTimestamp,
) -> guild_db::Result<CrankReport> {
    let contract = config.contract();
    let distribute_remaining = guild_db::transact(conn, &contract, now, |host| {
        // No next election while one is running.
        if host.next_election_time()?.is_some() {
            let released = process_election_distribution(host)?;
            if released > 0 {
                info!(released, "released election distributions");
            }
        }
        distribute_monthly(host, config.max_steps)
    })?;
    let gc_remaining =
        guild_db::transact(conn, &contract, now, |host| gc(host, config.gc_max_steps))?;

    let report = CrankReport {
        distribute_remaining,
        gc_remaining,
    };
    if report.saturated() {
        info!(
            distribute_remaining,
            gc_remaining, "crank pass used its full budget"
        );
    } else {
        debug!(distribute_remaining, gc_remaining, "crank pass complete");
    }
    Ok(report)
}
