//! guild-daemon: drives the distribution engine on a timer.
//!
//! Single OS process running a Tokio runtime. Every tick performs one
//! metered crank pass against the local database.

mod config;
mod crank;

use std::time::Duration;

use tracing::{error, info};

use crate::config::DaemonConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = DaemonConfig::load()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("guild={}", config.advanced.log_level).parse()?),
        )
        .init();

    info!("Guild daemon starting");

    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    // 2. Open database
    let db_path = data_dir.join("guild.db");
    let mut conn = guild_db::open(&db_path)?;
    info!(path = %db_path.display(), "database open");

    // 3. Bootstrap pools and seed the queue
    let dist = &config.distribution;
    if crank::seed(&mut conn, dist, crank::block_time_now())? {
        info!("processed due periods while seeding");
    }

    // 4. Crank until shutdown
    let mut interval = tokio::time::interval(Duration::from_secs(dist.tick_interval_secs.max(1)));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = crank::run_once(&mut conn, dist, crank::block_time_now()) {
                    error!("crank pass failed: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received, shutting down");
                break;
            }
        }
    }

    info!("Daemon stopped");
    Ok(())
}
