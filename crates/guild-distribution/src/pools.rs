//! Pool registry bootstrap.

use guild_types::Pool;

use crate::host::DistributionTables;
use crate::Result;

/// Create the `master` pool unless a pool already exists.
///
/// Returns `true` if the pool was created.
pub fn init_pools<T: DistributionTables + ?Sized>(tables: &mut T) -> Result<bool> {
    if !tables.pools()?.is_empty() {
        return Ok(false);
    }
    let pool = Pool::master();
    tables.insert_pool(&pool)?;
    tracing::info!(
        pool = %pool.name,
        pct = pool.monthly_distribution_pct,
        "bootstrapped pool registry"
    );
    Ok(true)
}

/// The pool registry, bootstrapping it if empty.
pub(crate) fn pools_or_default<T: DistributionTables + ?Sized>(
    tables: &mut T,
) -> Result<Vec<Pool>> {
    init_pools(tables)?;
    tables.pools()
}
