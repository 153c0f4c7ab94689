//! Reclaiming distribution points and teardown.

use crate::host::Host;
use crate::Result;

/// Forget up to `max_steps` drained distribution points, oldest first.
///
/// Stops at the first point that still holds an account; newer points are
/// not looked at. Returns the unused budget.
pub fn gc<H: Host + ?Sized>(host: &mut H, mut max_steps: u32) -> Result<u32> {
    if max_steps == 0 {
        return Ok(0);
    }
    for scope in host.distribution_points(max_steps as usize)? {
        if !host.scope_is_empty(scope)? {
            tracing::debug!(%scope, "gc stopped at live distribution point");
            break;
        }
        host.erase_distribution_point(scope)?;
        tracing::trace!(%scope, "collected distribution point");
        max_steps -= 1;
    }
    Ok(max_steps)
}

/// Erase every distribution account, pool and record.
pub fn clear_all<H: Host + ?Sized>(host: &mut H) -> Result<()> {
    let points = host.distribution_points(usize::MAX)?;
    let cleared = points.len();
    for scope in points {
        host.clear_scope(scope)?;
        host.erase_distribution_point(scope)?;
    }
    host.clear_pools()?;
    host.clear_records()?;
    tracing::info!(points = cleared, "cleared all distribution state");
    Ok(())
}
