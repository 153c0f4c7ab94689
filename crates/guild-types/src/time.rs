//! Block-derived time.
//!
//! A [`BlockTimestamp`] counts half-second slots since
//! 2000-01-01T00:00:00Z. Slot 0 doubles as "no timestamp".

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unix time of slot 0.
pub const BLOCK_EPOCH_UNIX_SECS: u64 = 946_684_800;

/// Slots per second.
pub const SLOTS_PER_SECOND: u32 = 2;

/// Slots per day.
pub const SLOTS_PER_DAY: u32 = 24 * 60 * 60 * SLOTS_PER_SECOND;

/// A point in time with half-second resolution.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockTimestamp {
    pub slot: u32,
}

impl BlockTimestamp {
    pub const fn from_slot(slot: u32) -> Self {
        Self { slot }
    }

    /// Convert Unix seconds, clamping to the representable range.
    pub fn from_unix_secs(secs: u64) -> Self {
        let slots = secs
            .saturating_sub(BLOCK_EPOCH_UNIX_SECS)
            .saturating_mul(u64::from(SLOTS_PER_SECOND));
        Self {
            slot: u32::try_from(slots).unwrap_or(u32::MAX),
        }
    }

    pub fn to_unix_secs(self) -> u64 {
        BLOCK_EPOCH_UNIX_SECS + u64::from(self.slot / SLOTS_PER_SECOND)
    }

    /// Whether this is the "no timestamp" value.
    pub fn is_zero(self) -> bool {
        self.slot == 0
    }

    /// Saturating addition of whole days.
    pub fn plus_days(self, days: u32) -> Self {
        Self {
            slot: self.slot.saturating_add(days.saturating_mul(SLOTS_PER_DAY)),
        }
    }

    /// Whole seconds from `earlier` to `self`, zero if `earlier` is later.
    pub fn seconds_since(self, earlier: BlockTimestamp) -> u32 {
        self.slot.saturating_sub(earlier.slot) / SLOTS_PER_SECOND
    }
}

impl fmt::Display for BlockTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot:{}", self.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_round_trip_on_whole_seconds() {
        let ts = BlockTimestamp::from_unix_secs(1_700_000_000);
        assert_eq!(ts.to_unix_secs(), 1_700_000_000);
        assert_eq!(ts.slot, (1_700_000_000 - BLOCK_EPOCH_UNIX_SECS as u32) * 2);
    }

    #[test]
    fn test_before_epoch_clamps_to_zero() {
        assert!(BlockTimestamp::from_unix_secs(0).is_zero());
    }

    #[test]
    fn test_plus_days() {
        let ts = BlockTimestamp::from_slot(10);
        assert_eq!(ts.plus_days(30).slot, 10 + 30 * 172_800);
        assert_eq!(BlockTimestamp::from_slot(u32::MAX).plus_days(1).slot, u32::MAX);
    }

    #[test]
    fn test_seconds_since() {
        let start = BlockTimestamp::from_slot(1_000);
        let end = start.plus_days(15);
        assert_eq!(end.seconds_since(start), 15 * 86_400);
        assert_eq!(start.seconds_since(end), 0);
    }
}
