//! Commission rate tiers keyed by profit percentage

use crate::constants::{RATE_TIERS, TOP_RATE};

/// Commission rate for a line with the given profit percentage.
///
/// Tier bounds are inclusive, so a value sitting exactly on a bound takes the
/// lower tier's rate. Anything above the last bound earns `TOP_RATE`.
pub fn commission_rate(profit_percent: f64) -> f64 {
    RATE_TIERS
        .iter()
        .find(|(upper, _)| profit_percent <= *upper)
        .map(|(_, rate)| *rate)
        .unwrap_or(TOP_RATE)
}
