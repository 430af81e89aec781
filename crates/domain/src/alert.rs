//! Low-stock alert classification.

use serde::{Deserialize, Serialize};

/// Default "low" boundary for alerting purposes.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

/// Classification of a stock level crossing that warrants a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockAlert {
    /// Stock came back from zero.
    BackInStock,

    /// Stock changed to a value within the low threshold.
    LowStock,

    /// Stock crossed into zero.
    OutOfStock,
}

impl StockAlert {
    /// Returns the alert name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            StockAlert::BackInStock => "back_in_stock",
            StockAlert::LowStock => "low_stock",
            StockAlert::OutOfStock => "out_of_stock",
        }
    }
}

impl std::fmt::Display for StockAlert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decides whether an old/new stock pair warrants a notification.
///
/// Returns `None` for anything that should not re-alert, in particular a
/// value that was already low or zero and did not change. Stateless and
/// deterministic: callers invoke it once per affected product or variant
/// after a stock mutation.
pub fn classify(old: u32, new: u32, threshold: u32) -> Option<StockAlert> {
    if new == 0 && old > 0 {
        return Some(StockAlert::OutOfStock);
    }
    if old == 0 && new > 0 {
        return Some(StockAlert::BackInStock);
    }
    if new > 0 && new <= threshold && new != old {
        return Some(StockAlert::LowStock);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_into_zero_is_out_of_stock() {
        assert_eq!(classify(1, 0, 10), Some(StockAlert::OutOfStock));
        assert_eq!(classify(50, 0, 10), Some(StockAlert::OutOfStock));
    }

    #[test]
    fn test_zero_staying_zero_does_not_realert() {
        assert_eq!(classify(0, 0, 10), None);
    }

    #[test]
    fn test_restock_from_zero_is_back_in_stock() {
        assert_eq!(classify(0, 5, 10), Some(StockAlert::BackInStock));
        assert_eq!(classify(0, 100, 10), Some(StockAlert::BackInStock));
    }

    #[test]
    fn test_dropping_into_threshold_is_low_stock() {
        assert_eq!(classify(12, 8, 10), Some(StockAlert::LowStock));
        assert_eq!(classify(11, 10, 10), Some(StockAlert::LowStock));
    }

    #[test]
    fn test_static_low_value_does_not_realert() {
        // A value must have changed to re-alert; a static low value
        // does not re-trigger on every read.
        assert_eq!(classify(5, 5, 10), None);
    }

    #[test]
    fn test_healthy_levels_are_silent() {
        assert_eq!(classify(50, 40, 10), None);
        assert_eq!(classify(11, 12, 10), None);
    }

    #[test]
    fn test_movement_within_threshold_realerts() {
        assert_eq!(classify(8, 6, 10), Some(StockAlert::LowStock));
        assert_eq!(classify(3, 4, 10), Some(StockAlert::LowStock));
    }
}
