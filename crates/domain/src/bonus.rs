//! Bonus and referral point math and its configuration.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// When a referred buyer's order qualifies for a referral commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralPolicy {
    /// Only the buyer's first approved order pays commission.
    #[default]
    FirstOrderOnly,

    /// Every approved order of a referred buyer pays commission.
    EveryOrder,
}

/// Process-wide bonus configuration, administrator-mutable.
///
/// Re-read at the start of every approval/rejection rather than cached, so
/// admin rate changes take effect immediately.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusConfig {
    /// Percentage of an approved order's total credited to the buyer.
    pub purchase_bonus_rate: f64,

    /// Percentage of a qualifying order's total credited to the referrer.
    pub referral_commission_rate: f64,

    /// Which of a referred buyer's orders pay commission.
    #[serde(default)]
    pub referral_policy: ReferralPolicy,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            purchase_bonus_rate: 1.0,
            referral_commission_rate: 5.0,
            referral_policy: ReferralPolicy::default(),
        }
    }
}

impl BonusConfig {
    /// Points credited to the buyer for an approved order:
    /// `round(total × purchase_bonus_rate / 100)`.
    pub fn purchase_bonus(&self, total: Money) -> i64 {
        points_for(total, self.purchase_bonus_rate)
    }

    /// Points credited to the referrer for a qualifying order:
    /// `round(total × referral_commission_rate / 100)`.
    pub fn referral_commission(&self, total: Money) -> i64 {
        points_for(total, self.referral_commission_rate)
    }
}

fn points_for(total: Money, rate_percent: f64) -> i64 {
    (total.cents() as f64 * rate_percent / 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_bonus_is_percentage_of_total() {
        let config = BonusConfig {
            purchase_bonus_rate: 10.0,
            ..BonusConfig::default()
        };
        assert_eq!(config.purchase_bonus(Money::from_cents(100_000)), 10_000);
    }

    #[test]
    fn test_referral_commission_is_percentage_of_total() {
        let config = BonusConfig {
            referral_commission_rate: 10.0,
            ..BonusConfig::default()
        };
        assert_eq!(config.referral_commission(Money::from_cents(100_000)), 10_000);
    }

    #[test]
    fn test_fractional_amounts_round_to_nearest() {
        let config = BonusConfig {
            purchase_bonus_rate: 2.5,
            ..BonusConfig::default()
        };
        // 2.5% of 99 = 2.475 → 2
        assert_eq!(config.purchase_bonus(Money::from_cents(99)), 2);
        // 2.5% of 101 = 2.525 → 3
        assert_eq!(config.purchase_bonus(Money::from_cents(101)), 3);
    }

    #[test]
    fn test_zero_rate_yields_zero_points() {
        let config = BonusConfig {
            purchase_bonus_rate: 0.0,
            ..BonusConfig::default()
        };
        assert_eq!(config.purchase_bonus(Money::from_cents(100_000)), 0);
    }

    #[test]
    fn test_default_policy_is_first_order_only() {
        assert_eq!(
            BonusConfig::default().referral_policy,
            ReferralPolicy::FirstOrderOnly
        );
    }

    #[test]
    fn test_config_serialization_defaults_policy() {
        let json = r#"{"purchase_bonus_rate": 2.0, "referral_commission_rate": 4.0}"#;
        let config: BonusConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.referral_policy, ReferralPolicy::FirstOrderOnly);
    }
}
