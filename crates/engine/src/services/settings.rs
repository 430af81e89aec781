//! Process-wide business settings: bonus rates and the low-stock threshold.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::{BonusConfig, DEFAULT_LOW_STOCK_THRESHOLD};

/// Trait for the configuration surface consumed by the engine.
///
/// Values are administrator-mutable and read-mostly; the engine re-reads
/// them at the start of each approval/rejection instead of caching, so a
/// stale rate never miscomputes a commission.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Returns the current bonus configuration.
    async fn bonus_config(&self) -> BonusConfig;

    /// Returns the current "low" stock boundary for alerting.
    async fn low_stock_threshold(&self) -> u32;
}

#[derive(Debug)]
struct SettingsState {
    config: BonusConfig,
    low_stock_threshold: u32,
}

/// In-memory settings store with admin setters.
#[derive(Debug, Clone)]
pub struct InMemorySettings {
    state: Arc<RwLock<SettingsState>>,
}

impl InMemorySettings {
    /// Creates settings with default rates and threshold.
    pub fn new() -> Self {
        Self::with_config(BonusConfig::default())
    }

    /// Creates settings with a specific bonus configuration.
    pub fn with_config(config: BonusConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(SettingsState {
                config,
                low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            })),
        }
    }

    /// Replaces the bonus configuration.
    pub fn set_bonus_config(&self, config: BonusConfig) {
        self.state.write().unwrap().config = config;
    }

    /// Replaces the low-stock threshold.
    pub fn set_low_stock_threshold(&self, threshold: u32) {
        self.state.write().unwrap().low_stock_threshold = threshold;
    }
}

impl Default for InMemorySettings {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsProvider for InMemorySettings {
    async fn bonus_config(&self) -> BonusConfig {
        self.state.read().unwrap().config
    }

    async fn low_stock_threshold(&self) -> u32 {
        self.state.read().unwrap().low_stock_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults() {
        let settings = InMemorySettings::new();
        assert_eq!(settings.bonus_config().await, BonusConfig::default());
        assert_eq!(
            settings.low_stock_threshold().await,
            DEFAULT_LOW_STOCK_THRESHOLD
        );
    }

    #[tokio::test]
    async fn test_admin_updates_are_visible_immediately() {
        let settings = InMemorySettings::new();
        settings.set_bonus_config(BonusConfig {
            purchase_bonus_rate: 10.0,
            referral_commission_rate: 10.0,
            ..BonusConfig::default()
        });
        settings.set_low_stock_threshold(3);

        assert_eq!(settings.bonus_config().await.purchase_bonus_rate, 10.0);
        assert_eq!(settings.low_stock_threshold().await, 3);
    }
}
