//! Configuration for the monetization ledger

use crate::types::{Principal, SubscriptionTier};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory for RocksDB
    pub data_dir: PathBuf,

    /// Platform admin principal (may verify creators, set tiers, sweep fees)
    pub admin: Principal,

    /// Fee and pricing configuration
    pub fees: FeeConfig,

    /// Subscription pricing configuration
    pub subscriptions: SubscriptionConfig,

    /// Statistics configuration
    pub stats: StatsConfig,

    /// RocksDB configuration
    pub rocksdb: RocksDbConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/creator-ledger"),
            admin: Principal::new("ST1HTBVD3JG9C05J7HBJTHGR0GGW7KXW28M5JS8QE"),
            fees: FeeConfig::default(),
            subscriptions: SubscriptionConfig::default(),
            stats: StatsConfig::default(),
            rocksdb: RocksDbConfig::default(),
        }
    }
}

/// Fee and pricing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Platform fee withheld on every transfer, in whole percent
    pub platform_fee_percent: u64,

    /// Minimum content price in micro-units
    pub min_content_price: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            platform_fee_percent: 5,
            min_content_price: 1_000_000, // 1 unit
        }
    }
}

/// Subscription pricing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    /// Length of one subscription period in days
    pub period_days: i64,

    /// Monthly rate for the Basic tier, micro-units
    pub basic_rate: u64,

    /// Monthly rate for the Premium tier, micro-units
    pub premium_rate: u64,

    /// Monthly rate for the VIP tier, micro-units
    pub vip_rate: u64,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            period_days: 30,
            basic_rate: 2_000_000,
            premium_rate: 5_000_000,
            vip_rate: 10_000_000,
        }
    }
}

impl SubscriptionConfig {
    /// Monthly rate for a tier
    pub fn monthly_rate(&self, tier: SubscriptionTier) -> u64 {
        match tier {
            SubscriptionTier::Basic => self.basic_rate,
            SubscriptionTier::Premium => self.premium_rate,
            SubscriptionTier::Vip => self.vip_rate,
        }
    }
}

/// Statistics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Trailing window for monthly-earnings rollups, in days
    pub earnings_window_days: i64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            earnings_window_days: 30,
        }
    }
}

/// RocksDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocksDbConfig {
    /// Write buffer size (MB)
    pub write_buffer_size_mb: usize,

    /// Max write buffers
    pub max_write_buffer_number: i32,

    /// Max background jobs (compaction + flush)
    pub max_background_jobs: i32,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            write_buffer_size_mb: 64,
            max_write_buffer_number: 4,
            max_background_jobs: 2,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load defaults with environment overrides
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(data_dir) = std::env::var("CREATOR_LEDGER_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(admin) = std::env::var("CREATOR_LEDGER_ADMIN") {
            config.admin = Principal::new(admin);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check configuration invariants
    pub fn validate(&self) -> crate::Result<()> {
        if self.fees.platform_fee_percent > 100 {
            return Err(crate::Error::Config(format!(
                "platform_fee_percent must be <= 100, got {}",
                self.fees.platform_fee_percent
            )));
        }
        if self.subscriptions.period_days < 1 {
            return Err(crate::Error::Config(
                "subscription period_days must be >= 1".to_string(),
            ));
        }
        if self.stats.earnings_window_days < 1 {
            return Err(crate::Error::Config(
                "earnings_window_days must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
