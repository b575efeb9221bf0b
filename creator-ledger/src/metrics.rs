//! Metrics collection for observability
//!
//! Prometheus counters for monitoring the ledger. Each ledger instance owns
//! its registry; nothing registers globally, so independent instances (and
//! parallel tests) never collide.
//!
//! # Metrics
//!
//! - `ledger_transfers_total` - Monetary transfers applied
//! - `ledger_transfer_volume_total` - Gross micro-units moved
//! - `ledger_fees_collected_total` - Micro-units withheld for the platform
//! - `ledger_access_denied_total` - Premium views denied

use prometheus::{IntCounter, Opts, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Monetary transfers applied
    pub transfers_total: IntCounter,

    /// Gross micro-units moved
    pub transfer_volume_total: IntCounter,

    /// Micro-units withheld for the platform
    pub fees_collected_total: IntCounter,

    /// Premium views denied
    pub access_denied_total: IntCounter,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("transfers_total", &self.transfers_total.get())
            .finish_non_exhaustive()
    }
}

impl Metrics {
    /// Create new metrics collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let transfers_total = IntCounter::with_opts(Opts::new(
            "ledger_transfers_total",
            "Monetary transfers applied",
        ))?;
        registry.register(Box::new(transfers_total.clone()))?;

        let transfer_volume_total = IntCounter::with_opts(Opts::new(
            "ledger_transfer_volume_total",
            "Gross micro-units moved through transfers",
        ))?;
        registry.register(Box::new(transfer_volume_total.clone()))?;

        let fees_collected_total = IntCounter::with_opts(Opts::new(
            "ledger_fees_collected_total",
            "Micro-units withheld for the platform",
        ))?;
        registry.register(Box::new(fees_collected_total.clone()))?;

        let access_denied_total = IntCounter::with_opts(Opts::new(
            "ledger_access_denied_total",
            "Premium content views denied",
        ))?;
        registry.register(Box::new(access_denied_total.clone()))?;

        Ok(Self {
            transfers_total,
            transfer_volume_total,
            fees_collected_total,
            access_denied_total,
            registry,
        })
    }

    /// Record a completed transfer
    pub fn record_transfer(&self, amount: u64, fee: u64) {
        self.transfers_total.inc();
        self.transfer_volume_total.inc_by(amount);
        self.fees_collected_total.inc_by(fee);
    }

    /// Record a denied premium view
    pub fn record_access_denied(&self) {
        self.access_denied_total.inc();
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
