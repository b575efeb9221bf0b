//! CreatorCash Ledger Core
//!
//! Accounting and access-control core for a creator monetization platform:
//! creators register, publish priced or subscription-gated content, and earn
//! revenue from purchases, subscriptions, and tips. The platform retains a
//! fee on every transfer.
//!
//! # Architecture
//!
//! - **Single Writer**: every mutating operation runs to completion inside
//!   one actor task, so validation and record creation are atomic as a unit
//! - **All-or-nothing**: each operation commits through one RocksDB
//!   `WriteBatch`; a failed check leaves no partial side effects
//! - **Pure access control**: content visibility is re-derived from records
//!   on every attempt, never cached
//!
//! # Invariants
//!
//! - Fee conservation: `creator_credit + platform_fee == amount` for every
//!   transfer, in exact integer arithmetic
//! - Monotonic ids: creator, content, and tip ids start at 1 and never repeat
//! - Content status only moves `Draft -> Published`, never back

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod access;
pub mod actor;
pub mod config;
pub mod engine;
pub mod error;
pub mod fees;
pub mod ledger;
pub mod metrics;
pub mod stats;
pub mod storage;
pub mod types;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use ledger::Ledger;
pub use stats::{CreatorStats, PlatformStats};
pub use storage::Storage;
pub use types::{
    Content, ContentStatus, ContentType, Creator, CreatorTier, Principal, Purchase, Subscription,
    SubscriptionTier, Tip,
};
