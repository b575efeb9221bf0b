//! Read-only statistics rollups
//!
//! Derived aggregates computed by scanning the relevant record families on
//! demand. Nothing here mutates records; there is no materialized state
//! beyond the direct counters the records already carry.

use crate::{
    config::StatsConfig,
    error::Result,
    fees,
    storage::Storage,
    types::{CreatorId, Subscription},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Per-creator rollup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorStats {
    /// Sum of view counters across the creator's content
    pub total_views: u64,

    /// Sum of like counters across the creator's content
    pub total_likes: u64,

    /// Number of tips received
    pub total_tips: u64,

    /// Active subscriptions to this creator
    pub subscriber_count: u64,

    /// Net credits received within the trailing earnings window
    pub monthly_earnings: u64,
}

/// Platform-wide rollup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    /// Creators registered so far
    pub total_creators: u64,

    /// Content records created so far
    pub total_content: u64,

    /// Fees accrued and not yet swept by the admin
    pub platform_earnings: u64,

    /// Next content id to assign
    pub next_content_id: u64,

    /// Next creator id to assign
    pub next_creator_id: u64,
}

/// Compute the per-creator rollup.
///
/// `monthly_earnings` is the sum of net creator credits (after the platform
/// fee at `fee_rate_percent`) from purchases, tips, and subscription payments
/// whose record timestamp falls within the trailing `earnings_window_days`
/// window ending at `now`.
///
/// Returns `None` for an unknown creator (read-only queries surface absence
/// as a null result, not an error).
pub fn creator_stats(
    storage: &Storage,
    creator_id: CreatorId,
    now: DateTime<Utc>,
    config: &StatsConfig,
    fee_rate_percent: u64,
) -> Result<Option<CreatorStats>> {
    if storage.get_creator(creator_id)?.is_none() {
        return Ok(None);
    }

    let window_start = now - Duration::days(config.earnings_window_days);

    let mut total_views = 0u64;
    let mut total_likes = 0u64;
    for content in storage.scan_content()? {
        if content.creator_id == creator_id {
            total_views += content.views;
            total_likes += content.likes;
        }
    }

    let mut total_tips = 0u64;
    let mut monthly_earnings = 0u64;

    for tip in storage.scan_tips()? {
        if tip.creator_id == creator_id {
            total_tips += 1;
            if tip.tipped_at >= window_start {
                monthly_earnings += fees::split(tip.amount, fee_rate_percent).creator_credit;
            }
        }
    }

    for purchase in storage.scan_purchases()? {
        if purchase.creator_id == creator_id && purchase.purchased_at >= window_start {
            monthly_earnings += purchase.creator_credit;
        }
    }

    let mut subscriber_count = 0u64;
    for sub in storage.scan_subscriptions()? {
        if sub.creator_id != creator_id {
            continue;
        }
        if sub.is_active(now) {
            subscriber_count += 1;
        }
        monthly_earnings += windowed_subscription_credit(&sub, window_start, fee_rate_percent);
    }

    Ok(Some(CreatorStats {
        total_views,
        total_likes,
        total_tips,
        subscriber_count,
        monthly_earnings,
    }))
}

/// Subscription payments counted toward the trailing window.
///
/// A subscription record accumulates `amount_paid` across renewals and only
/// retains its current window start, so a record started inside the window
/// contributes its full paid amount (net of fee) and older records
/// contribute nothing. Documented policy, not a per-payment breakdown.
fn windowed_subscription_credit(
    sub: &Subscription,
    window_start: DateTime<Utc>,
    fee_rate_percent: u64,
) -> u64 {
    if sub.start_date >= window_start {
        fees::split(sub.amount_paid, fee_rate_percent).creator_credit
    } else {
        0
    }
}

/// Compute the platform-wide rollup.
pub fn platform_stats(storage: &Storage) -> Result<PlatformStats> {
    let state = storage.platform_state()?;

    Ok(PlatformStats {
        // Ids are monotonic from 1 and records are never deleted, so the
        // totals fall straight out of the counters.
        total_creators: state.next_creator_id - 1,
        total_content: state.next_content_id - 1,
        platform_earnings: state.platform_earnings,
        next_content_id: state.next_content_id,
        next_creator_id: state.next_creator_id,
    })
}
