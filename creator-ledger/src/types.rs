//! Core types for the monetization ledger
//!
//! All types are designed for:
//! - Deterministic serialization (bincode)
//! - Memory safety (no unsafe code)
//! - Exact arithmetic (u64 micro-units for money)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Creator id, monotonically assigned starting at 1
pub type CreatorId = u64;

/// Content id, monotonically assigned starting at 1
pub type ContentId = u64;

/// Tip id, monotonically assigned starting at 1
pub type TipId = u64;

/// Caller identity (wallet address, session principal, etc.)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(String);

impl Principal {
    /// Create new principal
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Creator standing tier, set by the platform admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum CreatorTier {
    /// Default tier at registration
    Basic = 0,
    /// Gold tier
    Gold = 1,
    /// Platinum tier
    Platinum = 2,
}

impl CreatorTier {
    /// Parse from the numeric wire representation
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(CreatorTier::Basic),
            1 => Some(CreatorTier::Gold),
            2 => Some(CreatorTier::Platinum),
            _ => None,
        }
    }
}

/// Subscription tier purchased by a subscriber
///
/// Distinct from [`CreatorTier`]: this prices a subscriber's access to one
/// creator's premium catalog. "No subscription" is `Option::None` at the API
/// boundary, never `Basic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SubscriptionTier {
    /// Entry tier
    Basic = 0,
    /// Premium tier
    Premium = 1,
    /// VIP tier
    Vip = 2,
}

impl SubscriptionTier {
    /// Parse from the numeric wire representation
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(SubscriptionTier::Basic),
            1 => Some(SubscriptionTier::Premium),
            2 => Some(SubscriptionTier::Vip),
            _ => None,
        }
    }
}

/// Content media type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    /// Video content
    Video,
    /// Audio content
    Audio,
    /// Image content
    Image,
    /// Text content
    Text,
    /// Multi-part course
    Course,
}

impl ContentType {
    /// Wire representation
    pub fn code(&self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Audio => "audio",
            ContentType::Image => "image",
            ContentType::Text => "text",
            ContentType::Course => "course",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "video" => Some(ContentType::Video),
            "audio" => Some(ContentType::Audio),
            "image" => Some(ContentType::Image),
            "text" => Some(ContentType::Text),
            "course" => Some(ContentType::Course),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Content lifecycle status
///
/// Transitions only `Draft -> Published`, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ContentStatus {
    /// Created but not yet visible to the catalog
    Draft = 0,
    /// Published (terminal)
    Published = 1,
}

/// Creator profile and earnings record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    /// Creator id
    pub id: CreatorId,

    /// Owning principal (immutable after registration)
    pub owner: Principal,

    /// Display name
    pub name: String,

    /// Profile bio
    pub bio: String,

    /// Avatar URL
    pub avatar_url: String,

    /// Follower counter (no per-user dedup)
    pub followers: u64,

    /// Accrued earnings net of platform fees, decremented only by withdrawal
    pub total_earnings: u64,

    /// Number of content records created under this creator
    pub content_count: u64,

    /// Admin-set verification flag
    pub verification_status: bool,

    /// Registration timestamp
    pub created_at: DateTime<Utc>,

    /// Admin-set standing tier
    pub tier: CreatorTier,
}

/// Content record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Content id
    pub id: ContentId,

    /// Owning creator (immutable)
    pub creator_id: CreatorId,

    /// Title
    pub title: String,

    /// Description
    pub description: String,

    /// Media type
    pub content_type: ContentType,

    /// Price in micro-units (>= configured minimum)
    pub price: u64,

    /// Thumbnail URL
    pub thumbnail_url: String,

    /// Content URL
    pub content_url: String,

    /// View counter, incremented only on granted access
    pub views: u64,

    /// Like counter (no per-user dedup)
    pub likes: u64,

    /// Net purchase credits attributed to this content
    pub earnings: u64,

    /// Premium flag: purchase or active subscription required to view
    pub is_premium: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Lifecycle status
    pub status: ContentStatus,
}

impl Content {
    /// Whether the content has been published
    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }
}

/// Immutable purchase record; existence grants lifetime access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    /// Buying principal
    pub buyer: Principal,

    /// Purchased content
    pub content_id: ContentId,

    /// Creator credited by the purchase
    pub creator_id: CreatorId,

    /// Gross price paid
    pub price_paid: u64,

    /// Net amount credited to the creator (price minus platform fee)
    pub creator_credit: u64,

    /// Purchase timestamp
    pub purchased_at: DateTime<Utc>,
}

/// Subscription record for a (subscriber, creator) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Subscribing principal
    pub subscriber: Principal,

    /// Creator subscribed to
    pub creator_id: CreatorId,

    /// Purchased tier
    pub tier: SubscriptionTier,

    /// Window start
    pub start_date: DateTime<Utc>,

    /// Window end (always after `start_date`)
    pub end_date: DateTime<Utc>,

    /// Cumulative amount paid across renewals
    pub amount_paid: u64,

    /// Renewal flag for the external scheduler
    pub auto_renew: bool,
}

impl Subscription {
    /// Whether the subscription window covers `now`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now <= self.end_date
    }
}

/// Immutable tip record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    /// Tip id
    pub id: TipId,

    /// Creator tipped
    pub creator_id: CreatorId,

    /// Tipping principal
    pub tipper: Principal,

    /// Gross tip amount
    pub amount: u64,

    /// Message attached to the tip
    pub message: String,

    /// Tip timestamp
    pub tipped_at: DateTime<Utc>,
}

/// Platform-wide scalar accumulators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformState {
    /// Fees accrued to the platform, withdrawable only by the admin
    pub platform_earnings: u64,

    /// Next creator id to assign
    pub next_creator_id: CreatorId,

    /// Next content id to assign
    pub next_content_id: ContentId,

    /// Next tip id to assign
    pub next_tip_id: TipId,
}

impl Default for PlatformState {
    fn default() -> Self {
        Self {
            platform_earnings: 0,
            next_creator_id: 1,
            next_content_id: 1,
            next_tip_id: 1,
        }
    }
}

impl PlatformState {
    /// Allocate the next creator id
    pub fn allocate_creator_id(&mut self) -> CreatorId {
        let id = self.next_creator_id;
        self.next_creator_id += 1;
        id
    }

    /// Allocate the next content id
    pub fn allocate_content_id(&mut self) -> ContentId {
        let id = self.next_content_id;
        self.next_content_id += 1;
        id
    }

    /// Allocate the next tip id
    pub fn allocate_tip_id(&mut self) -> TipId {
        let id = self.next_tip_id;
        self.next_tip_id += 1;
        id
    }
}
