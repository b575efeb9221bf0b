//! Main ledger orchestration layer
//!
//! Ties together storage, the operation engine, and the single-writer actor
//! into a high-level API for the monetization core.
//!
//! # Example
//!
//! ```no_run
//! use creator_ledger::{Config, Ledger, Principal};
//!
//! #[tokio::main]
//! async fn main() -> creator_ledger::Result<()> {
//!     let config = Config::default();
//!     let ledger = Ledger::open(config)?;
//!
//!     let owner = Principal::new("ST2JHG361ZXG51QTKY2NQCVBPPRRE2KZB1HR05NNC");
//!     let creator_id = ledger
//!         .register_creator(owner, "Alex Creator", "Tech tutorials", "https://example.com/a.jpg")
//!         .await?;
//!
//!     let creator = ledger.get_creator(creator_id)?;
//!     assert!(creator.is_some());
//!
//!     ledger.shutdown().await
//! }
//! ```

use crate::{
    actor::{spawn_ledger_actor, LedgerHandle},
    engine::Engine,
    metrics::Metrics,
    stats::{CreatorStats, PlatformStats},
    storage::Storage,
    types::{
        Content, ContentId, ContentType, Creator, CreatorId, Principal, Subscription,
        SubscriptionTier, TipId,
    },
    Config, Error, Result,
};
use std::sync::Arc;

/// Main ledger interface
///
/// Each instance is fully independent: no process-wide state is shared, so
/// tests can open as many ledgers as they need side by side.
#[derive(Debug)]
pub struct Ledger {
    /// Actor handle for mutating operations
    handle: LedgerHandle,

    /// Engine access for read-only queries
    engine: Arc<Engine>,
}

impl Ledger {
    /// Open a ledger with the given configuration
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let storage = Arc::new(Storage::open(&config)?);
        let metrics = Metrics::new()
            .map_err(|e| Error::Other(format!("failed to create metrics: {}", e)))?;
        let engine = Arc::new(Engine::new(storage, config, metrics));
        let handle = spawn_ledger_actor(engine.clone());

        Ok(Self { handle, engine })
    }

    // Mutating operations (serialized through the actor)

    /// Register a creator profile and return its id
    pub async fn register_creator(
        &self,
        owner: Principal,
        name: impl Into<String>,
        bio: impl Into<String>,
        avatar_url: impl Into<String>,
    ) -> Result<CreatorId> {
        self.handle
            .register_creator(owner, name.into(), bio.into(), avatar_url.into())
            .await
    }

    /// Update a creator profile (owner only)
    pub async fn update_creator_profile(
        &self,
        creator_id: CreatorId,
        caller: Principal,
        name: impl Into<String>,
        bio: impl Into<String>,
        avatar_url: impl Into<String>,
    ) -> Result<()> {
        self.handle
            .update_creator_profile(creator_id, caller, name.into(), bio.into(), avatar_url.into())
            .await
    }

    /// Increment a creator's follower counter
    pub async fn follow_creator(&self, creator_id: CreatorId, caller: Principal) -> Result<()> {
        self.handle.follow_creator(creator_id, caller).await
    }

    /// Mark a creator as verified (admin only)
    pub async fn verify_creator(&self, creator_id: CreatorId, caller: Principal) -> Result<()> {
        self.handle.verify_creator(creator_id, caller).await
    }

    /// Set a creator's standing tier (admin only)
    pub async fn set_creator_tier(
        &self,
        creator_id: CreatorId,
        tier: u8,
        caller: Principal,
    ) -> Result<()> {
        self.handle.set_creator_tier(creator_id, tier, caller).await
    }

    /// Create a content record in draft status and return its id
    #[allow(clippy::too_many_arguments)]
    pub async fn create_content(
        &self,
        creator_id: CreatorId,
        caller: Principal,
        title: impl Into<String>,
        description: impl Into<String>,
        content_type: ContentType,
        price: u64,
        thumbnail_url: impl Into<String>,
        content_url: impl Into<String>,
        is_premium: bool,
    ) -> Result<ContentId> {
        self.handle
            .create_content(
                creator_id,
                caller,
                title.into(),
                description.into(),
                content_type,
                price,
                thumbnail_url.into(),
                content_url.into(),
                is_premium,
            )
            .await
    }

    /// Publish draft content (owner only)
    pub async fn publish_content(&self, content_id: ContentId, caller: Principal) -> Result<()> {
        self.handle.publish_content(content_id, caller).await
    }

    /// Increment a content like counter
    pub async fn like_content(&self, content_id: ContentId, caller: Principal) -> Result<()> {
        self.handle.like_content(content_id, caller).await
    }

    /// View content through access control; returns the updated snapshot
    pub async fn view_content(
        &self,
        content_id: ContentId,
        caller: Principal,
    ) -> Result<Content> {
        self.handle.view_content(content_id, caller).await
    }

    /// Purchase published content for its listed price
    pub async fn purchase_content(
        &self,
        buyer: Principal,
        content_id: ContentId,
    ) -> Result<()> {
        self.handle.purchase_content(buyer, content_id).await
    }

    /// Subscribe to a creator for `months` periods at the tier's rate
    pub async fn subscribe_to_creator(
        &self,
        subscriber: Principal,
        creator_id: CreatorId,
        tier: u8,
        months: u32,
        auto_renew: bool,
    ) -> Result<()> {
        self.handle
            .subscribe_to_creator(subscriber, creator_id, tier, months, auto_renew)
            .await
    }

    /// Tip a creator; returns the tip id
    pub async fn tip_creator(
        &self,
        tipper: Principal,
        creator_id: CreatorId,
        amount: u64,
        message: impl Into<String>,
    ) -> Result<TipId> {
        self.handle
            .tip_creator(tipper, creator_id, amount, message.into())
            .await
    }

    /// Withdraw accrued creator earnings (owner only)
    pub async fn withdraw_earnings(
        &self,
        creator_id: CreatorId,
        caller: Principal,
        amount: u64,
    ) -> Result<()> {
        self.handle.withdraw_earnings(creator_id, caller, amount).await
    }

    /// Sweep the platform fee accumulator (admin only); returns the amount
    pub async fn withdraw_platform_fees(&self, caller: Principal) -> Result<u64> {
        self.handle.withdraw_platform_fees(caller).await
    }

    /// Fund a principal's spendable balance (external wallet substrate hook)
    pub async fn deposit(&self, principal: Principal, amount: u64) -> Result<()> {
        self.handle.deposit(principal, amount).await
    }

    // Read-only queries (latest committed state, never block the writer)

    /// Get creator by id
    pub fn get_creator(&self, creator_id: CreatorId) -> Result<Option<Creator>> {
        self.engine.get_creator(creator_id)
    }

    /// Get content by id
    pub fn get_content(&self, content_id: ContentId) -> Result<Option<Content>> {
        self.engine.get_content(content_id)
    }

    /// Get the subscription record for a (user, creator) pair
    pub fn get_subscription(
        &self,
        user: &Principal,
        creator_id: CreatorId,
    ) -> Result<Option<Subscription>> {
        self.engine.get_subscription(user, creator_id)
    }

    /// Whether a purchase record exists for a (user, content) pair
    pub fn has_purchased_content(
        &self,
        user: &Principal,
        content_id: ContentId,
    ) -> Result<bool> {
        self.engine.has_purchased_content(user, content_id)
    }

    /// Whether an unexpired subscription exists for a (user, creator) pair
    pub fn is_subscribed(&self, user: &Principal, creator_id: CreatorId) -> Result<bool> {
        self.engine.is_subscribed(user, creator_id)
    }

    /// The active subscription tier, or `None` when not subscribed
    pub fn get_subscription_tier(
        &self,
        user: &Principal,
        creator_id: CreatorId,
    ) -> Result<Option<SubscriptionTier>> {
        self.engine.subscription_tier(user, creator_id)
    }

    /// Spendable wallet balance for a principal
    pub fn wallet_balance(&self, principal: &Principal) -> Result<u64> {
        self.engine.wallet_balance(principal)
    }

    /// Per-creator statistics rollup
    pub fn get_creator_stats(&self, creator_id: CreatorId) -> Result<Option<CreatorStats>> {
        self.engine.creator_stats(creator_id)
    }

    /// Platform-wide statistics rollup
    pub fn get_platform_stats(&self) -> Result<PlatformStats> {
        self.engine.platform_stats()
    }

    /// Shutdown the ledger actor
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown().await
    }
}
