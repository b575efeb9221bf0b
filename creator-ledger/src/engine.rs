//! Operation engine
//!
//! Implements every operation of the monetization core against the storage
//! layer. Each mutating operation follows the same shape:
//!
//! 1. validate preconditions (authorization, existence, pricing)
//! 2. apply the balance transfer (wallet debit, fee split, credits)
//! 3. stage record mutations into one [`WriteBatch`]
//! 4. commit atomically
//!
//! A failed check returns before anything is committed, so operations are
//! all-or-nothing. The engine itself is not synchronized; exclusive mutation
//! is guaranteed by running every mutating call inside the single-writer
//! actor (see [`crate::actor`]).

use crate::{
    access,
    error::{Error, Result},
    fees::{self, FeeSplit},
    metrics::Metrics,
    stats::{self, CreatorStats, PlatformStats},
    storage::Storage,
    types::{
        Content, ContentId, ContentStatus, ContentType, Creator, CreatorId, CreatorTier,
        PlatformState, Principal, Purchase, Subscription, SubscriptionTier, Tip, TipId,
    },
    Config,
};
use chrono::{Duration, Utc};
use rocksdb::WriteBatch;
use std::sync::Arc;

/// Longest subscription a single call may pay for
const MAX_SUBSCRIPTION_MONTHS: u32 = 120;

/// Operation engine over a storage instance
#[derive(Debug)]
pub struct Engine {
    storage: Arc<Storage>,
    config: Config,
    metrics: Metrics,
}

impl Engine {
    /// Create a new engine
    pub fn new(storage: Arc<Storage>, config: Config, metrics: Metrics) -> Self {
        Self {
            storage,
            config,
            metrics,
        }
    }

    /// Direct storage access (for read paths)
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Engine configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // Creator registry

    /// Register a new creator profile and return its id.
    ///
    /// A principal may own any number of creator profiles.
    pub fn register_creator(
        &self,
        owner: Principal,
        name: String,
        bio: String,
        avatar_url: String,
    ) -> Result<CreatorId> {
        let mut platform = self.storage.platform_state()?;
        let id = platform.allocate_creator_id();

        let creator = Creator {
            id,
            owner: owner.clone(),
            name,
            bio,
            avatar_url,
            followers: 0,
            total_earnings: 0,
            content_count: 0,
            verification_status: false,
            created_at: Utc::now(),
            tier: CreatorTier::Basic,
        };

        let mut batch = WriteBatch::default();
        self.storage.stage_creator(&mut batch, &creator)?;
        self.storage.stage_platform(&mut batch, &platform)?;
        self.storage.commit(batch)?;

        tracing::info!(creator_id = id, owner = %owner, "creator registered");
        Ok(id)
    }

    /// Update a creator profile (owner only)
    pub fn update_creator_profile(
        &self,
        creator_id: CreatorId,
        caller: &Principal,
        name: String,
        bio: String,
        avatar_url: String,
    ) -> Result<()> {
        let mut creator = self
            .storage
            .get_creator(creator_id)?
            .ok_or(Error::CreatorNotFound(creator_id))?;

        if *caller != creator.owner {
            return Err(Error::NotAuthorized);
        }

        creator.name = name;
        creator.bio = bio;
        creator.avatar_url = avatar_url;

        let mut batch = WriteBatch::default();
        self.storage.stage_creator(&mut batch, &creator)?;
        self.storage.commit(batch)?;
        Ok(())
    }

    /// Increment a creator's follower counter.
    ///
    /// No per-user dedup: repeated follows keep counting, mirroring the like
    /// counter.
    pub fn follow_creator(&self, creator_id: CreatorId, _caller: &Principal) -> Result<()> {
        let mut creator = self
            .storage
            .get_creator(creator_id)?
            .ok_or(Error::CreatorNotFound(creator_id))?;

        creator.followers += 1;

        let mut batch = WriteBatch::default();
        self.storage.stage_creator(&mut batch, &creator)?;
        self.storage.commit(batch)?;
        Ok(())
    }

    /// Mark a creator as verified (admin only)
    pub fn verify_creator(&self, creator_id: CreatorId, caller: &Principal) -> Result<()> {
        if *caller != self.config.admin {
            return Err(Error::NotAuthorized);
        }

        let mut creator = self
            .storage
            .get_creator(creator_id)?
            .ok_or(Error::CreatorNotFound(creator_id))?;

        creator.verification_status = true;

        let mut batch = WriteBatch::default();
        self.storage.stage_creator(&mut batch, &creator)?;
        self.storage.commit(batch)?;

        tracing::info!(creator_id, "creator verified");
        Ok(())
    }

    /// Set a creator's standing tier (admin only)
    pub fn set_creator_tier(
        &self,
        creator_id: CreatorId,
        tier: u8,
        caller: &Principal,
    ) -> Result<()> {
        if *caller != self.config.admin {
            return Err(Error::NotAuthorized);
        }

        let tier = CreatorTier::from_u8(tier).ok_or(Error::InvalidTier(tier))?;

        let mut creator = self
            .storage
            .get_creator(creator_id)?
            .ok_or(Error::CreatorNotFound(creator_id))?;

        creator.tier = tier;

        let mut batch = WriteBatch::default();
        self.storage.stage_creator(&mut batch, &creator)?;
        self.storage.commit(batch)?;
        Ok(())
    }

    // Content registry

    /// Create a content record in `Draft` status and return its id.
    ///
    /// The id counter is untouched when validation fails.
    #[allow(clippy::too_many_arguments)]
    pub fn create_content(
        &self,
        creator_id: CreatorId,
        caller: &Principal,
        title: String,
        description: String,
        content_type: ContentType,
        price: u64,
        thumbnail_url: String,
        content_url: String,
        is_premium: bool,
    ) -> Result<ContentId> {
        let mut creator = self
            .storage
            .get_creator(creator_id)?
            .ok_or(Error::CreatorNotFound(creator_id))?;

        if *caller != creator.owner {
            return Err(Error::NotAuthorized);
        }

        if price < self.config.fees.min_content_price {
            return Err(Error::InvalidPrice {
                price,
                minimum: self.config.fees.min_content_price,
            });
        }

        let mut platform = self.storage.platform_state()?;
        let id = platform.allocate_content_id();

        let content = Content {
            id,
            creator_id,
            title,
            description,
            content_type,
            price,
            thumbnail_url,
            content_url,
            views: 0,
            likes: 0,
            earnings: 0,
            is_premium,
            created_at: Utc::now(),
            status: ContentStatus::Draft,
        };

        creator.content_count += 1;

        let mut batch = WriteBatch::default();
        self.storage.stage_content(&mut batch, &content)?;
        self.storage.stage_creator(&mut batch, &creator)?;
        self.storage.stage_platform(&mut batch, &platform)?;
        self.storage.commit(batch)?;

        tracing::info!(content_id = id, creator_id, "content created");
        Ok(id)
    }

    /// Publish draft content (owner only).
    ///
    /// Publishing twice fails with `AlreadyPublished`; status never reverts.
    pub fn publish_content(&self, content_id: ContentId, caller: &Principal) -> Result<()> {
        let mut content = self
            .storage
            .get_content(content_id)?
            .ok_or(Error::ContentNotFound(content_id))?;

        let creator = self
            .storage
            .get_creator(content.creator_id)?
            .ok_or(Error::CreatorNotFound(content.creator_id))?;

        if *caller != creator.owner {
            return Err(Error::NotAuthorized);
        }

        if content.status != ContentStatus::Draft {
            return Err(Error::AlreadyPublished(content_id));
        }

        content.status = ContentStatus::Published;

        let mut batch = WriteBatch::default();
        self.storage.stage_content(&mut batch, &content)?;
        self.storage.commit(batch)?;

        tracing::info!(content_id, "content published");
        Ok(())
    }

    /// Increment a content like counter.
    ///
    /// No per-user dedup: repeated likes keep counting. Known gap, preserved
    /// from the observed platform behavior.
    pub fn like_content(&self, content_id: ContentId, _caller: &Principal) -> Result<()> {
        let mut content = self
            .storage
            .get_content(content_id)?
            .ok_or(Error::ContentNotFound(content_id))?;

        content.likes += 1;

        let mut batch = WriteBatch::default();
        self.storage.stage_content(&mut batch, &content)?;
        self.storage.commit(batch)?;
        Ok(())
    }

    /// View content through access control.
    ///
    /// On a granted view the view counter is incremented and the updated
    /// snapshot returned; a denied view mutates nothing.
    pub fn view_content(&self, content_id: ContentId, caller: &Principal) -> Result<Content> {
        let mut content = self
            .storage
            .get_content(content_id)?
            .ok_or(Error::ContentNotFound(content_id))?;

        let creator = self
            .storage
            .get_creator(content.creator_id)?
            .ok_or(Error::CreatorNotFound(content.creator_id))?;

        // Drafts are visible only to their owner.
        if content.status == ContentStatus::Draft && *caller != creator.owner {
            self.metrics.record_access_denied();
            return Err(Error::AccessDenied(content_id));
        }

        let now = Utc::now();
        let has_purchase = self.storage.has_purchase(caller, content_id)?;
        let subscription = self.storage.get_subscription(caller, content.creator_id)?;

        if !access::can_access(
            caller,
            &content,
            &creator.owner,
            has_purchase,
            subscription.as_ref(),
            now,
        ) {
            self.metrics.record_access_denied();
            tracing::debug!(content_id, caller = %caller, "premium view denied");
            return Err(Error::AccessDenied(content_id));
        }

        content.views += 1;

        let mut batch = WriteBatch::default();
        self.storage.stage_content(&mut batch, &content)?;
        self.storage.commit(batch)?;

        Ok(content)
    }

    // Tipping and purchases

    /// Purchase published content for its listed price.
    ///
    /// Idempotency: a second purchase of the same (buyer, content) pair
    /// fails with `AlreadyPurchased` and moves no money.
    pub fn purchase_content(&self, buyer: Principal, content_id: ContentId) -> Result<()> {
        let mut content = self
            .storage
            .get_content(content_id)?
            .ok_or(Error::ContentNotFound(content_id))?;

        // Drafts are not purchasable; they are not in the catalog yet.
        if !content.is_published() {
            return Err(Error::ContentNotFound(content_id));
        }

        if self.storage.has_purchase(&buyer, content_id)? {
            return Err(Error::AlreadyPurchased(content_id));
        }

        let mut creator = self
            .storage
            .get_creator(content.creator_id)?
            .ok_or(Error::CreatorNotFound(content.creator_id))?;
        let mut platform = self.storage.platform_state()?;

        let mut batch = WriteBatch::default();
        let split = self.apply_transfer(
            &mut batch,
            &buyer,
            content.price,
            &mut creator,
            &mut platform,
        )?;

        content.earnings += split.creator_credit;

        let purchase = Purchase {
            buyer: buyer.clone(),
            content_id,
            creator_id: content.creator_id,
            price_paid: content.price,
            creator_credit: split.creator_credit,
            purchased_at: Utc::now(),
        };

        self.storage.stage_content(&mut batch, &content)?;
        self.storage.stage_creator(&mut batch, &creator)?;
        self.storage.stage_platform(&mut batch, &platform)?;
        self.storage.stage_purchase(&mut batch, &purchase)?;
        self.storage.commit(batch)?;

        tracing::info!(
            content_id,
            buyer = %buyer,
            price = content.price,
            fee = split.platform_fee,
            "content purchased"
        );
        Ok(())
    }

    /// Tip a creator and return the tip id
    pub fn tip_creator(
        &self,
        tipper: Principal,
        creator_id: CreatorId,
        amount: u64,
        message: String,
    ) -> Result<TipId> {
        if amount == 0 {
            return Err(Error::InvalidAmount("tip amount must be positive".to_string()));
        }

        let mut creator = self
            .storage
            .get_creator(creator_id)?
            .ok_or(Error::CreatorNotFound(creator_id))?;
        let mut platform = self.storage.platform_state()?;

        let mut batch = WriteBatch::default();
        let split =
            self.apply_transfer(&mut batch, &tipper, amount, &mut creator, &mut platform)?;

        let tip_id = platform.allocate_tip_id();
        let tip = Tip {
            id: tip_id,
            creator_id,
            tipper: tipper.clone(),
            amount,
            message,
            tipped_at: Utc::now(),
        };

        self.storage.stage_tip(&mut batch, &tip)?;
        self.storage.stage_creator(&mut batch, &creator)?;
        self.storage.stage_platform(&mut batch, &platform)?;
        self.storage.commit(batch)?;

        tracing::info!(tip_id, creator_id, amount, fee = split.platform_fee, "tip recorded");
        Ok(tip_id)
    }

    // Subscriptions

    /// Subscribe to a creator for `months` periods at the tier's rate.
    ///
    /// Renewal policy: while the existing window is active, the window
    /// extends and the tier is replaced by the newly paid tier; once
    /// expired, a fresh window starts at the current time. `amount_paid`
    /// accumulates across renewals.
    pub fn subscribe_to_creator(
        &self,
        subscriber: Principal,
        creator_id: CreatorId,
        tier: u8,
        months: u32,
        auto_renew: bool,
    ) -> Result<()> {
        let tier = SubscriptionTier::from_u8(tier).ok_or(Error::InvalidTier(tier))?;

        if months == 0 || months > MAX_SUBSCRIPTION_MONTHS {
            return Err(Error::InvalidAmount(format!(
                "months must be between 1 and {}",
                MAX_SUBSCRIPTION_MONTHS
            )));
        }

        let mut creator = self
            .storage
            .get_creator(creator_id)?
            .ok_or(Error::CreatorNotFound(creator_id))?;

        let amount = self
            .config
            .subscriptions
            .monthly_rate(tier)
            .checked_mul(months as u64)
            .ok_or_else(|| Error::InvalidAmount("subscription amount overflow".to_string()))?;

        let mut platform = self.storage.platform_state()?;

        let mut batch = WriteBatch::default();
        self.apply_transfer(&mut batch, &subscriber, amount, &mut creator, &mut platform)?;

        let now = Utc::now();
        let extension = Duration::days(self.config.subscriptions.period_days * months as i64);

        let existing = self.storage.get_subscription(&subscriber, creator_id)?;
        let subscription = match existing {
            Some(prev) if prev.is_active(now) => Subscription {
                subscriber: subscriber.clone(),
                creator_id,
                tier,
                start_date: prev.start_date,
                end_date: prev.end_date + extension,
                amount_paid: prev.amount_paid + amount,
                auto_renew,
            },
            Some(prev) => Subscription {
                subscriber: subscriber.clone(),
                creator_id,
                tier,
                start_date: now,
                end_date: now + extension,
                amount_paid: prev.amount_paid + amount,
                auto_renew,
            },
            None => Subscription {
                subscriber: subscriber.clone(),
                creator_id,
                tier,
                start_date: now,
                end_date: now + extension,
                amount_paid: amount,
                auto_renew,
            },
        };

        self.storage.stage_subscription(&mut batch, &subscription)?;
        self.storage.stage_creator(&mut batch, &creator)?;
        self.storage.stage_platform(&mut batch, &platform)?;
        self.storage.commit(batch)?;

        tracing::info!(creator_id, subscriber = %subscriber, months, amount, "subscription recorded");
        Ok(())
    }

    // Balances and withdrawals

    /// Withdraw accrued creator earnings to the owner's wallet
    pub fn withdraw_earnings(
        &self,
        creator_id: CreatorId,
        caller: &Principal,
        amount: u64,
    ) -> Result<()> {
        if amount == 0 {
            return Err(Error::InvalidAmount(
                "withdrawal amount must be positive".to_string(),
            ));
        }

        let mut creator = self
            .storage
            .get_creator(creator_id)?
            .ok_or(Error::CreatorNotFound(creator_id))?;

        if *caller != creator.owner {
            return Err(Error::NotAuthorized);
        }

        if amount > creator.total_earnings {
            return Err(Error::InsufficientBalance {
                requested: amount,
                available: creator.total_earnings,
            });
        }

        creator.total_earnings -= amount;
        let balance = self.storage.wallet_balance(caller)?;

        let mut batch = WriteBatch::default();
        self.storage.stage_creator(&mut batch, &creator)?;
        self.storage.stage_wallet(&mut batch, caller, balance + amount)?;
        self.storage.commit(batch)?;

        tracing::info!(creator_id, amount, "earnings withdrawn");
        Ok(())
    }

    /// Sweep the whole platform fee accumulator to the admin wallet (admin
    /// only); returns the amount withdrawn.
    pub fn withdraw_platform_fees(&self, caller: &Principal) -> Result<u64> {
        if *caller != self.config.admin {
            return Err(Error::NotAuthorized);
        }

        let mut platform = self.storage.platform_state()?;
        let amount = platform.platform_earnings;
        platform.platform_earnings = 0;

        let balance = self.storage.wallet_balance(caller)?;

        let mut batch = WriteBatch::default();
        self.storage.stage_platform(&mut batch, &platform)?;
        self.storage.stage_wallet(&mut batch, caller, balance + amount)?;
        self.storage.commit(batch)?;

        tracing::info!(amount, "platform fees withdrawn");
        Ok(amount)
    }

    /// Fund a principal's spendable balance.
    ///
    /// Entry point for the external wallet substrate (and test rigs); the
    /// core itself never mints.
    pub fn deposit(&self, principal: &Principal, amount: u64) -> Result<()> {
        let balance = self.storage.wallet_balance(principal)?;
        let updated = balance
            .checked_add(amount)
            .ok_or_else(|| Error::InvalidAmount("wallet balance overflow".to_string()))?;

        let mut batch = WriteBatch::default();
        self.storage.stage_wallet(&mut batch, principal, updated)?;
        self.storage.commit(batch)?;
        Ok(())
    }

    /// Debit the payer wallet and split the amount between creator and
    /// platform. All movements are staged; nothing is visible until the
    /// caller commits the batch.
    fn apply_transfer(
        &self,
        batch: &mut WriteBatch,
        payer: &Principal,
        amount: u64,
        creator: &mut Creator,
        platform: &mut PlatformState,
    ) -> Result<FeeSplit> {
        let balance = self.storage.wallet_balance(payer)?;
        if balance < amount {
            return Err(Error::InsufficientFunds {
                required: amount,
                available: balance,
            });
        }

        let split = fees::split(amount, self.config.fees.platform_fee_percent);

        self.storage.stage_wallet(batch, payer, balance - amount)?;
        creator.total_earnings += split.creator_credit;
        platform.platform_earnings += split.platform_fee;

        self.metrics.record_transfer(amount, split.platform_fee);
        Ok(split)
    }

    // Read-only queries

    /// Get creator by id
    pub fn get_creator(&self, creator_id: CreatorId) -> Result<Option<Creator>> {
        self.storage.get_creator(creator_id)
    }

    /// Get content by id
    pub fn get_content(&self, content_id: ContentId) -> Result<Option<Content>> {
        self.storage.get_content(content_id)
    }

    /// Get the subscription record for a (user, creator) pair
    pub fn get_subscription(
        &self,
        user: &Principal,
        creator_id: CreatorId,
    ) -> Result<Option<Subscription>> {
        self.storage.get_subscription(user, creator_id)
    }

    /// Whether a purchase record exists for a (user, content) pair
    pub fn has_purchased_content(
        &self,
        user: &Principal,
        content_id: ContentId,
    ) -> Result<bool> {
        self.storage.has_purchase(user, content_id)
    }

    /// Whether an unexpired subscription exists for a (user, creator) pair
    pub fn is_subscribed(&self, user: &Principal, creator_id: CreatorId) -> Result<bool> {
        Ok(self
            .storage
            .get_subscription(user, creator_id)?
            .map(|sub| sub.is_active(Utc::now()))
            .unwrap_or(false))
    }

    /// The active subscription tier, or `None` when not subscribed.
    ///
    /// `None` is distinct from `SubscriptionTier::Basic`.
    pub fn subscription_tier(
        &self,
        user: &Principal,
        creator_id: CreatorId,
    ) -> Result<Option<SubscriptionTier>> {
        Ok(self
            .storage
            .get_subscription(user, creator_id)?
            .filter(|sub| sub.is_active(Utc::now()))
            .map(|sub| sub.tier))
    }

    /// Spendable wallet balance for a principal
    pub fn wallet_balance(&self, principal: &Principal) -> Result<u64> {
        self.storage.wallet_balance(principal)
    }

    /// Per-creator statistics rollup
    pub fn creator_stats(&self, creator_id: CreatorId) -> Result<Option<CreatorStats>> {
        stats::creator_stats(
            &self.storage,
            creator_id,
            Utc::now(),
            &self.config.stats,
            self.config.fees.platform_fee_percent,
        )
    }

    /// Platform-wide statistics rollup
    pub fn platform_stats(&self) -> Result<PlatformStats> {
        stats::platform_stats(&self.storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_engine() -> (Engine, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data_dir = temp_dir.path().to_path_buf();

        let storage = Arc::new(Storage::open(&config).unwrap());
        let metrics = Metrics::new().unwrap();
        (Engine::new(storage, config, metrics), temp_dir)
    }

    fn admin(engine: &Engine) -> Principal {
        engine.config().admin.clone()
    }

    fn user1() -> Principal {
        Principal::new("ST2JHG361ZXG51QTKY2NQCVBPPRRE2KZB1HR05NNC")
    }

    fn user2() -> Principal {
        Principal::new("ST2NEB84ASENDXKYGJPQW86YXQCEFEX2ZQPG87ND")
    }

    fn register(engine: &Engine, owner: &Principal) -> CreatorId {
        engine
            .register_creator(
                owner.clone(),
                "Alex Creator".to_string(),
                "Tech content creator".to_string(),
                "https://example.com/avatar.jpg".to_string(),
            )
            .unwrap()
    }

    fn create_published(engine: &Engine, creator_id: CreatorId, owner: &Principal, price: u64, is_premium: bool) -> ContentId {
        let content_id = engine
            .create_content(
                creator_id,
                owner,
                "How to Build a YouTube Channel".to_string(),
                "Complete guide to YouTube success".to_string(),
                ContentType::Video,
                price,
                "https://example.com/thumb.jpg".to_string(),
                "https://example.com/video.mp4".to_string(),
                is_premium,
            )
            .unwrap();
        engine.publish_content(content_id, owner).unwrap();
        content_id
    }

    #[test]
    fn test_register_assigns_sequential_ids() {
        let (engine, _temp) = test_engine();

        assert_eq!(register(&engine, &user1()), 1);
        assert_eq!(register(&engine, &user1()), 2);
        assert_eq!(register(&engine, &user2()), 3);
    }

    #[test]
    fn test_register_round_trip_with_zero_counters() {
        let (engine, _temp) = test_engine();
        let id = register(&engine, &user1());

        let creator = engine.get_creator(id).unwrap().unwrap();
        assert_eq!(creator.name, "Alex Creator");
        assert_eq!(creator.bio, "Tech content creator");
        assert_eq!(creator.avatar_url, "https://example.com/avatar.jpg");
        assert_eq!(creator.owner, user1());
        assert_eq!(creator.followers, 0);
        assert_eq!(creator.total_earnings, 0);
        assert_eq!(creator.content_count, 0);
        assert!(!creator.verification_status);
        assert_eq!(creator.tier, CreatorTier::Basic);
    }

    #[test]
    fn test_update_profile_owner_only() {
        let (engine, _temp) = test_engine();
        let id = register(&engine, &user1());

        let err = engine
            .update_creator_profile(
                id,
                &user2(),
                "Hijacked".to_string(),
                String::new(),
                String::new(),
            )
            .unwrap_err();
        assert_eq!(err.code(), 401);

        engine
            .update_creator_profile(
                id,
                &user1(),
                "Alex Creator Updated".to_string(),
                "Updated bio".to_string(),
                "https://example.com/new-avatar.jpg".to_string(),
            )
            .unwrap();

        let creator = engine.get_creator(id).unwrap().unwrap();
        assert_eq!(creator.name, "Alex Creator Updated");
    }

    #[test]
    fn test_create_content_rejects_low_price() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());

        let err = engine
            .create_content(
                creator_id,
                &user1(),
                "Cheap Content".to_string(),
                "Too cheap".to_string(),
                ContentType::Video,
                500_000, // below minimum
                String::new(),
                String::new(),
                false,
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPrice { .. }));
        assert_eq!(err.code(), 402);

        // No record created, id counter unchanged.
        let stats = engine.platform_stats().unwrap();
        assert_eq!(stats.total_content, 0);
        assert_eq!(stats.next_content_id, 1);
        assert_eq!(
            engine.get_creator(creator_id).unwrap().unwrap().content_count,
            0
        );
    }

    #[test]
    fn test_create_content_starts_draft() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());

        let content_id = engine
            .create_content(
                creator_id,
                &user1(),
                "Draft".to_string(),
                String::new(),
                ContentType::Text,
                5_000_000,
                String::new(),
                String::new(),
                false,
            )
            .unwrap();

        let content = engine.get_content(content_id).unwrap().unwrap();
        assert_eq!(content.status, ContentStatus::Draft);
        assert_eq!(content.views, 0);
        assert_eq!(content.likes, 0);
        assert_eq!(content.earnings, 0);
        assert_eq!(
            engine.get_creator(creator_id).unwrap().unwrap().content_count,
            1
        );
    }

    #[test]
    fn test_publish_twice_fails() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());
        let content_id = create_published(&engine, creator_id, &user1(), 5_000_000, false);

        let err = engine.publish_content(content_id, &user1()).unwrap_err();
        assert!(matches!(err, Error::AlreadyPublished(_)));

        // Status never reverts.
        let content = engine.get_content(content_id).unwrap().unwrap();
        assert_eq!(content.status, ContentStatus::Published);
    }

    #[test]
    fn test_publish_owner_only() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());
        let content_id = engine
            .create_content(
                creator_id,
                &user1(),
                "Draft".to_string(),
                String::new(),
                ContentType::Video,
                5_000_000,
                String::new(),
                String::new(),
                false,
            )
            .unwrap();

        assert_eq!(
            engine.publish_content(content_id, &user2()).unwrap_err().code(),
            401
        );
    }

    #[test]
    fn test_purchase_splits_fee_exactly() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());
        let content_id = create_published(&engine, creator_id, &user1(), 10_000_000, false);

        engine.deposit(&user2(), 50_000_000).unwrap();
        engine.purchase_content(user2(), content_id).unwrap();

        // 5% fee on 10 units
        let creator = engine.get_creator(creator_id).unwrap().unwrap();
        assert_eq!(creator.total_earnings, 9_500_000);

        let content = engine.get_content(content_id).unwrap().unwrap();
        assert_eq!(content.earnings, 9_500_000);

        let stats = engine.platform_stats().unwrap();
        assert_eq!(stats.platform_earnings, 500_000);

        // Conservation: debit equals credit plus fee.
        assert_eq!(engine.wallet_balance(&user2()).unwrap(), 40_000_000);
        assert_eq!(creator.total_earnings + stats.platform_earnings, 10_000_000);
    }

    #[test]
    fn test_purchase_idempotence() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());
        let content_id = create_published(&engine, creator_id, &user1(), 5_000_000, false);

        engine.deposit(&user2(), 20_000_000).unwrap();
        engine.purchase_content(user2(), content_id).unwrap();

        let err = engine.purchase_content(user2(), content_id).unwrap_err();
        assert!(matches!(err, Error::AlreadyPurchased(_)));
        assert_eq!(err.code(), 409);

        // Exactly one net-of-fee credit, not two.
        let creator = engine.get_creator(creator_id).unwrap().unwrap();
        assert_eq!(creator.total_earnings, 4_750_000);
        assert_eq!(engine.wallet_balance(&user2()).unwrap(), 15_000_000);
        assert!(engine.has_purchased_content(&user2(), content_id).unwrap());
    }

    #[test]
    fn test_purchase_insufficient_funds_leaves_no_trace() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());
        let content_id = create_published(&engine, creator_id, &user1(), 5_000_000, false);

        engine.deposit(&user2(), 1_000).unwrap();
        let err = engine.purchase_content(user2(), content_id).unwrap_err();
        assert!(matches!(err, Error::InsufficientFunds { .. }));

        assert_eq!(engine.wallet_balance(&user2()).unwrap(), 1_000);
        assert!(!engine.has_purchased_content(&user2(), content_id).unwrap());
        assert_eq!(engine.get_creator(creator_id).unwrap().unwrap().total_earnings, 0);
        assert_eq!(engine.platform_stats().unwrap().platform_earnings, 0);
    }

    #[test]
    fn test_purchase_unpublished_not_found() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());
        let content_id = engine
            .create_content(
                creator_id,
                &user1(),
                "Draft".to_string(),
                String::new(),
                ContentType::Video,
                5_000_000,
                String::new(),
                String::new(),
                false,
            )
            .unwrap();

        engine.deposit(&user2(), 20_000_000).unwrap();
        let err = engine.purchase_content(user2(), content_id).unwrap_err();
        assert_eq!(err.code(), 404);
    }

    #[test]
    fn test_premium_view_denied_then_granted_after_purchase() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());
        let content_id = create_published(&engine, creator_id, &user1(), 5_000_000, true);

        let err = engine.view_content(content_id, &user2()).unwrap_err();
        assert!(matches!(err, Error::AccessDenied(_)));

        // Denied view does not count.
        assert_eq!(engine.get_content(content_id).unwrap().unwrap().views, 0);

        engine.deposit(&user2(), 20_000_000).unwrap();
        engine.purchase_content(user2(), content_id).unwrap();

        let snapshot = engine.view_content(content_id, &user2()).unwrap();
        assert_eq!(snapshot.views, 1);
    }

    #[test]
    fn test_non_premium_view_by_stranger() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());
        let content_id = create_published(&engine, creator_id, &user1(), 5_000_000, false);

        let snapshot = engine.view_content(content_id, &user2()).unwrap();
        assert_eq!(snapshot.views, 1);

        let snapshot = engine.view_content(content_id, &user2()).unwrap();
        assert_eq!(snapshot.views, 2);
    }

    #[test]
    fn test_draft_view_owner_only() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());
        let content_id = engine
            .create_content(
                creator_id,
                &user1(),
                "Draft".to_string(),
                String::new(),
                ContentType::Video,
                5_000_000,
                String::new(),
                String::new(),
                false,
            )
            .unwrap();

        assert!(engine.view_content(content_id, &user2()).is_err());
        assert!(engine.view_content(content_id, &user1()).is_ok());
    }

    #[test]
    fn test_premium_view_granted_by_subscription() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());
        let content_id = create_published(&engine, creator_id, &user1(), 5_000_000, true);

        engine.deposit(&user2(), 20_000_000).unwrap();
        engine
            .subscribe_to_creator(user2(), creator_id, 0, 1, false)
            .unwrap();

        let snapshot = engine.view_content(content_id, &user2()).unwrap();
        assert_eq!(snapshot.views, 1);
    }

    #[test]
    fn test_subscribe_invalid_tier() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());

        engine.deposit(&user2(), 50_000_000).unwrap();
        let err = engine
            .subscribe_to_creator(user2(), creator_id, 5, 1, false)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTier(5)));
        assert_eq!(err.code(), 407);

        // No record, no money moved.
        assert!(!engine.is_subscribed(&user2(), creator_id).unwrap());
        assert_eq!(engine.wallet_balance(&user2()).unwrap(), 50_000_000);
    }

    #[test]
    fn test_subscribe_charges_rate_times_months() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());

        engine.deposit(&user2(), 50_000_000).unwrap();
        engine
            .subscribe_to_creator(user2(), creator_id, 1, 3, false)
            .unwrap();

        // Premium rate 5 units/month x 3 months
        assert_eq!(engine.wallet_balance(&user2()).unwrap(), 35_000_000);
        assert!(engine.is_subscribed(&user2(), creator_id).unwrap());
        assert_eq!(
            engine.subscription_tier(&user2(), creator_id).unwrap(),
            Some(SubscriptionTier::Premium)
        );

        let sub = engine.get_subscription(&user2(), creator_id).unwrap().unwrap();
        assert_eq!(sub.amount_paid, 15_000_000);
        assert!(sub.end_date > sub.start_date);
        assert_eq!((sub.end_date - sub.start_date).num_days(), 90);
    }

    #[test]
    fn test_resubscribe_extends_active_window() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());

        engine.deposit(&user2(), 50_000_000).unwrap();
        engine
            .subscribe_to_creator(user2(), creator_id, 0, 1, false)
            .unwrap();
        let first = engine.get_subscription(&user2(), creator_id).unwrap().unwrap();

        engine
            .subscribe_to_creator(user2(), creator_id, 1, 1, true)
            .unwrap();
        let renewed = engine.get_subscription(&user2(), creator_id).unwrap().unwrap();

        assert_eq!(renewed.start_date, first.start_date);
        assert_eq!(renewed.end_date, first.end_date + Duration::days(30));
        assert_eq!(renewed.tier, SubscriptionTier::Premium);
        assert_eq!(renewed.amount_paid, 2_000_000 + 5_000_000);
        assert!(renewed.auto_renew);
    }

    #[test]
    fn test_subscription_tier_none_when_absent() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());

        assert_eq!(engine.subscription_tier(&user2(), creator_id).unwrap(), None);
        assert!(!engine.is_subscribed(&user2(), creator_id).unwrap());
    }

    #[test]
    fn test_tip_creator() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());

        engine.deposit(&user2(), 10_000_000).unwrap();
        let tip_id = engine
            .tip_creator(
                user2(),
                creator_id,
                1_000_000,
                "Great content, keep it up!".to_string(),
            )
            .unwrap();
        assert_eq!(tip_id, 1);

        let tip_id = engine
            .tip_creator(user2(), creator_id, 500_000, "Love your work!".to_string())
            .unwrap();
        assert_eq!(tip_id, 2);

        // Net of 5% fee on both tips.
        let creator = engine.get_creator(creator_id).unwrap().unwrap();
        assert_eq!(creator.total_earnings, 950_000 + 475_000);
    }

    #[test]
    fn test_tip_zero_rejected() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());

        let err = engine
            .tip_creator(user2(), creator_id, 0, String::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAmount(_)));
    }

    #[test]
    fn test_verify_creator_admin_only() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());

        let err = engine.verify_creator(creator_id, &user1()).unwrap_err();
        assert_eq!(err.code(), 401);
        assert!(!engine.get_creator(creator_id).unwrap().unwrap().verification_status);

        engine.verify_creator(creator_id, &admin(&engine)).unwrap();
        assert!(engine.get_creator(creator_id).unwrap().unwrap().verification_status);
    }

    #[test]
    fn test_set_creator_tier() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());

        assert_eq!(
            engine
                .set_creator_tier(creator_id, 1, &user1())
                .unwrap_err()
                .code(),
            401
        );
        assert_eq!(
            engine
                .set_creator_tier(creator_id, 9, &admin(&engine))
                .unwrap_err()
                .code(),
            407
        );

        engine.set_creator_tier(creator_id, 2, &admin(&engine)).unwrap();
        assert_eq!(
            engine.get_creator(creator_id).unwrap().unwrap().tier,
            CreatorTier::Platinum
        );
    }

    #[test]
    fn test_withdraw_earnings() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());
        let content_id = create_published(&engine, creator_id, &user1(), 10_000_000, false);

        engine.deposit(&user2(), 10_000_000).unwrap();
        engine.purchase_content(user2(), content_id).unwrap();

        // Accrued 9.5 units; withdrawing more fails.
        let err = engine
            .withdraw_earnings(creator_id, &user1(), 10_000_000)
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientBalance { .. }));

        engine
            .withdraw_earnings(creator_id, &user1(), 4_000_000)
            .unwrap();
        let creator = engine.get_creator(creator_id).unwrap().unwrap();
        assert_eq!(creator.total_earnings, 5_500_000);
        assert_eq!(engine.wallet_balance(&user1()).unwrap(), 4_000_000);

        // Only the owner may withdraw.
        assert_eq!(
            engine
                .withdraw_earnings(creator_id, &user2(), 1)
                .unwrap_err()
                .code(),
            401
        );
    }

    #[test]
    fn test_withdraw_platform_fees_sweeps() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());
        let content_id = create_published(&engine, creator_id, &user1(), 10_000_000, false);

        engine.deposit(&user2(), 10_000_000).unwrap();
        engine.purchase_content(user2(), content_id).unwrap();

        assert_eq!(
            engine.withdraw_platform_fees(&user1()).unwrap_err().code(),
            401
        );

        let admin = admin(&engine);
        let swept = engine.withdraw_platform_fees(&admin).unwrap();
        assert_eq!(swept, 500_000);
        assert_eq!(engine.platform_stats().unwrap().platform_earnings, 0);
        assert_eq!(engine.wallet_balance(&admin).unwrap(), 500_000);

        // Second sweep finds nothing.
        assert_eq!(engine.withdraw_platform_fees(&admin).unwrap(), 0);
    }

    #[test]
    fn test_follow_and_like_counters() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());
        let content_id = create_published(&engine, creator_id, &user1(), 5_000_000, false);

        engine.follow_creator(creator_id, &user2()).unwrap();
        engine.follow_creator(creator_id, &user2()).unwrap();
        assert_eq!(engine.get_creator(creator_id).unwrap().unwrap().followers, 2);

        // No dedup on likes either.
        engine.like_content(content_id, &user2()).unwrap();
        engine.like_content(content_id, &user2()).unwrap();
        engine.like_content(content_id, &user2()).unwrap();
        assert_eq!(engine.get_content(content_id).unwrap().unwrap().likes, 3);
    }

    #[test]
    fn test_creator_stats_rollup() {
        let (engine, _temp) = test_engine();
        let creator_id = register(&engine, &user1());
        let content_id = create_published(&engine, creator_id, &user1(), 10_000_000, false);

        engine.deposit(&user2(), 50_000_000).unwrap();
        engine.view_content(content_id, &user2()).unwrap();
        engine.view_content(content_id, &user2()).unwrap();
        engine.like_content(content_id, &user2()).unwrap();
        engine.purchase_content(user2(), content_id).unwrap();
        engine
            .tip_creator(user2(), creator_id, 1_000_000, "tip".to_string())
            .unwrap();
        engine
            .subscribe_to_creator(user2(), creator_id, 0, 1, false)
            .unwrap();

        let stats = engine.creator_stats(creator_id).unwrap().unwrap();
        assert_eq!(stats.total_views, 2);
        assert_eq!(stats.total_likes, 1);
        assert_eq!(stats.total_tips, 1);
        assert_eq!(stats.subscriber_count, 1);
        // purchase 9.5 + tip 0.95 + subscription 1.9, all net of 5%
        assert_eq!(stats.monthly_earnings, 9_500_000 + 950_000 + 1_900_000);

        assert!(engine.creator_stats(999).unwrap().is_none());
    }

    #[test]
    fn test_platform_stats_rollup() {
        let (engine, _temp) = test_engine();
        let c1 = register(&engine, &user1());
        let _c2 = register(&engine, &user2());
        create_published(&engine, c1, &user1(), 5_000_000, false);

        let stats = engine.platform_stats().unwrap();
        assert_eq!(stats.total_creators, 2);
        assert_eq!(stats.total_content, 1);
        assert_eq!(stats.next_creator_id, 3);
        assert_eq!(stats.next_content_id, 2);
    }
}
