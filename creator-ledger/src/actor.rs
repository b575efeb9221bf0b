//! Actor-based concurrency for the ledger
//!
//! Single-writer pattern using a Tokio actor: every mutating operation is a
//! message processed to completion before the next one starts, so a
//! validation check and the record write it guards are atomic as a unit
//! (two concurrent purchases of the same content by the same buyer cannot
//! both succeed). Read-only queries bypass the actor and observe the latest
//! committed state.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │           External callers (HTTP/CLI glue)           │
//! └─────────────────────┬────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │               LedgerHandle (Clone)                   │
//! │         Sends commands to actor mailbox              │
//! └─────────────────────┬────────────────────────────────┘
//!                       │ mpsc::channel (bounded)
//!                       ▼
//! ┌──────────────────────────────────────────────────────┐
//! │             LedgerActor (Single Task)                │
//! │   validate -> transfer -> stage -> atomic commit     │
//! └──────────────────────────────────────────────────────┘
//! ```

use crate::{
    engine::Engine,
    error::{Error, Result},
    types::{Content, ContentId, ContentType, CreatorId, Principal, TipId},
};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Command sent to the ledger actor
pub enum LedgerCommand {
    /// Register a creator profile
    RegisterCreator {
        /// Owning principal
        owner: Principal,
        /// Display name
        name: String,
        /// Profile bio
        bio: String,
        /// Avatar URL
        avatar_url: String,
        /// Response channel
        respond: oneshot::Sender<Result<CreatorId>>,
    },

    /// Update a creator profile
    UpdateCreatorProfile {
        /// Creator to update
        creator_id: CreatorId,
        /// Calling principal
        caller: Principal,
        /// New display name
        name: String,
        /// New bio
        bio: String,
        /// New avatar URL
        avatar_url: String,
        /// Response channel
        respond: oneshot::Sender<Result<()>>,
    },

    /// Increment a creator's follower counter
    FollowCreator {
        /// Creator followed
        creator_id: CreatorId,
        /// Calling principal
        caller: Principal,
        /// Response channel
        respond: oneshot::Sender<Result<()>>,
    },

    /// Mark a creator as verified (admin)
    VerifyCreator {
        /// Creator to verify
        creator_id: CreatorId,
        /// Calling principal
        caller: Principal,
        /// Response channel
        respond: oneshot::Sender<Result<()>>,
    },

    /// Set a creator's standing tier (admin)
    SetCreatorTier {
        /// Creator to update
        creator_id: CreatorId,
        /// Raw tier value
        tier: u8,
        /// Calling principal
        caller: Principal,
        /// Response channel
        respond: oneshot::Sender<Result<()>>,
    },

    /// Create a content record
    CreateContent {
        /// Owning creator
        creator_id: CreatorId,
        /// Calling principal
        caller: Principal,
        /// Title
        title: String,
        /// Description
        description: String,
        /// Media type
        content_type: ContentType,
        /// Price in micro-units
        price: u64,
        /// Thumbnail URL
        thumbnail_url: String,
        /// Content URL
        content_url: String,
        /// Premium flag
        is_premium: bool,
        /// Response channel
        respond: oneshot::Sender<Result<ContentId>>,
    },

    /// Publish draft content
    PublishContent {
        /// Content to publish
        content_id: ContentId,
        /// Calling principal
        caller: Principal,
        /// Response channel
        respond: oneshot::Sender<Result<()>>,
    },

    /// Increment a content like counter
    LikeContent {
        /// Content liked
        content_id: ContentId,
        /// Calling principal
        caller: Principal,
        /// Response channel
        respond: oneshot::Sender<Result<()>>,
    },

    /// View content through access control
    ViewContent {
        /// Content viewed
        content_id: ContentId,
        /// Calling principal
        caller: Principal,
        /// Response channel
        respond: oneshot::Sender<Result<Content>>,
    },

    /// Purchase published content
    PurchaseContent {
        /// Buying principal
        buyer: Principal,
        /// Content purchased
        content_id: ContentId,
        /// Response channel
        respond: oneshot::Sender<Result<()>>,
    },

    /// Subscribe to a creator
    Subscribe {
        /// Subscribing principal
        subscriber: Principal,
        /// Creator subscribed to
        creator_id: CreatorId,
        /// Raw tier value
        tier: u8,
        /// Number of periods paid
        months: u32,
        /// Renewal flag
        auto_renew: bool,
        /// Response channel
        respond: oneshot::Sender<Result<()>>,
    },

    /// Tip a creator
    TipCreator {
        /// Tipping principal
        tipper: Principal,
        /// Creator tipped
        creator_id: CreatorId,
        /// Gross amount
        amount: u64,
        /// Message attached to the tip
        message: String,
        /// Response channel
        respond: oneshot::Sender<Result<TipId>>,
    },

    /// Withdraw accrued creator earnings
    WithdrawEarnings {
        /// Creator whose earnings are withdrawn
        creator_id: CreatorId,
        /// Calling principal
        caller: Principal,
        /// Amount to withdraw
        amount: u64,
        /// Response channel
        respond: oneshot::Sender<Result<()>>,
    },

    /// Sweep platform fees (admin)
    WithdrawPlatformFees {
        /// Calling principal
        caller: Principal,
        /// Response channel
        respond: oneshot::Sender<Result<u64>>,
    },

    /// Fund a principal's spendable balance
    Deposit {
        /// Funded principal
        principal: Principal,
        /// Amount to add
        amount: u64,
        /// Response channel
        respond: oneshot::Sender<Result<()>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that processes ledger commands sequentially
pub struct LedgerActor {
    /// Operation engine
    engine: Arc<Engine>,

    /// Mailbox for incoming commands
    mailbox: mpsc::Receiver<LedgerCommand>,
}

impl LedgerActor {
    /// Create new actor
    pub fn new(engine: Arc<Engine>, mailbox: mpsc::Receiver<LedgerCommand>) -> Self {
        Self { engine, mailbox }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(cmd) = self.mailbox.recv().await {
            match cmd {
                LedgerCommand::Shutdown => break,
                cmd => self.handle_command(cmd),
            }
        }
        tracing::debug!("ledger actor stopped");
    }

    /// Handle a single command to completion
    fn handle_command(&mut self, cmd: LedgerCommand) {
        match cmd {
            LedgerCommand::RegisterCreator {
                owner,
                name,
                bio,
                avatar_url,
                respond,
            } => {
                let _ = respond.send(self.engine.register_creator(owner, name, bio, avatar_url));
            }

            LedgerCommand::UpdateCreatorProfile {
                creator_id,
                caller,
                name,
                bio,
                avatar_url,
                respond,
            } => {
                let _ = respond.send(self.engine.update_creator_profile(
                    creator_id,
                    &caller,
                    name,
                    bio,
                    avatar_url,
                ));
            }

            LedgerCommand::FollowCreator {
                creator_id,
                caller,
                respond,
            } => {
                let _ = respond.send(self.engine.follow_creator(creator_id, &caller));
            }

            LedgerCommand::VerifyCreator {
                creator_id,
                caller,
                respond,
            } => {
                let _ = respond.send(self.engine.verify_creator(creator_id, &caller));
            }

            LedgerCommand::SetCreatorTier {
                creator_id,
                tier,
                caller,
                respond,
            } => {
                let _ = respond.send(self.engine.set_creator_tier(creator_id, tier, &caller));
            }

            LedgerCommand::CreateContent {
                creator_id,
                caller,
                title,
                description,
                content_type,
                price,
                thumbnail_url,
                content_url,
                is_premium,
                respond,
            } => {
                let _ = respond.send(self.engine.create_content(
                    creator_id,
                    &caller,
                    title,
                    description,
                    content_type,
                    price,
                    thumbnail_url,
                    content_url,
                    is_premium,
                ));
            }

            LedgerCommand::PublishContent {
                content_id,
                caller,
                respond,
            } => {
                let _ = respond.send(self.engine.publish_content(content_id, &caller));
            }

            LedgerCommand::LikeContent {
                content_id,
                caller,
                respond,
            } => {
                let _ = respond.send(self.engine.like_content(content_id, &caller));
            }

            LedgerCommand::ViewContent {
                content_id,
                caller,
                respond,
            } => {
                let _ = respond.send(self.engine.view_content(content_id, &caller));
            }

            LedgerCommand::PurchaseContent {
                buyer,
                content_id,
                respond,
            } => {
                let _ = respond.send(self.engine.purchase_content(buyer, content_id));
            }

            LedgerCommand::Subscribe {
                subscriber,
                creator_id,
                tier,
                months,
                auto_renew,
                respond,
            } => {
                let _ = respond.send(self.engine.subscribe_to_creator(
                    subscriber,
                    creator_id,
                    tier,
                    months,
                    auto_renew,
                ));
            }

            LedgerCommand::TipCreator {
                tipper,
                creator_id,
                amount,
                message,
                respond,
            } => {
                let _ = respond.send(self.engine.tip_creator(tipper, creator_id, amount, message));
            }

            LedgerCommand::WithdrawEarnings {
                creator_id,
                caller,
                amount,
                respond,
            } => {
                let _ = respond.send(self.engine.withdraw_earnings(creator_id, &caller, amount));
            }

            LedgerCommand::WithdrawPlatformFees { caller, respond } => {
                let _ = respond.send(self.engine.withdraw_platform_fees(&caller));
            }

            LedgerCommand::Deposit {
                principal,
                amount,
                respond,
            } => {
                let _ = respond.send(self.engine.deposit(&principal, amount));
            }

            LedgerCommand::Shutdown => {
                // Handled in main loop
            }
        }
    }
}

/// Handle for sending commands to the actor
#[derive(Clone)]
pub struct LedgerHandle {
    sender: mpsc::Sender<LedgerCommand>,
}

impl std::fmt::Debug for LedgerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerHandle").finish_non_exhaustive()
    }
}

impl LedgerHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<LedgerCommand>) -> Self {
        Self { sender }
    }

    async fn dispatch<T>(
        &self,
        cmd: LedgerCommand,
        rx: oneshot::Receiver<Result<T>>,
    ) -> Result<T> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| Error::Concurrency("actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("response channel closed".to_string()))?
    }

    /// Register a creator profile
    pub async fn register_creator(
        &self,
        owner: Principal,
        name: String,
        bio: String,
        avatar_url: String,
    ) -> Result<CreatorId> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            LedgerCommand::RegisterCreator {
                owner,
                name,
                bio,
                avatar_url,
                respond: tx,
            },
            rx,
        )
        .await
    }

    /// Update a creator profile
    pub async fn update_creator_profile(
        &self,
        creator_id: CreatorId,
        caller: Principal,
        name: String,
        bio: String,
        avatar_url: String,
    ) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            LedgerCommand::UpdateCreatorProfile {
                creator_id,
                caller,
                name,
                bio,
                avatar_url,
                respond: tx,
            },
            rx,
        )
        .await
    }

    /// Increment a creator's follower counter
    pub async fn follow_creator(&self, creator_id: CreatorId, caller: Principal) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            LedgerCommand::FollowCreator {
                creator_id,
                caller,
                respond: tx,
            },
            rx,
        )
        .await
    }

    /// Mark a creator as verified (admin)
    pub async fn verify_creator(&self, creator_id: CreatorId, caller: Principal) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            LedgerCommand::VerifyCreator {
                creator_id,
                caller,
                respond: tx,
            },
            rx,
        )
        .await
    }

    /// Set a creator's standing tier (admin)
    pub async fn set_creator_tier(
        &self,
        creator_id: CreatorId,
        tier: u8,
        caller: Principal,
    ) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            LedgerCommand::SetCreatorTier {
                creator_id,
                tier,
                caller,
                respond: tx,
            },
            rx,
        )
        .await
    }

    /// Create a content record
    #[allow(clippy::too_many_arguments)]
    pub async fn create_content(
        &self,
        creator_id: CreatorId,
        caller: Principal,
        title: String,
        description: String,
        content_type: ContentType,
        price: u64,
        thumbnail_url: String,
        content_url: String,
        is_premium: bool,
    ) -> Result<ContentId> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            LedgerCommand::CreateContent {
                creator_id,
                caller,
                title,
                description,
                content_type,
                price,
                thumbnail_url,
                content_url,
                is_premium,
                respond: tx,
            },
            rx,
        )
        .await
    }

    /// Publish draft content
    pub async fn publish_content(&self, content_id: ContentId, caller: Principal) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            LedgerCommand::PublishContent {
                content_id,
                caller,
                respond: tx,
            },
            rx,
        )
        .await
    }

    /// Increment a content like counter
    pub async fn like_content(&self, content_id: ContentId, caller: Principal) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            LedgerCommand::LikeContent {
                content_id,
                caller,
                respond: tx,
            },
            rx,
        )
        .await
    }

    /// View content through access control
    pub async fn view_content(&self, content_id: ContentId, caller: Principal) -> Result<Content> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            LedgerCommand::ViewContent {
                content_id,
                caller,
                respond: tx,
            },
            rx,
        )
        .await
    }

    /// Purchase published content
    pub async fn purchase_content(&self, buyer: Principal, content_id: ContentId) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            LedgerCommand::PurchaseContent {
                buyer,
                content_id,
                respond: tx,
            },
            rx,
        )
        .await
    }

    /// Subscribe to a creator
    pub async fn subscribe_to_creator(
        &self,
        subscriber: Principal,
        creator_id: CreatorId,
        tier: u8,
        months: u32,
        auto_renew: bool,
    ) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            LedgerCommand::Subscribe {
                subscriber,
                creator_id,
                tier,
                months,
                auto_renew,
                respond: tx,
            },
            rx,
        )
        .await
    }

    /// Tip a creator
    pub async fn tip_creator(
        &self,
        tipper: Principal,
        creator_id: CreatorId,
        amount: u64,
        message: String,
    ) -> Result<TipId> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            LedgerCommand::TipCreator {
                tipper,
                creator_id,
                amount,
                message,
                respond: tx,
            },
            rx,
        )
        .await
    }

    /// Withdraw accrued creator earnings
    pub async fn withdraw_earnings(
        &self,
        creator_id: CreatorId,
        caller: Principal,
        amount: u64,
    ) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            LedgerCommand::WithdrawEarnings {
                creator_id,
                caller,
                amount,
                respond: tx,
            },
            rx,
        )
        .await
    }

    /// Sweep platform fees (admin)
    pub async fn withdraw_platform_fees(&self, caller: Principal) -> Result<u64> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(LedgerCommand::WithdrawPlatformFees { caller, respond: tx }, rx)
            .await
    }

    /// Fund a principal's spendable balance
    pub async fn deposit(&self, principal: Principal, amount: u64) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.dispatch(
            LedgerCommand::Deposit {
                principal,
                amount,
                respond: tx,
            },
            rx,
        )
        .await
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(LedgerCommand::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Spawn the ledger actor
pub fn spawn_ledger_actor(engine: Arc<Engine>) -> LedgerHandle {
    let (tx, rx) = mpsc::channel(1000); // Bounded channel for backpressure
    let actor = LedgerActor::new(engine, rx);

    tokio::spawn(async move {
        actor.run().await;
    });

    LedgerHandle::new(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metrics::Metrics, storage::Storage, Config};

    fn test_engine() -> (Arc<Engine>, tempfile::TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.data_dir = temp_dir.path().to_path_buf();

        let storage = Arc::new(Storage::open(&config).unwrap());
        let metrics = Metrics::new().unwrap();
        (Arc::new(Engine::new(storage, config, metrics)), temp_dir)
    }

    #[tokio::test]
    async fn test_actor_spawn_and_shutdown() {
        let (engine, _temp) = test_engine();
        let handle = spawn_ledger_actor(engine);
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_actor_register_creator() {
        let (engine, _temp) = test_engine();
        let handle = spawn_ledger_actor(engine.clone());

        let id = handle
            .register_creator(
                Principal::new("ST2JHG361ZXG51QTKY2NQCVBPPRRE2KZB1HR05NNC"),
                "Alex Creator".to_string(),
                "Tech content creator".to_string(),
                "https://example.com/avatar.jpg".to_string(),
            )
            .await
            .unwrap();
        assert_eq!(id, 1);

        // Read path sees the committed record immediately.
        let creator = engine.get_creator(1).unwrap().unwrap();
        assert_eq!(creator.name, "Alex Creator");

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_actor_serializes_duplicate_purchases() {
        let (engine, _temp) = test_engine();
        let handle = spawn_ledger_actor(engine.clone());

        let owner = Principal::new("creator-owner");
        let buyer = Principal::new("buyer");

        let creator_id = handle
            .register_creator(owner.clone(), "C".to_string(), String::new(), String::new())
            .await
            .unwrap();
        let content_id = handle
            .create_content(
                creator_id,
                owner.clone(),
                "T".to_string(),
                String::new(),
                ContentType::Video,
                5_000_000,
                String::new(),
                String::new(),
                false,
            )
            .await
            .unwrap();
        handle.publish_content(content_id, owner).await.unwrap();
        handle.deposit(buyer.clone(), 100_000_000).await.unwrap();

        // Race two purchases through the mailbox; exactly one wins.
        let first = handle.purchase_content(buyer.clone(), content_id);
        let second = handle.purchase_content(buyer.clone(), content_id);
        let (a, b) = tokio::join!(first, second);
        assert!(a.is_ok() != b.is_ok());

        let creator = engine.get_creator(creator_id).unwrap().unwrap();
        assert_eq!(creator.total_earnings, 4_750_000);

        handle.shutdown().await.unwrap();
    }
}
