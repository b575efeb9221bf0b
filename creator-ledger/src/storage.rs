//! Storage layer using RocksDB
//!
//! # Column Families
//!
//! - `creators` - Creator profiles (key: creator_id)
//! - `content` - Content records (key: content_id)
//! - `purchases` - Purchase records (key: buyer || '|' || content_id)
//! - `subscriptions` - Subscription records (key: subscriber || '|' || creator_id)
//! - `tips` - Append-only tip log (key: tip_id)
//! - `wallets` - Spendable balances of the external wallet substrate (key: principal)
//! - `platform` - Platform-wide scalar accumulators (single key)
//!
//! Mutating operations stage every write into one [`WriteBatch`] and commit
//! it through [`Storage::commit`], so each logical operation is atomic.

use crate::{
    error::{Error, Result},
    types::{
        Content, ContentId, Creator, CreatorId, PlatformState, Principal, Purchase, Subscription,
        Tip, TipId,
    },
    Config,
};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, IteratorMode, Options, WriteBatch, DB};
use std::sync::Arc;

/// Column family names
const CF_CREATORS: &str = "creators";
const CF_CONTENT: &str = "content";
const CF_PURCHASES: &str = "purchases";
const CF_SUBSCRIPTIONS: &str = "subscriptions";
const CF_TIPS: &str = "tips";
const CF_WALLETS: &str = "wallets";
const CF_PLATFORM: &str = "platform";

/// Key for the single platform-state record
const PLATFORM_KEY: &[u8] = b"platform";

/// Storage wrapper for RocksDB
pub struct Storage {
    db: Arc<DB>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    /// Open or create database
    pub fn open(config: &Config) -> Result<Self> {
        let path = &config.data_dir;

        std::fs::create_dir_all(path)?;

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        // Tuning from config
        db_opts.set_write_buffer_size(config.rocksdb.write_buffer_size_mb * 1024 * 1024);
        db_opts.set_max_write_buffer_number(config.rocksdb.max_write_buffer_number);
        db_opts.set_max_background_jobs(config.rocksdb.max_background_jobs);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_CREATORS, Self::cf_options_state()),
            ColumnFamilyDescriptor::new(CF_CONTENT, Self::cf_options_state()),
            ColumnFamilyDescriptor::new(CF_PURCHASES, Self::cf_options_log()),
            ColumnFamilyDescriptor::new(CF_SUBSCRIPTIONS, Self::cf_options_state()),
            ColumnFamilyDescriptor::new(CF_TIPS, Self::cf_options_log()),
            ColumnFamilyDescriptor::new(CF_WALLETS, Self::cf_options_state()),
            ColumnFamilyDescriptor::new(CF_PLATFORM, Self::cf_options_state()),
        ];

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        tracing::info!(path = %path.display(), "opened ledger database");

        Ok(Self { db: Arc::new(db) })
    }

    // Column family options

    fn cf_options_state() -> Options {
        let mut opts = Options::default();
        // Frequently read records, use LZ4 for speed
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn cf_options_log() -> Options {
        let mut opts = Options::default();
        // Append-only records, compress harder
        opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
        opts
    }

    fn cf_handle(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| Error::Storage(format!("column family {} not found", name)))
    }

    // Key helpers

    fn pair_key(principal: &Principal, id: u64) -> Vec<u8> {
        let mut key = principal.as_str().as_bytes().to_vec();
        key.push(b'|'); // Separator
        key.extend_from_slice(&id.to_be_bytes());
        key
    }

    // Creator operations

    /// Get creator by id
    pub fn get_creator(&self, id: CreatorId) -> Result<Option<Creator>> {
        let cf = self.cf_handle(CF_CREATORS)?;
        match self.db.get_cf(cf, id.to_be_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// Stage a creator record into a batch
    pub fn stage_creator(&self, batch: &mut WriteBatch, creator: &Creator) -> Result<()> {
        let cf = self.cf_handle(CF_CREATORS)?;
        batch.put_cf(cf, creator.id.to_be_bytes(), bincode::serialize(creator)?);
        Ok(())
    }

    // Content operations

    /// Get content by id
    pub fn get_content(&self, id: ContentId) -> Result<Option<Content>> {
        let cf = self.cf_handle(CF_CONTENT)?;
        match self.db.get_cf(cf, id.to_be_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// Stage a content record into a batch
    pub fn stage_content(&self, batch: &mut WriteBatch, content: &Content) -> Result<()> {
        let cf = self.cf_handle(CF_CONTENT)?;
        batch.put_cf(cf, content.id.to_be_bytes(), bincode::serialize(content)?);
        Ok(())
    }

    /// Scan all content records
    pub fn scan_content(&self) -> Result<Vec<Content>> {
        let cf = self.cf_handle(CF_CONTENT)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_, value) = item?;
            records.push(bincode::deserialize(&value)?);
        }
        Ok(records)
    }

    // Purchase operations

    /// Get purchase record for a (buyer, content) pair
    pub fn get_purchase(
        &self,
        buyer: &Principal,
        content_id: ContentId,
    ) -> Result<Option<Purchase>> {
        let cf = self.cf_handle(CF_PURCHASES)?;
        match self.db.get_cf(cf, Self::pair_key(buyer, content_id))? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// Whether a purchase record exists for a (buyer, content) pair
    pub fn has_purchase(&self, buyer: &Principal, content_id: ContentId) -> Result<bool> {
        Ok(self.get_purchase(buyer, content_id)?.is_some())
    }

    /// Stage a purchase record into a batch
    pub fn stage_purchase(&self, batch: &mut WriteBatch, purchase: &Purchase) -> Result<()> {
        let cf = self.cf_handle(CF_PURCHASES)?;
        batch.put_cf(
            cf,
            Self::pair_key(&purchase.buyer, purchase.content_id),
            bincode::serialize(purchase)?,
        );
        Ok(())
    }

    /// Scan all purchase records
    pub fn scan_purchases(&self) -> Result<Vec<Purchase>> {
        let cf = self.cf_handle(CF_PURCHASES)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_, value) = item?;
            records.push(bincode::deserialize(&value)?);
        }
        Ok(records)
    }

    // Subscription operations

    /// Get subscription record for a (subscriber, creator) pair
    pub fn get_subscription(
        &self,
        subscriber: &Principal,
        creator_id: CreatorId,
    ) -> Result<Option<Subscription>> {
        let cf = self.cf_handle(CF_SUBSCRIPTIONS)?;
        match self.db.get_cf(cf, Self::pair_key(subscriber, creator_id))? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// Stage a subscription record into a batch
    pub fn stage_subscription(
        &self,
        batch: &mut WriteBatch,
        subscription: &Subscription,
    ) -> Result<()> {
        let cf = self.cf_handle(CF_SUBSCRIPTIONS)?;
        batch.put_cf(
            cf,
            Self::pair_key(&subscription.subscriber, subscription.creator_id),
            bincode::serialize(subscription)?,
        );
        Ok(())
    }

    /// Scan all subscription records
    pub fn scan_subscriptions(&self) -> Result<Vec<Subscription>> {
        let cf = self.cf_handle(CF_SUBSCRIPTIONS)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_, value) = item?;
            records.push(bincode::deserialize(&value)?);
        }
        Ok(records)
    }

    // Tip operations

    /// Get tip by id
    pub fn get_tip(&self, id: TipId) -> Result<Option<Tip>> {
        let cf = self.cf_handle(CF_TIPS)?;
        match self.db.get_cf(cf, id.to_be_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    /// Stage a tip record into a batch
    pub fn stage_tip(&self, batch: &mut WriteBatch, tip: &Tip) -> Result<()> {
        let cf = self.cf_handle(CF_TIPS)?;
        batch.put_cf(cf, tip.id.to_be_bytes(), bincode::serialize(tip)?);
        Ok(())
    }

    /// Scan all tip records
    pub fn scan_tips(&self) -> Result<Vec<Tip>> {
        let cf = self.cf_handle(CF_TIPS)?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_, value) = item?;
            records.push(bincode::deserialize(&value)?);
        }
        Ok(records)
    }

    // Wallet operations

    /// Spendable balance for a principal (zero if never funded)
    pub fn wallet_balance(&self, principal: &Principal) -> Result<u64> {
        let cf = self.cf_handle(CF_WALLETS)?;
        match self.db.get_cf(cf, principal.as_str().as_bytes())? {
            Some(value) => {
                let bytes: [u8; 8] = value
                    .as_slice()
                    .try_into()
                    .map_err(|_| Error::Storage("malformed wallet balance".to_string()))?;
                Ok(u64::from_be_bytes(bytes))
            }
            None => Ok(0),
        }
    }

    /// Stage a wallet balance into a batch
    pub fn stage_wallet(
        &self,
        batch: &mut WriteBatch,
        principal: &Principal,
        balance: u64,
    ) -> Result<()> {
        let cf = self.cf_handle(CF_WALLETS)?;
        batch.put_cf(cf, principal.as_str().as_bytes(), balance.to_be_bytes());
        Ok(())
    }

    // Platform operations

    /// Get platform-wide accumulators (defaults on first open)
    pub fn platform_state(&self) -> Result<PlatformState> {
        let cf = self.cf_handle(CF_PLATFORM)?;
        match self.db.get_cf(cf, PLATFORM_KEY)? {
            Some(value) => Ok(bincode::deserialize(&value)?),
            None => Ok(PlatformState::default()),
        }
    }

    /// Stage the platform state into a batch
    pub fn stage_platform(&self, batch: &mut WriteBatch, state: &PlatformState) -> Result<()> {
        let cf = self.cf_handle(CF_PLATFORM)?;
        batch.put_cf(cf, PLATFORM_KEY, bincode::serialize(state)?);
        Ok(())
    }

    // Commit

    /// Atomically commit a staged batch
    pub fn commit(&self, batch: WriteBatch) -> Result<()> {
        self.db.write(batch)?;
        Ok(())
    }

    /// Close database (graceful shutdown)
    pub fn close(self) -> Result<()> {
        drop(self.db);
        tracing::info!("ledger database closed");
        Ok(())
    }
}
