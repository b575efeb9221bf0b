//! Error types for the monetization ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// Validation failures carry the numeric codes used by existing callers of
/// the platform (see [`Error::code`]); infrastructure failures map to 500.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller is not the required principal (owner or admin)
    #[error("not authorized")]
    NotAuthorized,

    /// Content price below the configured minimum
    #[error("invalid price: {price} is below the minimum of {minimum}")]
    InvalidPrice {
        /// Offered price
        price: u64,
        /// Configured minimum
        minimum: u64,
    },

    /// Monetary amount failed validation (zero tip, zero-month subscription)
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Subscription or creator tier outside the defined set
    #[error("invalid tier: {0}")]
    InvalidTier(u8),

    /// Creator id unknown
    #[error("creator not found: {0}")]
    CreatorNotFound(u64),

    /// Content id unknown (or not visible to the caller)
    #[error("content not found: {0}")]
    ContentNotFound(u64),

    /// Content already transitioned to published
    #[error("content already published: {0}")]
    AlreadyPublished(u64),

    /// Purchase record already exists for this (buyer, content) pair
    #[error("content already purchased: {0}")]
    AlreadyPurchased(u64),

    /// Premium content access denied
    #[error("access denied to content {0}")]
    AccessDenied(u64),

    /// Payer wallet cannot cover the transfer
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Amount the transfer needs
        required: u64,
        /// Spendable wallet balance
        available: u64,
    },

    /// Withdrawal exceeds the accrued balance
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Amount requested
        requested: u64,
        /// Accrued earnings available
        available: u64,
    },

    /// Storage error (RocksDB)
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Numeric error code for wire compatibility with existing callers.
    ///
    /// The 401/402/404/407 values are load-bearing; the rest follow the same
    /// HTTP-flavored convention.
    pub fn code(&self) -> u16 {
        match self {
            Error::NotAuthorized | Error::AccessDenied(_) => 401,
            Error::InvalidPrice { .. } | Error::InvalidAmount(_) => 402,
            Error::InsufficientFunds { .. } | Error::InsufficientBalance { .. } => 403,
            Error::CreatorNotFound(_) | Error::ContentNotFound(_) => 404,
            Error::InvalidTier(_) => 407,
            Error::AlreadyPublished(_) | Error::AlreadyPurchased(_) => 409,
            Error::Storage(_)
            | Error::Serialization(_)
            | Error::Concurrency(_)
            | Error::Config(_)
            | Error::Io(_)
            | Error::Other(_) => 500,
        }
    }
}

impl From<rocksdb::Error> for Error {
    fn from(err: rocksdb::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
