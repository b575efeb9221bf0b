//! Platform fee arithmetic
//!
//! Every monetary transfer is split between the recipient creator and the
//! platform. The split uses integer floor division; the remainder of a
//! non-exact split stays with the creator credit, so
//! `creator_credit + platform_fee == amount` holds exactly for all inputs.

/// Result of splitting a transfer amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    /// Net amount credited to the creator
    pub creator_credit: u64,

    /// Fee withheld for the platform
    pub platform_fee: u64,
}

/// Split `amount` between creator and platform at `fee_rate_percent`.
///
/// `fee_rate_percent` must be <= 100 (enforced by [`crate::Config::validate`]).
pub fn split(amount: u64, fee_rate_percent: u64) -> FeeSplit {
    debug_assert!(fee_rate_percent <= 100);

    // Widen before multiplying so amounts near u64::MAX cannot overflow.
    let platform_fee = (amount as u128 * fee_rate_percent as u128 / 100) as u64;

    FeeSplit {
        creator_credit: amount - platform_fee,
        platform_fee,
    }
}
