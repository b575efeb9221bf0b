//! Content access control
//!
//! Pure decision function, re-evaluated from the underlying records on every
//! access attempt. Nothing here mutates or caches state; the engine gathers
//! the facts (ownership, purchase history, subscription) and asks for a
//! verdict.

use crate::types::{Content, Principal, Subscription};
use chrono::{DateTime, Utc};

/// Decide whether `user` may view `content`.
///
/// Rules, in order:
/// 1. Non-premium content is freely viewable.
/// 2. The creator's owner always sees their own content.
/// 3. A purchase record grants lifetime access, regardless of later changes.
/// 4. Any unexpired subscription to the content's creator unlocks the whole
///    premium catalog (no per-tier gating).
/// 5. Otherwise: denied.
pub fn can_access(
    user: &Principal,
    content: &Content,
    owner: &Principal,
    has_purchase: bool,
    subscription: Option<&Subscription>,
    now: DateTime<Utc>,
) -> bool {
    if !content.is_premium {
        return true;
    }

    if user == owner {
        return true;
    }

    if has_purchase {
        return true;
    }

    subscription.is_some_and(|sub| sub.is_active(now))
}
