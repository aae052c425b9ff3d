//! Objective edit-lock policy.
//!
//! A lock is advisory: one row per objective with an expiry timestamp. The
//! wizard renews it on a heartbeat and the server treats an expired row as
//! absent. No fencing — SQLite row operations are the only arbiter.

/// Lock lifetime in seconds.
pub const LOCK_TTL_SECS: u64 = 300;

/// Client heartbeat interval in seconds (renew before the TTL lapses).
pub const LOCK_HEARTBEAT_SECS: u64 = 240;

/// Wizard auto-save interval in seconds.
pub const AUTO_SAVE_SECS: u64 = 30;

/// Expiry timestamp for a lock taken at `now_unix`.
pub fn lock_expiry(now_unix: u64) -> u64 {
    now_unix + LOCK_TTL_SECS
}

/// Whether a lock row with `expires_at` is stale at `now_unix`.
pub fn is_expired(expires_at: u64, now_unix: u64) -> bool {
    expires_at <= now_unix
}

/// How an existing lock row relates to the member asking about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockView {
    /// No live lock.
    Free,
    /// Held by the asking member.
    Mine,
    /// Held by someone else until `expires_at`.
    Other { expires_at: u64 },
}

/// Classify a lock row (if any) from the perspective of `member_id`.
pub fn view(
    row: Option<(&str, u64)>,
    member_id: &str,
    now_unix: u64,
) -> LockView {
    match row {
        Some((holder, expires_at)) if !is_expired(expires_at, now_unix) => {
            if holder == member_id {
                LockView::Mine
            } else {
                LockView::Other { expires_at }
            }
        }
        _ => LockView::Free,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heartbeat_renews_before_expiry() {
        assert!(LOCK_HEARTBEAT_SECS < LOCK_TTL_SECS);
    }

    #[test]
    fn expired_lock_is_free() {
        let now = 1_000_000;
        assert_eq!(view(Some(("m1", now - 1)), "m2", now), LockView::Free);
        assert_eq!(view(Some(("m1", now)), "m2", now), LockView::Free);
        assert_eq!(view(None, "m2", now), LockView::Free);
    }

    #[test]
    fn live_lock_distinguishes_holder() {
        let now = 1_000_000;
        let exp = lock_expiry(now);
        assert_eq!(view(Some(("m1", exp)), "m1", now), LockView::Mine);
        assert_eq!(
            view(Some(("m1", exp)), "m2", now),
            LockView::Other { expires_at: exp }
        );
    }
}
