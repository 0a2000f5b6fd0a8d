//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use std::fmt;

/// A shortened URL with its lifecycle state.
///
/// `code`, `target_url` and `created_at` never change after creation.
/// `hit_count` only grows and `revoked` only ever moves from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub hit_count: i64,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked: bool,
}

/// Why a known link can no longer be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoneReason {
    Revoked,
    Expired,
}

impl GoneReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revoked => "revoked",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for GoneReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Link {
    /// Returns true if the expiry time is at or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Checks whether the link may be resolved at `now`.
    ///
    /// Revocation takes precedence over expiry when both apply.
    pub fn check_resolvable_at(&self, now: DateTime<Utc>) -> Result<(), GoneReason> {
        if self.revoked {
            return Err(GoneReason::Revoked);
        }
        if self.is_expired_at(now) {
            return Err(GoneReason::Expired);
        }
        Ok(())
    }

    /// Returns true if the link is neither revoked nor expired at `now`.
    pub fn is_resolvable_at(&self, now: DateTime<Utc>) -> bool {
        self.check_resolvable_at(now).is_ok()
    }
}

/// Input data for inserting a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn link(expires_at: Option<DateTime<Utc>>, revoked: bool) -> Link {
        Link {
            id: 1,
            code: "abc12345".to_string(),
            target_url: "https://example.com".to_string(),
            created_at: Utc::now(),
            hit_count: 0,
            expires_at,
            revoked,
        }
    }

    #[test]
    fn test_link_without_expiry_is_resolvable() {
        let link = link(None, false);
        assert!(link.is_resolvable_at(Utc::now()));
        assert!(!link.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_link_with_future_expiry_is_resolvable() {
        let now = Utc::now();
        let link = link(Some(now + Duration::hours(1)), false);
        assert!(link.is_resolvable_at(now));
    }

    #[test]
    fn test_link_expiring_exactly_now_is_gone() {
        let now = Utc::now();
        let link = link(Some(now), false);
        assert_eq!(link.check_resolvable_at(now), Err(GoneReason::Expired));
    }

    #[test]
    fn test_link_with_past_expiry_is_gone() {
        let now = Utc::now();
        let link = link(Some(now - Duration::seconds(1)), false);
        assert_eq!(link.check_resolvable_at(now), Err(GoneReason::Expired));
    }

    #[test]
    fn test_revoked_link_is_gone() {
        let link = link(None, true);
        assert_eq!(link.check_resolvable_at(Utc::now()), Err(GoneReason::Revoked));
    }

    #[test]
    fn test_revocation_reported_before_expiry() {
        let now = Utc::now();
        let link = link(Some(now - Duration::hours(1)), true);
        assert_eq!(link.check_resolvable_at(now), Err(GoneReason::Revoked));
    }

    #[test]
    fn test_gone_reason_labels() {
        assert_eq!(GoneReason::Revoked.as_str(), "revoked");
        assert_eq!(GoneReason::Expired.as_str(), "expired");
    }
}
