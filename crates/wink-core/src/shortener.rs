use crate::error::CoreError;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// Expiration policy for a shortened URL.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum ExpirationPolicy {
    /// The shortened URL never expires.
    #[default]
    Never,
    /// The shortened URL expires after a certain duration from creation.
    AfterDuration(SignedDuration),
    /// The shortened URL expires at a specific timestamp.
    AtTimestamp(Timestamp),
}

impl ExpirationPolicy {
    /// Expiry `secs` seconds after creation.
    pub fn after_secs(secs: u64) -> Result<Self, CoreError> {
        let secs = i64::try_from(secs)
            .map_err(|_| CoreError::InvalidExpiration(format!("ttl of {secs}s is too large")))?;
        Ok(ExpirationPolicy::AfterDuration(SignedDuration::from_secs(secs)))
    }

    /// Resolves the policy to an absolute expiry relative to `now`.
    pub fn expire_at(&self, now: Timestamp) -> Result<Option<Timestamp>, CoreError> {
        match self {
            ExpirationPolicy::Never => Ok(None),
            ExpirationPolicy::AfterDuration(duration) => now
                .checked_add(*duration)
                .map(Some)
                .map_err(|e| CoreError::InvalidExpiration(e.to_string())),
            ExpirationPolicy::AtTimestamp(timestamp) => Ok(Some(*timestamp)),
        }
    }
}

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortenParams {
    /// The URL to be shortened, before normalization.
    pub original_url: String,
    /// The expiration policy for the shortened URL.
    pub expiration: ExpirationPolicy,
}

impl ShortenParams {
    /// Parameters for a link that never expires.
    pub fn permanent(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            expiration: ExpirationPolicy::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_has_no_expiry() {
        let now = Timestamp::now();
        assert_eq!(ExpirationPolicy::Never.expire_at(now).unwrap(), None);
    }

    #[test]
    fn after_duration_is_relative_to_now() {
        let now = Timestamp::from_second(1_000).unwrap();
        let policy = ExpirationPolicy::AfterDuration(SignedDuration::from_secs(60));
        assert_eq!(
            policy.expire_at(now).unwrap(),
            Some(Timestamp::from_second(1_060).unwrap())
        );
    }

    #[test]
    fn after_secs_checks_range() {
        assert_eq!(
            ExpirationPolicy::after_secs(90).unwrap(),
            ExpirationPolicy::AfterDuration(SignedDuration::from_secs(90))
        );
        assert!(matches!(
            ExpirationPolicy::after_secs(u64::MAX),
            Err(CoreError::InvalidExpiration(_))
        ));
    }

    #[test]
    fn after_duration_overflow_is_rejected() {
        let policy = ExpirationPolicy::AfterDuration(SignedDuration::MAX);
        assert!(matches!(
            policy.expire_at(Timestamp::now()),
            Err(CoreError::InvalidExpiration(_))
        ));
    }
}
