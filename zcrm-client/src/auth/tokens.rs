//! OAuth credential model

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// OAuth credential set for a single API user, keyed by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub user_email: String,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_token: Option<String>,
    /// Absolute expiry of the access token.
    pub expiry_time: DateTime<Utc>,
}

impl OAuthTokens {
    /// Clock skew subtracted from the expiry when checking validity, so a
    /// token is refreshed before it actually lapses mid-request.
    const EXPIRY_SKEW_SECONDS: i64 = 10;

    pub fn new(
        user_email: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expiry_time: DateTime<Utc>,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            grant_token: None,
            expiry_time,
        }
    }

    pub fn with_grant_token(mut self, grant_token: impl Into<String>) -> Self {
        self.grant_token = Some(grant_token.into());
        self
    }

    /// Whether the access token is still usable.
    pub fn is_valid(&self) -> bool {
        Utc::now() + TimeDelta::seconds(Self::EXPIRY_SKEW_SECONDS) < self.expiry_time
    }
}
