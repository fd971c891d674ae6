//! Token storage contract and bundled stores
//!
//! The OAuth flow is storage-agnostic: host applications persist tokens
//! wherever suits them (file, database, memory) by implementing
//! [`TokenStore`]. Concrete stores own their concurrency safety.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;

use super::OAuthTokens;

/// Storage capability for OAuth credentials, keyed by user email.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist (or replace) the credentials for the tokens' user.
    async fn save_tokens(&self, tokens: &OAuthTokens) -> Result<()>;

    /// Fetch the credentials for a user, if stored.
    async fn get_tokens(&self, user_email: &str) -> Result<Option<OAuthTokens>>;

    /// Remove the credentials for a user. Removing an unknown user is not an
    /// error.
    async fn delete_tokens(&self, user_email: &str) -> Result<()>;

    /// The grant token configured out-of-band, if any.
    async fn get_grant_token(&self) -> Result<Option<String>>;
}

/// Process-local store for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: Mutex<HashMap<String, OAuthTokens>>,
    grant_token: Option<String>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grant_token(grant_token: impl Into<String>) -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
            grant_token: Some(grant_token.into()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, OAuthTokens>>> {
        self.tokens
            .lock()
            .map_err(|_| anyhow!("token store lock poisoned"))
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn save_tokens(&self, tokens: &OAuthTokens) -> Result<()> {
        self.lock()?
            .insert(tokens.user_email.clone(), tokens.clone());
        Ok(())
    }

    async fn get_tokens(&self, user_email: &str) -> Result<Option<OAuthTokens>> {
        Ok(self.lock()?.get(user_email).cloned())
    }

    async fn delete_tokens(&self, user_email: &str) -> Result<()> {
        self.lock()?.remove(user_email);
        Ok(())
    }

    async fn get_grant_token(&self) -> Result<Option<String>> {
        Ok(self.grant_token.clone())
    }
}

/// JSON-document-backed store.
///
/// The whole document is rewritten on every save; concurrent writers should
/// wrap the store in their own locking.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    grant_token: Option<String>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            grant_token: None,
        }
    }

    /// Store under the platform config directory (`zcrm/tokens.json`).
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir().context("no config directory available")?;
        Ok(Self::new(dir.join("zcrm").join("tokens.json")))
    }

    pub fn with_grant_token(mut self, grant_token: impl Into<String>) -> Self {
        self.grant_token = Some(grant_token.into());
        self
    }

    async fn read_all(&self) -> Result<HashMap<String, OAuthTokens>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("corrupt token store at {}", self.path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e).with_context(|| {
                format!("failed to read token store at {}", self.path.display())
            }),
        }
    }

    async fn write_all(&self, tokens: &HashMap<String, OAuthTokens>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let bytes = serde_json::to_vec_pretty(tokens).context("failed to encode token store")?;
        tokio::fs::write(&self.path, bytes)
            .await
            .with_context(|| format!("failed to write token store at {}", self.path.display()))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn save_tokens(&self, tokens: &OAuthTokens) -> Result<()> {
        let mut all = self.read_all().await?;
        all.insert(tokens.user_email.clone(), tokens.clone());
        self.write_all(&all).await
    }

    async fn get_tokens(&self, user_email: &str) -> Result<Option<OAuthTokens>> {
        Ok(self.read_all().await?.remove(user_email))
    }

    async fn delete_tokens(&self, user_email: &str) -> Result<()> {
        let mut all = self.read_all().await?;
        if all.remove(user_email).is_some() {
            self.write_all(&all).await?;
        }
        Ok(())
    }

    async fn get_grant_token(&self) -> Result<Option<String>> {
        Ok(self.grant_token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};

    fn tokens_for(email: &str) -> OAuthTokens {
        OAuthTokens::new(
            email,
            format!("access-{email}"),
            format!("refresh-{email}"),
            Utc::now() + TimeDelta::hours(1),
        )
    }

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store = InMemoryTokenStore::new();
        let tokens = tokens_for("amelia@zylker.com");

        store.save_tokens(&tokens).await.unwrap();
        assert_eq!(
            store.get_tokens("amelia@zylker.com").await.unwrap(),
            Some(tokens.clone())
        );
        assert_eq!(store.get_tokens("nobody@zylker.com").await.unwrap(), None);

        store.delete_tokens("amelia@zylker.com").await.unwrap();
        assert_eq!(store.get_tokens("amelia@zylker.com").await.unwrap(), None);
        // Deleting again is fine.
        store.delete_tokens("amelia@zylker.com").await.unwrap();
    }

    #[tokio::test]
    async fn memory_store_grant_token() {
        let store = InMemoryTokenStore::new();
        assert_eq!(store.get_grant_token().await.unwrap(), None);

        let store = InMemoryTokenStore::with_grant_token("1000.abc.def");
        assert_eq!(
            store.get_grant_token().await.unwrap(),
            Some("1000.abc.def".to_string())
        );
    }

    #[tokio::test]
    async fn file_store_round_trips() {
        let path = std::env::temp_dir()
            .join(format!("zcrm-tokens-{}", uuid::Uuid::new_v4()))
            .join("tokens.json");
        let store = FileTokenStore::new(&path);

        // Missing file reads as empty, not as an error.
        assert_eq!(store.get_tokens("amelia@zylker.com").await.unwrap(), None);

        let amelia = tokens_for("amelia@zylker.com");
        let ben = tokens_for("ben@zylker.com").with_grant_token("1000.gt");
        store.save_tokens(&amelia).await.unwrap();
        store.save_tokens(&ben).await.unwrap();

        assert_eq!(
            store.get_tokens("amelia@zylker.com").await.unwrap(),
            Some(amelia)
        );
        assert_eq!(store.get_tokens("ben@zylker.com").await.unwrap(), Some(ben));

        store.delete_tokens("amelia@zylker.com").await.unwrap();
        assert_eq!(store.get_tokens("amelia@zylker.com").await.unwrap(), None);

        tokio::fs::remove_dir_all(path.parent().unwrap())
            .await
            .unwrap();
    }
}
