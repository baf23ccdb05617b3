use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{
    config,
    spotify::{
        auth::refresh_token,
        exchange::{AuthExchangeError, TokenStore},
    },
    types::Token,
    utils,
};

/// Seconds before the nominal expiry at which a token counts as expired.
pub const REFRESH_MARGIN_SECS: u64 = 240;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token cache io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("token cache is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("token refresh failed: {0}")]
    Refresh(#[from] AuthExchangeError),
}

pub struct TokenManager {
    token: Token,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        Self::with_path(token, Self::token_path())
    }

    pub fn with_path(token: Token, path: PathBuf) -> Self {
        TokenManager { token, path }
    }

    pub async fn load() -> Result<Self, TokenError> {
        Self::load_from(Self::token_path()).await
    }

    pub async fn load_from(path: PathBuf) -> Result<Self, TokenError> {
        let content = async_fs::read_to_string(&path).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { token, path })
    }

    pub async fn persist(&self) -> Result<(), TokenError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Returns an access token that is valid for at least the refresh margin,
    /// refreshing and persisting the token first when needed.
    pub async fn get_valid_token(&mut self) -> Result<String, TokenError> {
        if self.is_expired() {
            let new_token = refresh_token(&self.token).await?;
            self.token = new_token;
            self.persist().await?;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(utils::now_timestamp())
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        let deadline = self
            .token
            .obtained_at
            .saturating_add(self.token.expires_in)
            .saturating_sub(REFRESH_MARGIN_SECS);
        now >= deadline
    }

    pub fn expires_at(&self) -> u64 {
        self.token.obtained_at.saturating_add(self.token.expires_in)
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }
}

/// Token store backed by the on-disk token cache.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new(TokenManager::token_path())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn save(&self, token: Token) -> Result<(), AuthExchangeError> {
        TokenManager::with_path(token, self.path.clone())
            .persist()
            .await
            .map_err(|e| AuthExchangeError::Store(e.to_string()))
    }
}
