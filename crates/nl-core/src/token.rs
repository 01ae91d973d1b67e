//! Bearer token providers
//!
//! The agent never caches its credential. Every API call asks a
//! [`TokenProvider`] for the current token, so a token rewritten on disk is
//! picked up by the next request without a restart.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::CoreError;

/// Source of the bearer token attached to gateway requests
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return the token to use for the next request
    async fn current_token(&self) -> Result<String, CoreError>;
}

/// Reads the token from a file on every call
#[derive(Debug, Clone)]
pub struct FileTokenProvider {
    path: PathBuf,
}

impl FileTokenProvider {
    /// Create a provider backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the token file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenProvider for FileTokenProvider {
    async fn current_token(&self) -> Result<String, CoreError> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CoreError::io(&self.path, e))?;

        Ok(data.trim().to_string())
    }
}

/// Always returns the same token
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Create a provider that always yields `token`
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn current_token(&self) -> Result<String, CoreError> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_token_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.txt");
        std::fs::write(&path, "  secret-token \n").unwrap();

        let provider = FileTokenProvider::new(&path);
        assert_eq!(provider.current_token().await.unwrap(), "secret-token");
    }

    #[tokio::test]
    async fn test_file_token_reread_each_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.txt");
        std::fs::write(&path, "first").unwrap();

        let provider = FileTokenProvider::new(&path);
        assert_eq!(provider.current_token().await.unwrap(), "first");

        std::fs::write(&path, "second\n").unwrap();
        assert_eq!(provider.current_token().await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_file_token_missing() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileTokenProvider::new(dir.path().join("user.txt"));

        let err = provider.current_token().await.unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }

    #[tokio::test]
    async fn test_file_token_is_not_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.txt");
        std::fs::write(&path, " \n").unwrap();

        let token = FileTokenProvider::new(&path).current_token().await.unwrap();
        assert_eq!(token, "");
    }

    #[tokio::test]
    async fn test_static_token() {
        let provider = StaticTokenProvider::new("abc");
        assert_eq!(provider.current_token().await.unwrap(), "abc");
        assert!(!format!("{:?}", provider).contains("abc"));
    }
}
