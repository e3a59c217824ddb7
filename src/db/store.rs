use async_trait::async_trait;
use thiserror::Error;

use super::models::ShortenedUrl;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Created(ShortenedUrl),
    /// The code is already taken by another record.
    Conflict,
}

/// The remote table mapping short codes to original URLs.
#[async_trait]
pub trait MappingStore: Send + Sync {
    async fn insert(&self, code: &str, original_url: &str) -> Result<InsertOutcome, StoreError>;

    /// Returns whether a row was removed.
    async fn delete_by_code(&self, code: &str) -> Result<bool, StoreError>;

    /// Rows come back newest first.
    async fn select_by_codes(&self, codes: &[String]) -> Result<Vec<ShortenedUrl>, StoreError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortenedUrl>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
