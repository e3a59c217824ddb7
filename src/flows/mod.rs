//! User-facing operations over the mapping store and the ownership ledger.

pub mod delete;
pub mod listing;
pub mod redirect;
pub mod shorten;

use thiserror::Error;

use crate::ledger::MAX_OWNED_URLS;

#[derive(Debug, Error)]
pub enum ShortenError {
    #[error("URL required")]
    UrlRequired,

    #[error("Invalid URL")]
    InvalidUrl,

    #[error("Limit reached")]
    LimitReached,

    #[error("Failed to shorten URL")]
    Store,
}

#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("Invalid short code")]
    InvalidCode,

    #[error("Failed to delete URL")]
    Store,
}

impl ShortenError {
    /// Longer explanation shown under the error title.
    pub fn detail(&self) -> String {
        match self {
            ShortenError::UrlRequired => "Please enter a URL to shorten".to_string(),
            ShortenError::InvalidUrl => {
                "Please enter a valid URL (include http:// or https://)".to_string()
            }
            ShortenError::LimitReached => format!(
                "Maximum {} URLs allowed. Delete some to add more.",
                MAX_OWNED_URLS
            ),
            ShortenError::Store => "Failed to shorten URL. Please try again.".to_string(),
        }
    }
}
