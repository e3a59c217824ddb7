use serde::{Deserialize, Serialize};

use crate::{db::models::ShortenedUrl, utils::short_url};

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub long_url: String,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
    pub long_url: String,
}

#[derive(Debug, Serialize)]
pub struct UrlDetailResponse {
    pub id: i64,
    pub code: String,
    pub original_url: String,
    pub short_url: String,
    pub created_at: String,
}

impl UrlDetailResponse {
    pub fn from_row(row: ShortenedUrl, base_url: &str) -> Self {
        Self {
            short_url: short_url(base_url, &row.code),
            id: row.id,
            code: row.code,
            original_url: row.original_url,
            created_at: row.created_at.to_rfc3339(),
        }
    }
}

/// Body of the homepage's create form.
#[derive(Debug, Deserialize)]
pub struct ShortenForm {
    #[serde(default)]
    pub url: String,
}
