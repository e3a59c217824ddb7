use tracing::{error, info, instrument, warn};

use crate::{db::store::MappingStore, utils::valid_short_code};

/// Where a visit to `/{segment}` ends up. The checking phase is the pending
/// `resolve` future; both variants here are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectState {
    Redirecting(String),
    NotFound,
}

#[instrument(skip(store))]
pub async fn resolve(store: &dyn MappingStore, segment: &str) -> RedirectState {
    if !valid_short_code(segment) {
        warn!(segment = %segment, "Not a short code");
        return RedirectState::NotFound;
    }

    match store.find_by_code(segment).await {
        Ok(Some(row)) => {
            info!(short_code = %segment, "Redirecting to long URL");
            RedirectState::Redirecting(row.original_url)
        }
        Ok(None) => {
            warn!(short_code = %segment, "Short code not found");
            RedirectState::NotFound
        }
        Err(e) => {
            error!(error = %e, short_code = %segment, "Error looking up short code");
            RedirectState::NotFound
        }
    }
}
