use tracing::{debug, error, info, instrument, warn};

use super::ShortenError;
use crate::{
    db::{
        models::ShortenedUrl,
        store::{InsertOutcome, MappingStore},
    },
    ledger::{Ledger, SlotStorage},
    utils::{generate_short_code, parse_url},
};

/// Fresh codes tried before giving up on a run of collisions.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Creates a short code for `raw_url` and records it as owned by this browser.
///
/// The ledger is touched only after the store accepted the record. If that
/// final ledger write fails the record stays in the store without an owner.
#[instrument(skip(store, ledger))]
pub async fn shorten<S: SlotStorage>(
    store: &dyn MappingStore,
    ledger: &mut Ledger<S>,
    raw_url: &str,
) -> Result<ShortenedUrl, ShortenError> {
    let url = raw_url.trim();
    if url.is_empty() {
        return Err(ShortenError::UrlRequired);
    }
    let Some(parsed) = parse_url(url) else {
        warn!(url = %url, "Invalid URL format");
        return Err(ShortenError::InvalidUrl);
    };
    let url = parsed.as_str();
    if ledger.is_at_capacity() {
        warn!(count = ledger.count(), "Owned URL limit reached");
        return Err(ShortenError::LimitReached);
    }

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let short_code = generate_short_code();
        debug!(short_code = %short_code, attempt, "Generated short code");

        match store.insert(&short_code, url).await {
            Ok(InsertOutcome::Created(row)) => {
                ledger.add_code(&row.code);
                info!(short_code = %row.code, "Created short URL");
                return Ok(row);
            }
            Ok(InsertOutcome::Conflict) => {
                warn!(short_code = %short_code, attempt, "Short code collision, regenerating");
            }
            Err(e) => {
                error!(error = %e, "Failed to insert short URL");
                return Err(ShortenError::Store);
            }
        }
    }

    error!(attempts = MAX_CODE_ATTEMPTS, "Could not find a free short code");
    Err(ShortenError::Store)
}
