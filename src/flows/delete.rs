use tracing::{error, info, instrument, warn};

use super::DeleteError;
use crate::{
    db::store::MappingStore,
    ledger::{Ledger, SlotStorage},
    utils::valid_short_code,
};

/// Deletes the record for `code` and forgets it locally. The ledger is left
/// alone unless the store confirmed the delete.
#[instrument(skip(store, ledger))]
pub async fn delete<S: SlotStorage>(
    store: &dyn MappingStore,
    ledger: &mut Ledger<S>,
    code: &str,
) -> Result<(), DeleteError> {
    if !valid_short_code(code) {
        warn!(short_code = %code, "Invalid short code");
        return Err(DeleteError::InvalidCode);
    }

    match store.delete_by_code(code).await {
        Ok(removed) => {
            if !removed {
                warn!(short_code = %code, "Short code was already gone");
            }
            ledger.remove_code(code);
            info!(short_code = %code, "Short URL deleted successfully");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, short_code = %code, "Error deleting short URL");
            Err(DeleteError::Store)
        }
    }
}
