use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use tracing::{error, instrument};

use crate::{
    flows::{delete, listing, shorten},
    ledger::{cookie::CookieStorage, Ledger},
    state::AppState,
    types::{ShortenRequest, ShortenResponse, UrlDetailResponse},
    utils::{short_url, valid_short_code},
};

#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let store = match state.store.health_check().await {
        Ok(()) => "ok",
        Err(e) => {
            error!(error = %e, "Store health check failed");
            "unavailable"
        }
    };
    let status = if store == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let response = json!({
        "status": store,
        "version": env!("CARGO_PKG_VERSION"),
    });
    (status, Json(response))
}

#[instrument(skip(state, storage, payload))]
pub async fn create_short_url(
    State(state): State<AppState>,
    storage: CookieStorage,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> impl IntoResponse {
    let payload = match payload {
        Ok(payload) => payload.0,
        Err(rejection) => {
            let error_message = match rejection {
                JsonRejection::MissingJsonContentType(_) => {
                    json!({"error": "Expected 'Content-Type: application/json' header"})
                }
                JsonRejection::JsonSyntaxError(_) => json!({"error": "JSON syntax error"}),
                JsonRejection::JsonDataError(_) => json!({"error": "JSON data structure mismatch"}),
                _ => json!({"error": "Unknown JSON parsing error"}),
            };
            error!(error = ?rejection, "JSON parsing error");
            return (StatusCode::BAD_REQUEST, Json(error_message)).into_response();
        }
    };

    let mut ledger = Ledger::new(storage);
    match shorten::shorten(state.store.as_ref(), &mut ledger, &payload.long_url).await {
        Ok(row) => {
            let response = ShortenResponse {
                short_url: short_url(&state.base_url, &row.code),
                code: row.code,
                long_url: row.original_url,
            };
            (
                StatusCode::CREATED,
                ledger.into_storage().into_jar(),
                Json(response),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[instrument(skip(state, storage))]
pub async fn get_my_short_urls(
    State(state): State<AppState>,
    storage: CookieStorage,
) -> Json<Vec<UrlDetailResponse>> {
    let ledger = Ledger::new(storage);
    Json(listing::list(state.store.as_ref(), &ledger, &state.base_url).await)
}

#[instrument(skip(state, storage))]
pub async fn delete_short_url(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
    storage: CookieStorage,
) -> impl IntoResponse {
    let mut ledger = Ledger::new(storage);
    match delete::delete(state.store.as_ref(), &mut ledger, &short_code).await {
        Ok(()) => (
            ledger.into_storage().into_jar(),
            Json(json!({"message": "short url deleted successfully"})),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[instrument(skip(state))]
pub async fn get_short_url_details(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Json<UrlDetailResponse>, StatusCode> {
    if !valid_short_code(&short_code) {
        error!(short_code = %short_code, "Invalid short code");
        return Err(StatusCode::BAD_REQUEST);
    }

    match state.store.find_by_code(&short_code).await {
        Ok(Some(row)) => Ok(Json(UrlDetailResponse::from_row(row, &state.base_url))),
        Ok(None) => {
            error!(short_code = %short_code, "Short code not found");
            Err(StatusCode::NOT_FOUND)
        }
        Err(e) => {
            error!(error = %e, "Database error");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
