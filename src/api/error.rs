use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::flows::{DeleteError, ShortenError};

impl ShortenError {
    pub fn status(&self) -> StatusCode {
        match self {
            ShortenError::UrlRequired | ShortenError::InvalidUrl => StatusCode::BAD_REQUEST,
            ShortenError::LimitReached => StatusCode::CONFLICT,
            ShortenError::Store => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ShortenError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
            "message": self.detail(),
        }));
        (self.status(), body).into_response()
    }
}

impl DeleteError {
    pub fn status(&self) -> StatusCode {
        match self {
            DeleteError::InvalidCode => StatusCode::BAD_REQUEST,
            DeleteError::Store => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DeleteError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({"error": self.to_string()}))).into_response()
    }
}
