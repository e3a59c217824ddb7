use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};

use super::{SlotStorage, StorageError};

// browsers drop larger cookies silently
const MAX_COOKIE_BYTES: usize = 4096;

/// Slot storage backed by the browser's cookies. Reads come from the request's
/// cookie jar; writes land in the jar and go out as `Set-Cookie` when the jar
/// is returned with the response.
#[derive(Debug, Default, Clone)]
pub struct CookieStorage {
    jar: CookieJar,
}

impl CookieStorage {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    /// The jar with every slot written during this request, ready to be used
    /// as a response part.
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl SlotStorage for CookieStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.jar.get(key).map(|cookie| cookie.value().to_string()))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let cookie: Cookie<'static> = Cookie::build((key.to_string(), value.to_string()))
            .path("/")
            .permanent()
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();

        let size = cookie.encoded().to_string().len();
        if size > MAX_COOKIE_BYTES {
            return Err(StorageError::Unavailable(format!(
                "cookie {} is {} bytes, over the {} byte limit",
                key, size, MAX_COOKIE_BYTES
            )));
        }

        self.jar = std::mem::take(&mut self.jar).add(cookie);
        Ok(())
    }
}

impl<S> FromRequestParts<S> for CookieStorage
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::new(CookieJar::from_headers(&parts.headers)))
    }
}
