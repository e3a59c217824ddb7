use std::{fmt, sync::Arc};

use r2d2::Pool;
use redis::Client;

use crate::db::store::MappingStore;

pub type RedisPool = Pool<Client>;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MappingStore>,
    pub base_url: String,
}

impl AppState {
    pub fn new(store: Arc<dyn MappingStore>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { store, base_url }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
