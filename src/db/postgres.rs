use async_trait::async_trait;
use redis::Commands;
use sqlx::PgPool;
use tracing::{debug, error, info, instrument};

use super::{
    models::ShortenedUrl,
    store::{InsertOutcome, MappingStore, StoreError},
};
use crate::state::RedisPool;

/// Postgres-backed mapping store with an optional Redis read-through cache
/// for single-code lookups.
#[derive(Debug, Clone)]
pub struct PgStore {
    pg_db: PgPool,
    redis_db: Option<RedisPool>,
    cache_ttl_secs: u64,
}

impl PgStore {
    pub fn new(pg_db: PgPool, redis_db: Option<RedisPool>, cache_ttl_secs: u64) -> Self {
        Self {
            pg_db,
            redis_db,
            cache_ttl_secs,
        }
    }

    fn cache_key(code: &str) -> String {
        format!("tinylink:code:{}", code)
    }

    fn cache_get(&self, code: &str) -> Option<ShortenedUrl> {
        let pool = self.redis_db.as_ref()?;
        let mut redis_conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!(error = %e, "Failed to get Redis connection");
                return None;
            }
        };

        match redis_conn.get::<_, Option<String>>(Self::cache_key(code)) {
            Ok(Some(cached)) => match serde_json::from_str(&cached) {
                Ok(row) => {
                    info!(short_code = %code, "Cache hit");
                    Some(row)
                }
                Err(e) => {
                    error!(error = %e, short_code = %code, "Corrupt cache entry");
                    None
                }
            },
            Ok(None) => {
                info!(short_code = %code, "Cache miss");
                None
            }
            Err(e) => {
                error!(error = %e, "Redis error");
                None
            }
        }
    }

    fn cache_put(&self, row: &ShortenedUrl) {
        let Some(pool) = self.redis_db.as_ref() else {
            return;
        };
        let payload = match serde_json::to_string(row) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Failed to encode cache entry");
                return;
            }
        };
        let result = pool.get().map_err(|e| e.to_string()).and_then(|mut conn| {
            conn.set_ex::<_, _, ()>(Self::cache_key(&row.code), payload, self.cache_ttl_secs)
                .map_err(|e| e.to_string())
        });
        if let Err(e) = result {
            error!(error = %e, "Failed to cache URL in Redis");
        }
    }

    fn cache_evict(&self, code: &str) {
        let Some(pool) = self.redis_db.as_ref() else {
            return;
        };
        let result = pool.get().map_err(|e| e.to_string()).and_then(|mut conn| {
            conn.del::<_, ()>(Self::cache_key(code))
                .map_err(|e| e.to_string())
        });
        if let Err(e) = result {
            error!(error = %e, short_code = %code, "Failed to evict cached URL");
        }
    }
}

#[async_trait]
impl MappingStore for PgStore {
    #[instrument(skip(self, original_url))]
    async fn insert(&self, code: &str, original_url: &str) -> Result<InsertOutcome, StoreError> {
        let row = sqlx::query_as::<_, ShortenedUrl>(
            "
            INSERT INTO shortened_urls (code, original_url)
            VALUES ($1, $2)
            ON CONFLICT (code) DO NOTHING
            RETURNING id, code, original_url, created_at
            ",
        )
        .bind(code)
        .bind(original_url)
        .fetch_optional(&self.pg_db)
        .await?;

        Ok(match row {
            Some(row) => InsertOutcome::Created(row),
            None => {
                debug!(short_code = %code, "Short code already taken");
                InsertOutcome::Conflict
            }
        })
    }

    #[instrument(skip(self))]
    async fn delete_by_code(&self, code: &str) -> Result<bool, StoreError> {
        let deleted: Option<String> = sqlx::query_scalar(
            "
            DELETE FROM shortened_urls
            WHERE code = $1
            RETURNING code
            ",
        )
        .bind(code)
        .fetch_optional(&self.pg_db)
        .await?;

        self.cache_evict(code);
        Ok(deleted.is_some())
    }

    #[instrument(skip(self), fields(count = codes.len()))]
    async fn select_by_codes(&self, codes: &[String]) -> Result<Vec<ShortenedUrl>, StoreError> {
        let rows = sqlx::query_as::<_, ShortenedUrl>(
            "
            SELECT id, code, original_url, created_at
            FROM shortened_urls
            WHERE code = ANY($1)
            ORDER BY created_at DESC
            ",
        )
        .bind(codes)
        .fetch_all(&self.pg_db)
        .await?;
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortenedUrl>, StoreError> {
        if let Some(row) = self.cache_get(code) {
            return Ok(Some(row));
        }

        let row = sqlx::query_as::<_, ShortenedUrl>(
            r#"
            SELECT id, code, original_url, created_at
            FROM shortened_urls
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pg_db)
        .await?;

        if let Some(row) = &row {
            self.cache_put(row);
        }
        Ok(row)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pg_db).await?;
        Ok(())
    }
}
