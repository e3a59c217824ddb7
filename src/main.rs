mod api;
mod config;
mod db;
mod flows;
mod ledger;
mod state;
mod telemetry;
mod types;
mod utils;

use std::{process, sync::Arc, time::Duration};

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info, warn};

use crate::{
    config::{Config, LogConfig},
    db::postgres::PgStore,
    state::{AppState, RedisPool},
};

#[tokio::main]
async fn main() {
    dotenv().ok();

    let _log_guard = telemetry::init(&LogConfig::load());
    let config = Config::load();

    // database config
    let pg_db = match PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            error!(error = %e, "Failed to connect to database");
            process::exit(1);
        }
    };

    if let Err(e) = sqlx::migrate!().run(&pg_db).await {
        error!(error = %e, "Failed to run database migrations");
        process::exit(1);
    }

    let redis_db = config.redis_url.as_deref().and_then(connect_redis);
    let store = PgStore::new(pg_db, redis_db, config.cache_ttl_secs);
    let app = api::routes::router(AppState::new(Arc::new(store), config.base_url.as_str()));

    let listener = match tokio::net::TcpListener::bind(&config.server_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, addr = %config.server_addr, "Failed to bind server address");
            process::exit(1);
        }
    };
    info!(addr = %config.server_addr, base_url = %config.base_url, "Server listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
        process::exit(1);
    }
}

// a broken cache is not fatal, lookups just go straight to postgres
fn connect_redis(redis_url: &str) -> Option<RedisPool> {
    let client = match redis::Client::open(redis_url) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Invalid REDIS_URL, lookup cache disabled");
            return None;
        }
    };
    match r2d2::Pool::builder()
        .max_size(10)
        .connection_timeout(Duration::from_secs(2))
        .build(client)
    {
        Ok(pool) => Some(pool),
        Err(e) => {
            warn!(error = %e, "Redis unavailable, lookup cache disabled");
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
