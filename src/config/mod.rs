use std::{env, process, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "{} is not a supported log format. Use either `pretty` or `json`",
                other
            )),
        }
    }
}

/// Logging settings, read before the subscriber exists so nothing here logs.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    pub dir: Option<String>,
}

impl LogConfig {
    pub fn load() -> Self {
        let format = env::var("LOG_FORMAT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(LogFormat::Pretty);
        let dir = env::var("LOG_DIR").ok().filter(|dir| !dir.trim().is_empty());
        Self { format, dir }
    }
}

pub struct Config {
    pub base_url: String,
    pub database_url: String,
    pub redis_url: Option<String>,
    pub server_addr: String,
    pub database_max_connections: u32,
    pub cache_ttl_secs: u64,
}

impl Config {
    pub fn load() -> Self {
        let database_url = get_env("DATABASE_URL");
        let redis_url = env::var("REDIS_URL").ok().or_else(|| {
            tracing::warn!("REDIS_URL environment variable not set, lookup cache disabled");
            None
        });
        let server_addr = get_env_or("SERVER_ADDRESS", "0.0.0.0:8080");
        let base_url = env::var("BASE_URL").unwrap_or_else(|_| {
            tracing::warn!(
                "BASE_URL environment variable not set, using default: {}",
                &server_addr
            );
            format!("http://{}", server_addr)
        });
        let database_max_connections = get_parsed_or("DATABASE_MAX_CONNECTIONS", 10);
        let cache_ttl_secs = get_parsed_or("CACHE_TTL_SECS", 3600);
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            database_url,
            redis_url,
            server_addr,
            database_max_connections,
            cache_ttl_secs,
        }
    }
}

fn get_env(var: &str) -> String {
    env::var(var).unwrap_or_else(|_| {
        tracing::error!("{} environment variable is required but not set.", var);
        process::exit(1);
    })
}

fn get_env_or(var: &str, default: &str) -> String {
    env::var(var).unwrap_or_else(|_| {
        tracing::warn!(
            "{} environment variable not set, using default: {}",
            var,
            default
        );
        default.to_string()
    })
}

fn get_parsed_or<T>(var: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "{} has an invalid value {:?}, using default: {}",
                var,
                raw,
                default
            );
            default
        }),
        Err(_) => default,
    }
}
