use crate::models::query::FilterPolicy;
use crate::models::responses::ResponseMode;
use regex::Regex;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 4500;
const DEFAULT_COLLECTION: &str = "books";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    Postgres { database_url: String },
    Redis { redis_url: String },
    Memory { seed_path: Option<PathBuf> },
}

/// Per-request query behavior shared by every handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuerySettings {
    pub response_mode: ResponseMode,
    pub filter_policy: FilterPolicy,
    pub sort_by_id: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: BackendConfig,
    pub collection: String,
    pub port: u16,
    pub connect_timeout: Duration,
    pub query: QuerySettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_type = get("BACKEND_TYPE").unwrap_or_else(|| "postgres".to_string());
        let backend = match backend_type.to_lowercase().as_str() {
            "postgres" | "postgresql" => BackendConfig::Postgres {
                database_url: get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            "redis" => BackendConfig::Redis {
                redis_url: get("REDIS_URL").ok_or(ConfigError::Missing("REDIS_URL"))?,
            },
            "memory" => BackendConfig::Memory {
                seed_path: get("SEED_PATH").map(PathBuf::from),
            },
            other => {
                return Err(ConfigError::Invalid {
                    key: "BACKEND_TYPE",
                    reason: format!("unknown backend '{}'", other),
                })
            }
        };

        let collection = get("BOOKS_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string());
        if !is_identifier(&collection) {
            return Err(ConfigError::Invalid {
                key: "BOOKS_COLLECTION",
                reason: format!("'{}' is not a plain identifier", collection),
            });
        }

        let port = parse_or("PORT", &get, DEFAULT_PORT)?;
        let connect_timeout = Duration::from_secs(parse_or(
            "CONNECT_TIMEOUT_SECS",
            &get,
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?);

        let query = QuerySettings {
            response_mode: parse_or("RESPONSE_MODE", &get, ResponseMode::default())?,
            filter_policy: parse_or("FILTER_POLICY", &get, FilterPolicy::default())?,
            sort_by_id: parse_or("SORT_BY_ID", &get, false)?,
        };

        Ok(Self {
            backend,
            collection,
            port,
            connect_timeout,
            query,
        })
    }

    pub fn socket_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_or<T, F>(key: &'static str, get: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn is_identifier(name: &str) -> bool {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").is_ok_and(|re| re.is_match(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_postgres_url() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/catalog")]).unwrap();

        assert_eq!(
            config.backend,
            BackendConfig::Postgres {
                database_url: "postgres://localhost/catalog".to_string()
            }
        );
        assert_eq!(config.collection, "books");
        assert_eq!(config.port, 4500);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.query, QuerySettings::default());
        assert_eq!(config.socket_addr(), "0.0.0.0:4500");
    }

    #[test]
    fn test_missing_database_url_is_fatal() {
        assert_eq!(load(&[]), Err(ConfigError::Missing("DATABASE_URL")));
        assert_eq!(
            load(&[("BACKEND_TYPE", "redis")]),
            Err(ConfigError::Missing("REDIS_URL"))
        );
    }

    #[test]
    fn test_memory_backend_needs_nothing() {
        let config = load(&[("BACKEND_TYPE", "memory")]).unwrap();
        assert_eq!(config.backend, BackendConfig::Memory { seed_path: None });
    }

    #[test]
    fn test_query_settings_are_read() {
        let config = load(&[
            ("BACKEND_TYPE", "memory"),
            ("RESPONSE_MODE", "passthrough"),
            ("FILTER_POLICY", "strict"),
            ("SORT_BY_ID", "true"),
            ("PORT", "8080"),
        ])
        .unwrap();

        assert_eq!(config.query.response_mode, ResponseMode::Passthrough);
        assert_eq!(config.query.filter_policy, FilterPolicy::Strict);
        assert!(config.query.sort_by_id);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(matches!(
            load(&[("BACKEND_TYPE", "cassandra")]),
            Err(ConfigError::Invalid { key: "BACKEND_TYPE", .. })
        ));
        assert!(matches!(
            load(&[("BACKEND_TYPE", "memory"), ("PORT", "http")]),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
        assert!(matches!(
            load(&[("BACKEND_TYPE", "memory"), ("BOOKS_COLLECTION", "books; DROP TABLE x")]),
            Err(ConfigError::Invalid { key: "BOOKS_COLLECTION", .. })
        ));
    }
}
