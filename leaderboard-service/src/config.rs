/// Configuration management for the leaderboard service
///
/// Loads configuration from environment variables.
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Score store configuration
    pub store: StoreConfig,
    /// Leaderboard query limits
    pub query: QueryConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Service name reported by the health check and logs
    pub service_name: String,
}

/// Score store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Table holding one item per score submission
    pub table_name: String,
}

/// Leaderboard query limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Page size used when the caller does not request one
    pub default_limit: u32,
    /// Largest page size a caller may request
    pub max_limit: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_page_limit(),
            max_limit: max_page_limit(),
        }
    }
}

// Default values
fn default_page_limit() -> u32 {
    10
}

fn max_page_limit() -> u32 {
    100
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            service_name: std::env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "leaderboard-service".to_string()),
        };

        let store = StoreConfig {
            table_name: std::env::var("LEADERBOARD_TABLE")
                .unwrap_or_else(|_| "leaderboard-scores".to_string()),
        };

        let query = QueryConfig {
            default_limit: std::env::var("DEFAULT_PAGE_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_page_limit),
            max_limit: std::env::var("MAX_PAGE_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(max_page_limit),
        };
        if query.default_limit == 0 || query.default_limit > query.max_limit {
            bail!(
                "DEFAULT_PAGE_LIMIT must be between 1 and MAX_PAGE_LIMIT ({})",
                query.max_limit
            );
        }

        Ok(Config { app, store, query })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::from_env().unwrap();

        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.service_name, "leaderboard-service");
        assert_eq!(config.store.table_name, "leaderboard-scores");
        assert_eq!(config.query.default_limit, 10);
        assert_eq!(config.query.max_limit, 100);
    }
}
