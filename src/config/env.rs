// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the raw restaurant records JSON file
    pub data_path: String,

    /// Optional path to community mention counts (normalized name -> count)
    pub community_mentions_path: Option<String>,

    /// Optional path to hygiene certification data (list of certified names)
    pub hygiene_path: Option<String>,

    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 8003)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Admin authentication token (for rebuild endpoint)
    pub admin_token: String,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env.local or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenv().ok();

        Config {
            data_path: env::var("DATA_PATH")
                .unwrap_or_else(|_| "data/restaurants.json".to_string()),

            community_mentions_path: env::var("COMMUNITY_MENTIONS_PATH").ok(),

            hygiene_path: env::var("HYGIENE_PATH").ok(),

            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8003".to_string())
                .parse()
                .unwrap_or(8003),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "admin-token-dev".to_string()),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.data_path.is_empty() {
            return Err("DATA_PATH is required".to_string());
        }

        if !std::path::Path::new(&self.data_path).exists() {
            log::warn!(
                "Data file {} not found - queries will report the corpus as unavailable",
                self.data_path
            );
        }

        Ok(())
    }
}
