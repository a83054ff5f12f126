//! Configuration management for the Microgreens Grow Tracker
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with MG_ prefix

use chrono::FixedOffset;
use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::DateError;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Farm-level settings
    pub farm: FarmConfig,

    /// Demo data seeding
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FarmConfig {
    /// Display name of the operation
    pub name: String,

    /// Local UTC offset of the farm (`±HH:MM`); "today" is taken here
    pub utc_offset: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    /// Load the demo plantings at startup
    pub demo_data: bool,
}

impl FarmConfig {
    /// The farm's local timezone as a fixed offset
    pub fn offset(&self) -> Result<FixedOffset, DateError> {
        shared::parse_utc_offset(&self.utc_offset)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("MG_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("farm.name", "Microgreens")?
            .set_default("farm.utc_offset", "+00:00")?
            .set_default("seed.demo_data", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (MG_ prefix)
            .add_source(
                Environment::with_prefix("MG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            name: "Microgreens".to_string(),
            utc_offset: "+00:00".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            farm: FarmConfig::default(),
            seed: SeedConfig::default(),
        }
    }
}
