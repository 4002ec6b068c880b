use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from `config.toml` (or `CONFIG_PATH`), falling
    /// back entirely to environment variables when no file is present.
    /// `DATABASE_URL` and `DB_MAX_CONNECTIONS` override either way.
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => toml::from_str(&config_str)
                .map_err(|e| AppError::Config(format!("failed to parse {config_path}: {e}")))?,
            Err(e) if e.kind() == ErrorKind::NotFound => Config {
                database: DatabaseConfig {
                    url: env::var("DATABASE_URL")
                        .unwrap_or_else(|_| "sqlite:somos_darua.db".to_string()),
                    max_connections: default_max_connections(),
                },
            },
            Err(e) => {
                return Err(AppError::Config(format!(
                    "failed to read {config_path}: {e}"
                )));
            }
        };

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database.url = url;
        }
        if let Ok(max) = env::var("DB_MAX_CONNECTIONS") {
            config.database.max_connections = max
                .parse()
                .map_err(|_| AppError::Config("DB_MAX_CONNECTIONS must be a number".to_string()))?;
        }

        Ok(config)
    }
}
