//! Server configuration module

use serde::{Deserialize, Serialize};

use super::{env_opt, env_parse, ConfigError};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Maximum JSON payload size in bytes
    #[serde(default = "default_max_payload_size")]
    pub max_payload_size: usize,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 3000,
            workers: 0,
            max_payload_size: default_max_payload_size(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Load from `SERVER_HOST`, `SERVER_PORT` (falls back to `PORT`), `SERVER_WORKERS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let port = match env_opt("SERVER_PORT") {
            Some(_) => env_parse("SERVER_PORT", defaults.port)?,
            None => env_parse("PORT", defaults.port)?,
        };

        Ok(Self {
            host: env_opt("SERVER_HOST").unwrap_or(defaults.host),
            port,
            workers: env_parse("SERVER_WORKERS", defaults.workers)?,
            max_payload_size: env_parse("MAX_PAYLOAD_SIZE", defaults.max_payload_size)?,
            cors: CorsConfig::from_env()?,
        })
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins (used outside development; empty means same-origin only)
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Max age for preflight cache in seconds
    #[serde(default = "default_max_age")]
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age: default_max_age(),
        }
    }
}

impl CorsConfig {
    /// Load from `ALLOWED_ORIGINS` (comma separated) and `CORS_MAX_AGE`
    pub fn from_env() -> Result<Self, ConfigError> {
        let allowed_origins = env_opt("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            allowed_origins,
            max_age: env_parse("CORS_MAX_AGE", default_max_age())?,
        })
    }
}

fn default_max_payload_size() -> usize {
    16 * 1024
}

fn default_max_age() -> usize {
    3600
}
