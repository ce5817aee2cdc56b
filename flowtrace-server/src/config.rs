//! Server configuration
//!
//! All settings come from environment variables with workable defaults,
//! so the service starts with no configuration at all in development.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Runtime configuration for the HTTP service
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port to bind
    pub port: u16,

    /// Graphviz binary used to rasterize graphs
    pub dot_bin: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `PORT` - HTTP port (default: 3000)
    /// - `FLOWTRACE_DOT_BIN` - Graphviz binary (default: "dot")
    /// - `REQUEST_TIMEOUT_SECS` - per-request timeout (default: 30)
    /// - `MAX_BODY_BYTES` - request body cap (default: 2 MiB)
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("Invalid PORT value")?;

        let dot_bin = env::var("FLOWTRACE_DOT_BIN").unwrap_or_else(|_| "dot".to_string());

        let timeout_seconds = env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("Invalid REQUEST_TIMEOUT_SECS value")?;

        let max_body_bytes = env::var("MAX_BODY_BYTES")
            .unwrap_or_else(|_| (2 * 1024 * 1024).to_string())
            .parse::<usize>()
            .context("Invalid MAX_BODY_BYTES value")?;

        let config = Self {
            port,
            dot_bin,
            request_timeout: Duration::from_secs(timeout_seconds),
            max_body_bytes,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.dot_bin.is_empty() {
            anyhow::bail!("FLOWTRACE_DOT_BIN cannot be empty");
        }
        if self.request_timeout.is_zero() {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be positive");
        }
        if self.max_body_bytes == 0 {
            anyhow::bail!("MAX_BODY_BYTES must be positive");
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            dot_bin: "dot".to_string(),
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}
