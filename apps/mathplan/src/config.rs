//! # Server Configuration
//!
//! Optional TOML configuration for the `serve` command, with environment
//! overrides:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [cache]
//! ttl_minutes = 5
//!
//! [limits]
//! rate_limit = 100
//! ```
//!
//! - `MATHPLAN_RATE_LIMIT`: requests per second (0 disables limiting)
//! - `MATHPLAN_TTL_MINUTES`: student-data cache TTL

use mathplan_core::{DEFAULT_TTL_MINUTES, MathPlanError};
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Bind address settings.
    pub server: ServerSection,
    /// Student-data cache settings.
    pub cache: CacheSection,
    /// Request limiting settings.
    pub limits: LimitsSection,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// `[cache]` section.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// Student-data TTL in minutes. Uniform for the whole cache.
    pub ttl_minutes: i64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_TTL_MINUTES,
        }
    }
}

/// `[limits]` section.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LimitsSection {
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self { rate_limit: 100 }
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, MathPlanError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| MathPlanError::Io(format!("read {}: {}", path.display(), e)))?;
                toml::from_str(&text)
                    .map_err(|e| MathPlanError::Serialization(format!("parse config: {e}")))?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply `MATHPLAN_*` environment overrides on top of file values.
    fn apply_env(&mut self) {
        if let Some(rate) = env_parse::<u32>("MATHPLAN_RATE_LIMIT") {
            self.limits.rate_limit = rate;
        }
        if let Some(ttl) = env_parse::<i64>("MATHPLAN_TTL_MINUTES") {
            self.cache.ttl_minutes = ttl;
        }
    }

    /// The bind address string.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_core() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.ttl_minutes, DEFAULT_TTL_MINUTES);
        assert_eq!(config.limits.rate_limit, 100);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9090
            "#,
        )
        .expect("parse");

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.cache.ttl_minutes, DEFAULT_TTL_MINUTES);
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn full_file_parses() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8088

            [cache]
            ttl_minutes = 10

            [limits]
            rate_limit = 0
            "#,
        )
        .expect("parse");

        assert_eq!(config.bind_addr(), "0.0.0.0:8088");
        assert_eq!(config.cache.ttl_minutes, 10);
        assert_eq!(config.limits.rate_limit, 0);
    }
}
