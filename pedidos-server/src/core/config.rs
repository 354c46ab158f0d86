use thiserror::Error;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | PORT | 3004 | HTTP port |
/// | SUPABASE_URL | (required) | Data store base URL |
/// | SUPABASE_SERVICE_ROLE_KEY | (required) | Data store service key |
/// | PORTAL_URL | https://ir-comercio-portal-zcan.onrender.com | Portal auth service |
/// | REQUEST_TIMEOUT_MS | 30000 | Outbound request timeout (ms) |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | LOG_DIR | (unset) | Daily log files when set |
///
/// # Example
///
/// ```ignore
/// PORT=8080 SUPABASE_URL=https://x.supabase.co SUPABASE_SERVICE_ROLE_KEY=... cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub port: u16,
    /// Data store base URL (the REST interface lives under `/rest/v1`)
    pub supabase_url: String,
    /// Service-role key sent on every store request
    pub supabase_key: String,
    /// Portal authentication service URL
    pub portal_url: String,
    /// Outbound request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Optional directory for daily log files
    pub log_dir: Option<String>,
}

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not configured")]
    MissingVar(&'static str),
}

const DEFAULT_PORTAL_URL: &str = "https://ir-comercio-portal-zcan.onrender.com";

impl Config {
    /// Load configuration from environment variables
    ///
    /// The store URL and key have no sensible default; startup fails
    /// without them.
    pub fn from_env() -> Result<Self, ConfigError> {
        let supabase_url =
            std::env::var("SUPABASE_URL").map_err(|_| ConfigError::MissingVar("SUPABASE_URL"))?;
        let supabase_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
            .map_err(|_| ConfigError::MissingVar("SUPABASE_SERVICE_ROLE_KEY"))?;

        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3004),
            supabase_url,
            supabase_key,
            portal_url: std::env::var("PORTAL_URL").unwrap_or_else(|_| DEFAULT_PORTAL_URL.into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        })
    }

    /// Build a configuration with explicit values, used by tests
    pub fn with_overrides(
        port: u16,
        supabase_url: impl Into<String>,
        portal_url: impl Into<String>,
    ) -> Self {
        Self {
            port,
            supabase_url: supabase_url.into(),
            supabase_key: String::new(),
            portal_url: portal_url.into(),
            request_timeout_ms: 30000,
            environment: "development".into(),
            log_dir: None,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_overrides() {
        let config = Config::with_overrides(0, "http://store.local", "http://portal.local");
        assert_eq!(config.port, 0);
        assert_eq!(config.supabase_url, "http://store.local");
        assert_eq!(config.portal_url, "http://portal.local");
        assert!(config.is_development());
        assert!(!config.is_production());
    }
}
