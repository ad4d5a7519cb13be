//! Runtime configuration from the environment.
//!
//! Values come from process environment variables, with a `.env` file in the
//! working directory loaded first when present. CLI flags override them.

use crate::error::{BiopubsError, Result};
use crate::gateway::{
    GatewayConfig, API_KEY_VAR, DEFAULT_GATEWAY_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};
use crate::publications::DataSource;
use std::env;
use tracing::{info, warn};

/// Gateway base URL variable
pub const GATEWAY_URL_VAR: &str = "AI_GATEWAY_URL";
/// Model name variable
pub const MODEL_VAR: &str = "AI_GATEWAY_MODEL";
/// Request timeout variable (seconds)
pub const TIMEOUT_VAR: &str = "AI_GATEWAY_TIMEOUT_SECS";
/// Publication export location variable
pub const SOURCE_VAR: &str = "PUBLICATIONS_SOURCE";

/// Default publication export location
pub const DEFAULT_SOURCE: &str = "data/publications.csv";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub source: DataSource,
}

impl AppConfig {
    /// Load `.env` if there is one. A missing file is not an error.
    pub fn load_dotenv() {
        match dotenvy::dotenv() {
            Ok(path) => info!(path = %path.display(), "Loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => warn!(error = %e, "Ignoring malformed .env"),
        }
    }

    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let timeout_secs = match get(TIMEOUT_VAR) {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| BiopubsError::Config(format!("Invalid {}: {}", TIMEOUT_VAR, e)))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let gateway = GatewayConfig {
            base_url: get(GATEWAY_URL_VAR).unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string()),
            api_key: get(API_KEY_VAR),
            model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_secs,
        };

        let source = DataSource::parse(&get(SOURCE_VAR).unwrap_or_else(|| DEFAULT_SOURCE.to_string()))?;

        Ok(Self { gateway, source })
    }

    /// Log the effective configuration without the credential.
    pub fn log_summary(&self) {
        info!(
            gateway = %self.gateway.base_url,
            model = %self.gateway.model,
            timeout_secs = self.gateway.timeout_secs,
            api_key_set = self.gateway.api_key.is_some(),
            source = %self.source,
            "Configuration"
        );
        if self.gateway.api_key.is_none() {
            warn!("{} is not set; AI requests will fail", API_KEY_VAR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let config = AppConfig::from_lookup(lookup(&[]))?;
        assert_eq!(config.gateway.base_url, DEFAULT_GATEWAY_URL);
        assert_eq!(config.gateway.model, DEFAULT_MODEL);
        assert_eq!(config.gateway.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.gateway.api_key.is_none());
        assert_eq!(config.source, DataSource::Path(PathBuf::from(DEFAULT_SOURCE)));
        Ok(())
    }

    #[test]
    fn test_overrides() -> Result<()> {
        let config = AppConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "secret"),
            (GATEWAY_URL_VAR, "http://localhost:8080/v1"),
            (MODEL_VAR, "test-model"),
            (TIMEOUT_VAR, "5"),
            (SOURCE_VAR, "https://example.org/publications.csv"),
        ]))?;
        assert_eq!(config.gateway.api_key.as_deref(), Some("secret"));
        assert_eq!(config.gateway.base_url, "http://localhost:8080/v1");
        assert_eq!(config.gateway.model, "test-model");
        assert_eq!(config.gateway.timeout_secs, 5);
        assert!(matches!(config.source, DataSource::Url(_)));
        Ok(())
    }

    #[test]
    fn test_blank_key_is_absent() -> Result<()> {
        let config = AppConfig::from_lookup(lookup(&[(API_KEY_VAR, "   ")]))?;
        assert!(config.gateway.api_key.is_none());
        Ok(())
    }

    #[test]
    fn test_bad_timeout() {
        let result = AppConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")]));
        assert!(matches!(result, Err(BiopubsError::Config(_))));
    }
}
