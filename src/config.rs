use std::env;
use std::time::Duration;
use anyhow::{bail, Context, Result};
use reqwest::Url;

use crate::auth::ApiKeyRegistry;

pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SERVICE_NAME: &str = "Codebase Gateway";

#[derive(Debug, Clone)]
pub struct Config {
    pub upstream_base_url: Url,
    pub upstream_timeout: Duration,
    pub api_keys: ApiKeyRegistry,
    pub health_requires_auth: bool,
    pub service_name: String,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// `from_env` is a thin wrapper over this so the parsing rules can be
    /// tested without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("UPSTREAM_BASE_URL")
            .context("UPSTREAM_BASE_URL environment variable is required")?;
        let upstream_base_url = Url::parse(&raw_url)
            .with_context(|| format!("UPSTREAM_BASE_URL must be a valid URL, got '{}'", raw_url))?;
        if !matches!(upstream_base_url.scheme(), "http" | "https") {
            bail!(
                "UPSTREAM_BASE_URL must use http or https, got '{}'",
                upstream_base_url.scheme()
            );
        }

        let timeout_secs = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            bail!("UPSTREAM_TIMEOUT_SECS must be greater than zero");
        }

        let api_keys = lookup("GATEWAY_API_KEYS")
            .context("GATEWAY_API_KEYS environment variable is required")?;
        let api_keys = ApiKeyRegistry::parse(&api_keys).context("GATEWAY_API_KEYS is invalid")?;

        let health_requires_auth = match lookup("HEALTH_REQUIRES_AUTH") {
            Some(raw) => parse_bool(&raw).context("HEALTH_REQUIRES_AUTH must be true or false")?,
            None => false,
        };

        let service_name =
            lookup("SERVICE_NAME").unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            upstream_base_url,
            upstream_timeout: Duration::from_secs(timeout_secs),
            api_keys,
            health_requires_auth,
            service_name,
            service_port,
            service_host,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Upstream base URL: {}", self.upstream_base_url);
        tracing::info!("  Upstream timeout: {}s", self.upstream_timeout.as_secs());
        tracing::info!("  Authorized API keys: {}", self.api_keys.len());
        tracing::info!(
            "  Health check: {}",
            if self.health_requires_auth { "authenticated" } else { "public" }
        );
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("expected a boolean, got '{}'", other),
    }
}
