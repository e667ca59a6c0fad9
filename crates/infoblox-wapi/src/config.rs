//! Connection settings for a WAPI grid master

use crate::error::{WapiError, WapiResult};
use crate::models::Creator;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// WAPI version used when none is configured
pub const DEFAULT_WAPI_VERSION: &str = "2.6.1";

/// Result cap applied to GET requests when none is configured
pub const DEFAULT_MAX_RESULTS: u32 = 1000;

/// Connection context for one client
#[derive(Clone)]
pub struct WapiConfig {
    /// IP address or FQDN of the grid master
    pub host: String,
    /// Account used for HTTP basic authentication
    pub username: String,
    /// Password for `username`
    pub password: String,
    /// PEM bundle holding the appliance certificate or its CA
    ///
    /// When set, only these certificates are trusted. `None` falls back to
    /// the public web roots compiled into the client.
    pub ca_cert: Option<PathBuf>,
    /// WAPI version, with or without a leading `v`
    pub version: String,
    /// `None` sends no `_max_results` directive
    pub max_results: Option<u32>,
    /// Creator tag added to DNS lookups
    pub creator: Creator,
    /// Per-request timeout; `None` waits as long as the HTTP stack does
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for WapiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WapiConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("ca_cert", &self.ca_cert)
            .field("version", &self.version)
            .field("max_results", &self.max_results)
            .field("creator", &self.creator)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl WapiConfig {
    /// Create settings with the default version, result cap and creator
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            ca_cert: None,
            version: DEFAULT_WAPI_VERSION.to_string(),
            max_results: Some(DEFAULT_MAX_RESULTS),
            creator: Creator::default(),
            timeout: None,
        }
    }

    /// Read settings from `INFOBLOX_*` environment variables
    ///
    /// `INFOBLOX_HOST`, `INFOBLOX_USERNAME` and `INFOBLOX_PASSWORD` are required.
    /// `INFOBLOX_CA_CERT`, `INFOBLOX_WAPI_VERSION`, `INFOBLOX_MAX_RESULTS`,
    /// `INFOBLOX_CREATOR` and `INFOBLOX_TIMEOUT_SECS` are optional; a cap of
    /// `0` disables `_max_results`.
    pub fn from_env() -> WapiResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> WapiResult<Self> {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| {
                WapiError::Config(format!("{} environment variable is required", name))
            })
        };

        let mut config = Self::new(
            required("INFOBLOX_HOST")?,
            required("INFOBLOX_USERNAME")?,
            required("INFOBLOX_PASSWORD")?,
        );

        if let Some(path) = lookup("INFOBLOX_CA_CERT") {
            config = config.with_ca_cert(path);
        }
        if let Some(version) = lookup("INFOBLOX_WAPI_VERSION") {
            config = config.with_version(version);
        }
        if let Some(max) = lookup("INFOBLOX_MAX_RESULTS") {
            let max: u32 = max.parse().map_err(|e| {
                WapiError::Config(format!("INFOBLOX_MAX_RESULTS is not a number: {}", e))
            })?;
            config = config.with_max_results((max > 0).then_some(max));
        }
        if let Some(creator) = lookup("INFOBLOX_CREATOR") {
            let creator: Creator = creator
                .parse()
                .map_err(|e| WapiError::Config(format!("INFOBLOX_CREATOR: {}", e)))?;
            config = config.with_creator(creator);
        }
        if let Some(secs) = lookup("INFOBLOX_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|e| {
                WapiError::Config(format!("INFOBLOX_TIMEOUT_SECS is not a number: {}", e))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Trust only the certificates in this PEM bundle
    pub fn with_ca_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert = Some(path.into());
        self
    }

    /// WAPI version without the leading `v`, e.g. `2.6.1`
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Result cap for GET requests, `None` for no cap
    pub fn with_max_results(mut self, max_results: Option<u32>) -> Self {
        self.max_results = max_results;
        self
    }

    /// Creator tag added to DNS lookups
    pub fn with_creator(mut self, creator: Creator) -> Self {
        self.creator = creator;
        self
    }

    /// Abort requests that take longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reject settings that cannot produce a valid base URL
    pub fn validate(&self) -> WapiResult<()> {
        if self.host.trim().is_empty() {
            return Err(WapiError::Config("host must not be empty".to_string()));
        }
        if self.host.contains('/') {
            return Err(WapiError::Config(format!(
                "host must be an address or FQDN, got {}",
                self.host
            )));
        }
        let version = self.version.trim_start_matches('v');
        if version.is_empty() || !version.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(WapiError::Config(format!("invalid WAPI version: {}", self.version)));
        }
        Ok(())
    }

    /// Versioned API root, e.g. `https://gm.example.com/wapi/v2.6.1`
    pub fn base_url(&self) -> String {
        format!(
            "https://{}/wapi/v{}",
            self.host,
            self.version.trim_start_matches('v')
        )
    }
}
