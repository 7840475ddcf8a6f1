//! Configuration structures for Neutron clients.
//!
//! This module provides the configuration used to build an API root from a
//! static region table, together with validation of its values.

use crate::Error;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;
use validator::{Validate, ValidationError};

/// Default path segment for the Networking v2 API.
pub const DEFAULT_API_VERSION: &str = "v2.0";

/// Configuration for a Neutron API root.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NeutronClientConfig {
    /// Region name to Networking endpoint URL
    #[validate(custom(function = "validate_region_endpoints"))]
    #[serde(default)]
    pub regions: BTreeMap<String, String>,

    /// Token sent as `X-Auth-Token`
    #[serde(default, skip_serializing)]
    pub token: Option<SecretString>,

    /// API version path segment appended to every endpoint
    #[validate(length(min = 1))]
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    20
}

const fn default_tls_verify() -> bool {
    true
}

fn validate_region_endpoints(
    regions: &BTreeMap<String, String>,
) -> Result<(), ValidationError> {
    for (region, endpoint) in regions {
        if region.trim().is_empty() {
            return Err(ValidationError::new("empty_region"));
        }
        if Url::parse(endpoint).is_err() {
            let mut err = ValidationError::new("invalid_endpoint");
            err.message = Some(format!("region `{region}` has invalid endpoint `{endpoint}`").into());
            return Err(err);
        }
    }
    Ok(())
}

impl NeutronClientConfig {
    /// Create an empty configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regions: BTreeMap::new(),
            token: None,
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
            tls_verify: default_tls_verify(),
        }
    }

    /// Register the endpoint for a region.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn with_region(
        mut self,
        region: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, Error> {
        self.regions.insert(region.into(), endpoint.into());
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        Ok(self)
    }

    /// Set the token sent with every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Override the API version path segment.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the whole configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid field.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }
}

impl Default for NeutronClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
