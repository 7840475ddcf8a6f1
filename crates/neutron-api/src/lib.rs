//! # neutron-api
//!
//! Region-aware entry point for OpenStack Networking (Neutron).
//!
//! [`NeutronApi`] resolves a region to its Networking endpoint through a
//! [`ServiceCatalog`] and hands out resource clients that share one HTTP
//! connection pool and one [`TokenProvider`].
//!
//! ```no_run
//! use neutron_api::NeutronApi;
//! use neutron_core::config::NeutronClientConfig;
//! use neutron_networks::CreateNetwork;
//!
//! # async fn run() -> neutron_core::Result<()> {
//! let config = NeutronClientConfig::new()
//!     .with_region("RegionOne", "http://controller:9696")?
//!     .with_token("gAAAAAB...");
//! let api = NeutronApi::from_config(&config)?;
//!
//! let networks = api.network_api("RegionOne")?;
//! let created = networks
//!     .create(&CreateNetwork::builder().name("private").build()?)
//!     .await?;
//! println!("{created}");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

use neutron_core::auth::{StaticToken, TokenProvider};
use neutron_core::catalog::{versioned_endpoint, ServiceCatalog, StaticCatalog};
use neutron_core::client::{ClientConfig, RestClient};
use neutron_core::config::{NeutronClientConfig, DEFAULT_API_VERSION};
use neutron_core::{Error, Result};
use neutron_extensions::ExtensionClient;
use neutron_networks::NetworkClient;
use std::sync::Arc;
use tracing::debug;

/// Builder for [`NeutronApi`].
pub struct NeutronApiBuilder {
    catalog: Arc<dyn ServiceCatalog>,
    tokens: Arc<dyn TokenProvider>,
    http_config: ClientConfig,
    api_version: String,
}

impl NeutronApiBuilder {
    /// Start from a catalog and a token provider.
    #[must_use]
    pub fn new(catalog: Arc<dyn ServiceCatalog>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            catalog,
            tokens,
            http_config: ClientConfig::default(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Override the HTTP configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Override the API version path segment.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Build the API root.
    ///
    /// # Errors
    ///
    /// Returns an error if the API version is empty or the HTTP client
    /// cannot be built.
    pub fn build(self) -> Result<NeutronApi> {
        if self.api_version.trim_matches('/').is_empty() {
            return Err(Error::ConfigError("API version must not be empty".to_string()));
        }
        Ok(NeutronApi {
            catalog: self.catalog,
            tokens: self.tokens,
            http: self.http_config.build_http()?,
            api_version: self.api_version,
        })
    }
}

/// Root of the Neutron API: hands out per-region resource clients.
#[derive(Clone)]
pub struct NeutronApi {
    catalog: Arc<dyn ServiceCatalog>,
    tokens: Arc<dyn TokenProvider>,
    http: reqwest::Client,
    api_version: String,
}

impl std::fmt::Debug for NeutronApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeutronApi")
            .field("regions", &self.catalog.configured_regions())
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl NeutronApi {
    /// Start building an API root.
    #[must_use]
    pub fn builder(
        catalog: Arc<dyn ServiceCatalog>,
        tokens: Arc<dyn TokenProvider>,
    ) -> NeutronApiBuilder {
        NeutronApiBuilder::new(catalog, tokens)
    }

    /// Build an API root from a static configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is invalid or has
    /// no token.
    pub fn from_config(config: &NeutronClientConfig) -> Result<Self> {
        config.check()?;
        let token = config
            .token
            .as_ref()
            .ok_or_else(|| Error::ConfigError("A token is required".to_string()))?;
        let tokens: Arc<dyn TokenProvider> = Arc::new(
            StaticToken::from_secret(token)
                .map_err(|err| Error::ConfigError(err.to_string()))?,
        );
        let catalog: Arc<dyn ServiceCatalog> = Arc::new(StaticCatalog::from_config(config)?);
        let http_config = ClientConfig::new()
            .with_timeout(config.timeout())
            .with_tls_verify(config.tls_verify);

        Self::builder(catalog, tokens)
            .with_http_config(http_config)
            .with_api_version(config.api_version.clone())
            .build()
    }

    /// Regions known to the service catalog.
    #[must_use]
    pub fn configured_regions(&self) -> Vec<String> {
        self.catalog.configured_regions()
    }

    /// API version path segment appended to every endpoint.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Network client bound to `region`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndpointResolution`] if the region is unknown.
    pub fn network_api(&self, region: &str) -> Result<NetworkClient> {
        Ok(NetworkClient::new(self.rest_client(region)?))
    }

    /// Extension client bound to `region`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndpointResolution`] if the region is unknown.
    pub fn extension_api(&self, region: &str) -> Result<ExtensionClient> {
        Ok(ExtensionClient::new(self.rest_client(region)?))
    }

    fn rest_client(&self, region: &str) -> Result<RestClient> {
        let endpoint = self.catalog.resolve_endpoint(region)?;
        let base = versioned_endpoint(&endpoint, &self.api_version)?;
        debug!(region, base = %base, "Binding client to region");
        RestClient::from_parts(self.http.clone(), base, Arc::clone(&self.tokens))
    }
}
