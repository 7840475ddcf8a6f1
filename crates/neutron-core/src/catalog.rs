//! Region to endpoint resolution.
//!
//! A [`ServiceCatalog`] maps a region name to the Networking endpoint for
//! that region. Live catalog lookups belong to the identity layer; this crate
//! ships [`StaticCatalog`] for configured deployments and tests.

use crate::config::NeutronClientConfig;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use tracing::debug;
use url::Url;

/// Service type of the Networking API in an OpenStack catalog.
pub const NETWORK_SERVICE_TYPE: &str = "network";

/// Region-keyed endpoint resolution.
#[cfg_attr(test, mockall::automock)]
pub trait ServiceCatalog: Send + Sync {
    /// Regions known to the catalog, sorted.
    fn configured_regions(&self) -> Vec<String>;

    /// Resolve the Networking endpoint for `region`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EndpointResolution`] if the region is unknown.
    fn resolve_endpoint(&self, region: &str) -> Result<Url>;
}

/// Catalog backed by a fixed region table.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    endpoints: BTreeMap<String, Url>,
}

impl StaticCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the endpoint for a region.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the URL cannot be parsed.
    pub fn with_endpoint(mut self, region: impl Into<String>, endpoint: &str) -> Result<Self> {
        let region = region.into();
        let url = Url::parse(endpoint).map_err(|err| {
            Error::InvalidEndpoint(format!("Invalid endpoint `{endpoint}` for `{region}`: {err}"))
        })?;
        self.endpoints.insert(region, url);
        Ok(self)
    }

    /// Build from the region table of a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &NeutronClientConfig) -> Result<Self> {
        config.check()?;
        config
            .regions
            .iter()
            .try_fold(Self::new(), |catalog, (region, endpoint)| {
                catalog.with_endpoint(region.clone(), endpoint)
            })
    }
}

impl ServiceCatalog for StaticCatalog {
    fn configured_regions(&self) -> Vec<String> {
        self.endpoints.keys().cloned().collect()
    }

    fn resolve_endpoint(&self, region: &str) -> Result<Url> {
        let endpoint = self.endpoints.get(region).cloned().ok_or_else(|| {
            Error::EndpointResolution(format!(
                "no `{NETWORK_SERVICE_TYPE}` endpoint for region `{region}`"
            ))
        })?;
        debug!(region, endpoint = %endpoint, "Resolved endpoint");
        Ok(endpoint)
    }
}

/// Append the API version segment to an endpoint unless it already ends with it.
///
/// # Errors
///
/// Returns [`Error::InvalidEndpoint`] if the endpoint cannot be a base URL.
pub fn versioned_endpoint(endpoint: &Url, api_version: &str) -> Result<Url> {
    if endpoint.cannot_be_a_base() {
        return Err(Error::InvalidEndpoint(format!(
            "`{endpoint}` cannot be used as a base URL"
        )));
    }
    let version = api_version.trim_matches('/');
    let already_versioned = endpoint
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .is_some_and(|last| last == version);

    let mut url = endpoint.clone();
    let trimmed = url.path().trim_end_matches('/').to_string();
    if already_versioned || version.is_empty() {
        url.set_path(&format!("{trimmed}/"));
    } else {
        url.set_path(&format!("{trimmed}/{version}/"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_catalog_resolves_known_region() {
        let catalog = StaticCatalog::new()
            .with_endpoint("RegionOne", "http://neutron.local:9696")
            .unwrap();
        let url = catalog.resolve_endpoint("RegionOne").unwrap();
        assert_eq!(url.as_str(), "http://neutron.local:9696/");
    }

    #[test]
    fn test_static_catalog_unknown_region() {
        let catalog = StaticCatalog::new()
            .with_endpoint("RegionOne", "http://neutron.local:9696")
            .unwrap();
        let err = catalog.resolve_endpoint("RegionTwo").unwrap_err();
        assert!(matches!(err, Error::EndpointResolution(_)));
    }

    #[test]
    fn test_static_catalog_invalid_endpoint() {
        let err = StaticCatalog::new()
            .with_endpoint("RegionOne", "::nope::")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_static_catalog_regions_sorted() {
        let catalog = StaticCatalog::new()
            .with_endpoint("RegionTwo", "http://two:9696")
            .unwrap()
            .with_endpoint("RegionOne", "http://one:9696")
            .unwrap();
        assert_eq!(catalog.configured_regions(), vec!["RegionOne", "RegionTwo"]);
    }

    #[test]
    fn test_static_catalog_from_config() {
        let config = NeutronClientConfig::new()
            .with_region("RegionOne", "http://one:9696")
            .unwrap();
        let catalog = StaticCatalog::from_config(&config).unwrap();
        assert_eq!(catalog.configured_regions(), vec!["RegionOne"]);
    }

    #[test]
    fn test_versioned_endpoint() {
        let base = Url::parse("http://one:9696").unwrap();
        assert_eq!(
            versioned_endpoint(&base, "v2.0").unwrap().as_str(),
            "http://one:9696/v2.0/"
        );

        let prefixed = Url::parse("https://cloud.example.com/network").unwrap();
        assert_eq!(
            versioned_endpoint(&prefixed, "v2.0").unwrap().as_str(),
            "https://cloud.example.com/network/v2.0/"
        );

        let versioned = Url::parse("http://one:9696/v2.0/").unwrap();
        assert_eq!(
            versioned_endpoint(&versioned, "v2.0").unwrap().as_str(),
            "http://one:9696/v2.0/"
        );
    }

    #[test]
    fn test_service_catalog_mock() {
        let mut mock = MockServiceCatalog::new();
        mock.expect_resolve_endpoint()
            .with(mockall::predicate::eq("RegionOne"))
            .times(1)
            .returning(|_| Ok(Url::parse("http://one:9696").unwrap()));
        mock.expect_configured_regions()
            .returning(|| vec!["RegionOne".to_string()]);

        assert!(mock.resolve_endpoint("RegionOne").is_ok());
        assert_eq!(mock.configured_regions(), vec!["RegionOne"]);
    }
}
