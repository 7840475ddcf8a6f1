//! Asynchronous client for the `/extensions` resource.

use crate::models::{Extension, ExtensionResponse, ExtensionsResponse};
use crate::Result;
use neutron_core::client::{resource_path, RestClient};
use reqwest::{Method, StatusCode};
use tracing::debug;
use url::Url;

const EXTENSIONS_PATH: &str = "extensions";

/// Client for extension discovery in one region.
#[derive(Debug, Clone)]
pub struct ExtensionClient {
    rest: RestClient,
}

impl ExtensionClient {
    /// Wrap a transport bound to a regional endpoint.
    #[must_use]
    pub const fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// Access the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.rest.base_url()
    }

    /// List every extension the endpoint advertises.
    ///
    /// # Errors
    ///
    /// Returns an error for any non-2xx status or undecodable body.
    pub async fn list_extensions(&self) -> Result<Vec<Extension>> {
        let response = self
            .rest
            .send(Method::GET, EXTENSIONS_PATH)
            .await?
            .error_for_status()?;
        let body: ExtensionsResponse = response.json(EXTENSIONS_PATH)?;
        Ok(body.extensions)
    }

    /// Fetch one extension by alias. Returns `None` if it is not offered.
    ///
    /// # Errors
    ///
    /// Returns [`neutron_core::Error::ValidationError`] for an unusable alias and an error
    /// for failures other than 404.
    pub async fn get_extension(&self, alias: &str) -> Result<Option<Extension>> {
        let path = resource_path(EXTENSIONS_PATH, alias)?;
        let response = self.rest.send(Method::GET, &path).await?;
        if response.status == StatusCode::NOT_FOUND {
            debug!(alias, "Extension not offered");
            return Ok(None);
        }
        let body: ExtensionResponse = response.error_for_status()?.json(&path)?;
        Ok(Some(body.extension))
    }

    /// Whether the endpoint offers the extension with `alias`.
    ///
    /// # Errors
    ///
    /// Same as [`ExtensionClient::get_extension`].
    pub async fn has_extension(&self, alias: &str) -> Result<bool> {
        Ok(self.get_extension(alias).await?.is_some())
    }
}
