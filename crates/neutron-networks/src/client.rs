//! Asynchronous client for the `/networks` resource.

use crate::models::{
    CreateNetwork, Network, NetworkRequest, NetworkResponse, NetworksRequest, NetworksResponse,
    UpdateNetwork,
};
use crate::Result;
use neutron_core::client::{resource_path, RawResponse, RestClient};
use neutron_core::Error;
use reqwest::{Method, StatusCode};
use tracing::{debug, warn};
use url::Url;

const NETWORKS_PATH: &str = "networks";

/// Client for network operations in one region.
///
/// `create` and `create_bulk` treat 404 as an error. `get`, `update` and
/// `delete` treat 404 as "no such network" and report it as `None` / `false`.
#[derive(Debug, Clone)]
pub struct NetworkClient {
    rest: RestClient,
}

impl NetworkClient {
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

    /// Create a network.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for an invalid payload,
    /// [`Error::NotFound`] on 404 and [`Error::ServerError`] on other failures.
    pub async fn create(&self, network: &CreateNetwork) -> Result<Network> {
        network.check()?;
        let response = self
            .rest
            .send_json(Method::POST, NETWORKS_PATH, Some(&NetworkRequest { network }))
            .await?
            .error_for_status()?;
        let body: NetworkResponse = response.json(NETWORKS_PATH)?;
        Ok(body.network)
    }

    /// Create several networks in one request.
    ///
    /// The result is in the same order as `networks`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if the list is empty or any element
    /// is invalid (nothing is sent), [`Error::BatchError`] if the response
    /// does not contain one network per request element, [`Error::NotFound`]
    /// on 404 and [`Error::ServerError`] on other failures.
    pub async fn create_bulk(&self, networks: &[CreateNetwork]) -> Result<Vec<Network>> {
        if networks.is_empty() {
            return Err(Error::ValidationError(
                "bulk create requires at least one network".to_string(),
            ));
        }
        for (index, network) in networks.iter().enumerate() {
            network.check().map_err(|err| {
                Error::ValidationError(format!("network at index {index}: {err}"))
            })?;
        }

        let response = self
            .rest
            .send_json(
                Method::POST,
                NETWORKS_PATH,
                Some(&NetworksRequest { networks }),
            )
            .await?
            .error_for_status()?;
        let body: NetworksResponse = response.json(NETWORKS_PATH)?;

        if body.networks.len() != networks.len() {
            warn!(
                requested = networks.len(),
                returned = body.networks.len(),
                "Bulk network create returned a different count"
            );
            return Err(Error::BatchError(format!(
                "requested {} networks, server returned {}",
                networks.len(),
                body.networks.len()
            )));
        }
        Ok(body.networks)
    }

    /// Fetch a network by id. Returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for an unusable id and
    /// [`Error::ServerError`] for failures other than 404.
    pub async fn get(&self, id: &str) -> Result<Option<Network>> {
        let path = network_path(id)?;
        let response = self.rest.send(Method::GET, &path).await?;
        decode_unless_missing(&path, response)
    }

    /// Update a network. Only fields set on `update` are sent.
    /// Returns `None` if the network does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for an unusable id and
    /// [`Error::ServerError`] for failures other than 404.
    pub async fn update(&self, id: &str, update: &UpdateNetwork) -> Result<Option<Network>> {
        let path = network_path(id)?;
        let response = self
            .rest
            .send_json(Method::PUT, &path, Some(&NetworkRequest { network: update }))
            .await?;
        decode_unless_missing(&path, response)
    }

    /// Delete a network. Returns `false` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for an unusable id and
    /// [`Error::ServerError`] for failures other than 404.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let path = network_path(id)?;
        let response = self.rest.send(Method::DELETE, &path).await?;
        if response.status == StatusCode::NOT_FOUND {
            debug!(id, "Network already absent");
            return Ok(false);
        }
        response.error_for_status()?;
        Ok(true)
    }
}

fn network_path(id: &str) -> Result<String> {
    resource_path(NETWORKS_PATH, id)
}

fn decode_unless_missing(path: &str, response: RawResponse) -> Result<Option<Network>> {
    if response.status == StatusCode::NOT_FOUND {
        debug!(path, "Network not found");
        return Ok(None);
    }
    let body: NetworkResponse = response.error_for_status()?.json(path)?;
    Ok(Some(body.network))
}
