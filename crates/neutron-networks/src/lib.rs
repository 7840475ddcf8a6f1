//! Network resource client and data models for OpenStack Networking (Neutron).
//!
//! Provides typed structures and an asynchronous client for the `/networks`
//! resource of the Networking v2 API.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::NetworkClient;
pub use models::{
    CreateNetwork, CreateNetworkBuilder, Network, NetworkBuilder, NetworkStatus, NetworkType,
    UpdateNetwork, UpdateNetworkBuilder,
};

/// Convenient result alias sharing the `neutron-core` error type.
pub type Result<T> = neutron_core::Result<T>;
