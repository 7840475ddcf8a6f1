//! Extension discovery for OpenStack Networking (Neutron).
//!
//! Lists the API extensions a Neutron endpoint advertises, so callers can
//! check for optional features such as provider networks before using them.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::ExtensionClient;
pub use models::{Extension, Link};

/// Convenient result alias sharing the `neutron-core` error type.
pub type Result<T> = neutron_core::Result<T>;
