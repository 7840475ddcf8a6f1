//! # neutron-core
//!
//! Core types and utilities for working with OpenStack Networking (Neutron).
//!
//! This crate provides the shared error type, HTTP transport, configuration and
//! collaborator traits that the per-resource client crates build on.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code mapping
//! - [`nullable`] - Tri-state field wrapper distinguishing absent, null and set values
//! - [`config`] - Configuration structures for Neutron clients
//! - [`client`] - HTTP client configuration and the shared REST transport
//! - [`catalog`] - Region to endpoint resolution
//! - [`auth`] - Token providers for the `X-Auth-Token` header

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod nullable;

// Re-export commonly used types
pub use error::{Error, Result};
pub use nullable::Nullable;
