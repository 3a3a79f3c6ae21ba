//! # fortios-core
//!
//! Core building blocks for managing FortiOS configuration objects over the CMDB REST API.
//!
//! Each resource type is described once by a static [`ResourceSpec`]. A [`Resource`]
//! orchestrator expands the caller's [`LocalConfig`] into a request payload, sends it
//! through a [`CmdbTransport`], and flattens the response back into local state.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code mapping
//! - [`types`] - Lifecycle operations, list import mode and move positions
//! - [`schema`] - Field and resource declarations
//! - [`state`] - Local configuration tree with explicit set/unset attributes
//! - [`expand`] - Local → remote marshalling
//! - [`flatten`] - Remote → local marshalling and secret placeholder handling
//! - [`transport`] - Transport trait and per-call request options
//! - [`client`] - reqwest implementation of the transport
//! - [`config`] - Provider configuration and environment loading
//! - [`query`] - Query parameter helper
//! - [`resource`] - Lifecycle orchestrator

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod expand;
pub mod flatten;
pub mod query;
pub mod resource;
pub mod schema;
pub mod state;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use client::{ClientConfig, CmdbClient, CmdbClientBuilder};
pub use config::ProviderConfig;
pub use error::{Error, Result};
pub use resource::{Lifecycle, Resource, ResourceState};
pub use schema::{FieldKind, FieldSpec, Presence, ResourceSpec, Sensitivity};
pub use state::{Attr, LocalConfig, SecretValue};
pub use transport::{CmdbTransport, Payload, RequestOptions};
pub use types::{ImportMode, MovePosition, Operation};
