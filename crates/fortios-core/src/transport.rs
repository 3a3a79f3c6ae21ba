//! Transport abstraction for the FortiOS CMDB API.
//!
//! [`CmdbTransport`] is the seam between the lifecycle orchestration and the network. The
//! HTTP implementation lives in [`crate::client`]; tests substitute a mock.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::types::MovePosition;

/// Generic string-keyed payload exchanged with the API.
pub type Payload = Map<String, Value>;

/// Default number of additional attempts for a failed call.
pub const DEFAULT_RETRIES: u32 = 1;

/// Per-call request settings.
///
/// Passed with every call instead of being stored on a shared client, so concurrent
/// orchestrations never observe each other's settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Additional attempts after a transient failure
    pub retries: u32,
    /// Virtual domain the call targets, if any
    pub vdom: Option<String>,
}

impl RequestOptions {
    /// Create options with the default retry count and no vdom.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            vdom: None,
        }
    }

    /// Set the retry count.
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Target a virtual domain.
    #[must_use]
    pub fn with_vdom(mut self, vdom: impl Into<String>) -> Self {
        self.vdom = Some(vdom.into());
        self
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// CMDB operations addressed by table path (e.g. `webfilter/content-header`) and mkey.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CmdbTransport: Send + Sync {
    /// Create an object. Returns the response envelope, which may carry the new `mkey`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn create(
        &self,
        path: &str,
        payload: &Payload,
        options: &RequestOptions,
    ) -> Result<Payload>;

    /// Read one object. `Ok(None)` means the object does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn read(
        &self,
        path: &str,
        mkey: &str,
        options: &RequestOptions,
    ) -> Result<Option<Payload>>;

    /// Update an object. Returns the response envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn update(
        &self,
        path: &str,
        mkey: &str,
        payload: &Payload,
        options: &RequestOptions,
    ) -> Result<Payload>;

    /// Delete an object.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn delete(&self, path: &str, mkey: &str, options: &RequestOptions) -> Result<()>;

    /// Move an object before or after `neighbor` in an ordered table.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn move_entry(
        &self,
        path: &str,
        mkey: &str,
        position: MovePosition,
        neighbor: &str,
        options: &RequestOptions,
    ) -> Result<()>;
}
