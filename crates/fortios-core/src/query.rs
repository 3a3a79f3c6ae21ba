//! Query string assembly for CMDB requests.
//!
//! Every call may carry a `vdom`; moves additionally carry `action=move` and a
//! `before`/`after` neighbor.

use std::fmt::Display;

use crate::transport::RequestOptions;
use crate::types::MovePosition;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Start from the per-call options (currently only the vdom).
    #[must_use]
    pub fn for_options(options: &RequestOptions) -> Self {
        let mut params = Self::new();
        params.push_opt("vdom", options.vdom.as_deref());
        params
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: Display,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Append `action=move` and the relative position.
    #[must_use]
    pub fn with_move(mut self, position: MovePosition, neighbor: &str) -> Self {
        self.push("action", "move");
        self.push(position.as_str(), neighbor);
        self
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
