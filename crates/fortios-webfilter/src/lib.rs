//! Web filter resources for FortiOS.
//!
//! Provides the schema and orchestrator constructor for `webfilter/content-header`, the
//! table of HTTP content-type patterns the web filter blocks, allows or exempts.

#![deny(missing_docs)]

pub mod content_header;

pub use content_header::{content_header, ContentHeaderEntry, CONTENT_HEADER};

/// Convenient result alias that reuses the shared FortiOS error type.
pub type Result<T> = fortios_core::Result<T>;
