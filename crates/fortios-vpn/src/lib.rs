//! IPsec VPN resources for FortiOS.
//!
//! Provides the schema and orchestrator constructor for `vpn.ipsec/phase1-interface`.

#![deny(missing_docs)]

pub mod phase1_interface;

pub use phase1_interface::{phase1_interface, PHASE1_INTERFACE};

/// Convenient result alias that reuses the shared FortiOS error type.
pub type Result<T> = fortios_core::Result<T>;
