//! Firewall policy resources for FortiOS.
//!
//! Provides [`SecurityPolicySeq`], which reorders entries of the
//! `firewall/policy` table by moving one policy before or after another.

#![deny(missing_docs)]

pub mod policy_seq;

pub use policy_seq::{PolicyMove, SecurityPolicySeq, SECURITY_POLICY_SEQ};

/// Convenient result alias that reuses the shared FortiOS error type.
pub type Result<T> = fortios_core::Result<T>;
