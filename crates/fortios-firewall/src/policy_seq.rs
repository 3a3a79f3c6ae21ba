//! Security policy sequencing.
//!
//! Moving a policy has no remote object of its own. Create and update issue the same
//! `PUT firewall/policy/<src>?action=move&before|after=<dst>` call and take the
//! source policy ID as the identity token. Read has nothing to fetch and succeeds without
//! a call; delete only clears the token, leaving the policy order as it is.

use std::sync::Arc;

use async_trait::async_trait;
use fortios_core::{
    CmdbTransport, Error, FieldSpec, Lifecycle, LocalConfig, MovePosition, Operation,
    RequestOptions, ResourceSpec, ResourceState,
};
use tracing::debug;

use crate::Result;

/// CMDB table whose entries are reordered.
pub const POLICY_PATH: &str = "firewall/policy";

/// Schema of the ordering resource.
pub static SECURITY_POLICY_SEQ: ResourceSpec = ResourceSpec {
    type_name: "FirewallSecurityPolicySeq",
    path: POLICY_PATH,
    fields: &[
        FieldSpec::int("policy_src_id", "policy-src-id").required(),
        FieldSpec::int("policy_dst_id", "policy-dst-id").required(),
        FieldSpec::string("alter_position", "alter-position")
            .one_of(&["before", "after"])
            .required(),
    ],
};

/// One requested move, checked before anything is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyMove {
    /// Policy being moved
    pub src: i64,
    /// Policy it is placed next to
    pub dst: i64,
    /// Side of `dst` to place `src` on
    pub position: MovePosition,
}

impl PolicyMove {
    /// Extract the move from local configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if an ID is missing and [`Error::InvalidPosition`]
    /// if `alter_position` is anything other than `before` or `after`.
    pub fn from_config(config: &LocalConfig) -> Result<Self> {
        let id = |name: &str| {
            config
                .get_int(name)
                .ok_or_else(|| Error::ValidationError(format!("{name} is required")))
        };
        let src = id("policy_src_id")?;
        let dst = id("policy_dst_id")?;
        let position = config
            .get_str("alter_position")
            .unwrap_or_default()
            .parse()?;

        Ok(Self { src, dst, position })
    }
}

/// Orchestrator for policy moves.
#[derive(Clone)]
pub struct SecurityPolicySeq {
    transport: Arc<dyn CmdbTransport>,
    options: RequestOptions,
}

impl std::fmt::Debug for SecurityPolicySeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityPolicySeq")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl SecurityPolicySeq {
    /// Create the orchestrator with default request options.
    #[must_use]
    pub fn new(transport: Arc<dyn CmdbTransport>) -> Self {
        Self {
            transport,
            options: RequestOptions::new(),
        }
    }

    /// Override the per-call request options.
    #[must_use]
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    async fn apply(&self, state: &mut ResourceState) -> Result<()> {
        let wrap = |err: Error| err.for_resource(Operation::Move, SECURITY_POLICY_SEQ.type_name);

        let request = PolicyMove::from_config(&state.config).map_err(wrap)?;
        let src = request.src.to_string();

        self.transport
            .move_entry(
                POLICY_PATH,
                &src,
                request.position,
                &request.dst.to_string(),
                &self.options,
            )
            .await
            .map_err(wrap)?;

        state.id = Some(src);
        Ok(())
    }
}

#[async_trait]
impl Lifecycle for SecurityPolicySeq {
    async fn create(&self, state: &mut ResourceState) -> Result<()> {
        self.apply(state).await
    }

    async fn read(&self, _state: &mut ResourceState) -> Result<()> {
        Ok(())
    }

    async fn update(&self, state: &mut ResourceState) -> Result<()> {
        self.apply(state).await
    }

    async fn delete(&self, state: &mut ResourceState) -> Result<()> {
        debug!(id = ?state.id, "policy order is left in place");
        state.id = None;
        Ok(())
    }
}
