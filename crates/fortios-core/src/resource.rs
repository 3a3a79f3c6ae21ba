//! Lifecycle orchestration for CMDB-backed resources.
//!
//! A [`Resource`] binds a static [`ResourceSpec`] to a transport and drives the
//! create / read / update / delete transitions of one [`ResourceState`]:
//!
//! - `create`: expand, create remotely, derive the identity token, then read back.
//! - `update`: expand, update remotely under the current token, re-derive the token, read back.
//! - `read`: fetch by token; a missing object clears the token, otherwise flatten.
//! - `delete`: delete remotely, then clear the token.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::expand::expand_resource;
use crate::flatten::flatten_resource;
use crate::schema::ResourceSpec;
use crate::state::LocalConfig;
use crate::transport::{CmdbTransport, Payload, RequestOptions};
use crate::types::{ImportMode, Operation};

/// Identity token plus the local view of one managed object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceState {
    /// Identity token (mkey). `None` while the object is absent.
    pub id: Option<String>,
    /// Local configuration
    pub config: LocalConfig,
}

impl ResourceState {
    /// State for an object that has not been created yet.
    #[must_use]
    pub fn new(config: LocalConfig) -> Self {
        Self { id: None, config }
    }

    /// State addressing an existing object.
    #[must_use]
    pub fn with_id(id: impl Into<String>, config: LocalConfig) -> Self {
        Self {
            id: Some(id.into()),
            config,
        }
    }

    /// Returns true while an identity token is held.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.id.is_some()
    }
}

/// The four lifecycle transitions every managed resource type offers.
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Create the object and reconcile local state.
    ///
    /// # Errors
    ///
    /// Returns an error wrapped with the operation and resource type.
    async fn create(&self, state: &mut ResourceState) -> Result<()>;

    /// Refresh local state from the remote object.
    ///
    /// # Errors
    ///
    /// Returns an error wrapped with the operation and resource type.
    async fn read(&self, state: &mut ResourceState) -> Result<()>;

    /// Push local changes and reconcile local state.
    ///
    /// # Errors
    ///
    /// Returns an error wrapped with the operation and resource type.
    async fn update(&self, state: &mut ResourceState) -> Result<()>;

    /// Delete the object and clear the identity token.
    ///
    /// # Errors
    ///
    /// Returns an error wrapped with the operation and resource type.
    async fn delete(&self, state: &mut ResourceState) -> Result<()>;
}

/// Orchestrator for one resource type.
#[derive(Clone)]
pub struct Resource {
    spec: &'static ResourceSpec,
    transport: Arc<dyn CmdbTransport>,
    options: RequestOptions,
    import_mode: ImportMode,
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("type_name", &self.spec.type_name)
            .field("options", &self.options)
            .field("import_mode", &self.import_mode)
            .finish_non_exhaustive()
    }
}

impl Resource {
    /// Create an orchestrator with default request options and managed list import.
    #[must_use]
    pub fn new(spec: &'static ResourceSpec, transport: Arc<dyn CmdbTransport>) -> Self {
        Self {
            spec,
            transport,
            options: RequestOptions::new(),
            import_mode: ImportMode::default(),
        }
    }

    /// Create an orchestrator using the options and import mode of a provider configuration.
    #[must_use]
    pub fn from_config(
        spec: &'static ResourceSpec,
        transport: Arc<dyn CmdbTransport>,
        config: &ProviderConfig,
    ) -> Self {
        Self::new(spec, transport)
            .with_options(config.request_options())
            .with_import_mode(config.import_mode)
    }

    /// Override the per-call request options.
    #[must_use]
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Override the list read-back policy.
    #[must_use]
    pub const fn with_import_mode(mut self, mode: ImportMode) -> Self {
        self.import_mode = mode;
        self
    }

    /// The resource declaration.
    #[must_use]
    pub const fn spec(&self) -> &'static ResourceSpec {
        self.spec
    }

    /// Adopt an existing object by identity token and read it with full list import.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] (wrapped) if the object does not exist.
    pub async fn import(&self, id: impl Into<String> + Send) -> Result<ResourceState> {
        let id = id.into();
        let mut state = ResourceState::with_id(id.clone(), LocalConfig::new());

        self.read_with_mode(&mut state, ImportMode::Full).await?;

        if state.is_present() {
            Ok(state)
        } else {
            Err(Error::NotFound(format!("{} `{id}`", self.spec.type_name))
                .for_resource(Operation::Read, self.spec.type_name))
        }
    }

    fn wrap(&self, operation: Operation) -> impl Fn(Error) -> Error + '_ {
        move |err| err.for_resource(operation, self.spec.type_name)
    }

    /// Identity from a create/update response: numeric mkeys as integer text, string mkeys
    /// as given, otherwise the resource type name.
    fn identity_from(&self, response: &Payload) -> String {
        match response.get("mkey") {
            Some(Value::Number(number)) => number
                .as_i64()
                .map(|id| id.to_string())
                .or_else(|| {
                    number
                        .as_f64()
                        .filter(|id| id.fract() == 0.0)
                        .map(|id| format!("{id:.0}"))
                })
                .unwrap_or_else(|| number.to_string()),
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            _ => self.spec.type_name.to_string(),
        }
    }

    async fn read_with_mode(&self, state: &mut ResourceState, mode: ImportMode) -> Result<()> {
        let Some(id) = state.id.clone() else {
            debug!(resource = self.spec.type_name, "read without identity, nothing to do");
            return Ok(());
        };

        let remote = self
            .transport
            .read(self.spec.path, &id, &self.options)
            .await
            .map_err(self.wrap(Operation::Read))?;

        match remote {
            Some(remote) => flatten_resource(self.spec, &remote, &mut state.config, mode)
                .map_err(self.wrap(Operation::Read)),
            None => {
                warn!(
                    resource = self.spec.type_name,
                    id = %id,
                    "object no longer exists remotely, clearing identity"
                );
                state.id = None;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl Lifecycle for Resource {
    async fn create(&self, state: &mut ResourceState) -> Result<()> {
        let payload =
            expand_resource(self.spec, &state.config).map_err(self.wrap(Operation::Create))?;

        let response = self
            .transport
            .create(self.spec.path, &payload, &self.options)
            .await
            .map_err(self.wrap(Operation::Create))?;

        state.id = Some(self.identity_from(&response));
        self.read(state).await
    }

    async fn read(&self, state: &mut ResourceState) -> Result<()> {
        self.read_with_mode(state, self.import_mode).await
    }

    async fn update(&self, state: &mut ResourceState) -> Result<()> {
        let id = state.id.clone().ok_or_else(|| {
            Error::InvalidRequest("no identity token to update".to_string())
                .for_resource(Operation::Update, self.spec.type_name)
        })?;

        let payload =
            expand_resource(self.spec, &state.config).map_err(self.wrap(Operation::Update))?;

        let response = self
            .transport
            .update(self.spec.path, &id, &payload, &self.options)
            .await
            .map_err(self.wrap(Operation::Update))?;

        state.id = Some(self.identity_from(&response));
        self.read(state).await
    }

    async fn delete(&self, state: &mut ResourceState) -> Result<()> {
        let Some(id) = state.id.clone() else {
            return Ok(());
        };

        self.transport
            .delete(self.spec.path, &id, &self.options)
            .await
            .map_err(self.wrap(Operation::Delete))?;

        state.id = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use crate::transport::MockCmdbTransport;
    use serde_json::json;

    const ENTRY_FIELDS: &[FieldSpec] = &[
        FieldSpec::string("pattern", "pattern"),
        FieldSpec::string("action", "action"),
    ];

    static SPEC: ResourceSpec = ResourceSpec {
        type_name: "WebfilterContentHeader",
        path: "webfilter/content-header",
        fields: &[
            FieldSpec::int("fosid", "id").required(),
            FieldSpec::string("name", "name").required(),
            FieldSpec::string("comment", "comment"),
            FieldSpec::list("entries", "entries", ENTRY_FIELDS),
        ],
    };

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    fn resource(mock: MockCmdbTransport) -> Resource {
        Resource::new(&SPEC, Arc::new(mock))
    }

    #[tokio::test]
    async fn create_sets_identity_and_reads_back() {
        let mut mock = MockCmdbTransport::new();
        mock.expect_create()
            .withf(|path, body, _| {
                path == "webfilter/content-header"
                    && Value::Object(body.clone()) == json!({"id": 5, "name": "hdr"})
            })
            .times(1)
            .returning(|_, _, _| Ok(payload(json!({"mkey": 5, "status": "success"}))));
        mock.expect_read()
            .withf(|path, mkey, _| path == "webfilter/content-header" && mkey == "5")
            .times(1)
            .returning(|_, _, _| {
                Ok(Some(payload(json!({"id": 5, "name": "hdr", "comment": "from remote"}))))
            });

        let mut state = ResourceState::new(LocalConfig::new().with("fosid", 5).with("name", "hdr"));
        resource(mock).create(&mut state).await.unwrap();

        assert_eq!(state.id.as_deref(), Some("5"));
        assert_eq!(state.config.get_str("comment"), Some("from remote"));
    }

    #[tokio::test]
    async fn create_falls_back_to_type_name() {
        let mut mock = MockCmdbTransport::new();
        mock.expect_create()
            .returning(|_, _, _| Ok(payload(json!({"status": "success"}))));
        mock.expect_read()
            .withf(|_, mkey, _| mkey == "WebfilterContentHeader")
            .returning(|_, _, _| Ok(Some(Payload::new())));

        let mut state = ResourceState::new(LocalConfig::new().with("name", "hdr"));
        resource(mock).create(&mut state).await.unwrap();

        assert_eq!(state.id.as_deref(), Some("WebfilterContentHeader"));
    }

    #[tokio::test]
    async fn string_and_float_mkeys() {
        let mut mock = MockCmdbTransport::new();
        mock.expect_update()
            .returning(|_, _, _, _| Ok(payload(json!({"mkey": 12.0}))));
        mock.expect_read().returning(|_, _, _| Ok(Some(Payload::new())));
        let orchestrator = resource(mock);

        let mut state = ResourceState::with_id("12", LocalConfig::new());
        orchestrator.update(&mut state).await.unwrap();
        assert_eq!(state.id.as_deref(), Some("12"));

        assert_eq!(
            orchestrator.identity_from(&payload(json!({"mkey": "branch-vpn"}))),
            "branch-vpn"
        );
    }

    #[tokio::test]
    async fn read_not_found_clears_identity_without_flatten() {
        let mut mock = MockCmdbTransport::new();
        mock.expect_read().times(1).returning(|_, _, _| Ok(None));

        let config = LocalConfig::new().with("name", "stale");
        let mut state = ResourceState::with_id("7", config.clone());
        resource(mock).read(&mut state).await.unwrap();

        assert!(state.id.is_none());
        assert_eq!(state.config, config);
    }

    #[tokio::test]
    async fn read_without_identity_is_noop() {
        let mut mock = MockCmdbTransport::new();
        mock.expect_read().times(0);

        let mut state = ResourceState::default();
        resource(mock).read(&mut state).await.unwrap();
        assert!(!state.is_present());
    }

    #[tokio::test]
    async fn read_honours_import_mode() {
        let remote = json!({"name": "hdr", "entries": [{"pattern": "X", "action": "block"}]});

        let mut mock = MockCmdbTransport::new();
        let managed_remote = remote.clone();
        mock.expect_read()
            .returning(move |_, _, _| Ok(Some(payload(managed_remote.clone()))));
        let mut state = ResourceState::with_id("1", LocalConfig::new());
        resource(mock).read(&mut state).await.unwrap();
        assert!(!state.config.is_set("entries"));

        let mut mock = MockCmdbTransport::new();
        mock.expect_read()
            .returning(move |_, _, _| Ok(Some(payload(remote.clone()))));
        let mut state = ResourceState::with_id("1", LocalConfig::new());
        resource(mock)
            .with_import_mode(ImportMode::Full)
            .read(&mut state)
            .await
            .unwrap();
        assert_eq!(state.config.get_list("entries").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_without_identity_fails() {
        let mut mock = MockCmdbTransport::new();
        mock.expect_update().times(0);

        let mut state = ResourceState::new(LocalConfig::new());
        let err = resource(mock).update(&mut state).await.unwrap_err();
        assert!(matches!(err.root_cause(), Error::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn delete_clears_identity() {
        let mut mock = MockCmdbTransport::new();
        mock.expect_delete()
            .withf(|path, mkey, _| path == "webfilter/content-header" && mkey == "5")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut state = ResourceState::with_id(
            "5",
            LocalConfig::new().with("entries", vec![LocalConfig::new().with("pattern", "X")]),
        );
        resource(mock).delete(&mut state).await.unwrap();
        assert!(state.id.is_none());
    }

    #[tokio::test]
    async fn transport_errors_are_wrapped() {
        let mut mock = MockCmdbTransport::new();
        mock.expect_delete()
            .returning(|_, _, _| Err(Error::ServiceUnavailable("down".to_string())));

        let mut state = ResourceState::with_id("5", LocalConfig::new());
        let err = resource(mock).delete(&mut state).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Error deleting WebfilterContentHeader resource: Service unavailable: down"
        );
        assert_eq!(state.id.as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn expand_errors_prevent_network_calls() {
        let mut mock = MockCmdbTransport::new();
        mock.expect_create().times(0);

        let mut state = ResourceState::new(LocalConfig::new().with("fosid", "not a number"));
        let err = resource(mock).create(&mut state).await.unwrap_err();
        assert!(matches!(err.root_cause(), Error::Expand { .. }));
    }

    #[tokio::test]
    async fn request_options_are_passed_per_call() {
        let mut mock = MockCmdbTransport::new();
        mock.expect_read()
            .withf(|_, _, options| options.retries == 4 && options.vdom.as_deref() == Some("dmz"))
            .times(1)
            .returning(|_, _, _| Ok(Some(Payload::new())));

        let mut state = ResourceState::with_id("1", LocalConfig::new());
        resource(mock)
            .with_options(RequestOptions::new().with_retries(4).with_vdom("dmz"))
            .read(&mut state)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn import_reads_lists_in_full() {
        let mut mock = MockCmdbTransport::new();
        mock.expect_read()
            .withf(|_, mkey, _| mkey == "3")
            .returning(|_, _, _| {
                Ok(Some(payload(json!({"id": 3, "name": "x", "entries": [{"pattern": "p"}]}))))
            });

        let state = resource(mock).import("3").await.unwrap();
        assert_eq!(state.id.as_deref(), Some("3"));
        assert_eq!(state.config.get_int("fosid"), Some(3));
        assert_eq!(state.config.get_list("entries").unwrap()[0].get_str("pattern"), Some("p"));
    }

    #[tokio::test]
    async fn import_missing_object_is_not_found() {
        let mut mock = MockCmdbTransport::new();
        mock.expect_read().returning(|_, _, _| Ok(None));

        let err = resource(mock).import("404").await.unwrap_err();
        assert!(matches!(err.root_cause(), Error::NotFound(_)));
    }
}
