//! Provider configuration.
//!
//! [`ProviderConfig`] describes how to reach one FortiOS appliance. It can be built in code,
//! deserialized, or loaded from `FORTIOS_*` environment variables, and produces both the
//! HTTP client and the per-call [`RequestOptions`].

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

use crate::client::{ClientConfig, CmdbClient, CmdbClientBuilder, FORTIOS_DEFAULT_TIMEOUT};
use crate::error::{Error, Result};
use crate::transport::{RequestOptions, DEFAULT_RETRIES};
use crate::types::ImportMode;

/// Appliance address (host or URL)
pub const ENV_HOSTNAME: &str = "FORTIOS_ACCESS_HOSTNAME";
/// REST API administrator token
pub const ENV_TOKEN: &str = "FORTIOS_ACCESS_TOKEN";
/// Skip TLS verification (`true`/`false`)
pub const ENV_INSECURE: &str = "FORTIOS_INSECURE";
/// PEM CA bundle path
pub const ENV_CA_BUNDLE: &str = "FORTIOS_CA_CABUNDLE";
/// Virtual domain
pub const ENV_VDOM: &str = "FORTIOS_VDOM";
/// Retry count
pub const ENV_RETRIES: &str = "FORTIOS_RETRIES";
/// List read-back policy (`false`/`managed` or `true`/`full`)
pub const ENV_IMPORT_TABLE: &str = "FORTIOS_IMPORT_TABLE";

/// Connection settings for one FortiOS appliance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProviderConfig {
    /// Appliance host name, IP address or `https://` URL
    #[validate(length(min = 1))]
    pub hostname: String,

    /// REST API token. Never serialized, redacted in `Debug`.
    #[serde(default, skip_serializing)]
    pub token: Option<SecretString>,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,

    /// Optional PEM CA bundle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cabundlefile: Option<PathBuf>,

    /// Virtual domain for every call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vdom: Option<String>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Additional attempts after a transient failure
    #[validate(range(min = 0, max = 10))]
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// How list fields are read back
    #[serde(default)]
    pub import_mode: ImportMode,
}

const fn default_request_timeout_secs() -> u64 {
    FORTIOS_DEFAULT_TIMEOUT
}

const fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

impl ProviderConfig {
    /// Create a configuration for `hostname` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn new(hostname: impl Into<String>) -> Result<Self> {
        let config = Self {
            hostname: hostname.into(),
            token: None,
            insecure: false,
            cabundlefile: None,
            vdom: None,
            request_timeout_secs: default_request_timeout_secs(),
            retries: default_retries(),
            import_mode: ImportMode::default(),
        };
        config.check()?;
        Ok(config)
    }

    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the hostname is missing or a value cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the hostname is missing or a value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let hostname = get(ENV_HOSTNAME)
            .ok_or_else(|| Error::ConfigError(format!("{ENV_HOSTNAME} is not set")))?;
        let mut config = Self::new(hostname)?;

        config.token = get(ENV_TOKEN).map(SecretString::from);
        config.cabundlefile = get(ENV_CA_BUNDLE).map(PathBuf::from);
        config.vdom = get(ENV_VDOM);
        if let Some(value) = get(ENV_INSECURE) {
            config.insecure = parse_var(ENV_INSECURE, &value)?;
        }
        if let Some(value) = get(ENV_RETRIES) {
            config.retries = parse_var(ENV_RETRIES, &value)?;
        }
        if let Some(value) = get(ENV_IMPORT_TABLE) {
            config.import_mode = value.parse()?;
        }

        config.check()?;
        Ok(config)
    }

    /// Set the API token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Skip TLS verification.
    #[must_use]
    pub const fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Trust a PEM CA bundle.
    #[must_use]
    pub fn with_cabundlefile(mut self, path: impl Into<PathBuf>) -> Self {
        self.cabundlefile = Some(path.into());
        self
    }

    /// Target a virtual domain.
    #[must_use]
    pub fn with_vdom(mut self, vdom: impl Into<String>) -> Self {
        self.vdom = Some(vdom.into());
        self
    }

    /// Set the retry count.
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set the list read-back policy.
    #[must_use]
    pub const fn with_import_mode(mut self, mode: ImportMode) -> Self {
        self.import_mode = mode;
        self
    }

    /// Request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Base URL of the appliance. A bare host is reached over HTTPS.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self.hostname.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        }
    }

    /// Options to pass with every call.
    #[must_use]
    pub fn request_options(&self) -> RequestOptions {
        let options = RequestOptions::new().with_retries(self.retries);
        match &self.vdom {
            Some(vdom) => options.with_vdom(vdom.clone()),
            None => options,
        }
    }

    /// Build the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the CA bundle cannot be loaded or
    /// the client cannot be constructed.
    pub fn build_client(&self) -> Result<CmdbClient> {
        self.check()?;

        let mut builder = CmdbClientBuilder::new(self.base_url())?
            .with_http_config(ClientConfig::new().with_timeout(self.timeout()))
            .with_insecure(self.insecure);

        if let Some(token) = &self.token {
            builder = builder.with_token(token.expose_secret());
        }
        if let Some(path) = &self.cabundlefile {
            builder = builder.with_ca_bundle(path.clone());
        }

        builder.build()
    }

    fn check(&self) -> Result<()> {
        self.validate()?;
        Ok(())
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::ConfigError(format!("Invalid value `{value}` for {key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = ProviderConfig::new("192.168.1.99").unwrap();
        assert_eq!(config.request_timeout_secs, 20);
        assert_eq!(config.retries, 1);
        assert_eq!(config.import_mode, ImportMode::Managed);
        assert!(!config.insecure);
        assert_eq!(config.base_url(), "https://192.168.1.99");
    }

    #[test]
    fn test_empty_hostname_rejected() {
        let err = ProviderConfig::new("").unwrap_err();
        assert!(matches!(err, Error::ValidationError(ref msg) if msg.contains("hostname")));
    }

    #[test]
    fn test_base_url_keeps_scheme() {
        let config = ProviderConfig::new("http://127.0.0.1:8080/").unwrap();
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = ProviderConfig::from_lookup(lookup(&[
            (ENV_HOSTNAME, "fgt.example.com"),
            (ENV_TOKEN, "abc"),
            (ENV_INSECURE, "true"),
            (ENV_CA_BUNDLE, "/etc/ssl/fortios.pem"),
            (ENV_VDOM, "root"),
            (ENV_RETRIES, "3"),
            (ENV_IMPORT_TABLE, "true"),
        ]))
        .unwrap();

        assert_eq!(config.hostname, "fgt.example.com");
        assert_eq!(
            config.token.as_ref().map(ExposeSecret::expose_secret),
            Some("abc")
        );
        assert!(config.insecure);
        assert_eq!(
            config.cabundlefile,
            Some(PathBuf::from("/etc/ssl/fortios.pem"))
        );
        assert_eq!(config.vdom.as_deref(), Some("root"));
        assert_eq!(config.retries, 3);
        assert_eq!(config.import_mode, ImportMode::Full);
    }

    #[test]
    fn test_from_lookup_requires_hostname() {
        let err = ProviderConfig::from_lookup(lookup(&[(ENV_TOKEN, "abc")])).unwrap_err();
        assert_eq!(
            err,
            Error::ConfigError("FORTIOS_ACCESS_HOSTNAME is not set".to_string())
        );
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = ProviderConfig::from_lookup(lookup(&[
            (ENV_HOSTNAME, "fgt"),
            (ENV_RETRIES, "many"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));

        let err = ProviderConfig::from_lookup(lookup(&[
            (ENV_HOSTNAME, "fgt"),
            (ENV_RETRIES, "11"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
    }

    #[test]
    fn test_request_options_carry_retries_and_vdom() {
        let options = ProviderConfig::new("fgt")
            .unwrap()
            .with_retries(4)
            .with_vdom("branch")
            .request_options();
        assert_eq!(options, RequestOptions::new().with_retries(4).with_vdom("branch"));
    }

    #[test]
    fn test_token_is_redacted_and_not_serialized() {
        let config = ProviderConfig::new("fgt").unwrap().with_token("secret-token");
        assert!(!format!("{config:?}").contains("secret-token"));

        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("token").is_none());
        assert_eq!(json["import_mode"], "managed");
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: ProviderConfig =
            serde_json::from_str(r#"{"hostname": "fgt", "import_mode": "full"}"#).unwrap();
        assert_eq!(config.retries, DEFAULT_RETRIES);
        assert_eq!(config.request_timeout_secs, FORTIOS_DEFAULT_TIMEOUT);
        assert_eq!(config.import_mode, ImportMode::Full);
    }

    #[test]
    fn test_build_client() {
        let client = ProviderConfig::new("fgt.example.com")
            .unwrap()
            .with_token("abc")
            .build_client()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "https://fgt.example.com/");
    }

    #[test]
    fn test_build_client_rejects_invalid_timeout() {
        let err = ProviderConfig::new("fgt")
            .unwrap()
            .with_timeout(0)
            .build_client()
            .unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
    }

    #[test]
    fn test_missing_ca_bundle_is_config_error() {
        let err = ProviderConfig::new("fgt")
            .unwrap()
            .with_cabundlefile("/nonexistent/fortios-ca.pem")
            .build_client()
            .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
