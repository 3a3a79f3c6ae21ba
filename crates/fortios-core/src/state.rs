//! Local configuration tree.
//!
//! A [`LocalConfig`] holds the caller's view of one object (or one nested block) keyed by
//! local field name. A missing key means the field is unset; there is no zero-value
//! stand-in for absence.

use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::fmt;

/// Secret attribute value. Never printed by `Debug`.
pub struct SecretValue(SecretString);

impl SecretValue {
    /// Wrap a plaintext secret.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// Access the plaintext value.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SecretValue {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl PartialEq for SecretValue {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue([REDACTED])")
    }
}

/// One attribute of a local configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Attr {
    /// Integer scalar
    Int(i64),
    /// String or enum-as-string scalar
    Str(String),
    /// Sensitive string scalar
    Secret(SecretValue),
    /// Ordered list of nested blocks
    List(Vec<LocalConfig>),
}

impl Attr {
    /// Short name of the attribute kind, for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Str(_) => "string",
            Self::Secret(_) => "secret",
            Self::List(_) => "list",
        }
    }
}

impl From<i64> for Attr {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Attr {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Attr {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for Attr {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Attr {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<SecretValue> for Attr {
    fn from(value: SecretValue) -> Self {
        Self::Secret(value)
    }
}

impl From<Vec<LocalConfig>> for Attr {
    fn from(value: Vec<LocalConfig>) -> Self {
        Self::List(value)
    }
}

/// Typed configuration tree conforming to a resource or block schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalConfig {
    attrs: BTreeMap<String, Attr>,
}

impl LocalConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            attrs: BTreeMap::new(),
        }
    }

    /// Set an attribute, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Attr>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a secret attribute, builder style.
    #[must_use]
    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, SecretValue::new(value));
        self
    }

    /// Set an attribute.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Attr>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Remove an attribute, returning its previous value.
    pub fn unset(&mut self, name: &str) -> Option<Attr> {
        self.attrs.remove(name)
    }

    /// Returns true if the attribute is explicitly set.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Returns true if no attribute is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Number of set attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Raw attribute access.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attr> {
        self.attrs.get(name)
    }

    /// Integer attribute access.
    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.attrs.get(name) {
            Some(Attr::Int(value)) => Some(*value),
            _ => None,
        }
    }

    /// String attribute access. Secrets are not returned here.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.attrs.get(name) {
            Some(Attr::Str(value)) => Some(value),
            _ => None,
        }
    }

    /// Secret attribute access.
    #[must_use]
    pub fn get_secret(&self, name: &str) -> Option<&SecretValue> {
        match self.attrs.get(name) {
            Some(Attr::Secret(value)) => Some(value),
            _ => None,
        }
    }

    /// Nested list access.
    #[must_use]
    pub fn get_list(&self, name: &str) -> Option<&[LocalConfig]> {
        match self.attrs.get(name) {
            Some(Attr::List(items)) => Some(items),
            _ => None,
        }
    }

    /// Iterate over set attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attr)> {
        self.attrs.iter().map(|(name, attr)| (name.as_str(), attr))
    }
}
