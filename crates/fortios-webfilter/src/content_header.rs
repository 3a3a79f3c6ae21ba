//! `webfilter/content-header` resource.

use std::sync::Arc;

use fortios_core::{CmdbTransport, FieldSpec, LocalConfig, Resource, ResourceSpec};

/// Actions an entry may take on a matching content type.
pub const ENTRY_ACTIONS: &[&str] = &["block", "allow", "exempt"];

const ENTRY_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("pattern", "pattern").len(0, 31),
    FieldSpec::string("action", "action").one_of(ENTRY_ACTIONS),
    FieldSpec::string("category", "category"),
];

/// Schema of a web filter content header list.
pub static CONTENT_HEADER: ResourceSpec = ResourceSpec {
    type_name: "WebfilterContentHeader",
    path: "webfilter/content-header",
    fields: &[
        FieldSpec::int("fosid", "id").required(),
        FieldSpec::string("name", "name").len(0, 35).required(),
        FieldSpec::string("comment", "comment").len(0, 255),
        FieldSpec::list("entries", "entries", ENTRY_FIELDS),
    ],
};

/// Orchestrator for content header lists.
#[must_use]
pub fn content_header(transport: Arc<dyn CmdbTransport>) -> Resource {
    Resource::new(&CONTENT_HEADER, transport)
}

/// One element of the `entries` block. Unset members stay unset in the local tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentHeaderEntry {
    /// Content type regular expression
    pub pattern: Option<String>,
    /// `block`, `allow` or `exempt`
    pub action: Option<String>,
    /// Space separated category IDs
    pub category: Option<String>,
}

impl ContentHeaderEntry {
    /// Entry matching `pattern`.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// Set the action.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Set the categories.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Read an entry back out of a local block.
    #[must_use]
    pub fn from_config(config: &LocalConfig) -> Self {
        let get = |name| config.get_str(name).map(ToString::to_string);
        Self {
            pattern: get("pattern"),
            action: get("action"),
            category: get("category"),
        }
    }
}

impl From<ContentHeaderEntry> for LocalConfig {
    fn from(entry: ContentHeaderEntry) -> Self {
        let mut config = Self::new();
        for (name, value) in [
            ("pattern", entry.pattern),
            ("action", entry.action),
            ("category", entry.category),
        ] {
            if let Some(value) = value {
                config.set(name, value);
            }
        }
        config
    }
}
