//! Static schema declarations.
//!
//! Every resource type exposes one [`ResourceSpec`]: an ordered list of [`FieldSpec`]
//! entries pairing the local (underscore) field name with the remote (hyphenated) key,
//! plus the validation metadata the caller may check before any network call. Nested
//! blocks are declared as list fields carrying their own field slice.
//!
//! Declarations are `const` and never mutated at runtime:
//!
//! ```
//! use fortios_core::schema::FieldSpec;
//!
//! const ENTRY: &[FieldSpec] = &[FieldSpec::string("pattern", "pattern").len(0, 31)];
//! const FIELDS: &[FieldSpec] = &[
//!     FieldSpec::int("fosid", "id").required(),
//!     FieldSpec::list("entries", "entries", ENTRY),
//! ];
//! assert_eq!(FIELDS[0].remote, "id");
//! ```

use crate::error::{Error, Result};
use crate::state::{Attr, LocalConfig};

/// Value kind and the validation rule attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Integer, optionally bounded (inclusive)
    Int {
        /// Inclusive `(min, max)` range
        range: Option<(i64, i64)>,
    },
    /// String, optionally length-bounded (inclusive, in characters)
    Str {
        /// Inclusive `(min, max)` length
        len: Option<(usize, usize)>,
    },
    /// String restricted to a fixed set of values
    Enum(&'static [&'static str]),
    /// Ordered list of nested blocks
    List(&'static [FieldSpec]),
}

/// Whether the caller must supply a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be set
    Required,
    /// May be set; when unset the appliance default applies
    Optional,
}

/// Per-field secret handling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensitivity {
    /// Ordinary value
    Plain,
    /// Secret whose read-back is a masked placeholder
    Masked,
    /// Secret the appliance never returns
    WriteOnly,
}

/// Declaration of one configuration attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Local field name (underscore separated)
    pub name: &'static str,
    /// Remote API key (usually hyphen separated)
    pub remote: &'static str,
    /// Kind and validation rule
    pub kind: FieldKind,
    /// Required or optional
    pub presence: Presence,
    /// Secret policy
    pub sensitivity: Sensitivity,
}

impl FieldSpec {
    const fn new(name: &'static str, remote: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            remote,
            kind,
            presence: Presence::Optional,
            sensitivity: Sensitivity::Plain,
        }
    }

    /// Declare an integer field.
    #[must_use]
    pub const fn int(name: &'static str, remote: &'static str) -> Self {
        Self::new(name, remote, FieldKind::Int { range: None })
    }

    /// Declare a string field.
    #[must_use]
    pub const fn string(name: &'static str, remote: &'static str) -> Self {
        Self::new(name, remote, FieldKind::Str { len: None })
    }

    /// Declare a nested-list field.
    #[must_use]
    pub const fn list(
        name: &'static str,
        remote: &'static str,
        fields: &'static [FieldSpec],
    ) -> Self {
        Self::new(name, remote, FieldKind::List(fields))
    }

    /// Bound an integer field (inclusive). No effect on other kinds.
    #[must_use]
    pub const fn range(mut self, min: i64, max: i64) -> Self {
        if let FieldKind::Int { .. } = self.kind {
            self.kind = FieldKind::Int {
                range: Some((min, max)),
            };
        }
        self
    }

    /// Bound a string field length (inclusive). No effect on other kinds.
    #[must_use]
    pub const fn len(mut self, min: usize, max: usize) -> Self {
        if let FieldKind::Str { .. } = self.kind {
            self.kind = FieldKind::Str {
                len: Some((min, max)),
            };
        }
        self
    }

    /// Restrict a string field to a fixed set of values.
    #[must_use]
    pub const fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.kind = FieldKind::Enum(values);
        self
    }

    /// Mark the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    /// Mark the field as a secret read back as a masked placeholder.
    #[must_use]
    pub const fn secret(mut self) -> Self {
        self.sensitivity = Sensitivity::Masked;
        self
    }

    /// Mark the field as a secret the appliance never returns.
    #[must_use]
    pub const fn write_only(mut self) -> Self {
        self.sensitivity = Sensitivity::WriteOnly;
        self
    }

    /// Returns true for nested-list fields.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self.kind, FieldKind::List(_))
    }

    /// Returns true when the field holds a secret.
    #[must_use]
    pub const fn is_secret(&self) -> bool {
        !matches!(self.sensitivity, Sensitivity::Plain)
    }
}

/// Declaration of one remote object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Resource type name, used in errors and as the fallback identity token
    pub type_name: &'static str,
    /// CMDB path below `/api/v2/cmdb/` (e.g. `webfilter/content-header`)
    pub path: &'static str,
    /// Top-level fields in declaration order
    pub fields: &'static [FieldSpec],
}

impl ResourceSpec {
    /// Look up a top-level field by local name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Check a configuration against the declared constraints.
    ///
    /// Reports every violation in one [`Error::ValidationError`]. Undeclared attributes are
    /// rejected as well.
    ///
    /// # Errors
    ///
    /// Returns an error listing all violations.
    pub fn validate(&self, config: &LocalConfig) -> Result<()> {
        let mut violations = Vec::new();
        validate_block(self.fields, config, "", &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(Error::ValidationError(format!(
                "{}: {}",
                self.type_name,
                violations.join("; ")
            )))
        }
    }
}

/// Join a field name onto a diagnostic path prefix.
#[must_use]
pub fn field_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn validate_block(
    fields: &[FieldSpec],
    config: &LocalConfig,
    prefix: &str,
    violations: &mut Vec<String>,
) {
    for field in fields {
        let path = field_path(prefix, field.name);
        match config.get(field.name) {
            None => {
                if field.presence == Presence::Required {
                    violations.push(format!("{path} is required"));
                }
            }
            Some(attr) => validate_attr(field, attr, &path, violations),
        }
    }

    for (name, _) in config.iter() {
        if !fields.iter().any(|field| field.name == name) {
            violations.push(format!("{} is not a declared field", field_path(prefix, name)));
        }
    }
}

fn validate_attr(field: &FieldSpec, attr: &Attr, path: &str, violations: &mut Vec<String>) {
    match (field.kind, attr) {
        (FieldKind::Int { range }, Attr::Int(value)) => {
            if let Some((min, max)) = range {
                if *value < min || *value > max {
                    violations.push(format!("{path} must be between {min} and {max}, got {value}"));
                }
            }
        }
        (FieldKind::Str { len }, Attr::Str(value)) => check_len(len, value, path, violations),
        (FieldKind::Str { len }, Attr::Secret(value)) if field.is_secret() => {
            check_len(len, value.expose(), path, violations);
        }
        (FieldKind::Enum(allowed), Attr::Str(value)) => {
            if !allowed.contains(&value.as_str()) {
                violations.push(format!(
                    "{path} must be one of [{}], got `{value}`",
                    allowed.join(", ")
                ));
            }
        }
        (FieldKind::List(sub_fields), Attr::List(items)) => {
            for (index, item) in items.iter().enumerate() {
                validate_block(sub_fields, item, &field_path(path, &index.to_string()), violations);
            }
        }
        (kind, attr) => violations.push(format!(
            "{path} expects {}, got {}",
            kind_name(kind),
            attr.kind_name()
        )),
    }
}

fn check_len(len: Option<(usize, usize)>, value: &str, path: &str, violations: &mut Vec<String>) {
    if let Some((min, max)) = len {
        let count = value.chars().count();
        if count < min || count > max {
            violations.push(format!(
                "{path} length must be between {min} and {max}, got {count}"
            ));
        }
    }
}

const fn kind_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Int { .. } => "integer",
        FieldKind::Str { .. } => "string",
        FieldKind::Enum(_) => "enum",
        FieldKind::List(_) => "list",
    }
}
