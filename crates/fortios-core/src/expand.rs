//! Local → remote marshalling.
//!
//! Walks a [`LocalConfig`] in schema order and builds the remote payload using each
//! field's remote key. Unset fields are omitted from the payload rather than sent as
//! `null`.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::schema::{field_path, FieldKind, FieldSpec, ResourceSpec};
use crate::state::{Attr, LocalConfig};
use crate::transport::Payload;

/// Build the request payload for a whole resource.
///
/// # Errors
///
/// Returns [`Error::Expand`] when an attribute does not have the declared kind.
pub fn expand_resource(spec: &ResourceSpec, config: &LocalConfig) -> Result<Payload> {
    expand_block(spec.fields, config, "")
}

/// Build the payload fragment for one block. `prefix` is only used in error paths.
///
/// # Errors
///
/// Returns [`Error::Expand`] when an attribute does not have the declared kind.
pub fn expand_block(fields: &[FieldSpec], config: &LocalConfig, prefix: &str) -> Result<Payload> {
    let mut payload = Payload::new();

    for field in fields {
        let Some(attr) = config.get(field.name) else {
            continue;
        };
        let path = field_path(prefix, field.name);
        if let Some(value) = expand_field(field, attr, &path)? {
            payload.insert(field.remote.to_string(), value);
        }
    }

    Ok(payload)
}

fn expand_field(field: &FieldSpec, attr: &Attr, path: &str) -> Result<Option<Value>> {
    match (field.kind, attr) {
        (FieldKind::Int { .. }, Attr::Int(value)) => Ok(Some(Value::from(*value))),
        (FieldKind::Str { .. } | FieldKind::Enum(_), Attr::Str(value)) => {
            Ok(Some(Value::String(value.clone())))
        }
        (FieldKind::Str { .. }, Attr::Secret(value)) => {
            Ok(Some(Value::String(value.expose().to_string())))
        }
        (FieldKind::List(sub_fields), Attr::List(items)) => expand_list(sub_fields, items, path),
        (_, attr) => Err(Error::Expand {
            field: path.to_string(),
            message: format!("unexpected {} value", attr.kind_name()),
        }),
    }
}

/// An empty list and a list whose first block expands to nothing both mean "unset": the
/// field is omitted, so an explicitly empty list cannot be told apart from an absent one.
fn expand_list(fields: &[FieldSpec], items: &[LocalConfig], path: &str) -> Result<Option<Value>> {
    let mut result = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let element = expand_block(fields, item, &field_path(path, &index.to_string()))?;
        if index == 0 && element.is_empty() {
            return Ok(None);
        }
        result.push(Value::Object(element));
    }

    if result.is_empty() {
        return Ok(None);
    }
    Ok(Some(Value::Array(result)))
}
