//! Remote → local marshalling.
//!
//! Refreshes a [`LocalConfig`] from a remote payload. Scalars present in the payload are
//! always overwritten; nested lists follow the [`ImportMode`] policy. Keys the schema does
//! not declare are ignored.

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::{field_path, FieldKind, FieldSpec, ResourceSpec, Sensitivity};
use crate::state::{Attr, LocalConfig, SecretValue};
use crate::transport::Payload;
use crate::types::ImportMode;

/// Prefix FortiOS puts in front of encrypted secrets it echoes back.
pub const ENCRYPTED_SECRET_PREFIX: &str = "ENC ";

/// Why a remote value could not be written into local state.
#[derive(Debug, Clone, PartialEq, Eq)]
enum WriteError {
    /// Value has the wrong JSON type for the declared kind
    Mismatch(String),
    /// Masked placeholder offered for a secret field
    MaskedSecret,
}

impl WriteError {
    fn into_error(self, path: &str) -> Error {
        let message = match self {
            Self::Mismatch(message) => message,
            Self::MaskedSecret => "masked secret cannot be stored".to_string(),
        };
        Error::FieldWrite {
            field: path.to_string(),
            message,
        }
    }
}

/// Returns true when a remote value is the placeholder FortiOS returns instead of a
/// secret: an `ENC ...` blob or a run of asterisks.
#[must_use]
pub fn is_masked_secret(value: &Value) -> bool {
    match value {
        Value::String(text) => {
            text.starts_with(ENCRYPTED_SECRET_PREFIX)
                || (!text.is_empty() && text.chars().all(|c| c == '*'))
        }
        _ => false,
    }
}

/// Refresh a whole resource from its remote payload.
///
/// # Errors
///
/// Returns [`Error::FieldWrite`] naming the first field whose remote value cannot be
/// stored, unless the field's policy suppresses that failure.
pub fn flatten_resource(
    spec: &ResourceSpec,
    remote: &Payload,
    config: &mut LocalConfig,
    mode: ImportMode,
) -> Result<()> {
    for field in spec.fields {
        let value = remote.get(field.remote).unwrap_or(&Value::Null);
        flatten_top_level(field, value, config, mode)?;
    }
    Ok(())
}

fn flatten_top_level(
    field: &FieldSpec,
    value: &Value,
    config: &mut LocalConfig,
    mode: ImportMode,
) -> Result<()> {
    if field.sensitivity == Sensitivity::WriteOnly {
        return Ok(());
    }

    if let FieldKind::List(sub_fields) = field.kind {
        if !mode.overwrites_lists() && !config.is_set(field.name) {
            return Ok(());
        }
        return match flatten_list(sub_fields, value, field.name)? {
            Some(items) => {
                config.set(field.name, items);
                Ok(())
            }
            None => {
                config.unset(field.name);
                Ok(())
            }
        };
    }

    write_scalar(field, value, config, field.name)
}

/// Store one scalar, applying the per-field suppression policy on failure.
fn write_scalar(
    field: &FieldSpec,
    value: &Value,
    config: &mut LocalConfig,
    path: &str,
) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }

    match to_attr(field, value) {
        Ok(attr) => {
            config.set(field.name, attr);
            Ok(())
        }
        Err(_) if write_error_suppressed(field, value) => {
            debug!(field = path, "keeping local value for masked secret");
            Ok(())
        }
        Err(err) => Err(err.into_error(path)),
    }
}

/// The only suppressed failure: a masked secret field receiving its placeholder.
fn write_error_suppressed(field: &FieldSpec, value: &Value) -> bool {
    field.sensitivity == Sensitivity::Masked && is_masked_secret(value)
}

fn to_attr(field: &FieldSpec, value: &Value) -> std::result::Result<Attr, WriteError> {
    match field.kind {
        FieldKind::Int { .. } => to_int(value).map(Attr::Int),
        FieldKind::Str { .. } | FieldKind::Enum(_) => {
            let text = to_text(value)?;
            match field.sensitivity {
                Sensitivity::Plain => Ok(Attr::Str(text)),
                _ if is_masked_secret(value) => Err(WriteError::MaskedSecret),
                _ => Ok(Attr::Secret(SecretValue::new(text))),
            }
        }
        FieldKind::List(_) => Err(WriteError::Mismatch(
            "nested list in scalar position".to_string(),
        )),
    }
}

fn to_int(value: &Value) -> std::result::Result<i64, WriteError> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|float| float.fract() == 0.0 && fits_i64(*float))
                    .map(|float| float as i64)
            })
            .ok_or_else(|| WriteError::Mismatch(format!("expected integer, got {number}"))),
        other => Err(WriteError::Mismatch(format!(
            "expected integer, got {}",
            json_type(other)
        ))),
    }
}

/// `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
#[allow(clippy::cast_precision_loss)]
fn fits_i64(float: f64) -> bool {
    float >= i64::MIN as f64 && float < i64::MAX as f64
}

fn to_text(value: &Value) -> std::result::Result<String, WriteError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(WriteError::Mismatch(format!(
            "expected string, got {}",
            json_type(other)
        ))),
    }
}

/// A null value, an empty array or an array whose first element is null all flatten to
/// `None`, mirroring the expand-side rule.
fn flatten_list(
    fields: &[FieldSpec],
    value: &Value,
    path: &str,
) -> Result<Option<Vec<LocalConfig>>> {
    let items = match value {
        Value::Null => return Ok(None),
        Value::Array(items) => items,
        other => {
            return Err(Error::FieldWrite {
                field: path.to_string(),
                message: format!("expected list, got {}", json_type(other)),
            });
        }
    };

    match items.first() {
        None | Some(Value::Null) => return Ok(None),
        Some(_) => {}
    }

    let mut result = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let element_path = field_path(path, &index.to_string());
        let Value::Object(remote) = item else {
            return Err(Error::FieldWrite {
                field: element_path,
                message: format!("expected object, got {}", json_type(item)),
            });
        };
        result.push(flatten_element(fields, remote, &element_path)?);
    }

    Ok(Some(result))
}

/// Each element starts from scratch: declared fields missing remotely stay unset.
fn flatten_element(fields: &[FieldSpec], remote: &Payload, prefix: &str) -> Result<LocalConfig> {
    let mut element = LocalConfig::new();

    for field in fields {
        let Some(value) = remote.get(field.remote) else {
            continue;
        };
        let path = field_path(prefix, field.name);
        match field.kind {
            FieldKind::List(sub_fields) => {
                if let Some(items) = flatten_list(sub_fields, value, &path)? {
                    element.set(field.name, items);
                }
            }
            _ if field.sensitivity == Sensitivity::WriteOnly => {}
            _ => write_scalar(field, value, &mut element, &path)?,
        }
    }

    Ok(element)
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
