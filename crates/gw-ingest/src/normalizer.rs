//! Field-level normalization for drifting upstream JSON.
//!
//! The stats API changes the JSON encoding of the same field between releases
//! (an experience value is an integer for one profession and a fraction for
//! another, and swaps between the two across API versions). Everything here
//! accepts any numeric encoding and folds it into one Rust type, so the
//! parser stays uniform.
//!
//! Rules shared by every accessor:
//! - absent or `null` means "not reported" and yields the empty/zero form;
//! - a value of the wrong JSON type is a [`SchemaError`], never silently zero.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{json_type, SchemaError};

// ---------------------------------------------------------------------------
// Scalar conversion
// ---------------------------------------------------------------------------

/// Fold an integer or fractional JSON number into `f64`.
///
/// Integers wider than 53 bits lose precision on the way to `f64`; that is
/// accepted, not reported. Fractional values keep their full precision.
pub fn numeric(field: &str, v: Option<&Value>) -> Result<f64, SchemaError> {
    match v {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| SchemaError::OutOfRange {
            field: field.to_string(),
            value: n.to_string(),
        }),
        Some(other) => Err(SchemaError::NotNumeric {
            field: field.to_string(),
            found: json_type(other),
        }),
    }
}

/// Counter accessor. Integral encodings are exact; a fractional encoding is
/// truncated toward zero.
pub fn count(field: &str, v: Option<&Value>) -> Result<i64, SchemaError> {
    match v {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            if let Some(u) = n.as_u64() {
                return i64::try_from(u).map_err(|_| SchemaError::OutOfRange {
                    field: field.to_string(),
                    value: u.to_string(),
                });
            }
            let f = numeric(field, v)?;
            if !f.is_finite() || f >= i64::MAX as f64 || f <= i64::MIN as f64 {
                return Err(SchemaError::OutOfRange {
                    field: field.to_string(),
                    value: n.to_string(),
                });
            }
            Ok(f.trunc() as i64)
        }
        Some(other) => Err(SchemaError::NotNumeric {
            field: field.to_string(),
            found: json_type(other),
        }),
    }
}

/// Level accessor: a non-negative counter that fits in `u32`.
pub fn level(field: &str, v: Option<&Value>) -> Result<u32, SchemaError> {
    let raw = count(field, v)?;
    u32::try_from(raw).map_err(|_| SchemaError::OutOfRange {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// Optional string. Empty strings read as absent.
pub fn text(field: &str, v: Option<&Value>) -> Result<Option<String>, SchemaError> {
    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(wrong_type(field, "string", other)),
    }
}

pub fn flag(field: &str, v: Option<&Value>) -> Result<bool, SchemaError> {
    match v {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(wrong_type(field, "bool", other)),
    }
}

/// Optional RFC 3339 instant, converted to UTC.
pub fn instant(field: &str, v: Option<&Value>) -> Result<Option<DateTime<Utc>>, SchemaError> {
    let Some(raw) = text(field, v)? else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|_| SchemaError::InvalidInstant {
            field: field.to_string(),
            raw,
        })
}

fn wrong_type(field: &str, expected: &'static str, found: &Value) -> SchemaError {
    SchemaError::WrongType {
        field: field.to_string(),
        expected,
        found: json_type(found),
    }
}

// ---------------------------------------------------------------------------
// Object reader
// ---------------------------------------------------------------------------

/// Read-only view over one JSON object that tracks its path for error
/// messages (e.g. `data[0].characters.abc.professions.combat.xp`).
///
/// An absent or `null` object is represented as an empty view: every
/// accessor on it yields the empty/zero form.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    path: String,
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Fields<'a> {
    /// Top-level view. The document root must be an object.
    pub fn root(v: &'a Value) -> Result<Self, SchemaError> {
        match v {
            Value::Object(map) => Ok(Self {
                path: String::new(),
                map: Some(map),
            }),
            other => Err(SchemaError::Malformed {
                reason: format!("top level must be an object, found {}", json_type(other)),
            }),
        }
    }

    /// View over `v` located at `path`.
    pub fn at(path: impl Into<String>, v: Option<&'a Value>) -> Result<Self, SchemaError> {
        let path = path.into();
        match v {
            None | Some(Value::Null) => Ok(Self { path, map: None }),
            Some(Value::Object(map)) => Ok(Self {
                path,
                map: Some(map),
            }),
            Some(other) => Err(wrong_type(&path, "object", other)),
        }
    }

    /// `false` when upstream omitted the object or sent `null`.
    pub fn is_present(&self) -> bool {
        self.map.is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_null())
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.and_then(|m| m.get(key))
    }

    /// Dotted path of `key` under this object.
    pub fn field(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    pub fn child(&self, key: &str) -> Result<Fields<'a>, SchemaError> {
        Fields::at(self.field(key), self.get(key))
    }

    /// Array under `key`; absent or `null` reads as empty.
    pub fn array(&self, key: &str) -> Result<&'a [Value], SchemaError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => Err(wrong_type(&self.field(key), "array", other)),
        }
    }

    /// Key/value pairs of this object, in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
        self.map.into_iter().flat_map(|m| m.iter())
    }

    pub fn numeric(&self, key: &str) -> Result<f64, SchemaError> {
        numeric(&self.field(key), self.get(key))
    }

    pub fn count(&self, key: &str) -> Result<i64, SchemaError> {
        count(&self.field(key), self.get(key))
    }

    pub fn level(&self, key: &str) -> Result<u32, SchemaError> {
        level(&self.field(key), self.get(key))
    }

    pub fn text(&self, key: &str) -> Result<Option<String>, SchemaError> {
        text(&self.field(key), self.get(key))
    }

    pub fn flag(&self, key: &str) -> Result<bool, SchemaError> {
        flag(&self.field(key), self.get(key))
    }

    pub fn instant(&self, key: &str) -> Result<Option<DateTime<Utc>>, SchemaError> {
        instant(&self.field(key), self.get(key))
    }

    /// Required, non-empty string.
    pub fn required_text(&self, key: &str) -> Result<String, SchemaError> {
        self.text(key)?.ok_or_else(|| SchemaError::MissingField {
            field: self.field(key),
        })
    }

    /// Required uuid, hyphenated or simple form.
    pub fn required_uuid(&self, key: &str) -> Result<Uuid, SchemaError> {
        let raw = self.required_text(key)?;
        Uuid::parse_str(raw.trim()).map_err(|_| SchemaError::InvalidUuid {
            field: self.field(key),
            raw,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
