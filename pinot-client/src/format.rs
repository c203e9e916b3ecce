//! Placeholder substitution for parameterized SQL queries.
//!
//! Pinot has no server-side prepared statements, so parameters are encoded
//! as SQL literals on the client and spliced into the query text.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};

/// TIMESTAMP literals use millisecond precision with no UTC offset suffix.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// A single query parameter, classified by its Pinot literal encoding.
///
/// `From` impls cover the natural Rust types; dynamic values can be
/// classified with `QueryParam::try_from(serde_json::Value)`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    /// Pinot STRING / BIG_DECIMAL, enclosed in single quotes
    Str(String),
    /// Pinot BYTES, encoded as an uppercase hex string in single quotes
    Bytes(Vec<u8>),
    /// Pinot TIMESTAMP, ISO 8601 in single quotes
    Timestamp(DateTime<Utc>),
    /// Pinot BOOLEAN, unquoted
    Bool(bool),
    /// Pinot INT, unquoted
    Int(i32),
    /// Pinot LONG, unquoted
    Long(i64),
    /// Pinot FLOAT, unquoted
    Float(f32),
    /// Pinot DOUBLE, unquoted
    Double(f64),
}

impl From<&str> for QueryParam {
    fn from(value: &str) -> Self {
        QueryParam::Str(value.to_string())
    }
}

impl From<String> for QueryParam {
    fn from(value: String) -> Self {
        QueryParam::Str(value)
    }
}

impl From<Vec<u8>> for QueryParam {
    fn from(value: Vec<u8>) -> Self {
        QueryParam::Bytes(value)
    }
}

impl From<&[u8]> for QueryParam {
    fn from(value: &[u8]) -> Self {
        QueryParam::Bytes(value.to_vec())
    }
}

impl From<DateTime<Utc>> for QueryParam {
    fn from(value: DateTime<Utc>) -> Self {
        QueryParam::Timestamp(value)
    }
}

impl From<bool> for QueryParam {
    fn from(value: bool) -> Self {
        QueryParam::Bool(value)
    }
}

impl From<i32> for QueryParam {
    fn from(value: i32) -> Self {
        QueryParam::Int(value)
    }
}

impl From<i64> for QueryParam {
    fn from(value: i64) -> Self {
        QueryParam::Long(value)
    }
}

impl From<f32> for QueryParam {
    fn from(value: f32) -> Self {
        QueryParam::Float(value)
    }
}

impl From<f64> for QueryParam {
    fn from(value: f64) -> Self {
        QueryParam::Double(value)
    }
}

impl TryFrom<serde_json::Value> for QueryParam {
    type Error = Error;

    /// Classify a dynamic JSON value. Null, arrays and objects have no
    /// Pinot literal encoding and are rejected.
    fn try_from(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(s) => Ok(QueryParam::Str(s)),
            serde_json::Value::Bool(b) => Ok(QueryParam::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(QueryParam::Long(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(QueryParam::Double(f))
                } else {
                    Err(Error::UnsupportedParameter(n.to_string()))
                }
            }
            other => Err(Error::UnsupportedParameter(format!(
                "JSON value {} cannot be encoded as a SQL literal",
                other
            ))),
        }
    }
}

/// Substitute each `?` placeholder in `query_pattern` with the literal
/// encoding of the corresponding parameter.
///
/// Fails with `Error::PlaceholderMismatch` before performing any
/// substitution when the placeholder count and parameter count differ.
///
/// String parameters are quoted verbatim: embedded single quotes are NOT
/// escaped, matching the behavior of the other Pinot client libraries.
/// Callers own the escaping of untrusted input.
pub fn format_query(query_pattern: &str, params: &[QueryParam]) -> Result<String> {
    let placeholders = query_pattern.matches('?').count();
    if placeholders != params.len() {
        return Err(Error::PlaceholderMismatch {
            placeholders,
            parameters: params.len(),
        });
    }

    // Split on '?' and interleave the encoded literals. split() yields one
    // segment more than there are placeholders, so the trailing segment
    // lands after the last parameter.
    let mut parts = query_pattern.split('?');
    let mut query = String::with_capacity(query_pattern.len());
    if let Some(first) = parts.next() {
        query.push_str(first);
    }
    for (part, param) in parts.zip(params) {
        query.push_str(&encode_param(param));
        query.push_str(part);
    }
    Ok(query)
}

fn encode_param(param: &QueryParam) -> String {
    match param {
        QueryParam::Str(s) => format!("'{}'", s),
        QueryParam::Bytes(b) => {
            let hex: String = b.iter().map(|byte| format!("{:02X}", byte)).collect();
            format!("'{}'", hex)
        }
        QueryParam::Timestamp(ts) => format!("'{}'", ts.format(TIMESTAMP_FORMAT)),
        QueryParam::Bool(v) => v.to_string(),
        QueryParam::Int(v) => v.to_string(),
        QueryParam::Long(v) => v.to_string(),
        QueryParam::Float(v) => v.to_string(),
        QueryParam::Double(v) => v.to_string(),
    }
}
