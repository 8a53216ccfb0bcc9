//! Value encoding and decoding
//!
//! Pure functions from (value, spec) to wire text and back. Nothing here
//! touches the transport.

use serde_json::{Number, Value};

use super::MarshalSpec;
use crate::error::{ObjectError, Result};
use crate::protocol::Reply;

/// Largest magnitude below which every whole `f64` is an exact integer (2^53)
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

// =============================================================================
// Free functions
// =============================================================================

/// Encode one value for the wire under `spec`
pub fn encode(value: &Value, spec: &MarshalSpec) -> Result<String> {
    match spec {
        MarshalSpec::None => match value {
            Value::String(s) => Ok(s.clone()),
            Value::Array(_) | Value::Object(_) => Err(ObjectError::usage(
                "aggregate values need a marshal spec (e.g. MarshalSpec::Json)",
            )),
            scalar => Ok(stringify_scalar(scalar)),
        },
        MarshalSpec::Integer | MarshalSpec::Float | MarshalSpec::String => match value {
            Value::Array(_) | Value::Object(_) => Err(ObjectError::marshal(format!(
                "cannot encode an aggregate value under {:?}",
                spec
            ))),
            scalar => Ok(stringify_scalar(scalar)),
        },
        MarshalSpec::Json => serde_json::to_string(value).map_err(ObjectError::marshal),
        MarshalSpec::Custom(marshaller) => marshaller.stringify(value),
    }
}

/// Encode a batch, preserving order. Stops at the first failure.
pub fn encode_all<'a, I>(values: I, spec: &MarshalSpec) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a Value>,
{
    values.into_iter().map(|v| encode(v, spec)).collect()
}

/// Decode a reply under `spec`
///
/// Nil decodes to `null` under every spec; arrays decode element-wise.
pub fn decode(reply: &Reply, spec: &MarshalSpec) -> Result<Value> {
    match reply {
        Reply::Nil => Ok(Value::Null),
        Reply::Array(items) => decode_all(items, spec).map(Value::Array),
        Reply::Error(message) => Err(ObjectError::Transport(message.clone())),
        Reply::Integer(n) => match spec {
            MarshalSpec::None | MarshalSpec::Integer => Ok(Value::from(*n)),
            _ => decode_text(&n.to_string(), spec),
        },
        Reply::Bulk(text) | Reply::Status(text) => decode_text(text, spec),
    }
}

/// Decode a batch of replies, preserving order. Stops at the first failure.
pub fn decode_all(replies: &[Reply], spec: &MarshalSpec) -> Result<Vec<Value>> {
    replies.iter().map(|r| decode(r, spec)).collect()
}

fn stringify_scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        // callers filter aggregates out
        other => other.to_string(),
    }
}

fn decode_text(text: &str, spec: &MarshalSpec) -> Result<Value> {
    match spec {
        MarshalSpec::None | MarshalSpec::String => Ok(Value::String(text.to_owned())),
        MarshalSpec::Integer => text
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| ObjectError::marshal(format!("'{}' is not an integer: {}", text, e))),
        MarshalSpec::Float => {
            let parsed = text
                .trim()
                .parse::<f64>()
                .map_err(|e| ObjectError::marshal(format!("'{}' is not a float: {}", text, e)))?;
            // whole numbers come back integral so `3` round-trips as `3`
            if parsed.fract() == 0.0 && parsed.abs() <= MAX_EXACT_FLOAT {
                return Ok(Value::from(parsed as i64));
            }
            Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or_else(|| ObjectError::marshal(format!("'{}' is not a finite number", text)))
        }
        MarshalSpec::Json => serde_json::from_str(text).map_err(ObjectError::marshal),
        MarshalSpec::Custom(marshaller) => marshaller.parse(text),
    }
}

// =============================================================================
// Embedded codec
// =============================================================================

/// Codec embedded in each adapter, carrying the collection-wide default spec
#[derive(Debug, Clone, Default)]
pub struct ValueCodec {
    default: MarshalSpec,
}

impl ValueCodec {
    pub fn new(default: MarshalSpec) -> Self {
        Self { default }
    }

    /// Collection-wide default spec
    pub fn default_spec(&self) -> &MarshalSpec {
        &self.default
    }

    /// Pick `spec` if given, otherwise the collection default
    pub fn resolve<'a>(&'a self, spec: Option<&'a MarshalSpec>) -> &'a MarshalSpec {
        spec.unwrap_or(&self.default)
    }

    pub fn to_wire(&self, value: &Value, spec: Option<&MarshalSpec>) -> Result<String> {
        encode(value, self.resolve(spec))
    }

    pub fn all_to_wire<'a, I>(&self, values: I, spec: Option<&MarshalSpec>) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        encode_all(values, self.resolve(spec))
    }

    pub fn from_wire(&self, reply: &Reply, spec: Option<&MarshalSpec>) -> Result<Value> {
        decode(reply, self.resolve(spec))
    }

    /// Decode a multi-bulk reply into a list. Nil counts as empty.
    pub fn all_from_wire(&self, reply: Reply, spec: Option<&MarshalSpec>) -> Result<Vec<Value>> {
        let spec = self.resolve(spec);
        match reply {
            Reply::Nil => Ok(Vec::new()),
            Reply::Array(items) => decode_all(&items, spec),
            other => Err(ObjectError::Protocol(format!(
                "expected array reply, got {}",
                other.kind_name()
            ))),
        }
    }
}
