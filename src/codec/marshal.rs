//! Marshal specifications

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{ObjectError, Result};

/// A user-supplied pair of conversion functions
///
/// `parse(stringify(v))` should give back `v`.
pub trait Marshaller: Send + Sync {
    fn stringify(&self, value: &Value) -> Result<String>;

    fn parse(&self, wire: &str) -> Result<Value>;
}

/// How one value is represented on the wire
#[derive(Clone, Default)]
pub enum MarshalSpec {
    /// Strings go out as-is and come back as strings
    #[default]
    None,

    /// JSON text
    Json,

    /// Base-10 integer
    Integer,

    /// Floating point number
    Float,

    /// Scalars stringified, read back as strings
    String,

    /// Delegate to a [`Marshaller`]
    Custom(Arc<dyn Marshaller>),
}

impl MarshalSpec {
    /// Wrap a custom marshaller
    pub fn custom(marshaller: impl Marshaller + 'static) -> Self {
        MarshalSpec::Custom(Arc::new(marshaller))
    }

    /// Look up a built-in spec by name (`none`, `json`, `integer`, `float`,
    /// `string`). Case-insensitive.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" | "" => Ok(MarshalSpec::None),
            "json" => Ok(MarshalSpec::Json),
            "integer" | "int" => Ok(MarshalSpec::Integer),
            "float" | "number" => Ok(MarshalSpec::Float),
            "string" => Ok(MarshalSpec::String),
            other => Err(ObjectError::usage(format!(
                "unknown marshal spec '{}'",
                other
            ))),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, MarshalSpec::None)
    }
}

impl FromStr for MarshalSpec {
    type Err = ObjectError;

    fn from_str(s: &str) -> Result<Self> {
        MarshalSpec::from_name(s)
    }
}

impl fmt::Debug for MarshalSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarshalSpec::None => f.write_str("None"),
            MarshalSpec::Json => f.write_str("Json"),
            MarshalSpec::Integer => f.write_str("Integer"),
            MarshalSpec::Float => f.write_str("Float"),
            MarshalSpec::String => f.write_str("String"),
            MarshalSpec::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
