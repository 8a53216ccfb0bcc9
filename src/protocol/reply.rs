//! Reply definitions
//!
//! Represents replies from the store, plus the conversions the adapters use
//! to read them.

use crate::error::{ObjectError, Result};

/// A reply from the store
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Missing value (`$-1` / `*-1`)
    Nil,

    /// Status line such as `OK` or a type name
    Status(String),

    /// Error line reported by the store
    Error(String),

    Integer(i64),

    Bulk(String),

    Array(Vec<Reply>),
}

impl Reply {
    /// The `+OK` status
    pub fn ok() -> Self {
        Reply::Status("OK".to_string())
    }

    pub fn bulk(text: impl Into<String>) -> Self {
        Reply::Bulk(text.into())
    }

    /// Bulk reply, or nil when absent
    pub fn optional(text: Option<String>) -> Self {
        text.map(Reply::Bulk).unwrap_or(Reply::Nil)
    }

    /// Array of bulk strings
    pub fn bulk_array<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Reply::Array(items.into_iter().map(|s| Reply::Bulk(s.into())).collect())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Nil)
    }

    /// Short name of the reply shape, for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Reply::Nil => "nil",
            Reply::Status(_) => "status",
            Reply::Error(_) => "error",
            Reply::Integer(_) => "integer",
            Reply::Bulk(_) => "bulk",
            Reply::Array(_) => "array",
        }
    }

    /// Turn an error reply into `Err`, pass everything else through
    pub fn into_result(self) -> Result<Reply> {
        match self {
            Reply::Error(message) => Err(ObjectError::Transport(message)),
            other => Ok(other),
        }
    }

    pub fn into_integer(self) -> Result<i64> {
        match self.into_result()? {
            Reply::Integer(n) => Ok(n),
            Reply::Bulk(s) | Reply::Status(s) => s
                .parse()
                .map_err(|_| ObjectError::Protocol(format!("expected integer reply, got '{}'", s))),
            other => Err(unexpected("integer", &other)),
        }
    }

    /// Integer reply, nil as `None`
    pub fn into_optional_integer(self) -> Result<Option<i64>> {
        match self {
            Reply::Nil => Ok(None),
            other => other.into_integer().map(Some),
        }
    }

    /// Integer reply read as a flag (non-zero is true)
    pub fn into_bool(self) -> Result<bool> {
        self.into_integer().map(|n| n != 0)
    }

    pub fn into_float(self) -> Result<f64> {
        match self.into_result()? {
            Reply::Integer(n) => Ok(n as f64),
            Reply::Bulk(s) | Reply::Status(s) => parse_score(&s),
            other => Err(unexpected("float", &other)),
        }
    }

    /// Float reply, nil as `None`
    pub fn into_optional_float(self) -> Result<Option<f64>> {
        match self {
            Reply::Nil => Ok(None),
            other => other.into_float().map(Some),
        }
    }

    /// Status line text (e.g. the reply to TYPE)
    pub fn into_status(self) -> Result<String> {
        match self.into_result()? {
            Reply::Status(s) | Reply::Bulk(s) => Ok(s),
            other => Err(unexpected("status", &other)),
        }
    }

    /// Expect a plain `OK`
    pub fn expect_ok(self) -> Result<()> {
        let status = self.into_status()?;
        if status.eq_ignore_ascii_case("OK") {
            Ok(())
        } else {
            Err(ObjectError::Protocol(format!("expected OK, got '{}'", status)))
        }
    }

    /// Multi-bulk reply, nil as empty
    pub fn into_array(self) -> Result<Vec<Reply>> {
        match self.into_result()? {
            Reply::Array(items) => Ok(items),
            Reply::Nil => Ok(Vec::new()),
            other => Err(unexpected("array", &other)),
        }
    }
}

/// Parse a score as the store formats it (`2`, `3.5`, `inf`, `-inf`)
pub(crate) fn parse_score(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "inf" | "+inf" => Ok(f64::INFINITY),
        "-inf" => Ok(f64::NEG_INFINITY),
        _ => trimmed
            .parse()
            .map_err(|_| ObjectError::marshal(format!("'{}' is not a valid score", text))),
    }
}

fn unexpected(wanted: &str, got: &Reply) -> ObjectError {
    ObjectError::Protocol(format!("expected {} reply, got {}", wanted, got.kind_name()))
}
