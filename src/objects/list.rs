//! Lists
//!
//! With `Config::max_length` set to `N`, every successful push, unshift and
//! insert is followed by `LTRIM key -N -1`, keeping the `N` right-most
//! elements. The mutating call still reports its own result.

use std::fmt;
use std::ops::{Deref, DerefMut};

use serde_json::Value;

use super::range::IndexWindow;
use super::EntityHandle;
use crate::config::Config;
use crate::error::{ObjectError, Result};
use crate::protocol::CommandType;
use crate::transport::SharedTransport;

/// Where [`List::insert`] places the new element relative to the pivot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Before,
    After,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Before => "BEFORE",
            Position::After => "AFTER",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to a list
#[derive(Debug, Clone)]
pub struct List {
    handle: EntityHandle,
}

impl List {
    /// Build a handle. A `max_length` of zero, or one the store cannot
    /// address, is a usage error.
    pub fn new(key: impl Into<String>, transport: SharedTransport, config: Config) -> Result<Self> {
        trim_bound(&config)?;
        Ok(Self {
            handle: EntityHandle::new(key, transport, config),
        })
    }

    /// Build against the process-wide default transport
    pub fn with_default_transport(key: impl Into<String>, config: Config) -> Result<Self> {
        trim_bound(&config)?;
        Ok(Self {
            handle: EntityHandle::with_default_transport(key, config)?,
        })
    }

    /// Apply the length bound, if any
    async fn trim(&self) -> Result<()> {
        let Some(max) = trim_bound(self.config())? else {
            return Ok(());
        };
        tracing::debug!("Trimming {} to its last {} elements", self.key(), max);
        self.call(self.command(CommandType::LTrim).arg(-max).arg(-1))
            .await?
            .expect_ok()
    }

    async fn push_with(&self, kind: CommandType, values: &[Value], op: &str) -> Result<i64> {
        if values.is_empty() {
            return Err(ObjectError::usage(format!("{} needs at least one value", op)));
        }
        let wire = self.codec().all_to_wire(values, None)?;
        let length = self
            .call(self.command(kind).args(wire))
            .await?
            .into_integer()?;
        self.trim().await?;
        Ok(length)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Append to the tail. Returns the new length.
    ///
    /// Redis: RPUSH
    #[doc(alias = "rpush")]
    pub async fn push(&self, value: impl Into<Value>) -> Result<i64> {
        self.push_with(CommandType::RPush, &[value.into()], "push").await
    }

    /// Append several values in order
    ///
    /// Redis: RPUSH
    pub async fn push_all<I, V>(&self, values: I) -> Result<i64>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.push_with(CommandType::RPush, &values, "push_all").await
    }

    /// Prepend to the head. Returns the new length.
    ///
    /// Redis: LPUSH
    #[doc(alias = "lpush")]
    pub async fn unshift(&self, value: impl Into<Value>) -> Result<i64> {
        self.push_with(CommandType::LPush, &[value.into()], "unshift").await
    }

    /// Prepend several values; each lands at the head in turn, so the last
    /// one ends up first
    ///
    /// Redis: LPUSH
    pub async fn unshift_all<I, V>(&self, values: I) -> Result<i64>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.push_with(CommandType::LPush, &values, "unshift_all").await
    }

    /// Remove and return the tail, `null` when empty
    ///
    /// Redis: RPOP
    #[doc(alias = "rpop")]
    pub async fn pop(&self) -> Result<Value> {
        let reply = self.call(self.command(CommandType::RPop)).await?;
        self.codec().from_wire(&reply, None)
    }

    /// Remove and return the head, `null` when empty
    ///
    /// Redis: LPOP
    #[doc(alias = "lpop")]
    pub async fn shift(&self) -> Result<Value> {
        let reply = self.call(self.command(CommandType::LPop)).await?;
        self.codec().from_wire(&reply, None)
    }

    /// Insert next to the first element equal to `pivot`. Returns the new
    /// length, or `-1` when the pivot is absent.
    ///
    /// Redis: LINSERT
    pub async fn insert(
        &self,
        position: Position,
        pivot: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Result<i64> {
        let command = self
            .command(CommandType::LInsert)
            .arg(position)
            .arg(self.codec().to_wire(&pivot.into(), None)?)
            .arg(self.codec().to_wire(&value.into(), None)?);
        let length = self.call(command).await?.into_integer()?;
        self.trim().await?;
        Ok(length)
    }

    /// Overwrite the element at `index` (negative counts from the tail)
    ///
    /// Redis: LSET
    #[doc(alias = "setAt")]
    pub async fn set_at(&self, index: i64, value: impl Into<Value>) -> Result<()> {
        let wire = self.codec().to_wire(&value.into(), None)?;
        self.call(self.command(CommandType::LSet).arg(index).arg(wire))
            .await?
            .expect_ok()
    }

    /// Remove elements equal to `value`: all of them for `count == 0`, up
    /// to `count` from the head for positive counts, and up to `|count|`
    /// from the tail for negative ones. Returns how many were removed.
    ///
    /// Redis: LREM
    #[doc(alias = "remove")]
    pub async fn delete(&self, value: impl Into<Value>, count: i64) -> Result<i64> {
        let wire = self.codec().to_wire(&value.into(), None)?;
        self.call(self.command(CommandType::LRem).arg(count).arg(wire))
            .await?
            .into_integer()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Elements in `[start, end)`; `None` reads through the tail. Negative
    /// indices count from the tail.
    ///
    /// Redis: LRANGE
    #[doc(alias = "range")]
    pub async fn slice(&self, start: i64, end: Option<i64>) -> Result<Vec<Value>> {
        let window = IndexWindow::new(start, end);
        let reply = self
            .call(window.command(CommandType::LRange, self.key()))
            .await?;
        self.codec().all_from_wire(reply, None)
    }

    /// Same as [`slice`](Self::slice)
    pub async fn range(&self, start: i64, end: Option<i64>) -> Result<Vec<Value>> {
        self.slice(start, end).await
    }

    /// Every element, head to tail
    #[doc(alias = "members", alias = "to_vec")]
    pub async fn values(&self) -> Result<Vec<Value>> {
        self.slice(0, None).await
    }

    /// The element at `index`, `null` when out of range
    ///
    /// Redis: LINDEX
    #[doc(alias = "get", alias = "index")]
    pub async fn at(&self, index: i64) -> Result<Value> {
        let reply = self.call(self.command(CommandType::LIndex).arg(index)).await?;
        self.codec().from_wire(&reply, None)
    }

    pub async fn first(&self) -> Result<Value> {
        self.at(0).await
    }

    pub async fn last(&self) -> Result<Value> {
        self.at(-1).await
    }

    /// Redis: LLEN
    #[doc(alias = "size", alias = "len")]
    pub async fn length(&self) -> Result<i64> {
        self.call(self.command(CommandType::LLen)).await?.into_integer()
    }

    #[doc(alias = "is_empty")]
    pub async fn empty(&self) -> Result<bool> {
        Ok(self.length().await? == 0)
    }
}

/// `max_length` as a store index, `None` when unbounded
fn trim_bound(config: &Config) -> Result<Option<i64>> {
    match config.max_length {
        None => Ok(None),
        Some(0) => Err(ObjectError::usage("max_length must be positive")),
        Some(max) => i64::try_from(max)
            .map(Some)
            .map_err(|_| ObjectError::usage(format!("max_length {} is too large", max))),
    }
}

impl Deref for List {
    type Target = EntityHandle;

    fn deref(&self) -> &EntityHandle {
        &self.handle
    }
}

impl DerefMut for List {
    fn deref_mut(&mut self) -> &mut EntityHandle {
        &mut self.handle
    }
}
