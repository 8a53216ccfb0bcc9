//! Unordered sets

use std::ops::{Deref, DerefMut};

use serde_json::Value;

use super::EntityHandle;
use crate::config::Config;
use crate::error::{ObjectError, Result};
use crate::protocol::CommandType;
use crate::transport::SharedTransport;

/// Handle to a set. Member order is whatever the store returns.
#[derive(Debug, Clone)]
pub struct Set {
    handle: EntityHandle,
}

impl Set {
    pub fn new(key: impl Into<String>, transport: SharedTransport, config: Config) -> Self {
        Self {
            handle: EntityHandle::new(key, transport, config),
        }
    }

    /// Build against the process-wide default transport
    pub fn with_default_transport(key: impl Into<String>, config: Config) -> Result<Self> {
        Ok(Self {
            handle: EntityHandle::with_default_transport(key, config)?,
        })
    }

    /// Add one member. Returns 1 if it was new, 0 if already present.
    ///
    /// Redis: SADD
    #[doc(alias = "sadd", alias = "push")]
    pub async fn add(&self, value: impl Into<Value>) -> Result<i64> {
        let wire = self.codec().to_wire(&value.into(), None)?;
        self.call(self.command(CommandType::SAdd).arg(wire))
            .await?
            .into_integer()
    }

    /// Add several members in one command. Returns how many were new.
    ///
    /// Redis: SADD
    #[doc(alias = "add_all", alias = "extend")]
    pub async fn merge<I, V>(&self, values: I) -> Result<i64>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(ObjectError::usage("merge needs at least one value"));
        }
        let wire = self.codec().all_to_wire(&values, None)?;
        self.call(self.command(CommandType::SAdd).args(wire))
            .await?
            .into_integer()
    }

    /// Remove and return an arbitrary member, `null` when empty
    ///
    /// Redis: SPOP
    pub async fn pop(&self) -> Result<Value> {
        let reply = self.call(self.command(CommandType::SPop)).await?;
        self.codec().from_wire(&reply, None)
    }

    /// Redis: SMEMBERS
    #[doc(alias = "values")]
    pub async fn members(&self) -> Result<Vec<Value>> {
        let reply = self.call(self.command(CommandType::SMembers)).await?;
        self.codec().all_from_wire(reply, None)
    }

    /// Redis: SISMEMBER
    #[doc(alias = "include", alias = "contains")]
    pub async fn is_member(&self, value: impl Into<Value>) -> Result<bool> {
        let wire = self.codec().to_wire(&value.into(), None)?;
        self.call(self.command(CommandType::SIsMember).arg(wire))
            .await?
            .into_bool()
    }

    /// Remove a member. Returns 1 if removed, 0 if absent.
    ///
    /// Redis: SREM
    #[doc(alias = "remove")]
    pub async fn delete(&self, value: impl Into<Value>) -> Result<i64> {
        let wire = self.codec().to_wire(&value.into(), None)?;
        self.call(self.command(CommandType::SRem).arg(wire))
            .await?
            .into_integer()
    }

    /// Redis: SCARD
    #[doc(alias = "size", alias = "count")]
    pub async fn length(&self) -> Result<i64> {
        self.call(self.command(CommandType::SCard)).await?.into_integer()
    }

    #[doc(alias = "is_empty")]
    pub async fn empty(&self) -> Result<bool> {
        Ok(self.length().await? == 0)
    }
}

impl Deref for Set {
    type Target = EntityHandle;

    fn deref(&self) -> &EntityHandle {
        &self.handle
    }
}

impl DerefMut for Set {
    fn deref_mut(&mut self) -> &mut EntityHandle {
        &mut self.handle
    }
}
