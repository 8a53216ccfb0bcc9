//! Scalar values
//!
//! A single marshalled value stored under a string key.

use std::ops::{Deref, DerefMut};

use serde_json::Value;

use super::EntityHandle;
use crate::codec::MarshalSpec;
use crate::config::Config;
use crate::error::Result;
use crate::protocol::CommandType;
use crate::transport::SharedTransport;

/// Handle to a string key holding one value
#[derive(Debug, Clone)]
pub struct Scalar {
    handle: EntityHandle,
}

impl Scalar {
    /// Build a handle. With `config.default` set, a set-if-absent for the
    /// default is dispatched on the current tokio runtime and not awaited.
    pub fn new(key: impl Into<String>, transport: SharedTransport, config: Config) -> Result<Self> {
        Self::from_handle(EntityHandle::new(key, transport, config))
    }

    /// Build against the process-wide default transport
    pub fn with_default_transport(key: impl Into<String>, config: Config) -> Result<Self> {
        Self::from_handle(EntityHandle::with_default_transport(key, config)?)
    }

    fn from_handle(handle: EntityHandle) -> Result<Self> {
        if let Some(default) = &handle.config().default {
            let wire = handle.codec().to_wire(default, None)?;
            handle.spawn_detached(vec![handle.command(CommandType::SetNx).arg(wire)])?;
        }
        Ok(Self { handle })
    }

    /// Redis: SET
    #[doc(alias = "set_value")]
    pub async fn set(&self, value: impl Into<Value>) -> Result<()> {
        self.set_with(&value.into(), None).await
    }

    /// Set using `spec` instead of the configured marshaller
    pub async fn set_as(&self, value: impl Into<Value>, spec: &MarshalSpec) -> Result<()> {
        self.set_with(&value.into(), Some(spec)).await
    }

    async fn set_with(&self, value: &Value, spec: Option<&MarshalSpec>) -> Result<()> {
        let wire = self.codec().to_wire(value, spec)?;
        self.call(self.command(CommandType::Set).arg(wire))
            .await?
            .expect_ok()
    }

    /// The stored value, `null` if the key is missing
    ///
    /// Redis: GET
    #[doc(alias = "get_value")]
    pub async fn get(&self) -> Result<Value> {
        self.get_with(None).await
    }

    /// Get using `spec` instead of the configured marshaller
    pub async fn get_as(&self, spec: &MarshalSpec) -> Result<Value> {
        self.get_with(Some(spec)).await
    }

    async fn get_with(&self, spec: Option<&MarshalSpec>) -> Result<Value> {
        let reply = self.call(self.command(CommandType::Get)).await?;
        self.codec().from_wire(&reply, spec)
    }
}

impl Deref for Scalar {
    type Target = EntityHandle;

    fn deref(&self) -> &EntityHandle {
        &self.handle
    }
}

impl DerefMut for Scalar {
    fn deref_mut(&mut self) -> &mut EntityHandle {
        &mut self.handle
    }
}
