//! Entity handle
//!
//! The key + configuration + transport triple every adapter is built on,
//! and the key-level operations all entities share.

use std::fmt;
use std::sync::Arc;

use crate::codec::ValueCodec;
use crate::config::Config;
use crate::error::{ObjectError, Result};
use crate::protocol::{Command, CommandType, Reply};
use crate::transport::{self, SharedTransport};

/// Options for [`EntityHandle::rename`] and [`EntityHandle::renamenx`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenameOptions {
    /// Point the handle at the new key once the store confirms the rename
    pub adopt: bool,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self { adopt: true }
    }
}

impl RenameOptions {
    /// Rename the stored entry but keep addressing the old key
    pub fn keep_key() -> Self {
        Self { adopt: false }
    }
}

/// Addresses one remote entry
///
/// Owns no data: the store is the system of record, and dropping a handle
/// leaves the entry alone.
#[derive(Clone)]
pub struct EntityHandle {
    key: String,
    config: Arc<Config>,
    transport: SharedTransport,
    codec: ValueCodec,
}

impl EntityHandle {
    pub fn new(key: impl Into<String>, transport: SharedTransport, config: Config) -> Self {
        let codec = ValueCodec::new(config.marshal.clone());
        Self {
            key: key.into(),
            config: Arc::new(config),
            transport,
            codec,
        }
    }

    /// Build against the process-wide default transport
    pub fn with_default_transport(key: impl Into<String>, config: Config) -> Result<Self> {
        Ok(Self::new(key, transport::default_transport()?, config))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &SharedTransport {
        &self.transport
    }

    pub fn codec(&self) -> &ValueCodec {
        &self.codec
    }

    /// A command addressed at this key
    pub(crate) fn command(&self, kind: CommandType) -> Command {
        Command::new(kind).arg(&self.key)
    }

    pub(crate) async fn call(&self, command: Command) -> Result<Reply> {
        self.transport.call(command).await
    }

    pub(crate) async fn pipeline(&self, commands: Vec<Command>) -> Result<Vec<Reply>> {
        self.transport.pipeline(commands).await
    }

    /// Send `commands` on the current runtime without waiting for them
    ///
    /// Used for default-value seeding; a call racing the seed may not see it.
    pub(crate) fn spawn_detached(&self, commands: Vec<Command>) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            ObjectError::usage("default values are seeded on a tokio runtime; none is running")
        })?;
        let transport = Arc::clone(&self.transport);
        let key = self.key.clone();
        runtime.spawn(async move {
            if let Err(e) = transport.pipeline(commands).await {
                tracing::warn!("Seeding default value for {} failed: {}", key, e);
            }
        });
        Ok(())
    }

    // =========================================================================
    // Key operations
    // =========================================================================

    /// Whether the key exists
    ///
    /// Redis: EXISTS
    pub async fn exists(&self) -> Result<bool> {
        self.call(self.command(CommandType::Exists)).await?.into_bool()
    }

    /// The store's type name for the key (`none` if absent)
    ///
    /// Redis: TYPE
    #[doc(alias = "type")]
    pub async fn key_type(&self) -> Result<String> {
        self.call(self.command(CommandType::Type)).await?.into_status()
    }

    /// Delete the whole entry. Returns the number of keys removed.
    ///
    /// Redis: DEL
    #[doc(alias = "del", alias = "delete")]
    pub async fn delete_key(&self) -> Result<i64> {
        self.call(self.command(CommandType::Del)).await?.into_integer()
    }

    /// Same as [`delete_key`](Self::delete_key)
    pub async fn clear(&self) -> Result<i64> {
        self.delete_key().await
    }

    /// Rename the entry, replacing any entry at `new_key`
    ///
    /// Redis: RENAME
    pub async fn rename(&mut self, new_key: impl Into<String>, options: RenameOptions) -> Result<()> {
        let new_key = new_key.into();
        self.call(self.command(CommandType::Rename).arg(&new_key))
            .await?
            .expect_ok()?;
        if options.adopt {
            self.adopt(new_key);
        }
        Ok(())
    }

    /// Rename the entry only if `new_key` is free. Returns whether it was
    /// renamed; the handle never adopts a key that was taken.
    ///
    /// Redis: RENAMENX
    #[doc(alias = "renameNx")]
    pub async fn renamenx(&mut self, new_key: impl Into<String>, options: RenameOptions) -> Result<bool> {
        let new_key = new_key.into();
        let renamed = self
            .call(self.command(CommandType::RenameNx).arg(&new_key))
            .await?
            .into_integer()?
            > 0;
        if renamed && options.adopt {
            self.adopt(new_key);
        }
        Ok(renamed)
    }

    fn adopt(&mut self, new_key: String) {
        tracing::debug!("Handle for {} now addresses {}", self.key, new_key);
        self.key = new_key;
    }

    /// Expire the key after `seconds`. False if the key does not exist.
    ///
    /// Redis: EXPIRE
    pub async fn expire(&self, seconds: i64) -> Result<bool> {
        self.call(self.command(CommandType::Expire).arg(seconds))
            .await?
            .into_bool()
    }

    /// Expire the key at a unix timestamp (seconds)
    ///
    /// Redis: EXPIREAT
    #[doc(alias = "expireAt")]
    pub async fn expire_at(&self, unix_seconds: i64) -> Result<bool> {
        self.call(self.command(CommandType::ExpireAt).arg(unix_seconds))
            .await?
            .into_bool()
    }

    /// Remove any expiry. True if one was removed.
    ///
    /// Redis: PERSIST
    pub async fn persist(&self) -> Result<bool> {
        self.call(self.command(CommandType::Persist)).await?.into_bool()
    }

    /// Seconds to live; `-1` without expiry, `-2` if the key is missing
    ///
    /// Redis: TTL
    pub async fn ttl(&self) -> Result<i64> {
        self.call(self.command(CommandType::Ttl)).await?.into_integer()
    }
}

impl fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityHandle")
            .field("key", &self.key)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
