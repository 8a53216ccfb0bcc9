//! Transport Module
//!
//! The seam between the adapters and the store.
//!
//! ## Architecture
//! - [`Transport`] executes one primitive [`Command`] per round trip, or a
//!   batch of them in one pipelined round trip
//! - [`TcpTransport`] speaks RESP2 to a real server
//! - [`MemoryTransport`] keeps the keyspace in process
//!
//! Handles receive their transport explicitly. A process-scoped default can
//! be installed once at startup with [`set_default`] for callers that build
//! handles through the `with_default_transport` constructors.

mod memory;
mod tcp;

pub use memory::MemoryTransport;
pub use tcp::TcpTransport;

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{ObjectError, Result};
use crate::protocol::{Command, Reply};

/// Executes primitive commands against a store
///
/// Implementations turn error replies into `Err`, so an `Ok` reply is never
/// [`Reply::Error`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one command
    async fn call(&self, command: Command) -> Result<Reply>;

    /// Execute several commands in one round trip, replies in order
    ///
    /// Fails on the first error reply.
    async fn pipeline(&self, commands: Vec<Command>) -> Result<Vec<Reply>> {
        let mut replies = Vec::with_capacity(commands.len());
        for command in commands {
            replies.push(self.call(command).await?);
        }
        Ok(replies)
    }
}

/// Transport shared by every handle built against it
pub type SharedTransport = Arc<dyn Transport>;

// =============================================================================
// Process-scoped default
// =============================================================================

static DEFAULT_TRANSPORT: RwLock<Option<SharedTransport>> = parking_lot::const_rwlock(None);

/// Install the process-wide default transport, returning the previous one
pub fn set_default(transport: SharedTransport) -> Option<SharedTransport> {
    tracing::debug!("Installing default transport");
    DEFAULT_TRANSPORT.write().replace(transport)
}

/// Remove the process-wide default transport
pub fn clear_default() -> Option<SharedTransport> {
    DEFAULT_TRANSPORT.write().take()
}

/// The process-wide default transport
pub fn default_transport() -> Result<SharedTransport> {
    DEFAULT_TRANSPORT
        .read()
        .as_ref()
        .cloned()
        .ok_or(ObjectError::NoTransport)
}
