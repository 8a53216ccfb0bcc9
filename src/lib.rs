//! # redis-objects
//!
//! Typed handles over remote Redis-style collections:
//! - Scalars, hashes, lists, sets and sorted sets behind one handle type each
//! - Pluggable value marshalling (JSON, integer, float, custom)
//! - Rank windows, score intervals and pagination for sorted sets
//! - RESP2 over TCP, or an in-process store for tests
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │        Scalar  Hash  List  Set  OrderedSet                   │
//! │              (objects, range engine)                         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ EntityHandle (key + Config + transport)
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ ValueCodec  │          │  Transport  │
//!   │  (codec)    │          │   (trait)   │
//!   └─────────────┘          └──────┬──────┘
//!                          ┌────────┴────────┐
//!                          ▼                 ▼
//!                   ┌─────────────┐   ┌─────────────┐
//!                   │TcpTransport │   │  Memory     │
//!                   │  (RESP2)    │   │  Transport  │
//!                   └─────────────┘   └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use redis_objects::{Config, Hash, MarshalSpec, MemoryTransport};
//!
//! # async fn demo() -> redis_objects::Result<()> {
//! let transport = Arc::new(MemoryTransport::new());
//! let config = Config::builder().marshal_key("age", MarshalSpec::Integer).build();
//! let user = Hash::new("user:1", transport, config)?;
//! user.set("age", 42).await?;
//! assert_eq!(user.get("age").await?, serde_json::json!(42));
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod protocol;
pub mod transport;
pub mod objects;
pub mod aliases;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, ObjectError, Result};
pub use config::{Config, ConfigBuilder, ConnectionConfig, ConnectionConfigBuilder};
pub use codec::{MarshalSpec, Marshaller, ValueCodec};
pub use transport::{MemoryTransport, SharedTransport, TcpTransport, Transport};
pub use objects::{
    EntityHandle, Hash, List, OrderedSet, Position, RangeEntries, RangeOptions, RenameOptions,
    Scalar, ScoreBound, ScoreRangeOptions, ScoredMember, Set,
};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of redis-objects
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
