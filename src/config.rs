//! Configuration for redis-objects
//!
//! [`Config`] controls how one entity marshals its values; it is frozen
//! behind an `Arc` once a handle is built. [`ConnectionConfig`] controls the
//! TCP transport.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::MarshalSpec;

/// Per-entity configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Marshalling
    // -------------------------------------------------------------------------
    /// Collection-wide default spec
    pub marshal: MarshalSpec,

    /// Per-field specs (hashes only)
    pub marshal_keys: HashMap<String, MarshalSpec>,

    /// Spec used for hash field names themselves
    pub key_marshaller: MarshalSpec,

    // -------------------------------------------------------------------------
    // Initial State
    // -------------------------------------------------------------------------
    /// Seed written with set-if-absent when a scalar (or hash, for an
    /// object value) handle is constructed
    pub default: Option<Value>,

    // -------------------------------------------------------------------------
    // List Bounds
    // -------------------------------------------------------------------------
    /// Lists are trimmed to their last `max_length` elements after every
    /// push, unshift and insert
    pub max_length: Option<usize>,
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// The per-field spec for `field`, if one is configured
    pub fn field_marshal(&self, field: &str) -> Option<&MarshalSpec> {
        self.marshal_keys.get(field)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the collection-wide marshal spec
    pub fn marshal(mut self, spec: MarshalSpec) -> Self {
        self.config.marshal = spec;
        self
    }

    /// Set the marshal spec for one hash field
    pub fn marshal_key(mut self, field: impl Into<String>, spec: MarshalSpec) -> Self {
        self.config.marshal_keys.insert(field.into(), spec);
        self
    }

    /// Set the marshal spec for hash field names
    pub fn key_marshaller(mut self, spec: MarshalSpec) -> Self {
        self.config.key_marshaller = spec;
        self
    }

    /// Set the seed value
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.config.default = Some(value.into());
        self
    }

    /// Bound list length (must be positive)
    pub fn max_length(mut self, len: usize) -> Self {
        self.config.max_length = Some(len);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// Settings for [`TcpTransport`](crate::transport::TcpTransport)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Server address (host:port)
    pub addr: String,

    /// Connect timeout (milliseconds, 0 disables)
    pub connect_timeout_ms: u64,

    /// Reply read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Request write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,

    /// Disable Nagle's algorithm
    pub nodelay: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:6379".to_string(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            nodelay: true,
        }
    }
}

impl ConnectionConfig {
    /// Create a new connection config builder
    pub fn builder() -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::default()
    }

    pub(crate) fn timeout(ms: u64) -> Option<Duration> {
        (ms > 0).then(|| Duration::from_millis(ms))
    }
}

/// Builder for ConnectionConfig
#[derive(Default)]
pub struct ConnectionConfigBuilder {
    config: ConnectionConfig,
}

impl ConnectionConfigBuilder {
    /// Set the server address
    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.config.addr = addr.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.config.nodelay = nodelay;
        self
    }

    pub fn build(self) -> ConnectionConfig {
        self.config
    }
}
