//! Hashes
//!
//! Field names go through `Config::key_marshaller`; each value goes through
//! its field's entry in `Config::marshal_keys`, falling back to
//! `Config::marshal`.

use std::ops::{Deref, DerefMut};

use serde_json::{Map, Value};

use super::EntityHandle;
use crate::codec::{self, MarshalSpec};
use crate::config::Config;
use crate::error::{ObjectError, Result};
use crate::protocol::{Command, CommandType, Reply};
use crate::transport::SharedTransport;

/// Field/value pairs in request order
pub type FieldValues = Vec<(String, Value)>;

/// Handle to a hash
#[derive(Debug, Clone)]
pub struct Hash {
    handle: EntityHandle,
}

impl Hash {
    /// Build a handle. An object in `config.default` is filled in (without
    /// overwriting existing fields) on the current tokio runtime and not
    /// awaited.
    pub fn new(key: impl Into<String>, transport: SharedTransport, config: Config) -> Result<Self> {
        Self::from_handle(EntityHandle::new(key, transport, config))
    }

    /// Build against the process-wide default transport
    pub fn with_default_transport(key: impl Into<String>, config: Config) -> Result<Self> {
        Self::from_handle(EntityHandle::with_default_transport(key, config)?)
    }

    fn from_handle(handle: EntityHandle) -> Result<Self> {
        let hash = Self { handle };
        match &hash.config().default {
            None => {}
            Some(Value::Object(fields)) => {
                let commands = hash.fill_commands(fields.iter().map(|(f, v)| (f.clone(), v.clone())))?;
                if !commands.is_empty() {
                    hash.spawn_detached(commands)?;
                }
            }
            Some(_) => return Err(ObjectError::usage("a hash default must be a JSON object")),
        }
        Ok(hash)
    }

    fn field_spec(&self, field: &str) -> Option<&MarshalSpec> {
        self.config().field_marshal(field)
    }

    fn encode_field(&self, field: &str) -> Result<String> {
        codec::encode(&Value::String(field.to_string()), &self.config().key_marshaller)
    }

    fn encode_value(&self, field: &str, value: &Value, spec: Option<&MarshalSpec>) -> Result<String> {
        self.codec().to_wire(value, spec.or_else(|| self.field_spec(field)))
    }

    /// Field name as configured, from its wire form
    fn field_name(&self, wire: &Reply) -> Result<String> {
        Ok(match codec::decode(wire, &self.config().key_marshaller)? {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    // =========================================================================
    // Single fields
    // =========================================================================

    /// Set a field. True if the field is new.
    ///
    /// Redis: HSET
    #[doc(alias = "put", alias = "store")]
    pub async fn set(&self, field: &str, value: impl Into<Value>) -> Result<bool> {
        self.set_with(field, &value.into(), None).await
    }

    /// Set a field using `spec`, overriding the configured marshallers
    pub async fn set_as(&self, field: &str, value: impl Into<Value>, spec: &MarshalSpec) -> Result<bool> {
        self.set_with(field, &value.into(), Some(spec)).await
    }

    async fn set_with(&self, field: &str, value: &Value, spec: Option<&MarshalSpec>) -> Result<bool> {
        let command = self
            .command(CommandType::HSet)
            .arg(self.encode_field(field)?)
            .arg(self.encode_value(field, value, spec)?);
        self.call(command).await?.into_bool()
    }

    /// A field's value, `null` if absent
    ///
    /// Redis: HGET
    #[doc(alias = "fetch")]
    pub async fn get(&self, field: &str) -> Result<Value> {
        self.get_with(field, None).await
    }

    /// Get a field using `spec`, overriding the configured marshallers
    pub async fn get_as(&self, field: &str, spec: &MarshalSpec) -> Result<Value> {
        self.get_with(field, Some(spec)).await
    }

    async fn get_with(&self, field: &str, spec: Option<&MarshalSpec>) -> Result<Value> {
        let reply = self
            .call(self.command(CommandType::HGet).arg(self.encode_field(field)?))
            .await?;
        self.codec().from_wire(&reply, spec.or_else(|| self.field_spec(field)))
    }

    /// Redis: HEXISTS
    #[doc(alias = "include", alias = "contains", alias = "is_member", alias = "is_key")]
    pub async fn has_key(&self, field: &str) -> Result<bool> {
        self.call(self.command(CommandType::HExists).arg(self.encode_field(field)?))
            .await?
            .into_bool()
    }

    /// Remove a field. Returns the number of fields removed.
    ///
    /// Redis: HDEL
    pub async fn delete(&self, field: &str) -> Result<i64> {
        self.call(self.command(CommandType::HDel).arg(self.encode_field(field)?))
            .await?
            .into_integer()
    }

    /// Atomically add `delta` to an integer field, returning the new value
    ///
    /// Redis: HINCRBY
    #[doc(alias = "incr")]
    pub async fn incrby(&self, field: &str, delta: i64) -> Result<i64> {
        self.call(
            self.command(CommandType::HIncrBy)
                .arg(self.encode_field(field)?)
                .arg(delta),
        )
        .await?
        .into_integer()
    }

    /// `incrby(field, 1)`
    pub async fn incr(&self, field: &str) -> Result<i64> {
        self.incrby(field, 1).await
    }

    // =========================================================================
    // Whole hash
    // =========================================================================

    /// All field names, decoded with the key marshaller
    ///
    /// Redis: HKEYS
    pub async fn keys(&self) -> Result<Vec<Value>> {
        let reply = self.call(self.command(CommandType::HKeys)).await?;
        self.codec()
            .all_from_wire(reply, Some(&self.config().key_marshaller))
    }

    /// All values, decoded with the collection default (field specs need
    /// the field name; use [`all`](Self::all) or
    /// [`bulk_values`](Self::bulk_values) for those)
    ///
    /// Redis: HVALS
    #[doc(alias = "vals")]
    pub async fn values(&self) -> Result<Vec<Value>> {
        let reply = self.call(self.command(CommandType::HVals)).await?;
        self.codec().all_from_wire(reply, None)
    }

    /// Every field with its value decoded per field
    ///
    /// Redis: HGETALL
    pub async fn all(&self) -> Result<Map<String, Value>> {
        let items = self
            .call(self.command(CommandType::HGetAll))
            .await?
            .into_array()?;
        if items.len() % 2 != 0 {
            return Err(ObjectError::Protocol(format!(
                "HGETALL reply has an odd number of elements ({})",
                items.len()
            )));
        }

        let mut fields = Map::new();
        for pair in items.chunks(2) {
            let name = self.field_name(&pair[0])?;
            let value = self.codec().from_wire(&pair[1], self.field_spec(&name))?;
            fields.insert(name, value);
        }
        Ok(fields)
    }

    /// Number of fields
    ///
    /// Redis: HLEN
    #[doc(alias = "length", alias = "count")]
    pub async fn size(&self) -> Result<i64> {
        self.call(self.command(CommandType::HLen)).await?.into_integer()
    }

    /// Redis: HLEN == 0
    #[doc(alias = "is_empty")]
    pub async fn empty(&self) -> Result<bool> {
        Ok(self.size().await? == 0)
    }

    // =========================================================================
    // Bulk
    // =========================================================================

    /// Set many fields at once. Accepts a map or a list of pairs.
    ///
    /// Redis: HMSET
    #[doc(alias = "update")]
    pub async fn bulk_set<I, K, V>(&self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut command = self.command(CommandType::HMSet);
        let mut any = false;
        for (field, value) in values {
            let field = field.into();
            command = command
                .arg(self.encode_field(&field)?)
                .arg(self.encode_value(&field, &value.into(), None)?);
            any = true;
        }
        if !any {
            return Err(ObjectError::usage("bulk_set needs at least one field"));
        }
        self.call(command).await?.expect_ok()
    }

    /// Set many fields, skipping those that already exist. Returns the
    /// number of fields written.
    ///
    /// Redis: HSETNX (pipelined)
    pub async fn fill<I, K, V>(&self, values: I) -> Result<i64>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let commands = self.fill_commands(values)?;
        if commands.is_empty() {
            return Err(ObjectError::usage("fill needs at least one field"));
        }
        let mut written = 0;
        for reply in self.pipeline(commands).await? {
            written += reply.into_integer()?;
        }
        Ok(written)
    }

    fn fill_commands<I, K, V>(&self, values: I) -> Result<Vec<Command>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        values
            .into_iter()
            .map(|(field, value)| {
                let field = field.into();
                Ok(self
                    .command(CommandType::HSetNx)
                    .arg(self.encode_field(&field)?)
                    .arg(self.encode_value(&field, &value.into(), None)?))
            })
            .collect()
    }

    /// Fetch many fields as (field, value) pairs in request order
    ///
    /// Redis: HMGET
    pub async fn bulk_get<I, S>(&self, fields: I) -> Result<FieldValues>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields: Vec<String> = fields.into_iter().map(|f| f.as_ref().to_string()).collect();
        let values = self.fetch_many(&fields).await?;
        Ok(fields.into_iter().zip(values).collect())
    }

    /// Fetch many fields' values in request order
    ///
    /// Redis: HMGET
    pub async fn bulk_values<I, S>(&self, fields: I) -> Result<Vec<Value>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields: Vec<String> = fields.into_iter().map(|f| f.as_ref().to_string()).collect();
        self.fetch_many(&fields).await
    }

    async fn fetch_many(&self, fields: &[String]) -> Result<Vec<Value>> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }
        let wire_fields = fields
            .iter()
            .map(|f| self.encode_field(f))
            .collect::<Result<Vec<_>>>()?;
        let replies = self
            .call(self.command(CommandType::HMGet).args(wire_fields))
            .await?
            .into_array()?;
        if replies.len() != fields.len() {
            return Err(ObjectError::Protocol(format!(
                "HMGET returned {} values for {} fields",
                replies.len(),
                fields.len()
            )));
        }
        fields
            .iter()
            .zip(replies.iter())
            .map(|(field, reply)| self.codec().from_wire(reply, self.field_spec(field)))
            .collect()
    }
}

impl Deref for Hash {
    type Target = EntityHandle;

    fn deref(&self) -> &EntityHandle {
        &self.handle
    }
}

impl DerefMut for Hash {
    fn deref_mut(&mut self) -> &mut EntityHandle {
        &mut self.handle
    }
}
