//! Command definitions
//!
//! The primitives consumed by the adapters, grouped by the data type they
//! operate on.

use std::fmt;

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    // keys
    Del,
    Exists,
    Type,
    Rename,
    RenameNx,
    Expire,
    ExpireAt,
    Persist,
    Ttl,

    // strings
    Get,
    Set,
    SetNx,

    // hashes
    HSet,
    HSetNx,
    HGet,
    HExists,
    HDel,
    HKeys,
    HVals,
    HGetAll,
    HLen,
    HMSet,
    HMGet,
    HIncrBy,

    // lists
    RPush,
    LPush,
    RPop,
    LPop,
    LRange,
    LInsert,
    LRem,
    LSet,
    LIndex,
    LLen,
    LTrim,

    // sets
    SAdd,
    SPop,
    SMembers,
    SIsMember,
    SRem,
    SCard,

    // sorted sets
    ZAdd,
    ZScore,
    ZRank,
    ZRevRank,
    ZRange,
    ZRevRange,
    ZRangeByScore,
    ZRevRangeByScore,
    ZCount,
    ZRem,
    ZRemRangeByRank,
    ZRemRangeByScore,
    ZCard,
    ZIncrBy,
}

impl CommandType {
    /// Name sent on the wire
    pub fn name(&self) -> &'static str {
        match self {
            CommandType::Del => "DEL",
            CommandType::Exists => "EXISTS",
            CommandType::Type => "TYPE",
            CommandType::Rename => "RENAME",
            CommandType::RenameNx => "RENAMENX",
            CommandType::Expire => "EXPIRE",
            CommandType::ExpireAt => "EXPIREAT",
            CommandType::Persist => "PERSIST",
            CommandType::Ttl => "TTL",
            CommandType::Get => "GET",
            CommandType::Set => "SET",
            CommandType::SetNx => "SETNX",
            CommandType::HSet => "HSET",
            CommandType::HSetNx => "HSETNX",
            CommandType::HGet => "HGET",
            CommandType::HExists => "HEXISTS",
            CommandType::HDel => "HDEL",
            CommandType::HKeys => "HKEYS",
            CommandType::HVals => "HVALS",
            CommandType::HGetAll => "HGETALL",
            CommandType::HLen => "HLEN",
            CommandType::HMSet => "HMSET",
            CommandType::HMGet => "HMGET",
            CommandType::HIncrBy => "HINCRBY",
            CommandType::RPush => "RPUSH",
            CommandType::LPush => "LPUSH",
            CommandType::RPop => "RPOP",
            CommandType::LPop => "LPOP",
            CommandType::LRange => "LRANGE",
            CommandType::LInsert => "LINSERT",
            CommandType::LRem => "LREM",
            CommandType::LSet => "LSET",
            CommandType::LIndex => "LINDEX",
            CommandType::LLen => "LLEN",
            CommandType::LTrim => "LTRIM",
            CommandType::SAdd => "SADD",
            CommandType::SPop => "SPOP",
            CommandType::SMembers => "SMEMBERS",
            CommandType::SIsMember => "SISMEMBER",
            CommandType::SRem => "SREM",
            CommandType::SCard => "SCARD",
            CommandType::ZAdd => "ZADD",
            CommandType::ZScore => "ZSCORE",
            CommandType::ZRank => "ZRANK",
            CommandType::ZRevRank => "ZREVRANK",
            CommandType::ZRange => "ZRANGE",
            CommandType::ZRevRange => "ZREVRANGE",
            CommandType::ZRangeByScore => "ZRANGEBYSCORE",
            CommandType::ZRevRangeByScore => "ZREVRANGEBYSCORE",
            CommandType::ZCount => "ZCOUNT",
            CommandType::ZRem => "ZREM",
            CommandType::ZRemRangeByRank => "ZREMRANGEBYRANK",
            CommandType::ZRemRangeByScore => "ZREMRANGEBYSCORE",
            CommandType::ZCard => "ZCARD",
            CommandType::ZIncrBy => "ZINCRBY",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primitive command ready to be sent
///
/// The first argument is always the key the command addresses.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    kind: CommandType,
    args: Vec<String>,
}

impl Command {
    pub fn new(kind: CommandType) -> Self {
        Self {
            kind,
            args: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Append several arguments
    pub fn args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        self.args.extend(args.into_iter().map(|a| a.to_string()));
        self
    }

    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        self.kind
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// The key this command addresses, if any
    pub fn key(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.name())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
