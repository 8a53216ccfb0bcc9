//! In-process transport
//!
//! A keyspace held in memory that answers every primitive the adapters use,
//! with the store's reply shapes and error strings. Expired keys are dropped
//! lazily when a command touches them; empty collections are removed after
//! each command.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::Transport;
use crate::error::{ObjectError, Result};
use crate::protocol::{Command, CommandType, Reply};

const WRONG_TYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";
const NOT_INTEGER: &str = "ERR value is not an integer or out of range";
const NOT_FLOAT: &str = "ERR value is not a valid float";
const SYNTAX: &str = "ERR syntax error";

/// Transport backed by an in-memory keyspace
#[derive(Default)]
pub struct MemoryTransport {
    keyspace: Mutex<Keyspace>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys
    pub fn key_count(&self) -> usize {
        let mut keyspace = self.keyspace.lock();
        keyspace.purge_all();
        keyspace.entries.len()
    }

    /// Drop every key
    pub fn flush(&self) {
        self.keyspace.lock().entries.clear();
    }

    /// Execute one command synchronously
    pub fn execute(&self, command: &Command) -> Result<Reply> {
        let mut keyspace = self.keyspace.lock();
        let args = Args {
            name: command.command_type().name(),
            items: command.arguments(),
        };
        args.require(1)?;

        let result = match command.command_type() {
            CommandType::Del
            | CommandType::Exists
            | CommandType::Type
            | CommandType::Rename
            | CommandType::RenameNx
            | CommandType::Expire
            | CommandType::ExpireAt
            | CommandType::Persist
            | CommandType::Ttl => key_command(&mut keyspace, command.command_type(), &args),
            CommandType::Get | CommandType::Set | CommandType::SetNx => {
                string_command(&mut keyspace, command.command_type(), &args)
            }
            CommandType::HSet
            | CommandType::HSetNx
            | CommandType::HGet
            | CommandType::HExists
            | CommandType::HDel
            | CommandType::HKeys
            | CommandType::HVals
            | CommandType::HGetAll
            | CommandType::HLen
            | CommandType::HMSet
            | CommandType::HMGet
            | CommandType::HIncrBy => hash_command(&mut keyspace, command.command_type(), &args),
            CommandType::RPush
            | CommandType::LPush
            | CommandType::RPop
            | CommandType::LPop
            | CommandType::LRange
            | CommandType::LInsert
            | CommandType::LRem
            | CommandType::LSet
            | CommandType::LIndex
            | CommandType::LLen
            | CommandType::LTrim => list_command(&mut keyspace, command.command_type(), &args),
            CommandType::SAdd
            | CommandType::SPop
            | CommandType::SMembers
            | CommandType::SIsMember
            | CommandType::SRem
            | CommandType::SCard => set_command(&mut keyspace, command.command_type(), &args),
            _ => zset_command(&mut keyspace, command.command_type(), &args),
        };

        if let Some(key) = command.key() {
            keyspace.prune(key);
        }
        result
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn call(&self, command: Command) -> Result<Reply> {
        tracing::trace!("memory <- {}", command);
        self.execute(&command)
    }
}

// =============================================================================
// Keyspace
// =============================================================================

#[derive(Default)]
struct Keyspace {
    entries: HashMap<String, Entry>,
}

struct Entry {
    data: Data,
    expires_at: Option<SystemTime>,
}

enum Data {
    Str(String),
    Hash(BTreeMap<String, String>),
    List(VecDeque<String>),
    Set(BTreeSet<String>),
    ZSet(SortedSet),
}

impl Entry {
    fn new(data: Data) -> Self {
        Self {
            data,
            expires_at: None,
        }
    }

    fn is_expired(&self, now: SystemTime) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

impl Data {
    fn type_name(&self) -> &'static str {
        match self {
            Data::Str(_) => "string",
            Data::Hash(_) => "hash",
            Data::List(_) => "list",
            Data::Set(_) => "set",
            Data::ZSet(_) => "zset",
        }
    }

    fn is_empty_collection(&self) -> bool {
        match self {
            Data::Str(_) => false,
            Data::Hash(h) => h.is_empty(),
            Data::List(l) => l.is_empty(),
            Data::Set(s) => s.is_empty(),
            Data::ZSet(z) => z.scores.is_empty(),
        }
    }

    fn string(&mut self) -> Result<&mut String> {
        match self {
            Data::Str(s) => Ok(s),
            _ => Err(store_error(WRONG_TYPE)),
        }
    }

    fn hash(&mut self) -> Result<&mut BTreeMap<String, String>> {
        match self {
            Data::Hash(h) => Ok(h),
            _ => Err(store_error(WRONG_TYPE)),
        }
    }

    fn list(&mut self) -> Result<&mut VecDeque<String>> {
        match self {
            Data::List(l) => Ok(l),
            _ => Err(store_error(WRONG_TYPE)),
        }
    }

    fn set(&mut self) -> Result<&mut BTreeSet<String>> {
        match self {
            Data::Set(s) => Ok(s),
            _ => Err(store_error(WRONG_TYPE)),
        }
    }

    fn zset(&mut self) -> Result<&mut SortedSet> {
        match self {
            Data::ZSet(z) => Ok(z),
            _ => Err(store_error(WRONG_TYPE)),
        }
    }
}

impl Keyspace {
    fn purge(&mut self, key: &str) {
        let now = SystemTime::now();
        if self.entries.get(key).is_some_and(|e| e.is_expired(now)) {
            self.entries.remove(key);
        }
    }

    fn purge_all(&mut self) {
        let now = SystemTime::now();
        self.entries.retain(|_, e| !e.is_expired(now));
    }

    fn entry(&mut self, key: &str) -> Option<&mut Entry> {
        self.purge(key);
        self.entries.get_mut(key)
    }

    fn data(&mut self, key: &str) -> Option<&mut Data> {
        self.entry(key).map(|e| &mut e.data)
    }

    fn data_or_insert(&mut self, key: &str, make: fn() -> Data) -> &mut Data {
        self.purge(key);
        &mut self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(make()))
            .data
    }

    fn prune(&mut self, key: &str) {
        if self
            .entries
            .get(key)
            .is_some_and(|e| e.data.is_empty_collection())
        {
            self.entries.remove(key);
        }
    }
}

// =============================================================================
// Sorted set storage
// =============================================================================

#[derive(Default)]
struct SortedSet {
    scores: HashMap<String, f64>,
}

impl SortedSet {
    /// Members ascending by score, ties by member bytes
    fn ordered(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> = self
            .scores
            .iter()
            .map(|(m, s)| (m.clone(), *s))
            .collect();
        entries.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    fn ordered_by(&self, reverse: bool) -> Vec<(String, f64)> {
        let mut entries = self.ordered();
        if reverse {
            entries.reverse();
        }
        entries
    }
}

#[derive(Clone, Copy)]
struct ScoreLimit {
    value: f64,
    exclusive: bool,
}

impl ScoreLimit {
    fn parse(text: &str) -> Result<Self> {
        let (exclusive, body) = match text.strip_prefix('(') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let value = match body.to_ascii_lowercase().as_str() {
            "-inf" => f64::NEG_INFINITY,
            "+inf" | "inf" => f64::INFINITY,
            other => other
                .parse::<f64>()
                .ok()
                .filter(|v| !v.is_nan())
                .ok_or_else(|| store_error("ERR min or max is not a float"))?,
        };
        Ok(Self { value, exclusive })
    }

    fn below(&self, score: f64) -> bool {
        if self.exclusive {
            self.value < score
        } else {
            self.value <= score
        }
    }

    fn above(&self, score: f64) -> bool {
        if self.exclusive {
            score < self.value
        } else {
            score <= self.value
        }
    }
}

fn format_score(score: f64) -> String {
    if score == f64::INFINITY {
        "inf".to_string()
    } else if score == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        score.to_string()
    }
}

// =============================================================================
// Argument access
// =============================================================================

struct Args<'a> {
    name: &'static str,
    items: &'a [String],
}

impl<'a> Args<'a> {
    fn require(&self, count: usize) -> Result<()> {
        if self.items.len() < count {
            Err(store_error(format!(
                "ERR wrong number of arguments for '{}' command",
                self.name.to_ascii_lowercase()
            )))
        } else {
            Ok(())
        }
    }

    fn str(&self, index: usize) -> Result<&'a str> {
        self.require(index + 1)?;
        Ok(self.items[index].as_str())
    }

    fn int(&self, index: usize) -> Result<i64> {
        self.str(index)?
            .parse()
            .map_err(|_| store_error(NOT_INTEGER))
    }

    fn float(&self, index: usize) -> Result<f64> {
        parse_float(self.str(index)?)
    }

    fn rest(&self, from: usize) -> &'a [String] {
        self.items.get(from..).unwrap_or(&[])
    }

    /// Remaining arguments as (first, second) pairs
    fn pairs(&self, from: usize) -> Result<Vec<(&'a str, &'a str)>> {
        let rest = self.rest(from);
        if rest.is_empty() || rest.len() % 2 != 0 {
            return Err(store_error(format!(
                "ERR wrong number of arguments for '{}' command",
                self.name.to_ascii_lowercase()
            )));
        }
        Ok(rest
            .chunks(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
            .collect())
    }
}

fn parse_float(text: &str) -> Result<f64> {
    let value = match text.to_ascii_lowercase().as_str() {
        "-inf" => f64::NEG_INFINITY,
        "+inf" | "inf" => f64::INFINITY,
        other => other.parse::<f64>().map_err(|_| store_error(NOT_FLOAT))?,
    };
    if value.is_nan() {
        return Err(store_error(NOT_FLOAT));
    }
    Ok(value)
}

fn store_error(message: impl Into<String>) -> ObjectError {
    ObjectError::Transport(message.into())
}

/// Resolve an inclusive (start, stop) pair with negative indices against
/// `len`. `None` when the window is empty.
fn normalize_range(start: i64, stop: i64, len: usize) -> Option<(usize, usize)> {
    let len = len as i64;
    let start = if start < 0 { start.saturating_add(len).max(0) } else { start };
    let stop = if stop < 0 { stop.saturating_add(len) } else { stop.min(len - 1) };
    if start > stop || start >= len {
        None
    } else {
        Some((start as usize, stop as usize))
    }
}

fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let index = if index < 0 { index.saturating_add(len) } else { index };
    (0..len).contains(&index).then_some(index as usize)
}

fn unix_time(timestamp: i64) -> SystemTime {
    if timestamp <= 0 {
        UNIX_EPOCH
    } else {
        UNIX_EPOCH + Duration::from_secs(timestamp as u64)
    }
}

// =============================================================================
// Keys
// =============================================================================

fn key_command(ks: &mut Keyspace, kind: CommandType, args: &Args<'_>) -> Result<Reply> {
    let key = args.str(0)?;
    match kind {
        CommandType::Del => {
            let mut removed = 0;
            for k in args.rest(0) {
                ks.purge(k);
                if ks.entries.remove(k.as_str()).is_some() {
                    removed += 1;
                }
            }
            Ok(Reply::Integer(removed))
        }
        CommandType::Exists => {
            let mut found = 0;
            for k in args.rest(0) {
                if ks.entry(k).is_some() {
                    found += 1;
                }
            }
            Ok(Reply::Integer(found))
        }
        CommandType::Type => Ok(Reply::Status(
            ks.data(key).map_or("none", |d| d.type_name()).to_string(),
        )),
        CommandType::Rename | CommandType::RenameNx => {
            let destination = args.str(1)?;
            if ks.entry(key).is_none() {
                return Err(store_error("ERR no such key"));
            }
            let only_if_absent = kind == CommandType::RenameNx;
            if only_if_absent && ks.entry(destination).is_some() {
                return Ok(Reply::Integer(0));
            }
            if key != destination {
                if let Some(entry) = ks.entries.remove(key) {
                    ks.entries.insert(destination.to_string(), entry);
                }
            }
            Ok(if only_if_absent {
                Reply::Integer(1)
            } else {
                Reply::ok()
            })
        }
        CommandType::Expire | CommandType::ExpireAt => {
            let amount = args.int(1)?;
            let deadline = if kind == CommandType::Expire {
                SystemTime::now() + Duration::from_secs(amount.max(0) as u64)
            } else {
                unix_time(amount)
            };
            let expire_now = (kind == CommandType::Expire && amount <= 0)
                || deadline <= SystemTime::now();
            let Some(entry) = ks.entry(key) else {
                return Ok(Reply::Integer(0));
            };
            entry.expires_at = Some(deadline);
            if expire_now {
                ks.entries.remove(key);
            }
            Ok(Reply::Integer(1))
        }
        CommandType::Persist => Ok(Reply::Integer(
            match ks.entry(key) {
                Some(entry) => i64::from(entry.expires_at.take().is_some()),
                None => 0,
            },
        )),
        CommandType::Ttl => Ok(Reply::Integer(match ks.entry(key) {
            None => -2,
            Some(Entry {
                expires_at: None, ..
            }) => -1,
            Some(Entry {
                expires_at: Some(at),
                ..
            }) => {
                let remaining = at
                    .duration_since(SystemTime::now())
                    .unwrap_or(Duration::ZERO);
                ((remaining.as_millis() + 500) / 1000) as i64
            }
        })),
        _ => Err(store_error(format!("ERR unknown command '{}'", kind))),
    }
}

// =============================================================================
// Strings
// =============================================================================

fn string_command(ks: &mut Keyspace, kind: CommandType, args: &Args<'_>) -> Result<Reply> {
    let key = args.str(0)?;
    match kind {
        CommandType::Get => match ks.data(key) {
            None => Ok(Reply::Nil),
            Some(data) => Ok(Reply::Bulk(data.string()?.clone())),
        },
        CommandType::Set => {
            let value = args.str(1)?;
            ks.entries
                .insert(key.to_string(), Entry::new(Data::Str(value.to_string())));
            Ok(Reply::ok())
        }
        CommandType::SetNx => {
            let value = args.str(1)?;
            if ks.entry(key).is_some() {
                return Ok(Reply::Integer(0));
            }
            ks.entries
                .insert(key.to_string(), Entry::new(Data::Str(value.to_string())));
            Ok(Reply::Integer(1))
        }
        _ => Err(store_error(format!("ERR unknown command '{}'", kind))),
    }
}

// =============================================================================
// Hashes
// =============================================================================

fn hash_command(ks: &mut Keyspace, kind: CommandType, args: &Args<'_>) -> Result<Reply> {
    let key = args.str(0)?;
    match kind {
        CommandType::HSet | CommandType::HMSet => {
            let pairs = args.pairs(1)?;
            let hash = ks.data_or_insert(key, || Data::Hash(BTreeMap::new())).hash()?;
            let mut added = 0;
            for (field, value) in pairs {
                if hash.insert(field.to_string(), value.to_string()).is_none() {
                    added += 1;
                }
            }
            Ok(if kind == CommandType::HMSet {
                Reply::ok()
            } else {
                Reply::Integer(added)
            })
        }
        CommandType::HSetNx => {
            let (field, value) = (args.str(1)?, args.str(2)?);
            let hash = ks.data_or_insert(key, || Data::Hash(BTreeMap::new())).hash()?;
            if hash.contains_key(field) {
                return Ok(Reply::Integer(0));
            }
            hash.insert(field.to_string(), value.to_string());
            Ok(Reply::Integer(1))
        }
        CommandType::HIncrBy => {
            let field = args.str(1)?;
            let delta = args.int(2)?;
            let hash = ks.data_or_insert(key, || Data::Hash(BTreeMap::new())).hash()?;
            let current = match hash.get(field) {
                Some(v) => v
                    .parse::<i64>()
                    .map_err(|_| store_error("ERR hash value is not an integer"))?,
                None => 0,
            };
            let next = current
                .checked_add(delta)
                .ok_or_else(|| store_error("ERR increment or decrement would overflow"))?;
            hash.insert(field.to_string(), next.to_string());
            Ok(Reply::Integer(next))
        }
        _ => {
            let Some(data) = ks.data(key) else {
                return Ok(match kind {
                    CommandType::HGet => Reply::Nil,
                    CommandType::HExists | CommandType::HDel | CommandType::HLen => {
                        Reply::Integer(0)
                    }
                    CommandType::HMGet => {
                        args.str(1)?;
                        Reply::Array(args.rest(1).iter().map(|_| Reply::Nil).collect())
                    }
                    _ => Reply::Array(Vec::new()),
                });
            };
            let hash = data.hash()?;
            match kind {
                CommandType::HGet => Ok(Reply::optional(hash.get(args.str(1)?).cloned())),
                CommandType::HExists => {
                    Ok(Reply::Integer(i64::from(hash.contains_key(args.str(1)?))))
                }
                CommandType::HDel => {
                    args.str(1)?;
                    let removed = args
                        .rest(1)
                        .iter()
                        .filter(|f| hash.remove(f.as_str()).is_some())
                        .count();
                    Ok(Reply::Integer(removed as i64))
                }
                CommandType::HKeys => Ok(Reply::bulk_array(hash.keys().cloned())),
                CommandType::HVals => Ok(Reply::bulk_array(hash.values().cloned())),
                CommandType::HGetAll => Ok(Reply::bulk_array(
                    hash.iter().flat_map(|(f, v)| [f.clone(), v.clone()]),
                )),
                CommandType::HLen => Ok(Reply::Integer(hash.len() as i64)),
                CommandType::HMGet => {
                    args.str(1)?;
                    Ok(Reply::Array(
                        args.rest(1)
                            .iter()
                            .map(|f| Reply::optional(hash.get(f.as_str()).cloned()))
                            .collect(),
                    ))
                }
                _ => Err(store_error(format!("ERR unknown command '{}'", kind))),
            }
        }
    }
}

// =============================================================================
// Lists
// =============================================================================

fn list_command(ks: &mut Keyspace, kind: CommandType, args: &Args<'_>) -> Result<Reply> {
    let key = args.str(0)?;
    match kind {
        CommandType::RPush | CommandType::LPush => {
            args.str(1)?;
            let list = ks.data_or_insert(key, || Data::List(VecDeque::new())).list()?;
            for value in args.rest(1) {
                if kind == CommandType::RPush {
                    list.push_back(value.clone());
                } else {
                    list.push_front(value.clone());
                }
            }
            Ok(Reply::Integer(list.len() as i64))
        }
        _ => {
            let Some(data) = ks.data(key) else {
                return match kind {
                    CommandType::RPop | CommandType::LPop | CommandType::LIndex => Ok(Reply::Nil),
                    CommandType::LRange => Ok(Reply::Array(Vec::new())),
                    CommandType::LSet => Err(store_error("ERR no such key")),
                    CommandType::LTrim => Ok(Reply::ok()),
                    _ => Ok(Reply::Integer(0)),
                };
            };
            let list = data.list()?;
            match kind {
                CommandType::RPop => Ok(Reply::optional(list.pop_back())),
                CommandType::LPop => Ok(Reply::optional(list.pop_front())),
                CommandType::LRange => {
                    let (start, stop) = (args.int(1)?, args.int(2)?);
                    Ok(match normalize_range(start, stop, list.len()) {
                        Some((s, e)) => Reply::bulk_array(list.range(s..=e).cloned()),
                        None => Reply::Array(Vec::new()),
                    })
                }
                CommandType::LInsert => {
                    let (place, pivot, value) = (args.str(1)?, args.str(2)?, args.str(3)?);
                    let after = match place.to_ascii_uppercase().as_str() {
                        "BEFORE" => false,
                        "AFTER" => true,
                        _ => return Err(store_error(SYNTAX)),
                    };
                    match list.iter().position(|v| v == pivot) {
                        None => Ok(Reply::Integer(-1)),
                        Some(at) => {
                            list.insert(if after { at + 1 } else { at }, value.to_string());
                            Ok(Reply::Integer(list.len() as i64))
                        }
                    }
                }
                CommandType::LRem => {
                    let (count, value) = (args.int(1)?, args.str(2)?);
                    let limit = if count == 0 { usize::MAX } else { count.unsigned_abs() as usize };
                    let mut removed = 0;
                    if count >= 0 {
                        let mut i = 0;
                        while i < list.len() && removed < limit {
                            if list[i] == value {
                                list.remove(i);
                                removed += 1;
                            } else {
                                i += 1;
                            }
                        }
                    } else {
                        let mut i = list.len();
                        while i > 0 && removed < limit {
                            i -= 1;
                            if list[i] == value {
                                list.remove(i);
                                removed += 1;
                            }
                        }
                    }
                    Ok(Reply::Integer(removed as i64))
                }
                CommandType::LSet => {
                    let (index, value) = (args.int(1)?, args.str(2)?);
                    let at = normalize_index(index, list.len())
                        .ok_or_else(|| store_error("ERR index out of range"))?;
                    list[at] = value.to_string();
                    Ok(Reply::ok())
                }
                CommandType::LIndex => {
                    let index = args.int(1)?;
                    Ok(Reply::optional(
                        normalize_index(index, list.len()).map(|at| list[at].clone()),
                    ))
                }
                CommandType::LLen => Ok(Reply::Integer(list.len() as i64)),
                CommandType::LTrim => {
                    let (start, stop) = (args.int(1)?, args.int(2)?);
                    match normalize_range(start, stop, list.len()) {
                        Some((s, e)) => {
                            list.truncate(e + 1);
                            list.drain(..s);
                        }
                        None => list.clear(),
                    }
                    Ok(Reply::ok())
                }
                _ => Err(store_error(format!("ERR unknown command '{}'", kind))),
            }
        }
    }
}

// =============================================================================
// Sets
// =============================================================================

fn set_command(ks: &mut Keyspace, kind: CommandType, args: &Args<'_>) -> Result<Reply> {
    let key = args.str(0)?;
    match kind {
        CommandType::SAdd => {
            args.str(1)?;
            let set = ks.data_or_insert(key, || Data::Set(BTreeSet::new())).set()?;
            let added = args
                .rest(1)
                .iter()
                .filter(|m| set.insert(m.to_string()))
                .count();
            Ok(Reply::Integer(added as i64))
        }
        _ => {
            let Some(data) = ks.data(key) else {
                return Ok(match kind {
                    CommandType::SPop => Reply::Nil,
                    CommandType::SMembers => Reply::Array(Vec::new()),
                    _ => Reply::Integer(0),
                });
            };
            let set = data.set()?;
            match kind {
                CommandType::SPop => Ok(Reply::optional(set.pop_first())),
                CommandType::SMembers => Ok(Reply::bulk_array(set.iter().cloned())),
                CommandType::SIsMember => Ok(Reply::Integer(i64::from(set.contains(args.str(1)?)))),
                CommandType::SRem => {
                    args.str(1)?;
                    let removed = args.rest(1).iter().filter(|m| set.remove(m.as_str())).count();
                    Ok(Reply::Integer(removed as i64))
                }
                CommandType::SCard => Ok(Reply::Integer(set.len() as i64)),
                _ => Err(store_error(format!("ERR unknown command '{}'", kind))),
            }
        }
    }
}

// =============================================================================
// Sorted sets
// =============================================================================

fn zset_command(ks: &mut Keyspace, kind: CommandType, args: &Args<'_>) -> Result<Reply> {
    let key = args.str(0)?;
    match kind {
        CommandType::ZAdd => {
            let pairs = args
                .pairs(1)?
                .into_iter()
                .map(|(score, member)| Ok((parse_float(score)?, member)))
                .collect::<Result<Vec<_>>>()?;
            let zset = ks.data_or_insert(key, || Data::ZSet(SortedSet::default())).zset()?;
            let mut added = 0;
            for (score, member) in pairs {
                if zset.scores.insert(member.to_string(), score).is_none() {
                    added += 1;
                }
            }
            Ok(Reply::Integer(added))
        }
        CommandType::ZIncrBy => {
            let delta = args.float(1)?;
            let member = args.str(2)?;
            let zset = ks.data_or_insert(key, || Data::ZSet(SortedSet::default())).zset()?;
            let next = zset.scores.get(member).copied().unwrap_or(0.0) + delta;
            if next.is_nan() {
                return Err(store_error("ERR resulting score is not a number (NaN)"));
            }
            zset.scores.insert(member.to_string(), next);
            Ok(Reply::Bulk(format_score(next)))
        }
        _ => {
            let Some(data) = ks.data(key) else {
                return Ok(match kind {
                    CommandType::ZScore | CommandType::ZRank | CommandType::ZRevRank => Reply::Nil,
                    CommandType::ZRange
                    | CommandType::ZRevRange
                    | CommandType::ZRangeByScore
                    | CommandType::ZRevRangeByScore => Reply::Array(Vec::new()),
                    _ => Reply::Integer(0),
                });
            };
            let zset = data.zset()?;
            match kind {
                CommandType::ZScore => Ok(Reply::optional(
                    zset.scores.get(args.str(1)?).map(|s| format_score(*s)),
                )),
                CommandType::ZRank | CommandType::ZRevRank => {
                    let member = args.str(1)?;
                    let ordered = zset.ordered_by(kind == CommandType::ZRevRank);
                    Ok(ordered
                        .iter()
                        .position(|(m, _)| m == member)
                        .map_or(Reply::Nil, |rank| Reply::Integer(rank as i64)))
                }
                CommandType::ZRange | CommandType::ZRevRange => {
                    let (start, stop) = (args.int(1)?, args.int(2)?);
                    let with_scores = match args.rest(3) {
                        [] => false,
                        [flag] if flag.eq_ignore_ascii_case("WITHSCORES") => true,
                        _ => return Err(store_error(SYNTAX)),
                    };
                    let ordered = zset.ordered_by(kind == CommandType::ZRevRange);
                    let window: &[(String, f64)] = match normalize_range(start, stop, ordered.len()) {
                        Some((s, e)) => &ordered[s..=e],
                        None => &[],
                    };
                    Ok(scored_reply(window, with_scores))
                }
                CommandType::ZRangeByScore | CommandType::ZRevRangeByScore => {
                    let reverse = kind == CommandType::ZRevRangeByScore;
                    let (first, second) = (ScoreLimit::parse(args.str(1)?)?, ScoreLimit::parse(args.str(2)?)?);
                    // descending queries take max before min
                    let (min, max) = if reverse { (second, first) } else { (first, second) };

                    let mut with_scores = false;
                    let mut limit: Option<(i64, i64)> = None;
                    let options = args.rest(3);
                    let mut i = 0;
                    while i < options.len() {
                        if options[i].eq_ignore_ascii_case("WITHSCORES") {
                            with_scores = true;
                            i += 1;
                        } else if options[i].eq_ignore_ascii_case("LIMIT") && i + 2 < options.len() {
                            let offset = options[i + 1].parse().map_err(|_| store_error(NOT_INTEGER))?;
                            let count = options[i + 2].parse().map_err(|_| store_error(NOT_INTEGER))?;
                            limit = Some((offset, count));
                            i += 3;
                        } else {
                            return Err(store_error(SYNTAX));
                        }
                    }

                    let selected: Vec<(String, f64)> = zset
                        .ordered_by(reverse)
                        .into_iter()
                        .filter(|(_, score)| min.below(*score) && max.above(*score))
                        .collect();
                    let window: Vec<(String, f64)> = match limit {
                        Some((offset, _)) if offset < 0 => Vec::new(),
                        Some((offset, count)) => {
                            let take = if count < 0 { usize::MAX } else { count as usize };
                            selected.into_iter().skip(offset as usize).take(take).collect()
                        }
                        None => selected,
                    };
                    Ok(scored_reply(&window, with_scores))
                }
                CommandType::ZCount => {
                    let (min, max) = (ScoreLimit::parse(args.str(1)?)?, ScoreLimit::parse(args.str(2)?)?);
                    let count = zset
                        .scores
                        .values()
                        .filter(|s| min.below(**s) && max.above(**s))
                        .count();
                    Ok(Reply::Integer(count as i64))
                }
                CommandType::ZRem => {
                    args.str(1)?;
                    let removed = args
                        .rest(1)
                        .iter()
                        .filter(|m| zset.scores.remove(m.as_str()).is_some())
                        .count();
                    Ok(Reply::Integer(removed as i64))
                }
                CommandType::ZRemRangeByRank => {
                    let (start, stop) = (args.int(1)?, args.int(2)?);
                    let ordered = zset.ordered();
                    let removed = match normalize_range(start, stop, ordered.len()) {
                        Some((s, e)) => {
                            for (member, _) in &ordered[s..=e] {
                                zset.scores.remove(member);
                            }
                            e - s + 1
                        }
                        None => 0,
                    };
                    Ok(Reply::Integer(removed as i64))
                }
                CommandType::ZRemRangeByScore => {
                    let (min, max) = (ScoreLimit::parse(args.str(1)?)?, ScoreLimit::parse(args.str(2)?)?);
                    let before = zset.scores.len();
                    zset.scores.retain(|_, s| !(min.below(*s) && max.above(*s)));
                    Ok(Reply::Integer((before - zset.scores.len()) as i64))
                }
                CommandType::ZCard => Ok(Reply::Integer(zset.scores.len() as i64)),
                _ => Err(store_error(format!("ERR unknown command '{}'", kind))),
            }
        }
    }
}

fn scored_reply(entries: &[(String, f64)], with_scores: bool) -> Reply {
    if with_scores {
        Reply::bulk_array(
            entries
                .iter()
                .flat_map(|(m, s)| [m.clone(), format_score(*s)]),
        )
    } else {
        Reply::bulk_array(entries.iter().map(|(m, _)| m.clone()))
    }
}
