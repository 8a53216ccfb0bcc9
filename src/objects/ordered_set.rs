//! Sorted sets
//!
//! Rank windows and score intervals both go through
//! [`range`](super::range); this module only picks the primitive and
//! decodes the reply.

use std::ops::{Deref, DerefMut};

use serde_json::Value;

use super::range::{
    decode_entries, score_command, IndexWindow, RangeEntries, RangeOptions, ScoreBound,
    ScoreRangeOptions,
};
use super::EntityHandle;
use crate::config::Config;
use crate::error::{ObjectError, Result};
use crate::protocol::{Command, CommandType};
use crate::transport::SharedTransport;

/// Handle to a sorted set
#[derive(Debug, Clone)]
pub struct OrderedSet {
    handle: EntityHandle,
}

impl OrderedSet {
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

    fn member(&self, member: impl Into<Value>) -> Result<String> {
        self.codec().to_wire(&member.into(), None)
    }

    fn window_command(&self, kind: CommandType, window: IndexWindow, with_scores: bool) -> Command {
        let command = window.command(kind, self.key());
        if with_scores {
            command.arg("WITHSCORES")
        } else {
            command
        }
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Add a member or update its score. Returns 1 for a new member, 0 for
    /// an update.
    ///
    /// Redis: ZADD
    #[doc(alias = "zadd", alias = "put", alias = "set")]
    pub async fn add(&self, member: impl Into<Value>, score: f64) -> Result<i64> {
        self.add_all([(member.into(), score)]).await
    }

    /// Add or update several members in one command. Returns how many were
    /// new.
    ///
    /// Redis: ZADD
    #[doc(alias = "put_all", alias = "set_all")]
    pub async fn add_all<I, V>(&self, entries: I) -> Result<i64>
    where
        I: IntoIterator<Item = (V, f64)>,
        V: Into<Value>,
    {
        let mut command = self.command(CommandType::ZAdd);
        let mut any = false;
        for (member, score) in entries {
            command = command.arg(score).arg(self.member(member)?);
            any = true;
        }
        if !any {
            return Err(ObjectError::usage("add_all needs at least one member"));
        }
        self.call(command).await?.into_integer()
    }

    /// Remove a member. Returns 1 if removed, 0 if absent.
    ///
    /// Redis: ZREM
    #[doc(alias = "remove")]
    pub async fn delete(&self, member: impl Into<Value>) -> Result<i64> {
        self.call(self.command(CommandType::ZRem).arg(self.member(member)?))
            .await?
            .into_integer()
    }

    /// A member's score, `None` if absent
    ///
    /// Redis: ZSCORE
    pub async fn score(&self, member: impl Into<Value>) -> Result<Option<f64>> {
        self.call(self.command(CommandType::ZScore).arg(self.member(member)?))
            .await?
            .into_optional_float()
    }

    /// True when the member has a rank
    #[doc(alias = "include", alias = "contains")]
    pub async fn is_member(&self, member: impl Into<Value>) -> Result<bool> {
        Ok(self.rank(member).await?.is_some())
    }

    /// Position in ascending score order, `None` if absent
    ///
    /// Redis: ZRANK
    pub async fn rank(&self, member: impl Into<Value>) -> Result<Option<i64>> {
        self.call(self.command(CommandType::ZRank).arg(self.member(member)?))
            .await?
            .into_optional_integer()
    }

    /// Position in descending score order, `None` if absent
    ///
    /// Redis: ZREVRANK
    #[doc(alias = "rev_rank")]
    pub async fn revrank(&self, member: impl Into<Value>) -> Result<Option<i64>> {
        self.call(self.command(CommandType::ZRevRank).arg(self.member(member)?))
            .await?
            .into_optional_integer()
    }

    /// Atomically add `by` to a member's score, creating it at 0 first if
    /// needed. Returns the new score.
    ///
    /// Redis: ZINCRBY
    #[doc(alias = "incrby")]
    pub async fn increment(&self, member: impl Into<Value>, by: f64) -> Result<f64> {
        self.call(
            self.command(CommandType::ZIncrBy)
                .arg(by)
                .arg(self.member(member)?),
        )
        .await?
        .into_float()
    }

    /// `increment(member, -by)`
    #[doc(alias = "decrby")]
    pub async fn decrement(&self, member: impl Into<Value>, by: f64) -> Result<f64> {
        self.increment(member, -by).await
    }

    /// `increment(member, 1)`
    pub async fn incr(&self, member: impl Into<Value>) -> Result<f64> {
        self.increment(member, 1.0).await
    }

    /// `decrement(member, 1)`
    pub async fn decr(&self, member: impl Into<Value>) -> Result<f64> {
        self.decrement(member, 1.0).await
    }

    // =========================================================================
    // Rank windows
    // =========================================================================

    /// Every member in ascending score order
    pub async fn members(&self, options: RangeOptions) -> Result<RangeEntries> {
        self.range(0, None, options).await
    }

    /// Members ranked in `[start, end)`, ascending; `None` reads through the
    /// highest rank
    ///
    /// Redis: ZRANGE
    pub async fn range(&self, start: i64, end: Option<i64>, options: RangeOptions) -> Result<RangeEntries> {
        self.window(CommandType::ZRange, start, end, options).await
    }

    /// Members ranked in `[start, end)`, descending
    ///
    /// Redis: ZREVRANGE
    #[doc(alias = "rev_range")]
    pub async fn revrange(&self, start: i64, end: Option<i64>, options: RangeOptions) -> Result<RangeEntries> {
        self.window(CommandType::ZRevRange, start, end, options).await
    }

    async fn window(
        &self,
        kind: CommandType,
        start: i64,
        end: Option<i64>,
        options: RangeOptions,
    ) -> Result<RangeEntries> {
        let command = self.window_command(kind, IndexWindow::new(start, end), options.with_scores);
        let reply = self.call(command).await?;
        decode_entries(self.codec(), reply, options.with_scores)
    }

    /// The member at rank `index` (negative counts from the highest), `None`
    /// out of range
    pub async fn at(&self, index: i64) -> Result<Option<Value>> {
        let command = self.window_command(CommandType::ZRange, IndexWindow::at(index), false);
        let reply = self.call(command).await?;
        Ok(decode_entries(self.codec(), reply, false)?
            .into_members()
            .into_iter()
            .next())
    }

    /// Lowest-scored member
    pub async fn first(&self) -> Result<Option<Value>> {
        self.at(0).await
    }

    /// Highest-scored member
    pub async fn last(&self) -> Result<Option<Value>> {
        self.at(-1).await
    }

    /// Remove members ranked `start..=stop` (inclusive, negative counts from
    /// the highest). Returns how many were removed.
    ///
    /// Redis: ZREMRANGEBYRANK
    pub async fn rem_range_by_rank(&self, start: i64, stop: i64) -> Result<i64> {
        self.call(
            self.command(CommandType::ZRemRangeByRank)
                .arg(start)
                .arg(stop),
        )
        .await?
        .into_integer()
    }

    // =========================================================================
    // Score intervals
    // =========================================================================

    /// Number of members with scores in `[min, max]`
    ///
    /// Redis: ZCOUNT
    #[doc(alias = "count")]
    pub async fn range_size(&self, min: impl Into<ScoreBound>, max: impl Into<ScoreBound>) -> Result<i64> {
        self.call(
            self.command(CommandType::ZCount)
                .arg(min.into())
                .arg(max.into()),
        )
        .await?
        .into_integer()
    }

    /// Members scored in `[min, max]`, ascending, optionally paginated
    ///
    /// Redis: ZRANGEBYSCORE
    pub async fn range_by_score(
        &self,
        min: impl Into<ScoreBound>,
        max: impl Into<ScoreBound>,
        options: ScoreRangeOptions,
    ) -> Result<RangeEntries> {
        self.by_score(CommandType::ZRangeByScore, min.into(), max.into(), options)
            .await
    }

    /// Members scored in `[min, max]`, descending, optionally paginated
    ///
    /// Redis: ZREVRANGEBYSCORE
    pub async fn rev_range_by_score(
        &self,
        min: impl Into<ScoreBound>,
        max: impl Into<ScoreBound>,
        options: ScoreRangeOptions,
    ) -> Result<RangeEntries> {
        self.by_score(CommandType::ZRevRangeByScore, min.into(), max.into(), options)
            .await
    }

    async fn by_score(
        &self,
        kind: CommandType,
        min: ScoreBound,
        max: ScoreBound,
        options: ScoreRangeOptions,
    ) -> Result<RangeEntries> {
        let command = score_command(kind, self.key(), &min, &max, &options);
        let reply = self.call(command).await?;
        decode_entries(self.codec(), reply, options.with_scores)
    }

    /// Remove members scored in `[min, max]`. Returns how many were removed.
    ///
    /// Redis: ZREMRANGEBYSCORE
    pub async fn rem_range_by_score(
        &self,
        min: impl Into<ScoreBound>,
        max: impl Into<ScoreBound>,
    ) -> Result<i64> {
        self.call(
            self.command(CommandType::ZRemRangeByScore)
                .arg(min.into())
                .arg(max.into()),
        )
        .await?
        .into_integer()
    }

    // =========================================================================
    // Size
    // =========================================================================

    /// Redis: ZCARD
    #[doc(alias = "size", alias = "len")]
    pub async fn length(&self) -> Result<i64> {
        self.call(self.command(CommandType::ZCard)).await?.into_integer()
    }

    #[doc(alias = "is_empty")]
    pub async fn empty(&self) -> Result<bool> {
        Ok(self.length().await? == 0)
    }
}

impl Deref for OrderedSet {
    type Target = EntityHandle;

    fn deref(&self) -> &EntityHandle {
        &self.handle
    }
}

impl DerefMut for OrderedSet {
    fn deref_mut(&mut self) -> &mut EntityHandle {
        &mut self.handle
    }
}
