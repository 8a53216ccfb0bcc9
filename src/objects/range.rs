//! Range and pagination engine
//!
//! Shared by [`List`](super::List) and [`OrderedSet`](super::OrderedSet):
//!
//! - index windows: callers use end-exclusive slices, the store uses
//!   inclusive indices, so `(start, end)` goes out as `(start, end - 1)` and
//!   an open end goes out as `-1`
//! - score bounds: passed through verbatim, so `"(5"` (exclusive) and
//!   `"-inf"` reach the store untouched
//! - pagination: `LIMIT offset count`, sent only when asked for
//! - `WITHSCORES` replies: alternating member/score pairs

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::ValueCodec;
use crate::error::{ObjectError, Result};
use crate::protocol::{Command, CommandType, Reply};

// =============================================================================
// Index windows
// =============================================================================

/// An index window in the store's inclusive convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexWindow {
    pub start: i64,
    pub stop: i64,
}

impl IndexWindow {
    /// Translate an end-exclusive `[start, end)` window; `None` reads
    /// through the last element
    ///
    /// `end = Some(0)` translates to stop `-1`, which the store reads as the
    /// last element. `at(-1)` relies on this.
    pub fn new(start: i64, end: Option<i64>) -> Self {
        Self {
            start,
            stop: end.map_or(-1, |end| end.saturating_sub(1)),
        }
    }

    /// The single-element window at `index`
    pub fn at(index: i64) -> Self {
        Self::new(index, Some(index.saturating_add(1)))
    }

    pub(crate) fn command(&self, kind: CommandType, key: &str) -> Command {
        Command::new(kind).arg(key).arg(self.start).arg(self.stop)
    }
}

// =============================================================================
// Score bounds
// =============================================================================

/// One end of a score interval, in the store's textual form
///
/// A leading `(` makes the bound exclusive. The adapter never interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBound(Cow<'static, str>);

impl ScoreBound {
    /// Below every score
    pub const MIN: ScoreBound = ScoreBound(Cow::Borrowed("-inf"));

    /// Above every score
    pub const MAX: ScoreBound = ScoreBound(Cow::Borrowed("+inf"));

    pub fn inclusive(score: f64) -> Self {
        ScoreBound(Cow::Owned(score.to_string()))
    }

    pub fn exclusive(score: f64) -> Self {
        ScoreBound(Cow::Owned(format!("({}", score)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScoreBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<f64> for ScoreBound {
    fn from(score: f64) -> Self {
        ScoreBound::inclusive(score)
    }
}

impl From<i64> for ScoreBound {
    fn from(score: i64) -> Self {
        ScoreBound(Cow::Owned(score.to_string()))
    }
}

impl From<i32> for ScoreBound {
    fn from(score: i32) -> Self {
        ScoreBound(Cow::Owned(score.to_string()))
    }
}

impl From<&str> for ScoreBound {
    fn from(raw: &str) -> Self {
        ScoreBound(Cow::Owned(raw.to_string()))
    }
}

impl From<String> for ScoreBound {
    fn from(raw: String) -> Self {
        ScoreBound(Cow::Owned(raw))
    }
}

// =============================================================================
// Options
// =============================================================================

/// Options for rank-window queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeOptions {
    pub with_scores: bool,
}

impl RangeOptions {
    pub fn with_scores() -> Self {
        Self { with_scores: true }
    }
}

/// Options for score-interval queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreRangeOptions {
    /// Results to skip (default 0)
    pub offset: Option<i64>,

    /// Maximum results (default all)
    pub count: Option<i64>,

    pub with_scores: bool,
}

impl ScoreRangeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[doc(alias = "limit")]
    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_scores(mut self) -> Self {
        self.with_scores = true;
        self
    }

    /// The pagination window, if one was requested
    pub fn limit(&self) -> Option<LimitWindow> {
        if self.offset.is_none() && self.count.is_none() {
            return None;
        }
        Some(LimitWindow {
            offset: self.offset.unwrap_or(0),
            count: self.count.unwrap_or(-1),
        })
    }
}

/// `LIMIT offset count`; a negative count means all remaining
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitWindow {
    pub offset: i64,
    pub count: i64,
}

/// Build a score-interval query. Descending queries send `max` first.
pub(crate) fn score_command(
    kind: CommandType,
    key: &str,
    min: &ScoreBound,
    max: &ScoreBound,
    options: &ScoreRangeOptions,
) -> Command {
    let (first, second) = match kind {
        CommandType::ZRevRangeByScore => (max, min),
        _ => (min, max),
    };
    let mut command = Command::new(kind).arg(key).arg(first).arg(second);
    if options.with_scores {
        command = command.arg("WITHSCORES");
    }
    if let Some(limit) = options.limit() {
        command = command.arg("LIMIT").arg(limit.offset).arg(limit.count);
    }
    command
}

// =============================================================================
// Results
// =============================================================================

/// A member with its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMember {
    pub member: Value,
    pub score: f64,
}

impl From<ScoredMember> for (Value, f64) {
    fn from(entry: ScoredMember) -> Self {
        (entry.member, entry.score)
    }
}

/// Result of a range query: bare members, or members with scores when
/// `with_scores` was set
#[derive(Debug, Clone, PartialEq)]
pub enum RangeEntries {
    Members(Vec<Value>),
    Scored(Vec<ScoredMember>),
}

impl RangeEntries {
    pub fn len(&self) -> usize {
        match self {
            RangeEntries::Members(m) => m.len(),
            RangeEntries::Scored(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Members only, scores dropped
    pub fn into_members(self) -> Vec<Value> {
        match self {
            RangeEntries::Members(m) => m,
            RangeEntries::Scored(s) => s.into_iter().map(|e| e.member).collect(),
        }
    }

    /// (member, score) pairs; `None` when scores were not requested
    pub fn into_pairs(self) -> Option<Vec<(Value, f64)>> {
        match self {
            RangeEntries::Members(_) => None,
            RangeEntries::Scored(s) => Some(s.into_iter().map(Into::into).collect()),
        }
    }
}

/// Decode a range reply; members go through the collection codec
pub(crate) fn decode_entries(
    codec: &ValueCodec,
    reply: Reply,
    with_scores: bool,
) -> Result<RangeEntries> {
    let items = reply.into_array()?;
    if !with_scores {
        return Ok(RangeEntries::Members(
            items
                .iter()
                .map(|item| codec.from_wire(item, None))
                .collect::<Result<_>>()?,
        ));
    }

    if items.len() % 2 != 0 {
        return Err(ObjectError::marshal(format!(
            "scored reply has an odd number of elements ({})",
            items.len()
        )));
    }
    let mut entries = Vec::with_capacity(items.len() / 2);
    let mut items = items.into_iter();
    while let (Some(member), Some(score)) = (items.next(), items.next()) {
        entries.push(ScoredMember {
            member: codec.from_wire(&member, None)?,
            score: score.into_float()?,
        });
    }
    Ok(RangeEntries::Scored(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_index_window_translates_to_inclusive() {
        assert_eq!(IndexWindow::new(0, Some(1)), IndexWindow { start: 0, stop: 0 });
        assert_eq!(IndexWindow::new(0, None), IndexWindow { start: 0, stop: -1 });
        assert_eq!(IndexWindow::new(0, Some(-1)), IndexWindow { start: 0, stop: -2 });
        assert_eq!(IndexWindow::at(-1), IndexWindow { start: -1, stop: -1 });
    }

    #[test]
    fn test_index_window_saturates_at_extremes() {
        assert_eq!(
            IndexWindow::new(0, Some(i64::MIN)),
            IndexWindow { start: 0, stop: i64::MIN }
        );
        assert_eq!(
            IndexWindow::at(i64::MAX),
            IndexWindow { start: i64::MAX, stop: i64::MAX - 1 }
        );
    }

    #[test]
    fn test_score_bounds_pass_markers_through() {
        assert_eq!(ScoreBound::from("(5").as_str(), "(5");
        assert_eq!(ScoreBound::exclusive(2.5).as_str(), "(2.5");
        assert_eq!(ScoreBound::from(3.0).as_str(), "3");
        assert_eq!(ScoreBound::MIN.as_str(), "-inf");
    }

    #[test]
    fn test_limit_only_when_requested() {
        assert_eq!(ScoreRangeOptions::new().limit(), None);
        assert_eq!(
            ScoreRangeOptions::new().count(1).limit(),
            Some(LimitWindow { offset: 0, count: 1 })
        );
        assert_eq!(
            ScoreRangeOptions::new().offset(2).limit(),
            Some(LimitWindow { offset: 2, count: -1 })
        );
    }

    #[test]
    fn test_score_command_shape() {
        let options = ScoreRangeOptions::new().offset(1).count(1).with_scores();
        let command = score_command(
            CommandType::ZRevRangeByScore,
            "z",
            &ScoreBound::from(2),
            &ScoreBound::from(4),
            &options,
        );
        assert_eq!(command.to_string(), "ZREVRANGEBYSCORE z 4 2 WITHSCORES LIMIT 1 1");
    }

    #[test]
    fn test_decode_scored_pairs() {
        let reply = Reply::bulk_array(["c", "3", "bar", "4.5"]);
        let entries = decode_entries(&ValueCodec::default(), reply, true).unwrap();
        assert_eq!(
            entries.into_pairs().unwrap(),
            vec![(json!("c"), 3.0), (json!("bar"), 4.5)]
        );
    }

    #[test]
    fn test_decode_odd_scored_reply_fails() {
        let reply = Reply::bulk_array(["c", "3", "bar"]);
        assert!(decode_entries(&ValueCodec::default(), reply, true).is_err());
    }
}
