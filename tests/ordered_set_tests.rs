//! Tests for OrderedSet
//!
//! These tests verify:
//! - Upsert semantics and scores
//! - Rank windows in both directions
//! - Score intervals with exclusive bounds and pagination
//! - Atomic increments

mod common;

use redis_objects::{
    Config, ErrorKind, MarshalSpec, OrderedSet, RangeEntries, RangeOptions, ScoreBound,
    ScoreRangeOptions, ScoredMember,
};
use serde_json::{json, Value};

use common::memory;

// =============================================================================
// Helper Functions
// =============================================================================

/// {a: 1, b: 2, c: 3, bar: 4}
async fn scored() -> OrderedSet {
    let zset = OrderedSet::new("scores", memory(), Config::default());
    zset.add_all([("a", 1.0), ("b", 2.0), ("c", 3.0), ("bar", 4.0)])
        .await
        .unwrap();
    zset
}

fn members(entries: RangeEntries) -> Vec<Value> {
    entries.into_members()
}

// =============================================================================
// Membership
// =============================================================================

#[tokio::test]
async fn test_add_upserts() {
    let zset = OrderedSet::new("z", memory(), Config::default());
    assert_eq!(zset.add("foo", 1.0).await.unwrap(), 1);
    assert_eq!(zset.add("foo", 2.0).await.unwrap(), 0);
    assert_eq!(zset.score("foo").await.unwrap(), Some(2.0));
    assert_eq!(zset.length().await.unwrap(), 1);
}

#[tokio::test]
async fn test_missing_member() {
    let zset = scored().await;
    assert_eq!(zset.score("nope").await.unwrap(), None);
    assert_eq!(zset.rank("nope").await.unwrap(), None);
    assert!(!zset.is_member("nope").await.unwrap());
    assert!(zset.is_member("a").await.unwrap());
}

#[tokio::test]
async fn test_rank_and_revrank() {
    let zset = scored().await;
    assert_eq!(zset.rank("a").await.unwrap(), Some(0));
    assert_eq!(zset.rank("bar").await.unwrap(), Some(3));
    assert_eq!(zset.revrank("bar").await.unwrap(), Some(0));
}

#[tokio::test]
async fn test_delete() {
    let zset = scored().await;
    assert_eq!(zset.delete("b").await.unwrap(), 1);
    assert_eq!(zset.delete("b").await.unwrap(), 0);
    assert_eq!(zset.length().await.unwrap(), 3);
}

#[tokio::test]
async fn test_add_all_empty_is_usage_error() {
    let zset = OrderedSet::new("z", memory(), Config::default());
    let err = zset.add_all(Vec::<(Value, f64)>::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);
}

// =============================================================================
// Rank Windows
// =============================================================================

#[tokio::test]
async fn test_members_in_score_order() {
    let zset = scored().await;
    assert_eq!(
        members(zset.members(RangeOptions::default()).await.unwrap()),
        vec![json!("a"), json!("b"), json!("c"), json!("bar")]
    );
}

#[tokio::test]
async fn test_range_windows() {
    let zset = scored().await;
    assert_eq!(
        members(zset.range(0, Some(2), RangeOptions::default()).await.unwrap()),
        vec![json!("a"), json!("b")]
    );
    assert_eq!(
        members(zset.revrange(0, Some(2), RangeOptions::default()).await.unwrap()),
        vec![json!("bar"), json!("c")]
    );
    assert_eq!(
        members(zset.range(-2, None, RangeOptions::default()).await.unwrap()),
        vec![json!("c"), json!("bar")]
    );
}

#[tokio::test]
async fn test_range_with_scores() {
    let zset = scored().await;
    let entries = zset.range(0, Some(2), RangeOptions::with_scores()).await.unwrap();
    assert_eq!(
        entries,
        RangeEntries::Scored(vec![
            ScoredMember { member: json!("a"), score: 1.0 },
            ScoredMember { member: json!("b"), score: 2.0 },
        ])
    );
}

#[tokio::test]
async fn test_at_first_last() {
    let zset = scored().await;
    assert_eq!(zset.at(1).await.unwrap(), Some(json!("b")));
    assert_eq!(zset.first().await.unwrap(), Some(json!("a")));
    assert_eq!(zset.last().await.unwrap(), Some(json!("bar")));
    assert_eq!(zset.at(10).await.unwrap(), None);
}

#[tokio::test]
async fn test_rem_range_by_rank() {
    let zset = scored().await;
    // inclusive: the two highest
    assert_eq!(zset.rem_range_by_rank(-2, -1).await.unwrap(), 2);
    assert_eq!(
        members(zset.members(RangeOptions::default()).await.unwrap()),
        vec![json!("a"), json!("b")]
    );
}

// =============================================================================
// Score Intervals
// =============================================================================

#[tokio::test]
async fn test_range_by_score_pagination() {
    let zset = scored().await;
    let page = ScoreRangeOptions::new().offset(1).count(1);

    let entries = zset.range_by_score(2, 4, page).await.unwrap();
    assert_eq!(members(entries), vec![json!("c")]);

    let entries = zset.range_by_score(2, 4, page.with_scores()).await.unwrap();
    assert_eq!(entries.into_pairs().unwrap(), vec![(json!("c"), 3.0)]);
}

#[tokio::test]
async fn test_range_by_score_bounds() {
    let zset = scored().await;
    assert_eq!(
        members(zset.range_by_score(2, 4, ScoreRangeOptions::new()).await.unwrap()),
        vec![json!("b"), json!("c"), json!("bar")]
    );
    assert_eq!(
        members(
            zset.range_by_score("(2", ScoreBound::MAX, ScoreRangeOptions::new())
                .await
                .unwrap()
        ),
        vec![json!("c"), json!("bar")]
    );
    assert_eq!(
        members(
            zset.range_by_score(ScoreBound::MIN, ScoreBound::exclusive(2.0), ScoreRangeOptions::new())
                .await
                .unwrap()
        ),
        vec![json!("a")]
    );
}

#[tokio::test]
async fn test_rev_range_by_score_takes_min_then_max() {
    let zset = scored().await;
    assert_eq!(
        members(zset.rev_range_by_score(2, 4, ScoreRangeOptions::new()).await.unwrap()),
        vec![json!("bar"), json!("c"), json!("b")]
    );
    assert_eq!(
        members(
            zset.rev_range_by_score(2, 4, ScoreRangeOptions::new().count(2))
                .await
                .unwrap()
        ),
        vec![json!("bar"), json!("c")]
    );
}

#[tokio::test]
async fn test_range_size_and_rem_range_by_score() {
    let zset = scored().await;
    assert_eq!(zset.range_size(2, 3).await.unwrap(), 2);
    assert_eq!(zset.range_size(ScoreBound::MIN, ScoreBound::MAX).await.unwrap(), 4);

    assert_eq!(zset.rem_range_by_score("(1", 3).await.unwrap(), 2);
    assert_eq!(
        members(zset.members(RangeOptions::default()).await.unwrap()),
        vec![json!("a"), json!("bar")]
    );
}

// =============================================================================
// Increments
// =============================================================================

#[tokio::test]
async fn test_increment_sequence() {
    let zset = OrderedSet::new("z", memory(), Config::default());
    assert_eq!(zset.increment("bar", 6.0).await.unwrap(), 6.0);
    assert_eq!(zset.incr("bar").await.unwrap(), 7.0);
    assert_eq!(zset.decrement("bar", 2.0).await.unwrap(), 5.0);
    assert_eq!(zset.decr("bar").await.unwrap(), 4.0);
    assert_eq!(zset.score("bar").await.unwrap(), Some(4.0));
}

#[tokio::test]
async fn test_members_go_through_the_codec() {
    let config = Config::builder().marshal(MarshalSpec::Integer).build();
    let zset = OrderedSet::new("ids", memory(), config);
    zset.add(7, 1.0).await.unwrap();
    zset.add(3, 2.0).await.unwrap();
    assert_eq!(
        members(zset.members(RangeOptions::default()).await.unwrap()),
        vec![json!(7), json!(3)]
    );
    assert_eq!(zset.rank(3).await.unwrap(), Some(1));
}

#[tokio::test]
async fn test_empty() {
    let zset = OrderedSet::new("z", memory(), Config::default());
    assert!(zset.empty().await.unwrap());
    zset.add("x", 0.0).await.unwrap();
    assert!(!zset.empty().await.unwrap());
}
