//! Tests for Set

mod common;

use redis_objects::{Config, ErrorKind, MarshalSpec, Set};
use serde_json::{json, Value};

use common::memory;

// =============================================================================
// Membership
// =============================================================================

#[tokio::test]
async fn test_add_is_idempotent() {
    let set = Set::new("tags", memory(), Config::default());
    assert_eq!(set.add("rust").await.unwrap(), 1);
    assert_eq!(set.add("rust").await.unwrap(), 0);
    assert_eq!(set.length().await.unwrap(), 1);
}

#[tokio::test]
async fn test_merge_counts_new_members() {
    let set = Set::new("tags", memory(), Config::default());
    set.add("a").await.unwrap();
    assert_eq!(set.merge(["a", "b", "c"]).await.unwrap(), 2);

    let mut members = set.members().await.unwrap();
    members.sort_by_key(|m| m.to_string());
    assert_eq!(members, vec![json!("a"), json!("b"), json!("c")]);
}

#[tokio::test]
async fn test_merge_empty_is_usage_error() {
    let set = Set::new("tags", memory(), Config::default());
    let err = set.merge(Vec::<Value>::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);
}

#[tokio::test]
async fn test_is_member_and_delete() {
    let set = Set::new("ids", memory(), Config::builder().marshal(MarshalSpec::Integer).build());
    set.merge([1, 2, 3]).await.unwrap();

    assert!(set.is_member(2).await.unwrap());
    assert_eq!(set.delete(2).await.unwrap(), 1);
    assert_eq!(set.delete(2).await.unwrap(), 0);
    assert!(!set.is_member(2).await.unwrap());
}

#[tokio::test]
async fn test_pop_drains_the_set() {
    let set = Set::new("bag", memory(), Config::builder().marshal(MarshalSpec::Integer).build());
    set.merge([10, 20]).await.unwrap();

    let mut popped = vec![set.pop().await.unwrap(), set.pop().await.unwrap()];
    popped.sort_by_key(|v| v.as_i64());
    assert_eq!(popped, vec![json!(10), json!(20)]);

    assert_eq!(set.pop().await.unwrap(), Value::Null);
    assert!(set.empty().await.unwrap());
}

#[tokio::test]
async fn test_json_members() {
    let set = Set::new("points", memory(), Config::builder().marshal(MarshalSpec::Json).build());
    set.add(json!({"x": 1, "y": 2})).await.unwrap();
    assert!(set.is_member(json!({"x": 1, "y": 2})).await.unwrap());
    assert_eq!(set.members().await.unwrap(), vec![json!({"x": 1, "y": 2})]);
}
