//! Tests for Scalar

mod common;

use redis_objects::{Config, ErrorKind, MarshalSpec, MemoryTransport, Scalar};
use serde_json::{json, Value};

use common::{memory, settle};

// =============================================================================
// Get / Set
// =============================================================================

#[tokio::test]
async fn test_missing_value_is_null() {
    let value = Scalar::new("nothing", memory(), Config::default()).unwrap();
    assert_eq!(value.get().await.unwrap(), Value::Null);
}

#[tokio::test]
async fn test_set_get_plain_string() {
    let value = Scalar::new("name", memory(), Config::default()).unwrap();
    value.set("ada").await.unwrap();
    assert_eq!(value.get().await.unwrap(), json!("ada"));

    // overwrite
    value.set("grace").await.unwrap();
    assert_eq!(value.get().await.unwrap(), json!("grace"));
}

#[tokio::test]
async fn test_json_value_round_trips() {
    let config = Config::builder().marshal(MarshalSpec::Json).build();
    let value = Scalar::new("profile", memory(), config).unwrap();

    let profile = json!({"name": "ada", "langs": ["rust", "ml"]});
    value.set(profile.clone()).await.unwrap();
    assert_eq!(value.get().await.unwrap(), profile);
}

#[tokio::test]
async fn test_per_call_spec_overrides_config() {
    let store = memory();
    let config = Config::builder().marshal(MarshalSpec::Json).build();
    let value = Scalar::new("count", store.clone(), config).unwrap();

    value.set_as(17, &MarshalSpec::Integer).await.unwrap();
    assert_eq!(value.get_as(&MarshalSpec::Integer).await.unwrap(), json!(17));
    assert_eq!(value.get_as(&MarshalSpec::String).await.unwrap(), json!("17"));
}

#[tokio::test]
async fn test_aggregate_without_spec_is_rejected() {
    let store = memory();
    let value = Scalar::new("bad", store.clone(), Config::default()).unwrap();
    let err = value.set(json!([1, 2])).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);
    // nothing was sent
    assert_eq!(store.key_count(), 0);
}

// =============================================================================
// Default Seeding
// =============================================================================

#[tokio::test]
async fn test_default_is_seeded_when_absent() {
    let config = Config::builder()
        .marshal(MarshalSpec::Integer)
        .default_value(5)
        .build();
    let value = Scalar::new("seeded", memory(), config).unwrap();
    settle().await;
    assert_eq!(value.get().await.unwrap(), json!(5));
}

#[tokio::test]
async fn test_default_does_not_overwrite() {
    let store = memory();
    Scalar::new("existing", store.clone(), Config::default())
        .unwrap()
        .set("kept")
        .await
        .unwrap();

    let config = Config::builder().default_value("replacement").build();
    let value = Scalar::new("existing", store, config).unwrap();
    settle().await;
    assert_eq!(value.get().await.unwrap(), json!("kept"));
}

#[test]
fn test_default_outside_runtime_is_usage_error() {
    let config = Config::builder().default_value(1).build();
    let err = Scalar::new("k", std::sync::Arc::new(MemoryTransport::new()), config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);
}
