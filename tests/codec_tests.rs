//! Codec Tests
//!
//! Tests for value marshalling and spec resolution.

use std::sync::Arc;

use redis_objects::codec::{decode, decode_all, encode, encode_all};
use redis_objects::protocol::Reply;
use redis_objects::{ErrorKind, MarshalSpec, Marshaller, ObjectError, Result, ValueCodec};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn round_trip(value: Value, spec: &MarshalSpec) -> Value {
    let wire = encode(&value, spec).unwrap();
    decode(&Reply::Bulk(wire), spec).unwrap()
}

/// Stores booleans as "yes"/"no"
struct YesNo;

impl Marshaller for YesNo {
    fn stringify(&self, value: &Value) -> Result<String> {
        match value {
            Value::Bool(true) => Ok("yes".to_string()),
            Value::Bool(false) => Ok("no".to_string()),
            other => Err(ObjectError::Marshal(format!("not a bool: {}", other))),
        }
    }

    fn parse(&self, text: &str) -> Result<Value> {
        match text {
            "yes" => Ok(Value::Bool(true)),
            "no" => Ok(Value::Bool(false)),
            other => Err(ObjectError::Marshal(format!("not yes/no: {}", other))),
        }
    }
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn test_none_spec_passes_strings_through() {
    assert_eq!(round_trip(json!("hello"), &MarshalSpec::None), json!("hello"));
    assert_eq!(encode(&json!("{not json"), &MarshalSpec::None).unwrap(), "{not json");
}

#[test]
fn test_none_spec_stringifies_scalars() {
    assert_eq!(encode(&json!(12), &MarshalSpec::None).unwrap(), "12");
    assert_eq!(encode(&json!(true), &MarshalSpec::None).unwrap(), "true");
    assert_eq!(encode(&Value::Null, &MarshalSpec::None).unwrap(), "null");
}

#[test]
fn test_json_round_trip() {
    let value = json!({"name": "ada", "tags": ["x", "y"], "age": 36, "ok": true});
    assert_eq!(round_trip(value.clone(), &MarshalSpec::Json), value);
    assert_eq!(round_trip(json!([1, 2, 3]), &MarshalSpec::Json), json!([1, 2, 3]));
    assert_eq!(round_trip(json!("plain"), &MarshalSpec::Json), json!("plain"));
}

#[test]
fn test_integer_round_trip() {
    assert_eq!(round_trip(json!(42), &MarshalSpec::Integer), json!(42));
    assert_eq!(round_trip(json!(-7), &MarshalSpec::Integer), json!(-7));
}

#[test]
fn test_float_round_trip() {
    assert_eq!(round_trip(json!(2.5), &MarshalSpec::Float), json!(2.5));
    assert_eq!(round_trip(json!(-0.125), &MarshalSpec::Float), json!(-0.125));
}

#[test]
fn test_float_whole_numbers_decode_as_integers() {
    assert_eq!(round_trip(json!(3), &MarshalSpec::Float), json!(3));
    assert_eq!(decode(&Reply::bulk("3.0"), &MarshalSpec::Float).unwrap(), json!(3));
    assert_eq!(decode(&Reply::bulk("-12"), &MarshalSpec::Float).unwrap(), json!(-12));
}

#[test]
fn test_float_rejects_non_finite() {
    let err = decode(&Reply::bulk("inf"), &MarshalSpec::Float).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Marshal);
}

#[test]
fn test_string_spec_keeps_text() {
    assert_eq!(decode(&Reply::bulk("007"), &MarshalSpec::String).unwrap(), json!("007"));
}

#[test]
fn test_custom_marshaller_round_trip() {
    let spec = MarshalSpec::custom(YesNo);
    assert_eq!(encode(&json!(true), &spec).unwrap(), "yes");
    assert_eq!(round_trip(json!(false), &spec), json!(false));
}

#[test]
fn test_batch_preserves_order() {
    let values = vec![json!(3), json!(1), json!(2)];
    let wire = encode_all(&values, &MarshalSpec::Integer).unwrap();
    assert_eq!(wire, vec!["3", "1", "2"]);

    let replies: Vec<Reply> = wire.into_iter().map(Reply::Bulk).collect();
    assert_eq!(decode_all(&replies, &MarshalSpec::Integer).unwrap(), values);
}

// =============================================================================
// Absent Values
// =============================================================================

#[test]
fn test_nil_decodes_to_null_under_every_spec() {
    for spec in [
        MarshalSpec::None,
        MarshalSpec::Json,
        MarshalSpec::Integer,
        MarshalSpec::Float,
        MarshalSpec::String,
        MarshalSpec::custom(YesNo),
    ] {
        assert_eq!(decode(&Reply::Nil, &spec).unwrap(), Value::Null, "{:?}", spec);
    }
}

#[test]
fn test_integer_reply_decodes_as_number() {
    assert_eq!(decode(&Reply::Integer(9), &MarshalSpec::None).unwrap(), json!(9));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_malformed_json_is_marshal_error() {
    let err = decode(&Reply::bulk("{oops"), &MarshalSpec::Json).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Marshal);
}

#[test]
fn test_non_numeric_integer_is_marshal_error() {
    let err = decode(&Reply::bulk("abc"), &MarshalSpec::Integer).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Marshal);
}

#[test]
fn test_aggregate_without_spec_is_usage_error() {
    let err = encode(&json!({"a": 1}), &MarshalSpec::None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);
}

#[test]
fn test_aggregate_under_scalar_spec_is_marshal_error() {
    let err = encode(&json!([1]), &MarshalSpec::Integer).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Marshal);
}

#[test]
fn test_custom_failure_surfaces() {
    let err = encode(&json!(1), &MarshalSpec::custom(YesNo)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Marshal);
}

#[test]
fn test_batch_is_fail_fast() {
    let replies = vec![Reply::bulk("1"), Reply::bulk("x"), Reply::bulk("3")];
    assert!(decode_all(&replies, &MarshalSpec::Integer).is_err());
}

// =============================================================================
// Spec Names and Resolution
// =============================================================================

#[test]
fn test_spec_from_name() {
    assert!(matches!(MarshalSpec::from_name("json").unwrap(), MarshalSpec::Json));
    assert!(matches!("integer".parse::<MarshalSpec>().unwrap(), MarshalSpec::Integer));

    let err = MarshalSpec::from_name("yaml").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);
}

#[test]
fn test_value_codec_resolution() {
    let codec = ValueCodec::new(MarshalSpec::Json);
    assert!(matches!(codec.resolve(None), MarshalSpec::Json));
    assert!(matches!(
        codec.resolve(Some(&MarshalSpec::Integer)),
        MarshalSpec::Integer
    ));

    assert_eq!(codec.to_wire(&json!("x"), None).unwrap(), "\"x\"");
    assert_eq!(codec.to_wire(&json!(5), Some(&MarshalSpec::None)).unwrap(), "5");
}

#[test]
fn test_value_codec_decodes_multi_bulk() {
    let codec = ValueCodec::new(MarshalSpec::Integer);
    let values = codec
        .all_from_wire(Reply::bulk_array(["1", "2"]), None)
        .unwrap();
    assert_eq!(values, vec![json!(1), json!(2)]);
    assert!(codec.all_from_wire(Reply::Nil, None).unwrap().is_empty());
}

#[test]
fn test_custom_spec_is_shareable() {
    let spec = MarshalSpec::Custom(Arc::new(YesNo));
    let copy = spec.clone();
    assert_eq!(encode(&json!(true), &copy).unwrap(), "yes");
}
