//! Protocol Tests
//!
//! Tests for RESP2 command encoding and reply decoding.

use redis_objects::protocol::{
    decode_reply, encode_command, encode_reply, Command, CommandType, Reply, MAX_BULK_SIZE,
};
use redis_objects::ErrorKind;

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_encode_command_as_bulk_array() {
    let command = Command::new(CommandType::HGet).arg("key").arg("field");
    assert_eq!(
        encode_command(&command),
        b"*3\r\n$4\r\nHGET\r\n$3\r\nkey\r\n$5\r\nfield\r\n".to_vec()
    );
}

#[test]
fn test_encode_command_keeps_binary_safe_lengths() {
    let command = Command::new(CommandType::Set).arg("k").arg("a b\r\nc");
    let encoded = encode_command(&command);
    assert!(encoded.ends_with(b"$7\r\na b\r\nc\r\n"));
}

#[test]
fn test_command_display_and_key() {
    let command = Command::new(CommandType::ZAdd).arg("z").arg(1.5).arg("m");
    assert_eq!(command.to_string(), "ZADD z 1.5 m");
    assert_eq!(command.key(), Some("z"));
    assert_eq!(command.command_type(), CommandType::ZAdd);
}

#[test]
fn test_encoded_command_decodes_as_array() {
    let command = Command::new(CommandType::RPush).arg("l").args(["a", "b"]);
    let (reply, consumed) = decode_reply(&encode_command(&command)).unwrap().unwrap();
    assert_eq!(reply, Reply::bulk_array(["RPUSH", "l", "a", "b"]));
    assert_eq!(consumed, encode_command(&command).len());
}

// =============================================================================
// Reply Decoding Tests
// =============================================================================

#[test]
fn test_decode_scalar_replies() {
    let cases: Vec<(&[u8], Reply)> = vec![
        (&b"+OK\r\n"[..], Reply::ok()),
        (&b"-ERR no such key\r\n"[..], Reply::Error("ERR no such key".into())),
        (&b":-42\r\n"[..], Reply::Integer(-42)),
        (&b"$5\r\nhello\r\n"[..], Reply::bulk("hello")),
        (&b"$0\r\n\r\n"[..], Reply::bulk("")),
        (&b"$-1\r\n"[..], Reply::Nil),
        (&b"*-1\r\n"[..], Reply::Nil),
    ];
    for (bytes, expected) in cases {
        let (reply, consumed) = decode_reply(bytes).unwrap().unwrap();
        assert_eq!(reply, expected);
        assert_eq!(consumed, bytes.len());
    }
}

#[test]
fn test_decode_nested_array() {
    let bytes = b"*2\r\n*2\r\n$1\r\na\r\n:1\r\n$-1\r\n";
    let (reply, _) = decode_reply(bytes).unwrap().unwrap();
    assert_eq!(
        reply,
        Reply::Array(vec![
            Reply::Array(vec![Reply::bulk("a"), Reply::Integer(1)]),
            Reply::Nil,
        ])
    );
}

#[test]
fn test_decode_leaves_trailing_bytes() {
    let bytes = b":1\r\n:2\r\n";
    let (first, consumed) = decode_reply(bytes).unwrap().unwrap();
    assert_eq!(first, Reply::Integer(1));
    let (second, _) = decode_reply(&bytes[consumed..]).unwrap().unwrap();
    assert_eq!(second, Reply::Integer(2));
}

#[test]
fn test_decode_incomplete_returns_none() {
    for partial in [
        &b""[..],
        &b"+OK"[..],
        &b"$5\r\nhel"[..],
        &b"*2\r\n$1\r\na\r\n"[..],
    ] {
        assert!(decode_reply(partial).unwrap().is_none(), "{:?}", partial);
    }
}

#[test]
fn test_decode_rejects_garbage() {
    let err = decode_reply(b"?what\r\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);

    assert!(decode_reply(b":abc\r\n").is_err());
    assert!(decode_reply(b"$3\r\nabcd\r\n").is_err());
}

#[test]
fn test_decode_rejects_oversized_bulk() {
    let header = format!("${}\r\n", MAX_BULK_SIZE + 1);
    assert!(decode_reply(header.as_bytes()).is_err());
}

// =============================================================================
// Reply Encoding Tests
// =============================================================================

#[test]
fn test_encode_reply_round_trips() {
    let reply = Reply::Array(vec![
        Reply::Status("QUEUED".into()),
        Reply::Integer(3),
        Reply::bulk("x"),
        Reply::Nil,
    ]);
    let encoded = encode_reply(&reply);
    let (decoded, consumed) = decode_reply(&encoded).unwrap().unwrap();
    assert_eq!(decoded, reply);
    assert_eq!(consumed, encoded.len());
}

// =============================================================================
// Reply Conversion Tests
// =============================================================================

#[test]
fn test_reply_conversions() {
    assert!(Reply::Integer(1).into_bool().unwrap());
    assert_eq!(Reply::bulk("2.5").into_float().unwrap(), 2.5);
    assert_eq!(Reply::bulk("-inf").into_float().unwrap(), f64::NEG_INFINITY);
    assert_eq!(Reply::Nil.into_optional_integer().unwrap(), None);
    assert!(Reply::Nil.into_array().unwrap().is_empty());
    assert!(Reply::ok().expect_ok().is_ok());

    let err = Reply::Error("WRONGTYPE x".into()).into_integer().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
