//! Codec Tests
//!
//! Tests for request frame encoding and reply frame decoding.

use docmux::mux::RequestId;
use docmux::protocol::{
    decode_reply, encode_command, encode_request, split_reply, Command, Condition, Reply,
};
use serde_json::json;

// =============================================================================
// Request Encoding Tests
// =============================================================================

#[test]
fn test_encode_request_orders_marker_id_verb_args() {
    let frame = encode_request(RequestId::new(42), "GET", &["x", "FROM", "users"]);
    assert_eq!(frame, "ID 42 GET x FROM users");
}

#[test]
fn test_encode_request_without_args_has_no_trailing_space() {
    let frame = encode_request::<&str>(RequestId::new(7), "PING", &[]);
    assert_eq!(frame, "ID 7 PING");
}

#[test]
fn test_encode_command_get() {
    let cmd = Command::Get {
        collection: "users".to_string(),
        document: "CoolTomato".to_string(),
    };
    assert_eq!(encode_command(RequestId::new(1), &cmd), "ID 1 GET CoolTomato FROM users");
}

#[test]
fn test_encode_command_set_embeds_json_body() {
    let cmd = Command::set("users", "alice", &json!({"name": "Alice"})).unwrap();
    assert_eq!(
        encode_command(RequestId::new(3), &cmd),
        r#"ID 3 SET alice FROM users TO {"name":"Alice"}"#
    );
}

#[test]
fn test_encode_command_list_with_condition() {
    let cmd = Command::List {
        collection: "users".to_string(),
        condition: Some(Condition::gt("height", "175")),
    };
    assert_eq!(
        encode_command(RequestId::new(9), &cmd),
        "ID 9 LIST users WHERE height GT 175"
    );
}

// =============================================================================
// Reply Splitting Tests
// =============================================================================

#[test]
fn test_split_reply_keeps_payload_spaces() {
    let frame = split_reply(r#"ID 12 {"a": 1, "b": 2}"#).unwrap();
    assert_eq!(frame.id_token, "12");
    assert_eq!(frame.payload, r#"{"a": 1, "b": 2}"#);
}

#[test]
fn test_split_reply_rejects_wrong_marker() {
    assert!(split_reply(r#"XX 1 {"status":"success"}"#).is_err());
    assert!(split_reply(r#"id 1 {"status":"success"}"#).is_err());
}

#[test]
fn test_split_reply_rejects_missing_parts() {
    assert!(split_reply("").is_err());
    assert!(split_reply("ID").is_err());
    assert!(split_reply("ID 5").is_err());
    assert!(split_reply(r#"ID  {"status":"success"}"#).is_err());
}

// =============================================================================
// Reply Decoding Tests
// =============================================================================

#[test]
fn test_decode_success_reply() {
    let (id, reply) = decode_reply(r#"ID 5 {"status":"success","data":{"name":"A"}}"#).unwrap();
    assert_eq!(id, "5");
    assert_eq!(reply, Reply::Success(json!({"name": "A"})));
}

#[test]
fn test_decode_success_reply_without_data_is_null() {
    let (_, reply) = decode_reply(r#"ID 5 {"status": "success"}"#).unwrap();
    assert_eq!(reply, Reply::Success(serde_json::Value::Null));
}

#[test]
fn test_decode_error_reply() {
    let (_, reply) =
        decode_reply(r#"ID 6 {"status": "error", "message": "Document not found"}"#).unwrap();
    assert_eq!(reply, Reply::Failure("Document not found".to_string()));
    assert!(!reply.is_success());
}

#[test]
fn test_decode_payload_with_spaces_matches_compact_form() {
    let (_, spaced) = decode_reply(r#"ID 1 {"status": "success", "data": {"a": 1, "b": 2}}"#).unwrap();
    let (_, compact) = decode_reply(r#"ID 1 {"status":"success","data":{"a":1,"b":2}}"#).unwrap();
    assert_eq!(spaced, compact);
    assert_eq!(spaced, Reply::Success(json!({"a": 1, "b": 2})));
}

#[test]
fn test_decode_rejects_invalid_json() {
    assert!(decode_reply("ID 1 not json").is_err());
    assert!(decode_reply(r#"ID 1 {"status": "success""#).is_err());
}

#[test]
fn test_decode_rejects_missing_status() {
    assert!(decode_reply(r#"ID 1 {"data": 1}"#).is_err());
}

#[test]
fn test_decode_rejects_failure_without_message() {
    assert!(decode_reply(r#"ID 1 {"status": "error"}"#).is_err());
}

#[test]
fn test_reply_into_result() {
    assert_eq!(Reply::Success(json!(1)).into_result().unwrap(), json!(1));

    let err = Reply::Failure("nope".to_string()).into_result().unwrap_err();
    assert_eq!(err.remote_message(), Some("nope"));
    assert_eq!(err.to_string(), "nope");
}
