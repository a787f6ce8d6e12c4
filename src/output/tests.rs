//! Tests for output messages and sinks

use super::*;
use crate::schema::{JsonSchema, JsonType, SchemaProperty};
use crate::types::JsonObject;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

fn record(value: serde_json::Value) -> JsonObject {
    match value {
        serde_json::Value::Object(obj) => obj,
        other => panic!("not an object: {other}"),
    }
}

#[test]
fn test_schema_message_shape() {
    let schema = JsonSchema::new().property("employeeId", SchemaProperty::nullable(JsonType::Integer));
    let msg = Message::schema("employees", &schema, &["employeeId"], Some("lastModified"));

    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(value["type"], "SCHEMA");
    assert_eq!(value["stream"], "employees");
    assert_eq!(value["key_properties"], json!(["employeeId"]));
    assert_eq!(value["bookmark_properties"], json!(["lastModified"]));
    assert_eq!(
        value["schema"]["properties"]["employeeId"]["type"],
        json!(["integer", "null"])
    );
}

#[test]
fn test_schema_message_without_replication_key() {
    let msg = Message::schema("leave_balances", &JsonSchema::new(), &["a", "b"], None);
    let value = serde_json::to_value(&msg).unwrap();
    assert!(value.get("bookmark_properties").is_none());
    assert_eq!(value["key_properties"], json!(["a", "b"]));
}

#[test]
fn test_record_message_shape() {
    let at = Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap();
    let msg = Message::record("attendance_insights", record(json!({"employee": 1})), Some(at));

    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(value["type"], "RECORD");
    assert_eq!(value["record"], json!({"employee": 1}));
    assert_eq!(value["time_extracted"], "2024-03-15T08:00:00Z");
    assert_eq!(msg.stream(), Some("attendance_insights"));
}

#[test]
fn test_state_message_shape() {
    let msg = Message::state(json!({"bookmarks": {}}));
    assert_eq!(
        serde_json::to_value(&msg).unwrap(),
        json!({"type": "STATE", "value": {"bookmarks": {}}})
    );
    assert!(msg.is_state());
    assert_eq!(msg.stream(), None);
}

#[test]
fn test_message_deserializes_from_line() {
    let msg: Message =
        serde_json::from_str(r#"{"type":"RECORD","stream":"s","record":{"x":1}}"#).unwrap();
    assert!(msg.is_record());
}

#[test]
fn test_vec_sink_collects() {
    let mut sink: Vec<Message> = Vec::new();
    sink.emit(Message::state(json!({}))).unwrap();
    sink.emit(Message::record("s", JsonObject::new(), None)).unwrap();
    assert_eq!(sink.len(), 2);
    assert!(sink[1].is_record());
}

#[test]
fn test_json_lines_writer_one_object_per_line() {
    let mut writer = JsonLinesWriter::new(Vec::new());
    writer
        .emit(Message::record("s", record(json!({"a": 1})), None))
        .unwrap();
    writer.emit(Message::state(json!({"bookmarks": {}}))).unwrap();
    assert_eq!(writer.messages_written(), 2);

    let output = String::from_utf8(writer.into_inner()).unwrap();
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(lines[0]).unwrap(),
        json!({"type": "RECORD", "stream": "s", "record": {"a": 1}})
    );
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(lines[1]).unwrap()["type"],
        "STATE"
    );
}

#[test]
fn test_pretty_writer_spans_lines() {
    let mut writer = JsonLinesWriter::pretty(Vec::new());
    writer.emit(Message::state(json!({"bookmarks": {}}))).unwrap();
    let output = String::from_utf8(writer.into_inner()).unwrap();
    assert!(output.lines().count() > 1);
}
