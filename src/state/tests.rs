//! Tests for state types and StateManager

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

#[test]
fn test_state_serializes_singer_shape() {
    let mut state = State::new();
    state.set_cursor("employees", "lastModified", "2024-05-01T10:00:00".to_string());

    assert_eq!(
        state.to_value(),
        json!({
            "bookmarks": {
                "employees": {
                    "replication_key": "lastModified",
                    "replication_key_value": "2024-05-01T10:00:00"
                }
            }
        })
    );
    assert_eq!(State::new().to_value(), json!({"bookmarks": {}}));
}

#[test]
fn test_state_tolerates_missing_bookmarks() {
    let state: State = serde_json::from_value(json!({})).unwrap();
    assert!(state.bookmarks.is_empty());
    assert!(state.get_cursor("employees").is_none());
}

#[test]
fn test_newer_cursor() {
    let later = json!("2024-06-01");
    let earlier = json!("2024-01-01");

    assert_eq!(newer_cursor(None, Some(&later)), Some("2024-06-01".to_string()));
    assert_eq!(
        newer_cursor(Some("2024-03-01"), Some(&later)),
        Some("2024-06-01".to_string())
    );
    assert_eq!(newer_cursor(Some("2024-03-01"), Some(&earlier)), None);
    assert_eq!(newer_cursor(Some("2024-06-01"), Some(&later)), None);
    assert_eq!(newer_cursor(None, Some(&json!(null))), None);
    assert_eq!(newer_cursor(None, Some(&json!(""))), None);
    assert_eq!(newer_cursor(None, None), None);
    assert_eq!(newer_cursor(None, Some(&json!(17))), Some("17".to_string()));
}

#[test]
fn test_in_memory_manager() {
    let manager = StateManager::in_memory();
    assert!(manager.is_in_memory());
}

#[tokio::test]
async fn test_get_set_cursor() {
    let manager = StateManager::in_memory();
    assert!(manager.get_cursor("employees").await.is_none());

    manager
        .set_cursor("employees", "lastModified", "2024-01-01".to_string())
        .await
        .unwrap();

    assert_eq!(
        manager.get_cursor("employees").await,
        Some("2024-01-01".to_string())
    );
}

#[tokio::test]
async fn test_from_json() {
    let manager = StateManager::from_json(
        r#"{"bookmarks": {"employees": {"replication_key": "lastModified", "replication_key_value": "x"}}}"#,
    )
    .unwrap();

    assert!(manager.is_in_memory());
    assert_eq!(manager.get_cursor("employees").await, Some("x".to_string()));
}

#[test]
fn test_from_json_invalid() {
    assert!(matches!(
        StateManager::from_json("{not json"),
        Err(crate::error::Error::State { .. })
    ));
}

#[tokio::test]
async fn test_from_json_empty_string_is_empty_state() {
    let manager = StateManager::from_json("  ").unwrap();
    assert_eq!(manager.to_value().await, json!({"bookmarks": {}}));
}

#[tokio::test]
async fn test_file_round_trip_and_auto_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    // Missing file starts empty
    let manager = StateManager::from_file(&path).unwrap();
    assert!(manager.get_cursor("employees").await.is_none());

    manager
        .set_cursor("employees", "lastModified", "2024-04-01".to_string())
        .await
        .unwrap();
    assert!(path.exists());

    let reloaded = StateManager::from_file(&path).unwrap();
    assert_eq!(
        reloaded.get_cursor("employees").await,
        Some("2024-04-01".to_string())
    );
}

#[tokio::test]
async fn test_save_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.json");

    let manager = StateManager::in_memory();
    manager
        .set_cursor("employees", "lastModified", "v".to_string())
        .await
        .unwrap();
    manager.save_to_file(&path).await.unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        written["bookmarks"]["employees"]["replication_key_value"],
        "v"
    );
}

#[tokio::test]
async fn test_clone_shares_state() {
    let manager = StateManager::in_memory();
    let clone = manager.clone();

    clone
        .set_cursor("employees", "lastModified", "shared".to_string())
        .await
        .unwrap();

    assert_eq!(
        manager.get_cursor("employees").await,
        Some("shared".to_string())
    );
}
