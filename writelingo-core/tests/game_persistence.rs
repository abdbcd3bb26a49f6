//! Save/load tests for the game store snapshot file.

use tempfile::TempDir;
use writelingo_core::game::{MemoryUserStore, PersistError, Skill, UserStore, DEMO_USER};

#[tokio::test]
async fn test_save_and_load_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("game_state.json");

    let store = MemoryUserStore::new();
    store.update("ana", |user| {
        let xp = user.calculate_xp("Word Choice Duel", 1.0, false);
        user.add_xp(xp);
        user.update_win_streak(true);
        user.deduct_heart();
    });
    store.save_json(&path).await.expect("save should succeed");

    let loaded = MemoryUserStore::load_json(&path).await.expect("load should succeed");
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.snapshot(), store.snapshot());

    let ana = loaded.get("ana").unwrap();
    assert_eq!(ana.xp, 40);
    assert_eq!(ana.hearts, 4);
    assert_eq!(ana.win_streak, 1);
    assert_eq!(ana.proficiency(Skill::Vocabulary), 15);
    assert_eq!(loaded.get(DEMO_USER).unwrap().xp, 2000);
}

#[tokio::test]
async fn test_snapshot_file_is_readable_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("game_state.json");
    MemoryUserStore::new().save_json(&path).await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["version"], 1);
    assert_eq!(json["users"][DEMO_USER]["skills"]["Tone & Style"], 10);
}

#[tokio::test]
async fn test_version_mismatch() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("future.json");
    std::fs::write(&path, r#"{"version": 7, "saved_at": "2024-01-01T00:00:00Z", "users": {}}"#).unwrap();

    let err = MemoryUserStore::load_json(&path).await.unwrap_err();
    assert!(matches!(
        err,
        PersistError::VersionMismatch {
            expected: 1,
            found: 7
        }
    ));
}

#[tokio::test]
async fn test_invalid_files() {
    let temp_dir = TempDir::new().unwrap();

    let no_version = temp_dir.path().join("no_version.json");
    std::fs::write(&no_version, r#"{"users": {}}"#).unwrap();
    assert!(matches!(
        MemoryUserStore::load_json(&no_version).await,
        Err(PersistError::InvalidFormat)
    ));

    let garbage = temp_dir.path().join("garbage.json");
    std::fs::write(&garbage, "not json").unwrap();
    assert!(matches!(
        MemoryUserStore::load_json(&garbage).await,
        Err(PersistError::Json(_))
    ));

    let missing = temp_dir.path().join("missing.json");
    assert!(matches!(
        MemoryUserStore::load_json(&missing).await,
        Err(PersistError::Io(_))
    ));
}
