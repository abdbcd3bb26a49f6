//! User record storage and JSON snapshots.

use super::record::UserRecord;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Id of the demo account every fresh store contains.
pub const DEMO_USER: &str = "default_user";

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid snapshot format")]
    InvalidFormat,

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Repository of user records keyed by user id.
///
/// `update` must run its closure atomically for a key: concurrent updates
/// to one user serialize. A missing user is created before the closure runs.
pub trait UserStore: Send + Sync {
    fn update<R>(&self, user_id: &str, f: impl FnOnce(&mut UserRecord) -> R) -> R;

    fn get(&self, user_id: &str) -> Option<UserRecord>;

    /// Copy of every record, ordered by user id.
    fn snapshot(&self) -> BTreeMap<String, UserRecord>;
}

/// Sharded in-memory store.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<String, UserRecord>,
}

impl MemoryUserStore {
    /// A store holding only the demo account.
    pub fn new() -> Self {
        let store = Self::empty();
        store
            .users
            .insert(DEMO_USER.to_string(), UserRecord::demo(Utc::now()));
        store
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = (String, UserRecord)>) -> Self {
        Self {
            users: records.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Save every record to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let snapshot = Snapshot::new(self.snapshot());
        let content = serde_json::to_string_pretty(&snapshot)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load a store from a JSON file written by [`MemoryUserStore::save_json`].
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let value: serde_json::Value = serde_json::from_str(&content)?;

        let found = value
            .get("version")
            .and_then(|v| v.as_u64())
            .ok_or(PersistError::InvalidFormat)?;
        if found != u64::from(SNAPSHOT_VERSION) {
            return Err(PersistError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: u32::try_from(found).unwrap_or(u32::MAX),
            });
        }

        let snapshot: Snapshot = serde_json::from_value(value)?;
        Ok(Self::from_records(snapshot.users))
    }
}

impl UserStore for MemoryUserStore {
    fn update<R>(&self, user_id: &str, f: impl FnOnce(&mut UserRecord) -> R) -> R {
        // The entry guard holds the shard lock until `f` returns.
        let mut entry = self
            .users
            .entry(user_id.to_string())
            .or_insert_with(|| UserRecord::new(Utc::now()));
        f(entry.value_mut())
    }

    fn get(&self, user_id: &str) -> Option<UserRecord> {
        self.users.get(user_id).map(|r| r.value().clone())
    }

    fn snapshot(&self) -> BTreeMap<String, UserRecord> {
        self.users
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}

// ============================================================================
// Snapshot file
// ============================================================================

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    saved_at: DateTime<Utc>,
    users: BTreeMap<String, UserRecord>,
}

impl Snapshot {
    fn new(users: BTreeMap<String, UserRecord>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            users,
        }
    }
}
