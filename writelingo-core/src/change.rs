//! Change records shared by the correction, diff, and analysis layers.

use serde::{Deserialize, Serialize};

/// What kind of edit a change describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Addition,
    Deletion,
    Modification,
}

impl ChangeType {
    /// Reason attached to diff changes that no correction explains.
    pub fn default_reason(self) -> &'static str {
        match self {
            ChangeType::Modification => {
                "AI adjusted this word to better match the target tone and flow."
            }
            ChangeType::Addition => "AI added this to improve narrative clarity.",
            ChangeType::Deletion => "AI removed this for conciseness.",
        }
    }
}

/// A single edit from `before` to `after`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub before: String,
    pub after: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ChangeRecord {
    pub fn new(change_type: ChangeType, before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            change_type,
            before: before.into(),
            after: after.into(),
            reason: None,
        }
    }

    pub fn modification(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self::new(ChangeType::Modification, before, after)
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
