//! Word-level change tracking between an original and a revised text.

use crate::change::{ChangeRecord, ChangeType};
use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices, Algorithm, DiffTag};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    pub changes: Vec<ChangeRecord>,
}

/// Align the whitespace-split words of both texts and report the edits.
pub fn diff_words(original: &str, revised: &str) -> DiffResult {
    let before: Vec<&str> = original.split_whitespace().collect();
    let after: Vec<&str> = revised.split_whitespace().collect();

    let changes = capture_diff_slices(Algorithm::Lcs, &before, &after)
        .iter()
        .filter_map(|op| {
            let (tag, old, new) = op.as_tag_tuple();
            let change_type = match tag {
                DiffTag::Equal => return None,
                DiffTag::Insert => ChangeType::Addition,
                DiffTag::Delete => ChangeType::Deletion,
                DiffTag::Replace => ChangeType::Modification,
            };
            let before_text = before[old].join(" ");
            let after_text = after[new].join(" ");
            if before_text.is_empty() && after_text.is_empty() {
                return None;
            }
            Some(ChangeRecord::new(change_type, before_text, after_text))
        })
        .collect();

    DiffResult { changes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts_have_no_changes() {
        let text = "The quick brown fox jumps.";
        assert!(diff_words(text, text).changes.is_empty());
        assert!(diff_words("", "").changes.is_empty());
    }

    #[test]
    fn test_whitespace_only_differences_are_ignored() {
        assert!(diff_words("a  b\nc", "a b c").changes.is_empty());
    }

    #[test]
    fn test_modification() {
        let result = diff_words("I didn't completed the task.", "I didn't complete the task.");
        assert_eq!(
            result.changes,
            vec![ChangeRecord::new(ChangeType::Modification, "completed", "complete")]
        );
    }

    #[test]
    fn test_addition_and_deletion() {
        let added = diff_words("the cat sat", "the black cat sat");
        assert_eq!(
            added.changes,
            vec![ChangeRecord::new(ChangeType::Addition, "", "black")]
        );

        let removed = diff_words("the the cat", "the cat");
        assert_eq!(removed.changes.len(), 1);
        assert_eq!(removed.changes[0].change_type, ChangeType::Deletion);
        assert_eq!(removed.changes[0].before, "the");
        assert_eq!(removed.changes[0].after, "");
    }

    #[test]
    fn test_multi_word_replacement_joined() {
        let result = diff_words("a apple fell", "an apple fell");
        assert_eq!(result.changes[0].before, "a");
        assert_eq!(result.changes[0].after, "an");

        let result = diff_words("hey this is cool", "hello this is great indeed");
        let types: Vec<ChangeType> = result.changes.iter().map(|c| c.change_type).collect();
        assert_eq!(types, vec![ChangeType::Modification, ChangeType::Modification]);
        assert_eq!(result.changes[1].before, "cool");
        assert_eq!(result.changes[1].after, "great indeed");
    }
}
