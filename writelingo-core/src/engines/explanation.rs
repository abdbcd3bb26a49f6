//! Human-readable summary lines built from the other engines' results.

use super::{DiffResult, NarrativeResult, StructureResult, ToneResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationResult {
    pub explanation: Vec<String>,
}

pub fn explain(
    narrative: &NarrativeResult,
    structure: &StructureResult,
    tone: &ToneResult,
    diff: &DiffResult,
) -> ExplanationResult {
    let mut lines = Vec::new();

    let score = narrative.consistency_score;
    if score < 0.5 {
        lines.push(format!(
            "Narrative warning: low adjacent sentence consistency ({score:.2})."
        ));
    } else {
        lines.push(format!(
            "Narrative status: consistency is acceptable ({score:.2})."
        ));
    }

    lines.extend(
        structure
            .suggestions
            .iter()
            .map(|s| format!("Structure suggestion: {s}")),
    );

    if tone.applied_replacements.is_empty() {
        lines.push("Tone modifications: no replacements were applied.".to_string());
    } else {
        lines.push(format!(
            "Tone modifications applied: {}",
            tone.applied_replacements.join(", ")
        ));
    }

    lines.push(format!(
        "Change tracker detected {} change(s).",
        diff.changes.len()
    ));

    ExplanationResult { explanation: lines }
}
