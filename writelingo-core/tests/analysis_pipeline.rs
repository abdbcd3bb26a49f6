//! End-to-end tests for the analysis pipeline using scripted model doubles.

use std::sync::Arc;
use writelingo_core::change::ChangeType;
use writelingo_core::engines::{CorrectionEngine, NarrativeEngine, StructureEngine, ToneEngine};
use writelingo_core::models::{EntailmentModel, Generator, LexiconTagger, NliLogits, Tagger};
use writelingo_core::testing::{FailingGenerator, ScriptedEntailment, ScriptedGenerator};
use writelingo_core::{
    AnalysisError, AnalyzeRequest, Analyzer, DedupMode, LiveCheckRequest, SpellChecker, Tone,
};

fn analyzer_with(
    generator: Arc<dyn Generator>,
    nli: Option<Arc<dyn EntailmentModel>>,
    dedup: DedupMode,
) -> Analyzer {
    let tagger: Arc<dyn Tagger> = Arc::new(LexiconTagger::builtin());
    let speller = SpellChecker::builtin();
    Analyzer::new(
        NarrativeEngine::new(tagger.clone(), nli),
        StructureEngine::new(speller.clone()),
        ToneEngine::new(generator, "google/flan-t5-small"),
        CorrectionEngine::new(tagger, speller).with_dedup(dedup),
    )
}

fn echo_analyzer(text: &str) -> Analyzer {
    analyzer_with(Arc::new(ScriptedGenerator::new(vec![text])), None, DedupMode::Surface)
}

// =============================================================================
// Full pipeline
// =============================================================================

#[tokio::test]
async fn test_correction_reasons_flow_into_diff() {
    let text = "I didn't completed the task.";
    let response = echo_analyzer(text)
        .analyze(&AnalyzeRequest::new(text))
        .await
        .unwrap();

    assert_eq!(response.modified_text, "I didn't complete the task.");
    assert_eq!(response.consistency_score, 1.0);
    assert_eq!(response.detected_tone, Tone::Neutral);

    assert_eq!(response.changes.len(), 1);
    let change = &response.changes[0];
    assert_eq!(change.change_type, ChangeType::Modification);
    assert_eq!(change.before, "completed");
    assert_eq!(change.after, "complete");
    assert_eq!(
        change.reason.as_deref(),
        Some("After 'did', use the base form 'complete'.")
    );

    assert_eq!(
        response.explanation.last().map(String::as_str),
        Some("Change tracker detected 1 change(s).")
    );
    assert!(response
        .explanation
        .contains(&"Tone modifications applied: model_inference:google/flan-t5-small+LoRA".to_string()));
}

#[tokio::test]
async fn test_tone_edits_get_default_reasons() {
    let analyzer = analyzer_with(
        Arc::new(ScriptedGenerator::new(vec!["The task is done."])),
        None,
        DedupMode::Surface,
    );
    let request = AnalyzeRequest::new("hey the task is done").with_target_tone(Tone::Formal);
    let response = analyzer.analyze(&request).await.unwrap();

    assert_eq!(response.detected_tone, Tone::Informal);
    assert_eq!(response.modified_text, "The task is done.");
    assert!(!response.changes.is_empty());
    for change in &response.changes {
        assert_eq!(
            change.reason.as_deref(),
            Some(change.change_type.default_reason()),
            "{change:?}"
        );
    }
}

#[tokio::test]
async fn test_tone_failure_still_corrects_original() {
    let analyzer = analyzer_with(Arc::new(FailingGenerator::new("endpoint down")), None, DedupMode::Surface);
    let response = analyzer
        .analyze(&AnalyzeRequest::new("She ate a apple."))
        .await
        .unwrap();

    assert_eq!(response.modified_text, "She ate an apple.");
    let tone_line = response
        .explanation
        .iter()
        .find(|line| line.starts_with("Tone modifications applied: model_error:"))
        .expect("tone error should be explained");
    assert!(tone_line.contains("endpoint down"));
}

#[tokio::test]
async fn test_diff_is_empty_for_clean_text() {
    let text = "The sun rose over the quiet town.";
    let response = echo_analyzer(text).analyze(&AnalyzeRequest::new(text)).await.unwrap();
    assert_eq!(response.modified_text, text);
    assert!(response.changes.is_empty());
}

#[tokio::test]
async fn test_empty_text_is_rejected() {
    let err = echo_analyzer("unused")
        .analyze(&AnalyzeRequest::new(""))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyText));
}

#[tokio::test]
async fn test_nli_failure_fails_the_pipeline() {
    let nli = Arc::new(ScriptedEntailment::failing("classifier offline"));
    let analyzer = analyzer_with(Arc::new(ScriptedGenerator::new(vec!["x"])), Some(nli), DedupMode::Surface);

    let err = analyzer
        .analyze(&AnalyzeRequest::new("The door is open. The door is shut."))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Model(_)));
    assert!(err.to_string().contains("classifier offline"));
}

#[tokio::test]
async fn test_consistency_uses_entailment_scores() {
    let nli = Arc::new(ScriptedEntailment::constant(NliLogits::new(0.0, 0.0, 0.0)));
    let text = "The door is open. Wind blows through it.";
    let analyzer = analyzer_with(Arc::new(ScriptedGenerator::new(vec![text])), Some(nli.clone()), DedupMode::Surface);

    let response = analyzer.analyze(&AnalyzeRequest::new(text)).await.unwrap();
    assert!((response.consistency_score - 2.0 / 3.0).abs() < 1e-6);
    assert_eq!(nli.calls().len(), 1);
}

#[tokio::test]
async fn test_position_dedup_changes_output() {
    let text = "I can completed this. It was completed.";
    let surface = echo_analyzer(text).analyze(&AnalyzeRequest::new(text)).await.unwrap();
    assert_eq!(surface.modified_text, "I can complete this. It was complete.");

    let position = analyzer_with(Arc::new(ScriptedGenerator::new(vec![text])), None, DedupMode::Position)
        .analyze(&AnalyzeRequest::new(text))
        .await
        .unwrap();
    assert_eq!(position.modified_text, "I can complete this. It was completed.");
}

// =============================================================================
// Live check
// =============================================================================

#[tokio::test]
async fn test_live_check_without_topic() {
    let result = echo_analyzer("x")
        .live_check(&LiveCheckRequest {
            text: "Anything at all.".to_string(),
            topic: None,
        })
        .await
        .unwrap();
    assert!(result.is_on_topic);
    assert_eq!(result.relevance_score, 1.0);
    assert!(result.suggestion.is_none());
}

#[tokio::test]
async fn test_live_check_off_topic() {
    let nli = Arc::new(ScriptedEntailment::constant(NliLogits::new(8.0, 0.0, 0.0)));
    let analyzer = analyzer_with(Arc::new(ScriptedGenerator::new(vec!["x"])), Some(nli), DedupMode::Surface);
    let result = analyzer
        .live_check(&LiveCheckRequest {
            text: "My cat sleeps all day.".to_string(),
            topic: Some("rocket engines".to_string()),
        })
        .await
        .unwrap();

    assert!(!result.is_on_topic);
    assert!(result.relevance_score < 0.4);
    assert!(result.suggestion.unwrap().contains("rocket engines"));
}
