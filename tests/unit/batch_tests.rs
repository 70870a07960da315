/*!
 * Tests for batch construction, correlation and orchestration
 */

use std::sync::Arc;
use std::time::Duration;

use vttlate::app_config::TranslationMode;
use vttlate::errors::TranslationError;
use vttlate::providers::mock::MockProvider;
use vttlate::subtitle_processor::SubtitleDocument;
use vttlate::translation::{
    BatchOptions, BatchStatus, BatchTranslator, CueClassifier, Substitution, TranslationBatch,
    TranslationResult,
};

use crate::common::SAMPLE_VTT;

fn sample_batch() -> TranslationBatch {
    let doc = SubtitleDocument::parse(SAMPLE_VTT);
    TranslationBatch::collect(CueClassifier::default().classify_document(&doc))
}

fn translator(mock: &MockProvider, mode: TranslationMode) -> BatchTranslator {
    let options = BatchOptions {
        mode,
        timeout: Duration::from_millis(200),
        max_concurrent_requests: 2,
    };
    BatchTranslator::new(Arc::new(mock.clone()), options)
}

#[test]
fn test_collect_shouldKeepDocumentOrderAndPositions() {
    let batch = sample_batch();
    let positions: Vec<usize> = batch.entries().iter().map(|e| e.position).collect();
    assert_eq!(positions, vec![4, 8]);
    assert_eq!(batch.texts(), vec!["Hello", "Goodbye"]);
}

#[test]
fn test_correlate_withMatchingLength_shouldPairByIndex() {
    let result = TranslationResult::new(vec!["Hola".to_string(), "Adiós".to_string()]);
    let subs = result.correlate(&sample_batch()).unwrap();
    assert_eq!(
        subs,
        vec![
            Substitution { position: 4, text: "Hola".to_string() },
            Substitution { position: 8, text: "Adiós".to_string() },
        ]
    );
}

#[test]
fn test_correlate_withShortResponse_shouldReportMismatch() {
    let result = TranslationResult::new(vec!["Hola".to_string()]);
    assert!(matches!(
        result.correlate(&sample_batch()),
        Err(TranslationError::LengthMismatch { expected: 2, actual: 1 })
    ));
}

#[test]
fn test_correlate_withLongResponse_shouldReportMismatch() {
    let result = TranslationResult::new(vec!["Hola".to_string(), "Adiós".to_string(), "Extra".to_string()]);
    assert!(matches!(
        result.correlate(&sample_batch()),
        Err(TranslationError::LengthMismatch { expected: 2, actual: 3 })
    ));
}

#[test]
fn test_correlate_withEmptyAndMultilineTranslations_shouldKeepSourceAndFlatten() {
    let result = TranslationResult::new(vec!["  ".to_string(), "Good\nbye".to_string()]);
    let subs = result.correlate(&sample_batch()).unwrap();
    assert_eq!(subs, vec![Substitution { position: 8, text: "Good bye".to_string() }]);
}

#[tokio::test]
async fn test_translate_withEmptyBatch_shouldSkipWithoutRequest() {
    let mock = MockProvider::working();
    let outcome = translator(&mock, TranslationMode::Batch)
        .translate(&TranslationBatch::default(), "et", "en")
        .await;
    assert_eq!(outcome.status, BatchStatus::Skipped);
    assert_eq!(outcome.requests, 0);
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_translate_inBatchMode_shouldSendOneRequest() {
    let mock = MockProvider::working();
    let outcome = translator(&mock, TranslationMode::Batch)
        .translate(&sample_batch(), "et", "en")
        .await;

    assert_eq!(outcome.status, BatchStatus::Translated);
    assert_eq!(outcome.requests, 1);
    assert_eq!(mock.received(), vec![vec!["Hello".to_string(), "Goodbye".to_string()]]);
    assert_eq!(outcome.substitutions[1].text, "[en] Goodbye");
}

#[tokio::test]
async fn test_translate_withMalformedResponse_shouldFallBack() {
    let mock = MockProvider::malformed();
    let outcome = translator(&mock, TranslationMode::Batch)
        .translate(&sample_batch(), "et", "en")
        .await;
    assert!(matches!(outcome.status, BatchStatus::Fallback { .. }));
    assert!(outcome.substitutions.is_empty());
}

#[tokio::test]
async fn test_translate_withSlowProvider_shouldTimeOutAndFallBack() {
    let mock = MockProvider::slow(2_000);
    let outcome = translator(&mock, TranslationMode::Batch)
        .translate(&sample_batch(), "et", "en")
        .await;
    match outcome.status {
        BatchStatus::Fallback { reason } => assert!(reason.contains("timed out")),
        other => panic!("expected fallback, got {:?}", other),
    }
}

#[tokio::test]
async fn test_translate_inPerLineMode_shouldFallBackPerLine() {
    // Every second request fails
    let mock = MockProvider::intermittent(2);
    let outcome = translator(&mock, TranslationMode::PerLine)
        .translate(&sample_batch(), "et", "en")
        .await;

    assert_eq!(outcome.requests, 2);
    assert_eq!(outcome.status, BatchStatus::Partial { failed: 1 });
    assert_eq!(outcome.substitutions.len(), 1);
}

#[tokio::test]
async fn test_translate_inPerLineMode_shouldKeepOrder() {
    let mock = MockProvider::working();
    let outcome = translator(&mock, TranslationMode::PerLine)
        .translate(&sample_batch(), "et", "en")
        .await;

    assert_eq!(outcome.status, BatchStatus::Translated);
    let positions: Vec<usize> = outcome.substitutions.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![4, 8]);
}
