//! Tests for metrics emitted by the chunked driver.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use tokenz::telemetry;
use tokenz::{Encoding, NoProgress, Result, TokenizerProvider, TokenzError, tokenize_document};

// ============================================================================
// Stub tokenizers
// ============================================================================

/// One token per character.
struct CharTokenizer;

impl TokenizerProvider for CharTokenizer {
    fn encode(&self, text: &str, _add_special_tokens: bool) -> Result<Encoding> {
        let n = text.chars().count();
        Ok(Encoding {
            ids: (0..n as u32).collect(),
            offsets: (0..n).map(|i| (i, i + 1)).collect(),
        })
    }

    fn token_to_id(&self, _token: &str) -> Option<u32> {
        None
    }
}

struct FailingTokenizer;

impl TokenizerProvider for FailingTokenizer {
    fn encode(&self, _text: &str, _add_special_tokens: bool) -> Result<Encoding> {
        Err(TokenzError::Tokenizer("unavailable".into()))
    }

    fn token_to_id(&self, _token: &str) -> Option<u32> {
        None
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// The `status` label of the first counter matching `name`.
fn status_label(snapshot: &SnapshotVec, name: &str) -> Option<String> {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .flat_map(|(key, _, _, _)| key.key().labels())
        .find(|label| label.key() == "status")
        .map(|label| label.value().to_string())
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn successful_document_records_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokenize_document("abcdefghij", &CharTokenizer, 4, &mut NoProgress)
    });
    assert_eq!(result.unwrap().len(), 10);

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::DOCUMENTS_TOTAL), 1);
    assert_eq!(
        status_label(&snapshot, telemetry::DOCUMENTS_TOTAL).as_deref(),
        Some("ok")
    );
    assert_eq!(counter_total(&snapshot, telemetry::CHUNKS_TOTAL), 3);
    assert_eq!(counter_total(&snapshot, telemetry::TOKENS_TOTAL), 10);
    assert!(
        has_histogram(&snapshot, telemetry::TOKENIZE_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[test]
fn failed_document_records_error_status() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokenize_document("abcdefghij", &FailingTokenizer, 4, &mut NoProgress)
    });
    assert!(result.is_err());

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::DOCUMENTS_TOTAL), 1);
    assert_eq!(
        status_label(&snapshot, telemetry::DOCUMENTS_TOTAL).as_deref(),
        Some("error")
    );
    assert_eq!(counter_total(&snapshot, telemetry::CHUNKS_TOTAL), 0);
    assert_eq!(counter_total(&snapshot, telemetry::TOKENS_TOTAL), 0);
}

#[test]
fn cancelled_document_records_cancelled_status() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokenz::tokenize_document_until("abcdefghij", &CharTokenizer, 4, &mut NoProgress, || true)
    });
    assert!(matches!(result, Err(TokenzError::Cancelled)));

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        status_label(&snapshot, telemetry::DOCUMENTS_TOTAL).as_deref(),
        Some("cancelled")
    );
}

#[test]
fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let result = tokenize_document("hello", &CharTokenizer, 2, &mut NoProgress).unwrap();
    assert_eq!(result.len(), 5);
}
