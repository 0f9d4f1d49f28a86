//! Telemetry metric name constants.
//!
//! Centralised metric names for tokenz operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `tokenz_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `status`: outcome, "ok", "error" or "cancelled"

/// Total documents run through the chunked driver.
///
/// Labels: `status` ("ok" | "error" | "cancelled").
pub const DOCUMENTS_TOTAL: &str = "tokenz_documents_total";

/// Total chunks handed to the external tokenizer.
pub const CHUNKS_TOTAL: &str = "tokenz_chunks_total";

/// Total tokens produced across all documents.
pub const TOKENS_TOTAL: &str = "tokenz_tokens_total";

/// Whole-document tokenization duration in seconds.
pub const TOKENIZE_DURATION_SECONDS: &str = "tokenz_tokenize_duration_seconds";

/// Session results discarded because a newer request superseded them.
pub const STALE_RESULTS_TOTAL: &str = "tokenz_stale_results_total";
