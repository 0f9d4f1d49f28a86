//! Chunked tokenization driver.
//!
//! Long documents are split into fixed-size character chunks, each chunk is
//! encoded independently by the external tokenizer, and the per-chunk
//! results are merged back into whole-document coordinates.
//!
//! Chunk boundaries are purely positional. A boundary that falls inside a
//! word splits that word across two tokenizer calls, so chunked output can
//! differ from encoding the whole text at once. This is accepted, not
//! corrected.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{Result, TokenzError};
use crate::telemetry;
use crate::tokenizer::TokenizerProvider;

/// Default chunk length in characters.
pub const DEFAULT_MAX_CHUNK_LEN: usize = 1024;

/// Merged tokenizer output for a whole document.
///
/// `ids[i]` spans characters `offsets[i].0..offsets[i].1` of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizationResult {
    pub ids: Vec<u32>,
    pub offsets: Vec<(usize, usize)>,
}

impl TokenizationResult {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate `(id, (start, end))` pairs in document order.
    pub fn tokens(&self) -> impl Iterator<Item = (u32, (usize, usize))> + '_ {
        self.ids.iter().copied().zip(self.offsets.iter().copied())
    }
}

/// A contiguous character slice of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Position of the chunk in the document's chunk sequence.
    pub index: usize,
    /// Character position of the chunk's first character in the document.
    pub base: usize,
    pub text: &'a str,
}

/// Receives integer completion percentages while a document is tokenized.
pub trait ProgressObserver {
    fn on_progress(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressObserver for F {
    fn on_progress(&mut self, percent: u8) {
        self(percent)
    }
}

/// Observer that ignores progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _percent: u8) {}
}

/// Split `text` into consecutive chunks of at most `max_chunk_len` characters.
///
/// Returns `ceil(chars / max_chunk_len)` chunks; empty text yields none.
pub fn split_chunks(text: &str, max_chunk_len: usize) -> Result<Vec<Chunk<'_>>> {
    if max_chunk_len == 0 {
        return Err(TokenzError::InvalidInput(
            "max_chunk_len must be greater than zero".to_string(),
        ));
    }

    let mut chunks = Vec::new();
    let mut start_byte = 0;
    let mut chars_in_chunk = 0;

    for (byte_idx, _) in text.char_indices() {
        if chars_in_chunk == max_chunk_len {
            chunks.push(Chunk {
                index: chunks.len(),
                base: chunks.len() * max_chunk_len,
                text: &text[start_byte..byte_idx],
            });
            start_byte = byte_idx;
            chars_in_chunk = 0;
        }
        chars_in_chunk += 1;
    }

    if chars_in_chunk > 0 {
        chunks.push(Chunk {
            index: chunks.len(),
            base: chunks.len() * max_chunk_len,
            text: &text[start_byte..],
        });
    }

    Ok(chunks)
}

/// Tokenize a whole document chunk by chunk.
///
/// Every chunk is encoded with special tokens and character offsets. Offsets
/// from chunk `i` are shifted by `i * max_chunk_len`. The observer receives
/// `(completed * 100) / total` after each chunk. If any chunk fails, the
/// whole call fails and nothing is returned.
pub fn tokenize_document(
    text: &str,
    tokenizer: &dyn TokenizerProvider,
    max_chunk_len: usize,
    observer: &mut impl ProgressObserver,
) -> Result<TokenizationResult> {
    tokenize_document_until(text, tokenizer, max_chunk_len, observer, || false)
}

/// [`tokenize_document`] with cooperative cancellation.
///
/// `is_cancelled` is checked before each chunk; once it returns true the
/// call stops with [`TokenzError::Cancelled`].
#[instrument(
    skip(text, tokenizer, observer, is_cancelled),
    fields(chars = tracing::field::Empty, chunks = tracing::field::Empty)
)]
pub fn tokenize_document_until(
    text: &str,
    tokenizer: &dyn TokenizerProvider,
    max_chunk_len: usize,
    observer: &mut impl ProgressObserver,
    is_cancelled: impl Fn() -> bool,
) -> Result<TokenizationResult> {
    let start = Instant::now();
    let outcome = run_chunks(text, tokenizer, max_chunk_len, observer, is_cancelled);
    record_document(start, &outcome);
    outcome
}

fn run_chunks(
    text: &str,
    tokenizer: &dyn TokenizerProvider,
    max_chunk_len: usize,
    observer: &mut impl ProgressObserver,
    is_cancelled: impl Fn() -> bool,
) -> Result<TokenizationResult> {
    let chunks = split_chunks(text, max_chunk_len)?;
    let total = chunks.len();

    let span = tracing::Span::current();
    span.record("chars", text.chars().count());
    span.record("chunks", total);

    let mut result = TokenizationResult::default();

    for chunk in &chunks {
        if is_cancelled() {
            debug!(chunk = chunk.index, "tokenization cancelled");
            return Err(TokenzError::Cancelled);
        }

        let encoding = tokenizer.encode(chunk.text, true)?;
        if encoding.ids.len() != encoding.offsets.len() {
            return Err(TokenzError::Tokenizer(format!(
                "tokenizer returned {} ids but {} offsets for chunk {}",
                encoding.ids.len(),
                encoding.offsets.len(),
                chunk.index
            )));
        }

        debug!(
            chunk = chunk.index,
            base = chunk.base,
            tokens = encoding.len(),
            "chunk tokenized"
        );
        metrics::counter!(telemetry::CHUNKS_TOTAL).increment(1);

        result.ids.extend_from_slice(&encoding.ids);
        if chunk.index == 0 {
            result.offsets.extend_from_slice(&encoding.offsets);
        } else {
            result.offsets.extend(
                encoding
                    .offsets
                    .iter()
                    .map(|&(s, e)| (s + chunk.base, e + chunk.base)),
            );
        }

        // total > 0 inside the loop
        let percent = ((chunk.index + 1) * 100 / total) as u8;
        observer.on_progress(percent);
    }

    info!(tokens = result.len(), chunks = total, "document tokenized");
    Ok(result)
}

fn record_document(start: Instant, outcome: &Result<TokenizationResult>) {
    let status = match outcome {
        Ok(result) => {
            metrics::counter!(telemetry::TOKENS_TOTAL).increment(result.len() as u64);
            "ok"
        }
        Err(TokenzError::Cancelled) => "cancelled",
        Err(_) => "error",
    };
    metrics::counter!(telemetry::DOCUMENTS_TOTAL, "status" => status).increment(1);
    metrics::histogram!(telemetry::TOKENIZE_DURATION_SECONDS)
        .record(start.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_cover_text_in_order() {
        let chunks = split_chunks("abcdefg", 3).unwrap();
        let texts: Vec<_> = chunks.iter().map(|c| c.text).collect();
        assert_eq!(texts, ["abc", "def", "g"]);
        let bases: Vec<_> = chunks.iter().map(|c| c.base).collect();
        assert_eq!(bases, [0, 3, 6]);
    }

    #[test]
    fn chunks_count_characters_not_bytes() {
        let chunks = split_chunks("héllo wörld", 4).unwrap();
        let texts: Vec<_> = chunks.iter().map(|c| c.text).collect();
        assert_eq!(texts, ["héll", "o wö", "rld"]);
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_chunk() {
        assert_eq!(split_chunks("abcdef", 3).unwrap().len(), 2);
        assert!(split_chunks("", 3).unwrap().is_empty());
    }

    #[test]
    fn zero_chunk_len_is_rejected() {
        assert!(matches!(
            split_chunks("abc", 0),
            Err(TokenzError::InvalidInput(_))
        ));
    }
}
