//! Background tokenization with stale-result discarding.
//!
//! Each [`TokenizeSession::submit`] call gets a generation number from a
//! monotonically increasing counter and runs the chunked driver on tokio's
//! blocking pool. Only the newest generation may publish its result. Older
//! requests stop at the next chunk boundary and report
//! [`TaskOutcome::Stale`], so a slow request can never overwrite the result
//! of a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, instrument};

use crate::driver::{TokenizationResult, tokenize_document_until};
use crate::error::{Result, TokenzError};
use crate::telemetry;
use crate::tokenizer::TokenizerProvider;

/// Progress channel capacity.
///
/// Only changed percentages are sent, so 0..=100 always fits.
const PROGRESS_BUFFER: usize = 101;

/// A result that made it to the display.
#[derive(Debug, Clone)]
pub struct Published {
    pub generation: u64,
    pub text: Arc<str>,
    pub result: Arc<TokenizationResult>,
}

/// How a submitted request ended.
#[derive(Debug, Clone)]
pub enum TaskOutcome {
    /// The result was the newest and is now [`TokenizeSession::latest`].
    Applied(Published),
    /// A newer request superseded this one; its result was discarded.
    Stale { generation: u64 },
}

impl TaskOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TaskOutcome::Applied(_))
    }
}

struct Inner {
    tokenizer: RwLock<Arc<dyn TokenizerProvider>>,
    max_chunk_len: usize,
    generation: AtomicU64,
    latest: RwLock<Option<Published>>,
}

impl Inner {
    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn tokenizer(&self) -> Result<Arc<dyn TokenizerProvider>> {
        let guard = self
            .tokenizer
            .read()
            .map_err(|e| TokenzError::TaskFailed(format!("Failed to acquire read lock: {e}")))?;
        Ok(Arc::clone(&guard))
    }

    /// Publish `result` if `generation` is still the newest request.
    fn publish(
        &self,
        generation: u64,
        text: Arc<str>,
        result: TokenizationResult,
    ) -> Result<TaskOutcome> {
        let mut latest = self
            .latest
            .write()
            .map_err(|e| TokenzError::TaskFailed(format!("Failed to acquire write lock: {e}")))?;

        let superseded = latest.as_ref().is_some_and(|p| p.generation > generation);
        if generation != self.current_generation() || superseded {
            return Ok(stale(generation));
        }

        let published = Published {
            generation,
            text,
            result: Arc::new(result),
        };
        *latest = Some(published.clone());
        Ok(TaskOutcome::Applied(published))
    }
}

fn stale(generation: u64) -> TaskOutcome {
    debug!(generation, "discarding stale tokenization result");
    metrics::counter!(telemetry::STALE_RESULTS_TOTAL).increment(1);
    TaskOutcome::Stale { generation }
}

/// Runs tokenize requests off the calling task.
///
/// Cheap to clone; clones share the generation counter and published result.
#[derive(Clone)]
pub struct TokenizeSession {
    inner: Arc<Inner>,
}

impl TokenizeSession {
    pub fn new(tokenizer: Arc<dyn TokenizerProvider>, max_chunk_len: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                tokenizer: RwLock::new(tokenizer),
                max_chunk_len,
                generation: AtomicU64::new(0),
                latest: RwLock::new(None),
            }),
        }
    }

    /// Generation of the most recent request (0 before the first).
    pub fn current_generation(&self) -> u64 {
        self.inner.current_generation()
    }

    /// The most recently applied result, if any.
    pub fn latest(&self) -> Option<Published> {
        self.inner.latest.read().ok().and_then(|p| p.clone())
    }

    /// Swap the tokenizer used by future requests.
    ///
    /// In-flight requests were made with the old tokenizer and become stale.
    pub fn set_tokenizer(&self, tokenizer: Arc<dyn TokenizerProvider>) -> Result<()> {
        let mut guard = self
            .inner
            .tokenizer
            .write()
            .map_err(|e| TokenzError::TaskFailed(format!("Failed to acquire write lock: {e}")))?;
        *guard = tokenizer;
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Start tokenizing `text` in the background.
    ///
    /// The request runs on the tokenizer installed at the time of the call.
    ///
    /// # Panics
    ///
    /// Requires a tokio runtime context.
    #[instrument(skip(self, text))]
    pub fn submit(&self, text: impl Into<Arc<str>>) -> TokenizeTask {
        let text: Arc<str> = text.into();
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (tx, rx) = mpsc::channel(PROGRESS_BUFFER);
        let inner = Arc::clone(&self.inner);
        let tokenizer = self.inner.tokenizer();

        debug!(generation, bytes = text.len(), "tokenize request submitted");

        let handle = tokio::task::spawn_blocking(move || {
            let tokenizer = tokenizer?;
            let mut last_sent = None;
            let mut observer = |percent: u8| {
                if last_sent != Some(percent) {
                    last_sent = Some(percent);
                    // receiver may be gone; progress is advisory
                    let _ = tx.try_send(percent);
                }
            };

            let outcome = tokenize_document_until(
                &text,
                &*tokenizer,
                inner.max_chunk_len,
                &mut observer,
                || inner.current_generation() != generation,
            );

            match outcome {
                Ok(result) => inner.publish(generation, Arc::clone(&text), result),
                Err(TokenzError::Cancelled) => Ok(stale(generation)),
                Err(e) => Err(e),
            }
        });

        TokenizeTask {
            generation,
            progress: Some(ReceiverStream::new(rx)),
            handle,
        }
    }
}

/// Handle to a submitted tokenize request.
pub struct TokenizeTask {
    generation: u64,
    progress: Option<ReceiverStream<u8>>,
    handle: JoinHandle<Result<TaskOutcome>>,
}

impl TokenizeTask {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Take the progress stream. Returns `None` after the first call.
    ///
    /// The stream yields distinct percentages in increasing order and ends
    /// when the request finishes.
    pub fn take_progress(&mut self) -> Option<ReceiverStream<u8>> {
        self.progress.take()
    }

    /// Wait for the request to finish.
    ///
    /// Tokenizer failures come back as errors; nothing is published for them.
    pub async fn finish(self) -> Result<TaskOutcome> {
        self.handle
            .await
            .map_err(|e| TokenzError::TaskFailed(e.to_string()))?
    }
}
