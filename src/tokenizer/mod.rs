//! External tokenizer capability.
//!
//! tokenz never tokenizes text itself. It calls a [`TokenizerProvider`],
//! which returns token ids plus character offsets for a piece of text.
//! The [`TokenizerRegistry`] maps model names to HuggingFace tokenizers,
//! loading them lazily and caching them for reuse.

#[cfg(feature = "huggingface")]
mod hf;

#[cfg(feature = "huggingface")]
pub use hf::HfTokenizer;

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
#[cfg(feature = "huggingface")]
use std::sync::{Arc, RwLock};

use crate::error::{Result, TokenzError};

/// Model names offered out of the box.
pub const DEFAULT_MODELS: &[&str] = &[
    "gpt2",
    "bert-base-uncased",
    "roberta-base",
    "t5-small",
    "distilbert-base-uncased",
];

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "gpt2";

/// Output of a single tokenizer call.
///
/// Offsets are `(start, end)` character positions local to the text that
/// was encoded, one pair per id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoding {
    pub ids: Vec<u32>,
    pub offsets: Vec<(usize, usize)>,
}

impl Encoding {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Trait for tokenizer implementations.
///
/// Implementations may be slow and may fail; callers treat them as opaque.
pub trait TokenizerProvider: Send + Sync {
    /// Encode text into ids and character offsets.
    fn encode(&self, text: &str, add_special_tokens: bool) -> Result<Encoding>;

    /// Look up a single vocabulary entry.
    fn token_to_id(&self, token: &str) -> Option<u32>;

    /// Count tokens in the given text.
    fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(self.encode(text, false)?.len())
    }
}

/// Source for a tokenizer model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizerSource {
    /// Load from HuggingFace Hub repository.
    HuggingFace { repo_id: String },
    /// Load from a local `tokenizer.json`.
    Local { path: PathBuf },
    /// Alias to another model's tokenizer.
    Alias { target: String },
}

/// Registry mapping model names to tokenizers.
///
/// Mappings are resolved exact-first, then by longest prefix. With the
/// `huggingface` feature the registry also loads and caches tokenizers.
pub struct TokenizerRegistry {
    #[cfg(feature = "huggingface")]
    tokenizers: RwLock<HashMap<String, Arc<dyn TokenizerProvider>>>,
    model_mappings: HashMap<String, TokenizerSource>,
}

impl TokenizerRegistry {
    /// Create a new registry with the default model mappings.
    pub fn new() -> Self {
        let model_mappings = DEFAULT_MODELS
            .iter()
            .map(|model| {
                (
                    model.to_string(),
                    TokenizerSource::HuggingFace {
                        repo_id: model.to_string(),
                    },
                )
            })
            .collect();

        Self {
            #[cfg(feature = "huggingface")]
            tokenizers: RwLock::new(HashMap::new()),
            model_mappings,
        }
    }

    /// Register a custom model → tokenizer mapping.
    ///
    /// Overrides a default mapping with the same name.
    pub fn register(&mut self, model_pattern: impl Into<String>, source: TokenizerSource) {
        self.model_mappings.insert(model_pattern.into(), source);
    }

    /// Registered model names, sorted.
    pub fn models(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.model_mappings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve model name to tokenizer source.
    ///
    /// Matches against registered patterns (longest prefix wins) and follows
    /// aliases. An alias chain that loops back on itself is an error.
    pub fn resolve_source(&self, model: &str) -> Result<TokenizerSource> {
        let mut seen = HashSet::new();
        let mut current = model.to_string();

        loop {
            if !seen.insert(current.clone()) {
                return Err(TokenzError::Configuration(format!(
                    "Alias cycle detected while resolving tokenizer for model: {model}"
                )));
            }

            match self.lookup_pattern(&current) {
                Some(TokenizerSource::Alias { target }) => current = target.clone(),
                Some(source) => return Ok(source.clone()),
                None => return Err(TokenzError::ModelNotFound(current)),
            }
        }
    }

    fn lookup_pattern(&self, model: &str) -> Option<&TokenizerSource> {
        if let Some(source) = self.model_mappings.get(model) {
            return Some(source);
        }

        self.model_mappings
            .iter()
            .filter(|(pattern, _)| model.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
            .map(|(_, source)| source)
    }
}

#[cfg(feature = "huggingface")]
impl TokenizerRegistry {
    /// Get the tokenizer for a model, loading it on first use.
    pub fn get(&self, model: &str) -> Result<Arc<dyn TokenizerProvider>> {
        // Fast path: already loaded
        if let Some(provider) = self.read_cache()?.get(model) {
            return Ok(Arc::clone(provider));
        }

        let source = self.resolve_source(model)?;
        tracing::info!(model, ?source, "loading tokenizer");
        let provider: Arc<dyn TokenizerProvider> = Arc::new(HfTokenizer::load(&source)?);

        let mut cache = self.tokenizers.write().map_err(|e| {
            TokenzError::Configuration(format!("Failed to acquire write lock: {e}"))
        })?;
        // Double-check after acquiring write lock
        if let Some(existing) = cache.get(model) {
            return Ok(Arc::clone(existing));
        }
        cache.insert(model.to_string(), Arc::clone(&provider));
        Ok(provider)
    }

    /// Count tokens for the given text using the specified model's tokenizer.
    pub fn count_tokens(&self, text: &str, model: &str) -> Result<usize> {
        self.get(model)?.count_tokens(text)
    }

    fn read_cache(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, Arc<dyn TokenizerProvider>>>> {
        self.tokenizers
            .read()
            .map_err(|e| TokenzError::Configuration(format!("Failed to acquire read lock: {e}")))
    }
}

impl Default for TokenizerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
