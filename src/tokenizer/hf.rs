//! HuggingFace tokenizers implementation.

use std::path::Path;

use super::{Encoding, TokenizerProvider, TokenizerSource};
use crate::error::{Result, TokenzError};

/// HuggingFace tokenizers implementation.
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
}

impl HfTokenizer {
    /// Load a tokenizer from a resolved source.
    ///
    /// Aliases must be resolved by the registry first.
    pub fn load(source: &TokenizerSource) -> Result<Self> {
        match source {
            TokenizerSource::HuggingFace { repo_id } => Self::from_hub(repo_id),
            TokenizerSource::Local { path } => Self::from_file(path),
            TokenizerSource::Alias { target } => Err(TokenzError::Configuration(format!(
                "unresolved tokenizer alias: {target}"
            ))),
        }
    }

    /// Load tokenizer from HuggingFace Hub.
    ///
    /// Downloads `tokenizer.json` if not cached locally.
    pub fn from_hub(repo_id: &str) -> Result<Self> {
        let api = hf_hub::api::sync::Api::new().map_err(|e| {
            TokenzError::Configuration(format!("Failed to initialize HF API: {e}"))
        })?;

        let tokenizer_path = api
            .model(repo_id.to_string())
            .get("tokenizer.json")
            .map_err(|e| {
                TokenzError::ModelNotFound(format!(
                    "{repo_id}: failed to download tokenizer: {e}"
                ))
            })?;

        Self::from_file(&tokenizer_path)
    }

    /// Load tokenizer from local file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let inner = tokenizers::Tokenizer::from_file(path).map_err(|e| {
            TokenzError::Configuration(format!("Failed to load tokenizer from {path:?}: {e}"))
        })?;

        Ok(Self { inner })
    }
}

impl From<tokenizers::Tokenizer> for HfTokenizer {
    fn from(inner: tokenizers::Tokenizer) -> Self {
        Self { inner }
    }
}

impl TokenizerProvider for HfTokenizer {
    fn encode(&self, text: &str, add_special_tokens: bool) -> Result<Encoding> {
        // Character offsets, not byte offsets: the render side slices by char.
        let encoding = self
            .inner
            .encode_char_offsets(text, add_special_tokens)
            .map_err(|e| TokenzError::Tokenizer(format!("Tokenization failed: {e}")))?;

        Ok(Encoding {
            ids: encoding.get_ids().to_vec(),
            offsets: encoding.get_offsets().to_vec(),
        })
    }

    fn token_to_id(&self, token: &str) -> Option<u32> {
        self.inner.token_to_id(token)
    }
}
