//! Hover lookup: vocabulary id for the word under a pointer.
//!
//! This is best effort. The word is looked up as a single vocabulary entry,
//! which need not match how the surrounding text was actually tokenized.

use std::fmt;

use serde::Serialize;

use crate::tokenizer::TokenizerProvider;

/// Result of a vocabulary lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TokenLookup {
    Found { token: String, id: u32 },
    NotFound { token: String },
}

impl TokenLookup {
    pub fn id(&self) -> Option<u32> {
        match self {
            TokenLookup::Found { id, .. } => Some(*id),
            TokenLookup::NotFound { .. } => None,
        }
    }
}

impl fmt::Display for TokenLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenLookup::Found { token, id } => write!(f, "Token: {token}\nID: {id}"),
            TokenLookup::NotFound { .. } => f.write_str("Token information not available"),
        }
    }
}

/// Look `word` up in the tokenizer's vocabulary.
pub fn lookup(word: &str, tokenizer: &dyn TokenizerProvider) -> TokenLookup {
    let token = word.to_string();
    if word.trim().is_empty() {
        return TokenLookup::NotFound { token };
    }
    match tokenizer.token_to_id(word) {
        Some(id) => TokenLookup::Found { token, id },
        None => {
            tracing::trace!(word, "no vocabulary entry");
            TokenLookup::NotFound { token }
        }
    }
}

/// The word under character position `pos`.
///
/// A word is a maximal run of alphanumeric or `_` characters. Returns
/// `None` when `pos` is past the end or not inside a word.
pub fn word_at(text: &str, pos: usize) -> Option<&str> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let &(_, c) = chars.get(pos)?;
    if !is_word(c) {
        return None;
    }

    let start = chars[..pos]
        .iter()
        .rposition(|&(_, c)| !is_word(c))
        .map_or(0, |i| i + 1);
    let end = chars[pos..]
        .iter()
        .position(|&(_, c)| !is_word(c))
        .map_or(chars.len(), |i| pos + i);

    let start_byte = chars[start].0;
    let end_byte = chars.get(end).map_or(text.len(), |&(b, _)| b);
    Some(&text[start_byte..end_byte])
}
