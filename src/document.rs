//! Plain-text documents: load, save, find and replace.
//!
//! Positions are character positions, the same unit token offsets use.

use std::fs;
use std::path::Path;

use crate::error::{Result, TokenzError};

/// Read a UTF-8 text file.
pub fn load(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| TokenzError::io(path, e))
}

/// Write `text` to a file, replacing its contents.
pub fn save(path: impl AsRef<Path>, text: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, text).map_err(|e| TokenzError::io(path, e))
}

/// Find the first occurrence of `needle` at or after character `from`.
///
/// Returns the `(start, end)` character span of the match. Does not wrap
/// around to the start of the text.
pub fn find(text: &str, needle: &str, from: usize) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    let from_byte = text
        .char_indices()
        .nth(from)
        .map(|(b, _)| b)
        .or_else(|| (from == text.chars().count()).then_some(text.len()))?;

    let start_byte = from_byte + text[from_byte..].find(needle)?;
    let start = text[..start_byte].chars().count();
    Some((start, start + needle.chars().count()))
}

/// Replace every occurrence of `needle` with `replacement`.
///
/// Both must be non-empty; otherwise the text is returned unchanged with a
/// count of zero.
pub fn replace_all(text: &str, needle: &str, replacement: &str) -> (String, usize) {
    if needle.is_empty() || replacement.is_empty() {
        return (text.to_string(), 0);
    }
    let count = text.matches(needle).count();
    (text.replace(needle, replacement), count)
}
