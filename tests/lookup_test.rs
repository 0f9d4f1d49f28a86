//! Tests for the hover lookup helper.

use std::collections::HashMap;

use tokenz::{Encoding, Result, TokenLookup, TokenizerProvider, lookup, word_at};

struct VocabTokenizer {
    vocab: HashMap<&'static str, u32>,
}

impl VocabTokenizer {
    fn new() -> Self {
        Self {
            vocab: HashMap::from([("hello", 31373), ("world", 995), ("Ġworld", 995)]),
        }
    }
}

impl TokenizerProvider for VocabTokenizer {
    fn encode(&self, _text: &str, _add_special_tokens: bool) -> Result<Encoding> {
        Ok(Encoding::default())
    }

    fn token_to_id(&self, token: &str) -> Option<u32> {
        self.vocab.get(token).copied()
    }
}

#[test]
fn known_word_is_found() {
    let result = lookup("hello", &VocabTokenizer::new());
    assert_eq!(
        result,
        TokenLookup::Found {
            token: "hello".to_string(),
            id: 31373
        }
    );
    assert_eq!(result.id(), Some(31373));
    assert_eq!(result.to_string(), "Token: hello\nID: 31373");
}

#[test]
fn unknown_word_is_not_found() {
    let result = lookup("tokenization", &VocabTokenizer::new());
    assert_eq!(result.id(), None);
    assert_eq!(result.to_string(), "Token information not available");
}

#[test]
fn blank_word_is_not_found() {
    assert!(matches!(
        lookup("", &VocabTokenizer::new()),
        TokenLookup::NotFound { .. }
    ));
    assert!(matches!(
        lookup("  ", &VocabTokenizer::new()),
        TokenLookup::NotFound { .. }
    ));
}

#[test]
fn lookup_serializes_with_status_tag() {
    let json = serde_json::to_value(lookup("world", &VocabTokenizer::new())).unwrap();
    assert_eq!(json["status"], "found");
    assert_eq!(json["id"], 995);
}

#[test]
fn word_at_finds_surrounding_word() {
    let text = "hello, wörld_2 !";
    assert_eq!(word_at(text, 0), Some("hello"));
    assert_eq!(word_at(text, 4), Some("hello"));
    assert_eq!(word_at(text, 9), Some("wörld_2"));
    assert_eq!(word_at(text, 13), Some("wörld_2"));
}

#[test]
fn word_at_outside_a_word_is_none() {
    let text = "hello, world";
    assert_eq!(word_at(text, 5), None);
    assert_eq!(word_at(text, 6), None);
    assert_eq!(word_at(text, 12), None);
    assert_eq!(word_at("", 0), None);
}
