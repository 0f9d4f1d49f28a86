//! Render mapper.
//!
//! Walks a [`TokenizationResult`] and rebuilds the source text as a list of
//! spans, one per token, each with an optional background color. A single
//! uncolored space follows every token so neighbouring tokens stay
//! visually apart.

use colored::Colorize;
use serde::Serialize;

use crate::driver::TokenizationResult;
use crate::palette::{ColorPalette, Rgb};

/// A piece of display text with an optional background color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSpan {
    pub text: String,
    pub color: Option<Rgb>,
}

impl RenderedSpan {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }
}

/// Counters shown alongside the rendered tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub tokens: usize,
    pub characters: usize,
    pub words: usize,
}

impl std::fmt::Display for DocumentStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Token Count: {} | Character Count: {} | Word Count: {}",
            self.tokens, self.characters, self.words
        )
    }
}

/// Output of [`render`]: spans in display order plus counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub spans: Vec<RenderedSpan>,
    pub stats: DocumentStats,
}

impl RenderedDocument {
    /// All span text concatenated, colors dropped.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Token spans only, separators skipped.
    pub fn token_spans(&self) -> impl Iterator<Item = &RenderedSpan> {
        self.spans.iter().step_by(2)
    }
}

/// Rebuild `text` as colored token spans.
///
/// With `use_color` off every span is uncolored. Otherwise the palette picks
/// the color by token index; no palette, or an empty one, gives
/// [`Rgb::NEUTRAL`].
pub fn render(
    text: &str,
    result: &TokenizationResult,
    palette: Option<&ColorPalette>,
    use_color: bool,
) -> RenderedDocument {
    let index = CharIndex::new(text);
    let mut spans = Vec::with_capacity(result.len() * 2);

    for (i, (start, end)) in result.offsets.iter().copied().enumerate() {
        let color = use_color.then(|| match palette {
            Some(palette) => palette.color_for(i),
            None => Rgb::NEUTRAL,
        });
        spans.push(RenderedSpan {
            text: index.slice(start, end).to_string(),
            color,
        });
        spans.push(RenderedSpan::plain(" "));
    }

    RenderedDocument {
        spans,
        stats: stats(text, result),
    }
}

/// Token, character and word counts for a document.
pub fn stats(text: &str, result: &TokenizationResult) -> DocumentStats {
    DocumentStats {
        tokens: result.ids.len(),
        characters: text.chars().count(),
        words: text.split_whitespace().count(),
    }
}

/// Paint a rendered document for a 24-bit color terminal.
pub fn paint_ansi(document: &RenderedDocument) -> String {
    let mut out = String::new();
    for span in &document.spans {
        match span.color {
            Some(Rgb { r, g, b }) => {
                out.push_str(&span.text.black().on_truecolor(r, g, b).to_string())
            }
            None => out.push_str(&span.text),
        }
    }
    out
}

/// Maps character positions to byte positions in a string.
struct CharIndex<'a> {
    text: &'a str,
    // byte offset of every char boundary, including the end of the string
    boundaries: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    fn new(text: &'a str) -> Self {
        let boundaries = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { text, boundaries }
    }

    /// Characters `start..end`, clamped to the text. Inverted ranges are empty.
    fn slice(&self, start: usize, end: usize) -> &'a str {
        let last = self.boundaries.len() - 1;
        let start = start.min(last);
        let end = end.clamp(start, last);
        &self.text[self.boundaries[start]..self.boundaries[end]]
    }
}
