//! tokenz - see how a tokenizer splits your text
//!
//! This crate runs text through a pretrained tokenizer in fixed-size
//! chunks, maps the token offsets back onto the original text and renders
//! every token with its own background color.
//!
//! # Example
//!
//! ```rust,no_run
//! use tokenz::{HfTokenizer, NoProgress, PaletteSet, render, tokenize_document};
//!
//! fn main() -> tokenz::Result<()> {
//!     let tokenizer = HfTokenizer::from_hub("gpt2")?;
//!     let text = "Hello, world!";
//!
//!     let result = tokenize_document(text, &tokenizer, 1024, &mut NoProgress)?;
//!     let palettes = PaletteSet::builtin();
//!     let rendered = render(text, &result, Some(palettes.get("Ocean")?), true);
//!
//!     println!("{}", tokenz::render::paint_ansi(&rendered));
//!     println!("{}", rendered.stats);
//!     Ok(())
//! }
//! ```
//!
//! # Background sessions
//!
//! ```rust,ignore
//! let session = TokenizeSession::new(tokenizer, 1024);
//! let first = session.submit("draft");
//! let second = session.submit("final text");
//!
//! // `first` is superseded and reports `TaskOutcome::Stale`.
//! assert!(second.finish().await?.is_applied());
//! ```

pub mod config;
pub mod document;
pub mod driver;
pub mod error;
pub mod lookup;
pub mod palette;
pub mod render;
pub mod session;
pub mod telemetry;
pub mod tokenizer;
mod version;

// Re-export main types at crate root
pub use config::Config;
pub use driver::{
    Chunk, DEFAULT_MAX_CHUNK_LEN, NoProgress, ProgressObserver, TokenizationResult, split_chunks,
    tokenize_document, tokenize_document_until,
};
pub use error::{Result, TokenzError};
pub use lookup::{TokenLookup, lookup, word_at};
pub use palette::{ColorPalette, PaletteSet, Rgb, random_color};
pub use render::{DocumentStats, RenderedDocument, RenderedSpan, render};
pub use session::{Published, TaskOutcome, TokenizeSession, TokenizeTask};
pub use tokenizer::{Encoding, TokenizerProvider, TokenizerRegistry, TokenizerSource};
pub use version::{PKG_VERSION, long_version, version_string};

#[cfg(feature = "huggingface")]
pub use tokenizer::HfTokenizer;
