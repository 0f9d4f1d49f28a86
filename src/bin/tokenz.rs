//! tokenz: tokenizer visualiser CLI
//!
//! Tokenizes text with a pretrained tokenizer and prints every token on its
//! own background color.

use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio_stream::StreamExt;
use tracing::info;

use tokenz::document;
use tokenz::render::paint_ansi;
use tokenz::{Config, TaskOutcome, TokenizeSession, lookup, render, word_at};

/// tokenz CLI
#[derive(Parser)]
#[command(name = "tokenz")]
#[command(version = tokenz::PKG_VERSION, long_version = tokenz::long_version())]
#[command(about = "See how a tokenizer splits your text")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "TOKENZ_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tokenize text and show the colored tokens
    Tokenize {
        /// Text to tokenize (or omit to read from --file or stdin)
        text: Option<String>,
        /// Read the text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Model whose tokenizer to use
        #[arg(short, long)]
        model: Option<String>,
        /// Color palette name
        #[arg(short, long)]
        palette: Option<String>,
        /// Print tokens without background colors
        #[arg(long)]
        no_color: bool,
        /// Chunk length in characters
        #[arg(long)]
        chunk_len: Option<usize>,
        /// Print ids, offsets and counts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up the vocabulary id of a word
    Lookup {
        /// Word, or surrounding text when --at is given
        text: String,
        /// Character position of the word inside TEXT
        #[arg(long)]
        at: Option<usize>,
        /// Model whose tokenizer to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Replace every occurrence of a string in a file
    Replace {
        file: PathBuf,
        find: String,
        replacement: String,
        /// Write the result back instead of printing it
        #[arg(short, long)]
        in_place: bool,
    },

    /// List available palettes
    Palettes,

    /// List configured models
    Models,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Tokenize {
            text,
            file,
            model,
            palette,
            no_color,
            chunk_len,
            json,
        } => {
            let text = match file {
                Some(path) => document::load(path)?,
                None => resolve_text(text, "tokenize")?,
            };
            let model = model.unwrap_or_else(|| config.tokenizer.model.clone());
            let chunk_len = chunk_len.unwrap_or(config.tokenizer.max_chunk_len);

            let tokenizer = config.tokenizer_registry().get(&model)?;
            info!(%model, chunk_len, "tokenizing");

            let session = TokenizeSession::new(tokenizer, chunk_len);
            let mut task = session.submit(text);
            let progress_printer = task.take_progress().map(|mut progress| {
                let show = io::stderr().is_terminal() && !json;
                tokio::spawn(async move {
                    while let Some(percent) = progress.next().await {
                        if show {
                            eprint!("\rTokenization progress: {percent}%");
                        }
                    }
                    if show {
                        eprintln!();
                    }
                })
            });

            let outcome = task.finish().await?;
            if let Some(printer) = progress_printer {
                // the stream ends once the worker drops its sender
                let _ = printer.await;
            }
            let published = match outcome {
                TaskOutcome::Applied(published) => published,
                TaskOutcome::Stale { generation } => {
                    return Err(format!("request {generation} was superseded").into());
                }
            };

            let palettes = config.palette_set()?;
            let palette_name = palette.unwrap_or_else(|| config.display.palette.clone());
            let use_color = config.display.use_color && !no_color;
            let rendered = render(
                &published.text,
                &published.result,
                Some(palettes.get(&palette_name)?),
                use_color,
            );

            if json {
                let out = serde_json::json!({
                    "model": model,
                    "ids": published.result.ids,
                    "offsets": published.result.offsets,
                    "stats": rendered.stats,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", paint_ansi(&rendered))?;
                writeln!(stdout, "{}", rendered.stats)?;
            }
        }

        Command::Lookup { text, at, model } => {
            let model = model.unwrap_or_else(|| config.tokenizer.model.clone());
            let tokenizer = config.tokenizer_registry().get(&model)?;
            let word = match at {
                Some(pos) => word_at(&text, pos).unwrap_or_default(),
                None => text.as_str(),
            };
            println!("{}", lookup(word, &*tokenizer));
        }

        Command::Replace {
            file,
            find,
            replacement,
            in_place,
        } => {
            let text = document::load(&file)?;
            let (replaced, count) = document::replace_all(&text, &find, &replacement);
            if in_place {
                document::save(&file, &replaced)?;
            } else {
                print!("{replaced}");
            }
            eprintln!("{count} replacement(s)");
        }

        Command::Palettes => {
            let palettes = config.palette_set()?;
            for name in palettes.names() {
                let marker = if name.eq_ignore_ascii_case(&config.display.palette) {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {name}");
            }
        }

        Command::Models => {
            let registry = config.tokenizer_registry();
            for name in registry.models() {
                let marker = if name == config.tokenizer.model { "*" } else { " " };
                println!("{marker} {name}");
            }
        }
    }

    Ok(())
}

/// Resolve text input from an optional CLI argument and/or stdin.
///
/// - arg only → arg
/// - stdin only → stdin, as is (offsets refer to the exact text)
/// - both → arg wins
/// - neither → error
fn resolve_text(arg: Option<String>, command: &str) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(text) = arg {
        return Ok(text);
    }
    if io::stdin().is_terminal() {
        return Err(
            format!("{command}: no input provided (pass text, --file or pipe via stdin)").into(),
        );
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
