//! Configuration loading for tokenz.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.tokenz/config.toml` (user)
//! 3. `/etc/tokenz/config.toml` (system)
//!
//! Every setting has a default, so running without any config file is fine.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::driver::DEFAULT_MAX_CHUNK_LEN;
use crate::palette::{ColorPalette, DEFAULT_PALETTE, PaletteSet};
use crate::tokenizer::{DEFAULT_MODEL, TokenizerRegistry, TokenizerSource};
use crate::{Result, TokenzError};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tokenizer: TokenizerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Custom palettes: name → list of `#RRGGBB` colors.
    #[serde(default)]
    pub palettes: BTreeMap<String, Vec<String>>,
}

/// Tokenizer selection and chunking.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerConfig {
    /// Model whose tokenizer is used (default: gpt2).
    #[serde(default = "default_model")]
    pub model: String,
    /// Chunk length in characters (default: 1024).
    #[serde(default = "default_max_chunk_len")]
    pub max_chunk_len: usize,
    /// Extra model → tokenizer mappings.
    #[serde(default)]
    pub models: BTreeMap<String, ModelSourceConfig>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_chunk_len: default_max_chunk_len(),
            models: BTreeMap::new(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_chunk_len() -> usize {
    DEFAULT_MAX_CHUNK_LEN
}

/// Where a configured model's tokenizer comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSourceConfig {
    Huggingface(String),
    Local(PathBuf),
    Alias(String),
}

impl From<ModelSourceConfig> for TokenizerSource {
    fn from(source: ModelSourceConfig) -> Self {
        match source {
            ModelSourceConfig::Huggingface(repo_id) => TokenizerSource::HuggingFace { repo_id },
            ModelSourceConfig::Local(path) => TokenizerSource::Local { path },
            ModelSourceConfig::Alias(target) => TokenizerSource::Alias { target },
        }
    }
}

/// Rendering preferences.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Palette name (default: "Nord Aurora").
    #[serde(default = "default_palette")]
    pub palette: String,
    /// Whether tokens get background colors (default: true).
    #[serde(default = "default_use_color")]
    pub use_color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            use_color: default_use_color(),
        }
    }
}

fn default_palette() -> String {
    DEFAULT_PALETTE.to_string()
}

fn default_use_color() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; must exist)
    /// 2. `~/.tokenz/config.toml`
    /// 3. `/etc/tokenz/config.toml`
    ///
    /// Falls back to defaults when no file is found and no path was given.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a single config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TokenzError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            TokenzError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.tokenizer.max_chunk_len == 0 {
            return Err(TokenzError::Configuration(
                "tokenizer.max_chunk_len must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(TokenzError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".tokenz").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/tokenz/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Built-in palettes plus the configured custom ones.
    pub fn palette_set(&self) -> Result<PaletteSet> {
        let mut set = PaletteSet::builtin();
        for (name, colors) in &self.palettes {
            set.insert(ColorPalette::from_hex(name.clone(), colors.as_slice())?);
        }
        Ok(set)
    }

    /// Default registry plus the configured model mappings.
    pub fn tokenizer_registry(&self) -> TokenizerRegistry {
        let mut registry = TokenizerRegistry::new();
        for (model, source) in &self.tokenizer.models {
            registry.register(model.clone(), source.clone().into());
        }
        registry
    }
}
