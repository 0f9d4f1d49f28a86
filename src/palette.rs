//! Token color palettes.
//!
//! A palette is either a named list of colors, assigned to tokens cyclically
//! by index, or the `Randomize` sentinel, which derives a pseudo-random
//! color from each token's index.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TokenzError};

/// Name of the per-token random palette.
pub const RANDOMIZE: &str = "Randomize";

/// Palette selected when nothing else is configured.
pub const DEFAULT_PALETTE: &str = "Nord Aurora";

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Color used when a palette has nothing to offer.
    pub const NEUTRAL: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Rgb {
    type Err = TokenzError;

    /// Parse `#RRGGBB` (the leading `#` is optional).
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TokenzError::InvalidColor(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| TokenzError::InvalidColor(s.to_string()))
        };
        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Deterministic pseudo-random color for a token index.
///
/// Each channel is drawn from `128..=255` so dark text stays readable.
pub fn random_color(index: usize) -> Rgb {
    let mut rng = ChaCha8Rng::seed_from_u64(index as u64);
    Rgb::new(
        rng.gen_range(128..=255),
        rng.gen_range(128..=255),
        rng.gen_range(128..=255),
    )
}

/// A named color palette or the randomize sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorPalette {
    Colors { name: String, colors: Vec<Rgb> },
    Randomize,
}

impl ColorPalette {
    pub fn new(name: impl Into<String>, colors: Vec<Rgb>) -> Self {
        ColorPalette::Colors {
            name: name.into(),
            colors,
        }
    }

    /// Build a palette from `#RRGGBB` strings.
    pub fn from_hex<S: AsRef<str>>(name: impl Into<String>, colors: &[S]) -> Result<Self> {
        let colors = colors
            .iter()
            .map(|c| c.as_ref().parse())
            .collect::<Result<Vec<Rgb>>>()?;
        Ok(Self::new(name, colors))
    }

    pub fn name(&self) -> &str {
        match self {
            ColorPalette::Colors { name, .. } => name,
            ColorPalette::Randomize => RANDOMIZE,
        }
    }

    /// Color for the token at `index`.
    ///
    /// An empty palette always yields [`Rgb::NEUTRAL`].
    pub fn color_for(&self, index: usize) -> Rgb {
        match self {
            ColorPalette::Randomize => random_color(index),
            ColorPalette::Colors { colors, .. } if colors.is_empty() => Rgb::NEUTRAL,
            ColorPalette::Colors { colors, .. } => colors[index % colors.len()],
        }
    }
}

const BUILTIN_PALETTES: &[(&str, &[&str])] = &[
    ("Nord Aurora", &["#BF616A", "#D08770", "#EBCB8B", "#A3BE8C", "#B48EAD"]),
    ("Nord Frost", &["#8FBCBB", "#88C0D0", "#81A1C1", "#5E81AC"]),
    ("Ocean", &["#0077BE", "#009DC4", "#00C5CD", "#48D1CC", "#20B2AA"]),
    ("Forest", &["#228B22", "#32CD32", "#90EE90", "#98FB98", "#3CB371"]),
    ("Sunset", &["#FF7F50", "#FF6B6B", "#FF4500", "#FF8C00", "#FFA500"]),
    ("Berry", &["#8B0000", "#B22222", "#DC143C", "#FF69B4", "#DB7093"]),
    ("Desert", &["#DEB887", "#D2B48C", "#F4A460", "#DAA520", "#CD853F"]),
    ("Galaxy", &["#483D8B", "#4B0082", "#800080", "#8A2BE2", "#9370DB"]),
    ("Autumn", &["#8B4513", "#CD853F", "#DEB887", "#D2691E", "#A0522D"]),
    ("Spring", &["#98FB98", "#90EE90", "#3CB371", "#2E8B57", "#228B22"]),
    ("Winter", &["#B0C4DE", "#B0E0E6", "#87CEEB", "#87CEFA", "#00BFFF"]),
    ("Summer", &["#FFD700", "#FFA500", "#FF8C00", "#FF7F50", "#FF6347"]),
    ("Retro", &["#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEEAD"]),
    ("Candy", &["#FF69B4", "#FFB6C1", "#FFC0CB", "#FF1493", "#C71585"]),
    ("Earth", &["#8B4513", "#A0522D", "#6B8E23", "#556B2F", "#2F4F4F"]),
    ("Jewel", &["#9400D3", "#4B0082", "#0000CD", "#00008B", "#191970"]),
    ("Pastel", &["#FFB3BA", "#FFDFBA", "#FFFFBA", "#BAFFC9", "#BAE1FF"]),
    ("Neon", &["#FF00FF", "#00FFFF", "#FF00FF", "#00FF00", "#FFFF00"]),
    ("Monochrome", &["#000000", "#333333", "#666666", "#999999", "#CCCCCC"]),
    (
        "Rainbow",
        &["#FF0000", "#FF7F00", "#FFFF00", "#00FF00", "#0000FF", "#4B0082", "#8F00FF"],
    ),
    ("Cyber", &["#00FF00", "#00FFFF", "#FF00FF", "#FF0000", "#0000FF"]),
    ("Nordic", &["#D8DEE9", "#E5E9F0", "#ECEFF4", "#81A1C1", "#88C0D0"]),
    ("Ice", &["#F0F8FF", "#E0FFFF", "#B0E0E6", "#B0C4DE", "#87CEEB"]),
    ("Fire", &["#8B0000", "#B22222", "#CD5C5C", "#FF4500", "#FF6347"]),
    ("Deep Sea", &["#000080", "#00008B", "#0000CD", "#0000FF", "#1E90FF"]),
    ("Bamboo", &["#006400", "#228B22", "#32CD32", "#90EE90", "#98FB98"]),
    ("Dusk", &["#4B0082", "#483D8B", "#6A5ACD", "#7B68EE", "#8A2BE2"]),
    ("Dawn", &["#FF69B4", "#DDA0DD", "#EE82EE", "#DA70D6", "#BA55D3"]),
];

/// Named palettes available for selection.
///
/// Lookups are case-insensitive. Custom palettes override built-ins with
/// the same name.
#[derive(Debug, Clone)]
pub struct PaletteSet {
    // keyed by lowercase name
    palettes: BTreeMap<String, ColorPalette>,
}

impl PaletteSet {
    /// The built-in palettes plus `Randomize`.
    pub fn builtin() -> Self {
        let mut set = Self {
            palettes: BTreeMap::new(),
        };
        for (name, colors) in BUILTIN_PALETTES {
            let colors = colors
                .iter()
                .filter_map(|c| c.parse().ok())
                .collect();
            set.insert(ColorPalette::new(*name, colors));
        }
        set.insert(ColorPalette::Randomize);
        set
    }

    pub fn insert(&mut self, palette: ColorPalette) {
        self.palettes
            .insert(palette.name().to_lowercase(), palette);
    }

    pub fn get(&self, name: &str) -> Result<&ColorPalette> {
        self.palettes
            .get(&name.to_lowercase())
            .ok_or_else(|| TokenzError::UnknownPalette(name.to_string()))
    }

    /// Palette names in display order (alphabetical).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.palettes.values().map(ColorPalette::name)
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }
}

impl Default for PaletteSet {
    fn default() -> Self {
        Self::builtin()
    }
}
