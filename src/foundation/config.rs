use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{CarddivError, CarddivResult};

/// Deck shipped with every deployment; the cache falls back to it.
pub const DEFAULT_DECK: &str = "Poker.zip";
/// Spread width used when a request does not name one.
pub const DEFAULT_WIDTH: u32 = 600;
/// JPEG quality used for rendered spreads.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Process-wide settings shared by the deck cache and the spread renderer.
///
/// Every field has a default, so a config file only needs the keys it overrides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarddivConfig {
    /// Directory holding the deck archives.
    pub deck_root: PathBuf,
    /// Deck name used when a requested deck cannot be opened.
    pub default_deck: String,
    /// Spread width in pixels when none is requested.
    pub default_width: u32,
    /// JPEG quality (1..=100).
    pub jpeg_quality: u8,
    /// Whether layouts may randomly reverse cards.
    pub allow_reversed: bool,
    /// Worker threads for batch rendering. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for CarddivConfig {
    fn default() -> Self {
        Self {
            deck_root: PathBuf::from("decks"),
            default_deck: DEFAULT_DECK.to_string(),
            default_width: DEFAULT_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            allow_reversed: true,
            threads: None,
        }
    }
}

impl CarddivConfig {
    /// Read settings from a JSON file and validate them.
    pub fn from_json_file(path: &Path) -> CarddivResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings that would make every request fail.
    pub fn validate(&self) -> CarddivResult<()> {
        if self.default_deck.trim().is_empty() {
            return Err(CarddivError::validation("default_deck must be non-empty"));
        }
        if self.default_width == 0 {
            return Err(CarddivError::validation("default_width must be > 0"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(CarddivError::validation("jpeg_quality must be in 1..=100"));
        }
        if self.threads == Some(0) {
            return Err(CarddivError::validation("threads must be > 0 when set"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
