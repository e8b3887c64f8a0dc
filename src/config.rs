//! Optional TOML config, read from `~/.config/rss2blog/config.toml` unless
//! `--config` names another file.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::blog::DEFAULT_MAX_ENTRIES;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// SEC-014: Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Any subset of keys may be given; the rest keep their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Blog collection document updated in `--update` mode.
    pub blogs_path: PathBuf,

    /// Maximum number of entries kept in the collection after a merge.
    pub max_entries: usize,

    /// Fixed values stamped onto every generated entry.
    pub entry: EntryDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blogs_path: PathBuf::from("blogs.json"),
            max_entries: DEFAULT_MAX_ENTRIES,
            entry: EntryDefaults::default(),
        }
    }
}

/// Literal values the entry transformer falls back to or copies verbatim.
///
/// Kept out of the transformer so parsing stays a pure function of the feed
/// text, these defaults and the processing date.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EntryDefaults {
    /// Author used when an item has no `dc:creator`.
    pub author: String,

    /// Publication name appended to SEO titles as `"<title> | <source_name>"`.
    pub source_name: String,

    /// Reading-time label copied onto every entry.
    pub read_time: String,

    /// Cover image URL for listing cards.
    pub image_url: String,

    /// Open Graph image URL for social previews.
    pub og_image_url: String,

    /// Tags used when an item has no non-empty `<category>` elements.
    pub default_tags: Vec<String>,

    /// SEO keywords used when an item has no non-empty `<category>` elements.
    pub default_keywords: Vec<String>,

    /// How many leading entries (in feed order) are marked featured.
    pub featured_count: usize,
}

impl Default for EntryDefaults {
    fn default() -> Self {
        Self {
            author: "TechCrunch".to_string(),
            source_name: "TechCrunch".to_string(),
            read_time: "5 min read".to_string(),
            image_url: "https://images.unsplash.com/photo-1488590528505-98d2b5aba04b?w=800&q=80"
                .to_string(),
            og_image_url:
                "https://images.unsplash.com/photo-1488590528505-98d2b5aba04b?w=1200&q=80"
                    .to_string(),
            default_tags: vec!["Technology".to_string()],
            default_keywords: vec!["technology".to_string(), "techcrunch".to_string()],
            featured_count: 2,
        }
    }
}

impl Config {
    /// SEC-014: Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Loads the config at `path`. A missing, empty or whitespace-only file
    /// gives [`Config::default`]; keys this crate doesn't know are logged
    /// and skipped.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let Some(content) = Self::read_limited(path)? else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        };
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            warn_unknown_keys(&raw, TOP_LEVEL_KEYS, "");
            if let Some(toml::Value::Table(entry)) = raw.get("entry") {
                warn_unknown_keys(entry, ENTRY_KEYS, "entry.");
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            blogs_path = %config.blogs_path.display(),
            max_entries = config.max_entries,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// `Ok(None)` when the file does not exist.
    fn read_limited(path: &Path) -> Result<Option<String>, ConfigError> {
        let not_found = |e: &std::io::Error| e.kind() == std::io::ErrorKind::NotFound;

        let size = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) if not_found(&e) => return Ok(None),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        if size > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(format!(
                "{} is {size} bytes (max {} bytes)",
                path.display(),
                Self::MAX_FILE_SIZE
            )));
        }

        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            // SEC-014: removed between the size check and the read
            Err(e) if not_found(&e) => Ok(None),
            Err(e) => Err(ConfigError::Io(e)),
        }
    }
}

const TOP_LEVEL_KEYS: &[&str] = &["blogs_path", "max_entries", "entry"];

const ENTRY_KEYS: &[&str] = &[
    "author",
    "source_name",
    "read_time",
    "image_url",
    "og_image_url",
    "default_tags",
    "default_keywords",
    "featured_count",
];

fn warn_unknown_keys(table: &toml::Table, known_keys: &[&str], prefix: &str) {
    for key in table.keys() {
        if !known_keys.contains(&key.as_str()) {
            tracing::warn!(key = %format!("{prefix}{key}"), "Unknown key in config file, ignoring");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
