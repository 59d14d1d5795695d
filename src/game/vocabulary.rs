//! Themed word source for puzzles
//!
//! Embeds a French vocabulary at build time, grouped by theme. A user
//! word file in the same format can stand in for it:
//!
//! ```text
//! # comment
//! [theme]
//! WORD
//! ```
//!
//! Words listed before any `[theme]` header land in a default theme.

use crate::puzzle::normalize_word;
use once_cell::sync::Lazy;
use rand::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Theme used for words that appear before any header.
pub const DEFAULT_THEME: &str = "mots";

static VOCABULARY_DATA: &str = include_str!("../../data/vocabulary.txt");

/// Parsed once on first use.
static EMBEDDED: Lazy<Vocabulary> = Lazy::new(|| load_embedded(VOCABULARY_DATA));

/// Parse built-in data, logging the cause and falling back to an empty
/// vocabulary when it is broken.
fn load_embedded(text: &str) -> Vocabulary {
    match Vocabulary::parse(text) {
        Ok(vocabulary) => vocabulary,
        Err(e) => {
            tracing::error!(error = %e, "embedded vocabulary is unreadable");
            Vocabulary::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("failed to read word file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed theme header on line {line}: {text}")]
    MalformedHeader { line: usize, text: String },
    #[error("unknown theme {name:?} (available: {available})")]
    UnknownTheme { name: String, available: String },
    #[error("word list is empty")]
    Empty,
}

/// A named group of words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub words: Vec<String>,
}

/// Words grouped by theme, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    themes: Vec<Theme>,
}

impl Vocabulary {
    /// The vocabulary compiled into the binary.
    pub fn embedded() -> Vocabulary {
        EMBEDDED.clone()
    }

    pub fn from_file(path: &Path) -> Result<Vocabulary, VocabularyError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse the themed word-list format. Words are normalized and
    /// deduplicated within their theme.
    pub fn parse(text: &str) -> Result<Vocabulary, VocabularyError> {
        let mut themes: Vec<Theme> = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| VocabularyError::MalformedHeader {
                        line: idx + 1,
                        text: line.to_string(),
                    })?;
                themes.push(Theme {
                    name: theme_key(name),
                    words: Vec::new(),
                });
                continue;
            }

            let word = normalize_word(line);
            if word.is_empty() {
                continue;
            }
            if themes.is_empty() {
                themes.push(Theme {
                    name: DEFAULT_THEME.to_string(),
                    words: Vec::new(),
                });
            }
            if let Some(theme) = themes.last_mut() {
                if !theme.words.contains(&word) {
                    theme.words.push(word);
                }
            }
        }

        themes.retain(|t| !t.words.is_empty());
        if themes.is_empty() {
            return Err(VocabularyError::Empty);
        }
        Ok(Vocabulary { themes })
    }

    /// Theme names in file order.
    pub fn themes(&self) -> Vec<&str> {
        self.themes.iter().map(|t| t.name.as_str()).collect()
    }

    /// Words of one theme, or of every theme (deduplicated) when `theme` is None.
    pub fn words(&self, theme: Option<&str>) -> Result<Vec<&str>, VocabularyError> {
        match theme {
            Some(name) => {
                let key = theme_key(name);
                self.themes
                    .iter()
                    .find(|t| t.name == key)
                    .map(|t| t.words.iter().map(String::as_str).collect())
                    .ok_or_else(|| VocabularyError::UnknownTheme {
                        name: name.to_string(),
                        available: self.themes().join(", "),
                    })
            }
            None => {
                let mut seen = HashSet::new();
                Ok(self
                    .themes
                    .iter()
                    .flat_map(|t| t.words.iter())
                    .map(String::as_str)
                    .filter(|w| seen.insert(*w))
                    .collect())
            }
        }
    }

    /// Pick up to `count` distinct random words.
    pub fn pick<R: Rng + ?Sized>(
        &self,
        theme: Option<&str>,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<String>, VocabularyError> {
        let mut pool = self.words(theme)?;
        pool.shuffle(rng);
        pool.truncate(count);
        Ok(pool.into_iter().map(str::to_string).collect())
    }
}

/// Theme names compare composed and lowercased, accents included.
fn theme_key(name: &str) -> String {
    name.trim().nfc().collect::<String>().to_lowercase()
}
