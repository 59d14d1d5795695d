//! Command-line configuration

use crate::app::{clamp_handle, DEFAULT_ROUND_DURATION};
use crate::game::vocabulary::{Vocabulary, VocabularyError};
use crate::game::DEFAULT_WORD_COUNT;
use crate::puzzle::{Direction, PuzzleOptions, DEFAULT_MAX_ATTEMPTS};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Largest accepted grid side
pub const MAX_SIDE: usize = 30;

/// motmele: find the hidden words
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Grid width in columns
    #[arg(long, global = true, default_value_t = 10)]
    pub width: usize,

    /// Grid height in rows
    #[arg(long, global = true, default_value_t = 12)]
    pub height: usize,

    /// Number of words to hide per puzzle
    #[arg(long, global = true, default_value_t = DEFAULT_WORD_COUNT)]
    pub words: usize,

    /// Only draw words from this theme [default: every theme]
    #[arg(long, global = true)]
    pub theme: Option<String>,

    /// Word file with `[theme]` headers, one word per line [default: embedded vocabulary]
    #[arg(long, global = true, value_name = "PATH")]
    pub word_file: Option<PathBuf>,

    /// Allowed directions, comma separated [default: all]
    #[arg(long, global = true, value_delimiter = ',')]
    pub directions: Option<Vec<Direction>>,

    /// Never write words backwards
    #[arg(long, global = true, default_value_t = false)]
    pub no_reverse: bool,

    /// Seed for reproducible puzzles
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Round duration in seconds, 0 for untimed
    #[arg(long, global = true, default_value_t = DEFAULT_ROUND_DURATION)]
    pub duration: u32,

    /// Extra players seated in pass & play, comma separated
    #[arg(long, global = true, value_delimiter = ',')]
    pub players: Vec<String>,

    /// Player handle [default: saved handle]
    #[arg(long, global = true)]
    pub handle: Option<String>,

    /// Directory holding the database and log file [default: OS data directory]
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Play in the terminal (default)
    Play,
    /// Print one puzzle to stdout
    Print {
        /// Also list where each word is hidden
        #[arg(long, default_value_t = false)]
        answers: bool,
    },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be between 1 and {max}, got {value}", max = MAX_SIDE)]
    InvalidDimension { name: &'static str, value: usize },
    #[error("at least one word must be requested")]
    NoWords,
}

/// Validated settings for a session
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,
    pub options: PuzzleOptions,
    pub word_count: usize,
    pub theme: Option<String>,
    pub word_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub duration: u32,
    pub guests: Vec<String>,
    pub handle: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        check_side("width", cli.width)?;
        check_side("height", cli.height)?;
        if cli.words == 0 {
            return Err(ConfigError::NoWords);
        }

        let mut directions = Vec::new();
        for direction in cli.directions.unwrap_or_else(|| Direction::ALL.to_vec()) {
            if !directions.contains(&direction) {
                directions.push(direction);
            }
        }

        let guests = cli
            .players
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        Ok(Self {
            command: cli.command.unwrap_or(Command::Play),
            options: PuzzleOptions {
                width: cli.width,
                height: cli.height,
                directions,
                allow_reversed: !cli.no_reverse,
                max_attempts: DEFAULT_MAX_ATTEMPTS,
            },
            word_count: cli.words,
            theme: cli.theme,
            word_file: cli.word_file,
            seed: cli.seed,
            duration: cli.duration,
            guests,
            handle: cli.handle.map(|h| clamp_handle(&h)).filter(|h| !h.is_empty()),
            data_dir: cli.data_dir,
        })
    }

    /// Load the configured word source
    pub fn vocabulary(&self) -> Result<Vocabulary, VocabularyError> {
        match &self.word_file {
            Some(path) => Vocabulary::from_file(path),
            None => Ok(Vocabulary::embedded()),
        }
    }
}

fn check_side(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if (1..=MAX_SIDE).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidDimension { name, value })
    }
}
