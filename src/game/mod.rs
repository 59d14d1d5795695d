//! Game logic: rounds, word sources, claim arbitration, progress reporting

pub mod arbitrator;
pub mod progress;
pub mod vocabulary;

use crate::puzzle::{self, Puzzle, PuzzleError, PuzzleOptions};
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use vocabulary::{Vocabulary, VocabularyError};

/// Default number of words requested per puzzle
pub const DEFAULT_WORD_COUNT: usize = 8;

/// Label used in records when words come from every theme
pub const ALL_THEMES: &str = "tous";

/// How a round is played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    /// One player against the clock
    Solo,
    /// Several players sharing one keyboard, first finder scores
    PassAndPlay,
}

impl PlayMode {
    pub fn label(&self) -> &'static str {
        match self {
            PlayMode::Solo => "Solo",
            PlayMode::PassAndPlay => "Pass & Play",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
}

/// Produces a fresh puzzle for every round
pub struct RoundFactory {
    vocabulary: Vocabulary,
    theme: Option<String>,
    word_count: usize,
    options: PuzzleOptions,
    /// Set when seeded; otherwise the thread RNG is used
    rng: Option<StdRng>,
}

impl RoundFactory {
    /// Create a factory. With a seed every run produces the same sequence
    /// of puzzles.
    pub fn new(
        vocabulary: Vocabulary,
        theme: Option<String>,
        word_count: usize,
        options: PuzzleOptions,
        seed: Option<u64>,
    ) -> Result<Self, GameError> {
        // Fail early on a bad theme rather than on the first round
        vocabulary.words(theme.as_deref())?;

        let rng = seed.map(StdRng::seed_from_u64);

        Ok(Self {
            vocabulary,
            theme,
            word_count,
            options,
            rng,
        })
    }

    pub fn theme_label(&self) -> &str {
        self.theme.as_deref().unwrap_or(ALL_THEMES)
    }

    /// Pick words and generate a brand new puzzle
    pub fn next_puzzle(&mut self) -> Result<Puzzle, GameError> {
        let theme = self.theme.as_deref();
        let (words, puzzle) = match &mut self.rng {
            Some(rng) => {
                let words = self.vocabulary.pick(theme, self.word_count, rng)?;
                let puzzle = puzzle::generate_with_rng(&words, &self.options, rng)?;
                (words, puzzle)
            }
            None => {
                let words = self.vocabulary.pick(theme, self.word_count, &mut rand::rng())?;
                let puzzle = puzzle::generate(&words, &self.options)?;
                (words, puzzle)
            }
        };

        tracing::info!(
            theme = self.theme_label(),
            requested = words.len(),
            placed = puzzle.placements().len(),
            width = self.options.width,
            height = self.options.height,
            "generated puzzle"
        );

        Ok(puzzle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory(seed: Option<u64>) -> RoundFactory {
        RoundFactory::new(
            Vocabulary::embedded(),
            Some("vertus".to_string()),
            6,
            PuzzleOptions::default(),
            seed,
        )
        .unwrap()
    }

    #[test]
    fn test_next_puzzle_uses_theme_words() {
        let mut factory = factory(Some(1));
        let puzzle = factory.next_puzzle().unwrap();
        let vocab = Vocabulary::embedded();
        let pool = vocab.words(Some("vertus")).unwrap();

        assert!(!puzzle.placed_words().is_empty());
        assert!(puzzle.placed_words().len() <= 6);
        for word in puzzle.placed_words() {
            assert!(pool.contains(&word.as_str()));
        }
    }

    #[test]
    fn test_seeded_factories_agree() {
        let mut a = factory(Some(99));
        let mut b = factory(Some(99));
        assert_eq!(a.next_puzzle().unwrap(), b.next_puzzle().unwrap());
        assert_eq!(a.next_puzzle().unwrap(), b.next_puzzle().unwrap());
    }

    #[test]
    fn test_each_round_gets_new_puzzle() {
        let mut factory = factory(Some(5));
        let first = factory.next_puzzle().unwrap();
        let second = factory.next_puzzle().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_unknown_theme_rejected() {
        let result = RoundFactory::new(
            Vocabulary::embedded(),
            Some("inconnu".to_string()),
            6,
            PuzzleOptions::default(),
            None,
        );
        assert!(matches!(
            result,
            Err(GameError::Vocabulary(VocabularyError::UnknownTheme { .. }))
        ));
    }

    #[test]
    fn test_all_themes_label() {
        let factory = RoundFactory::new(Vocabulary::embedded(), None, 4, PuzzleOptions::default(), Some(2))
            .unwrap();
        assert_eq!(factory.theme_label(), ALL_THEMES);
    }
}
