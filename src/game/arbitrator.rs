//! Claim arbitration for a puzzle round
//!
//! Every round, solo or pass-and-play, runs through an arbitrator: it owns
//! the set of words hidden in the puzzle, decides which of them a selected
//! line spells, and makes sure only the first finder scores a word.

use crate::puzzle::selection::matches_word;
use std::collections::HashMap;

/// Result of submitting a selected line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimResult {
    /// The line spells an unfound word
    Accepted {
        word: String,
        points: u32,
        /// Monotonic claim counter within the round
        claim_sequence: u64,
    },
    /// The line spells a word somebody already found
    AlreadyFound { word: String, by: String },
    /// The line spells none of the hidden words
    NoMatch,
    /// The round is over
    RoundEnded,
}

/// Points for finding a word: one per letter.
pub fn word_points(word: &str) -> u32 {
    word.chars().count() as u32
}

/// Tracks found words and player scores during a round
#[derive(Debug, Clone)]
pub struct RoundArbitrator {
    /// Words hidden in the puzzle
    words: Vec<String>,
    /// Found words, mapping word -> finder
    found: HashMap<String, String>,
    /// Player scores, in seating order
    scores: Vec<(String, u32)>,
    round_active: bool,
    claim_sequence: u64,
}

impl RoundArbitrator {
    pub fn new(words: Vec<String>, players: &[String]) -> Self {
        Self {
            words,
            found: HashMap::new(),
            scores: players.iter().map(|p| (p.clone(), 0)).collect(),
            round_active: true,
            claim_sequence: 0,
        }
    }

    /// Match a selected line against the hidden words and award it.
    ///
    /// Unfound words take precedence, so a palindrome-like overlap with an
    /// already found word never hides a fresh one.
    pub fn try_claim(&mut self, line: &str, player: &str) -> ClaimResult {
        if !self.round_active {
            return ClaimResult::RoundEnded;
        }

        let fresh = self
            .words
            .iter()
            .find(|w| !self.found.contains_key(*w) && matches_word(line, w))
            .cloned();

        let Some(word) = fresh else {
            return match self.words.iter().find(|w| matches_word(line, w)) {
                Some(word) => ClaimResult::AlreadyFound {
                    word: word.clone(),
                    by: self.found.get(word).cloned().unwrap_or_default(),
                },
                None => ClaimResult::NoMatch,
            };
        };

        let points = word_points(&word);
        self.found.insert(word.clone(), player.to_string());
        match self.scores.iter_mut().find(|(name, _)| name == player) {
            Some((_, score)) => *score += points,
            None => self.scores.push((player.to_string(), points)),
        }
        self.claim_sequence += 1;

        ClaimResult::Accepted {
            word,
            points,
            claim_sequence: self.claim_sequence,
        }
    }

    /// End the round (no more claims accepted)
    pub fn end_round(&mut self) {
        self.round_active = false;
    }

    pub fn is_active(&self) -> bool {
        self.round_active
    }

    /// Every hidden word has been found
    pub fn is_complete(&self) -> bool {
        self.found.len() == self.words.len()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Hidden words nobody has found yet, in puzzle order
    pub fn remaining(&self) -> Vec<&str> {
        self.words
            .iter()
            .filter(|w| !self.found.contains_key(*w))
            .map(String::as_str)
            .collect()
    }

    pub fn is_found(&self, word: &str) -> bool {
        self.found.contains_key(word)
    }

    pub fn finder(&self, word: &str) -> Option<&str> {
        self.found.get(word).map(String::as_str)
    }

    /// Words found by one player
    pub fn found_by(&self, player: &str) -> Vec<&str> {
        self.words
            .iter()
            .filter(|w| self.found.get(*w).map(String::as_str) == Some(player))
            .map(String::as_str)
            .collect()
    }

    /// Scores sorted highest first; ties keep seating order
    pub fn scores(&self) -> Vec<(String, u32)> {
        let mut scores = self.scores.clone();
        scores.sort_by(|a, b| b.1.cmp(&a.1));
        scores
    }

    pub fn player_score(&self, player: &str) -> u32 {
        self.scores
            .iter()
            .find(|(name, _)| name == player)
            .map_or(0, |(_, score)| *score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_words() -> Vec<String> {
        vec!["AMOUR".to_string(), "FOI".to_string(), "PAIX".to_string()]
    }

    fn test_players() -> Vec<String> {
        vec!["Alice".to_string(), "Bob".to_string()]
    }

    #[test]
    fn test_first_finder_wins() {
        let mut arb = RoundArbitrator::new(test_words(), &test_players());

        let result = arb.try_claim("FOI", "Alice");
        assert_eq!(
            result,
            ClaimResult::Accepted {
                word: "FOI".to_string(),
                points: 3,
                claim_sequence: 1
            }
        );

        let result = arb.try_claim("FOI", "Bob");
        assert!(matches!(
            result,
            ClaimResult::AlreadyFound { by, .. } if by == "Alice"
        ));
    }

    #[test]
    fn test_reversed_line_matches() {
        let mut arb = RoundArbitrator::new(test_words(), &test_players());
        let result = arb.try_claim("RUOMA", "Bob");
        assert!(matches!(result, ClaimResult::Accepted { ref word, points: 5, .. } if word == "AMOUR"));
        assert!(arb.is_found("AMOUR"));
        assert_eq!(arb.finder("AMOUR"), Some("Bob"));
    }

    #[test]
    fn test_no_match() {
        let mut arb = RoundArbitrator::new(test_words(), &test_players());
        assert_eq!(arb.try_claim("AMO", "Alice"), ClaimResult::NoMatch);
        assert_eq!(arb.try_claim("", "Alice"), ClaimResult::NoMatch);
    }

    #[test]
    fn test_unfound_word_preferred_over_found_one() {
        let words = vec!["LEON".to_string(), "NOEL".to_string()];
        let mut arb = RoundArbitrator::new(words, &test_players());
        assert!(matches!(
            arb.try_claim("NOEL", "Alice"),
            ClaimResult::Accepted { ref word, .. } if word == "LEON"
        ));
        assert!(matches!(
            arb.try_claim("NOEL", "Bob"),
            ClaimResult::Accepted { ref word, .. } if word == "NOEL"
        ));
        assert!(matches!(arb.try_claim("LEON", "Bob"), ClaimResult::AlreadyFound { .. }));
        assert!(arb.is_complete());
    }

    #[test]
    fn test_scores_tracked_and_sorted() {
        let mut arb = RoundArbitrator::new(test_words(), &test_players());
        arb.try_claim("FOI", "Bob");
        arb.try_claim("AMOUR", "Alice");
        arb.try_claim("PAIX", "Bob");

        assert_eq!(arb.player_score("Alice"), 5);
        assert_eq!(arb.player_score("Bob"), 7);
        assert_eq!(
            arb.scores(),
            vec![("Bob".to_string(), 7), ("Alice".to_string(), 5)]
        );
        assert_eq!(arb.found_by("Bob"), vec!["FOI", "PAIX"]);
    }

    #[test]
    fn test_completion_and_remaining() {
        let mut arb = RoundArbitrator::new(test_words(), &test_players());
        assert_eq!(arb.remaining(), vec!["AMOUR", "FOI", "PAIX"]);
        arb.try_claim("AMOUR", "Alice");
        arb.try_claim("FOI", "Alice");
        assert!(!arb.is_complete());
        assert_eq!(arb.remaining(), vec!["PAIX"]);
        arb.try_claim("XIAP", "Alice");
        assert!(arb.is_complete());
    }

    #[test]
    fn test_round_ended() {
        let mut arb = RoundArbitrator::new(test_words(), &test_players());
        arb.end_round();
        assert!(!arb.is_active());
        assert_eq!(arb.try_claim("FOI", "Alice"), ClaimResult::RoundEnded);
    }

    #[test]
    fn test_unknown_player_gets_seat() {
        let mut arb = RoundArbitrator::new(test_words(), &test_players());
        arb.try_claim("PAIX", "Carol");
        assert_eq!(arb.player_score("Carol"), 4);
    }

    #[test]
    fn test_accented_points_count_chars() {
        assert_eq!(word_points("ÉGLISE"), 6);
    }
}
