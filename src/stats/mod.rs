//! Statistics and Elo rating system
//!
//! This module provides:
//! - The `RoundRecord` payload written to the event log at the end of a round
//! - Pairwise Elo calculations for pass-and-play rounds
//! - Deterministic replay of round history into lifetime stats
//!
//! Elo uses pairwise comparisons:
//! - At round end, each player pair gets a win/loss/draw result
//! - Expected score: E_A = 1 / (1 + 10^((R_B - R_A)/400))
//! - Rating update: ΔR_A = (K/(N-1)) * Σ(Result - Expected)

use crate::game::PlayMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default K factor for Elo calculations
pub const DEFAULT_K: f64 = 32.0;

/// Default starting Elo rating
pub const DEFAULT_ELO: f64 = 1200.0;

/// Payload version written into every record. Readers ignore unknown
/// fields, so newer payloads stay readable.
pub const PAYLOAD_VERSION: u32 = 1;

fn payload_version() -> u32 {
    PAYLOAD_VERSION
}

/// Outcome of one finished round, stored as a JSON event payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    #[serde(default = "payload_version")]
    pub version: u32,
    /// Unix timestamp (milliseconds) when the round finished
    pub played_at: i64,
    pub mode: PlayMode,
    pub theme: String,
    pub width: usize,
    pub height: usize,
    /// Number of words hidden in the grid
    pub words_total: usize,
    /// Final scores: (player, score), highest first
    pub scores: Vec<(String, u32)>,
    /// Words found: (player, word), in discovery order
    pub found: Vec<(String, String)>,
    /// Every hidden word was found before time ran out
    pub completed: bool,
    pub elapsed_secs: u32,
}

impl RoundRecord {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn player_count(&self) -> usize {
        self.scores.len()
    }

    /// Rated rounds need at least two players
    pub fn is_multiplayer(&self) -> bool {
        self.scores.len() >= 2
    }
}

/// Player lifetime statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStats {
    pub handle: String,
    pub elo: f64,
    pub rounds_played: u32,
    /// Total points scored across all rounds
    pub total_points: u32,
    /// Best single-round score
    pub best_score: u32,
    pub words_found: u32,
    /// Longest word found (by character count)
    pub longest_word: String,
    pub puzzles_completed: u32,
    /// Fastest completed round, in seconds
    pub fastest_completion: Option<u32>,
    /// First-place finishes in multi-player rounds
    pub wins: u32,
}

impl PlayerStats {
    pub fn new(handle: String) -> Self {
        PlayerStats {
            handle,
            elo: DEFAULT_ELO,
            ..Default::default()
        }
    }

    /// Average score per round
    pub fn average_score(&self) -> f64 {
        if self.rounds_played == 0 {
            0.0
        } else {
            self.total_points as f64 / self.rounds_played as f64
        }
    }
}

/// Elo calculator with deterministic replay
#[derive(Debug, Clone)]
pub struct EloCalculator {
    k_factor: f64,
    ratings: HashMap<String, f64>,
}

impl EloCalculator {
    pub fn new() -> Self {
        Self::with_k_factor(DEFAULT_K)
    }

    pub fn with_k_factor(k_factor: f64) -> Self {
        EloCalculator {
            k_factor,
            ratings: HashMap::new(),
        }
    }

    /// A player's current rating (or default if new)
    pub fn rating(&self, player: &str) -> f64 {
        self.ratings.get(player).copied().unwrap_or(DEFAULT_ELO)
    }

    /// Ratings sorted highest first
    pub fn leaderboard(&self) -> Vec<(String, f64)> {
        let mut ratings: Vec<_> = self.ratings.iter().map(|(k, v)| (k.clone(), *v)).collect();
        ratings.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ratings
    }

    fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
        1.0 / (1.0 + 10.0_f64.powf((rating_b - rating_a) / 400.0))
    }

    /// Update ratings from one round using pairwise comparisons:
    /// for every pair (A,B), A scores 1.0 if ahead, 0.5 on a tie, else 0.0.
    pub fn process_round(&mut self, record: &RoundRecord) {
        if !record.is_multiplayer() {
            return;
        }

        let k_adjusted = self.k_factor / (record.player_count() - 1) as f64;

        let player_ratings: Vec<(&str, u32, f64)> = record
            .scores
            .iter()
            .map(|(name, score)| (name.as_str(), *score, self.rating(name)))
            .collect();

        let changes: Vec<(String, f64)> = player_ratings
            .iter()
            .enumerate()
            .map(|(i, (player_a, score_a, rating_a))| {
                let total: f64 = player_ratings
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, (_, score_b, rating_b))| {
                        let actual = match score_a.cmp(score_b) {
                            std::cmp::Ordering::Greater => 1.0,
                            std::cmp::Ordering::Equal => 0.5,
                            std::cmp::Ordering::Less => 0.0,
                        };
                        k_adjusted * (actual - Self::expected_score(*rating_a, *rating_b))
                    })
                    .sum();
                (player_a.to_string(), total)
            })
            .collect();

        for (player, change) in changes {
            let current = self.rating(&player);
            self.ratings.insert(player, current + change);
        }
    }
}

impl Default for EloCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifetime statistics for every player seen in the round history
#[derive(Debug, Default)]
pub struct StatsTracker {
    stats: HashMap<String, PlayerStats>,
    elo: EloCalculator,
}

impl StatsTracker {
    pub fn new() -> Self {
        StatsTracker::default()
    }

    #[cfg(test)]
    pub fn get(&self, handle: &str) -> Option<&PlayerStats> {
        self.stats.get(handle)
    }

    fn get_or_create(&mut self, handle: &str) -> &mut PlayerStats {
        self.stats
            .entry(handle.to_string())
            .or_insert_with(|| PlayerStats::new(handle.to_string()))
    }

    /// Fold one finished round into the stats
    pub fn process_round(&mut self, record: &RoundRecord) {
        let max_score = record.scores.iter().map(|(_, s)| *s).max().unwrap_or(0);

        for (handle, score) in &record.scores {
            let stats = self.get_or_create(handle);
            stats.rounds_played += 1;
            stats.total_points += score;
            stats.best_score = stats.best_score.max(*score);
            if record.completed {
                stats.puzzles_completed += 1;
                stats.fastest_completion = Some(
                    stats
                        .fastest_completion
                        .map_or(record.elapsed_secs, |best| best.min(record.elapsed_secs)),
                );
            }
            if record.is_multiplayer() && *score == max_score && max_score > 0 {
                stats.wins += 1;
            }
        }

        for (handle, word) in &record.found {
            let stats = self.get_or_create(handle);
            stats.words_found += 1;
            if word.chars().count() > stats.longest_word.chars().count() {
                stats.longest_word = word.clone();
            }
        }

        if record.is_multiplayer() {
            self.elo.process_round(record);
            for (handle, _) in &record.scores {
                let rating = self.elo.rating(handle);
                self.get_or_create(handle).elo = rating;
            }
        }
    }

    /// Recompute everything from history, oldest round first
    pub fn rebuild_from_records(&mut self, records: &mut [RoundRecord]) {
        self.stats.clear();
        self.elo = EloCalculator::new();

        records.sort_by_key(|r| r.played_at);
        for record in records.iter() {
            self.process_round(record);
        }
    }

    /// All players, best total points first
    pub fn points_leaderboard(&self) -> Vec<&PlayerStats> {
        let mut players: Vec<_> = self.stats.values().collect();
        players.sort_by(|a, b| b.total_points.cmp(&a.total_points).then_with(|| a.handle.cmp(&b.handle)));
        players
    }

    pub fn elo_leaderboard(&self) -> Vec<(String, f64)> {
        self.elo.leaderboard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(played_at: i64, scores: &[(&str, u32)], completed: bool) -> RoundRecord {
        RoundRecord {
            version: PAYLOAD_VERSION,
            played_at,
            mode: if scores.len() > 1 {
                PlayMode::PassAndPlay
            } else {
                PlayMode::Solo
            },
            theme: "vertus".to_string(),
            width: 10,
            height: 12,
            words_total: 3,
            scores: scores.iter().map(|(n, s)| (n.to_string(), *s)).collect(),
            found: Vec::new(),
            completed,
            elapsed_secs: 90,
        }
    }

    #[test]
    fn test_record_json_roundtrip() {
        let mut rec = record(1000, &[("Alice", 8)], true);
        rec.found = vec![("Alice".to_string(), "ÉGLISE".to_string())];
        let json = rec.to_json().unwrap();
        assert_eq!(RoundRecord::from_json(&json).unwrap(), rec);
    }

    #[test]
    fn test_record_without_version_defaults() {
        let json = r#"{"played_at":5,"mode":"solo","theme":"lieux","width":8,"height":8,
            "words_total":2,"scores":[["Ana",4]],"found":[["Ana","SION"]],
            "completed":false,"elapsed_secs":30,"extra":true}"#;
        let rec = RoundRecord::from_json(json).unwrap();
        assert_eq!(rec.version, PAYLOAD_VERSION);
        assert_eq!(rec.mode, PlayMode::Solo);
    }

    #[test]
    fn test_elo_equal_ratings_winner_gains() {
        let mut elo = EloCalculator::new();
        elo.process_round(&record(1, &[("Alice", 10), ("Bob", 5)], false));

        assert!((elo.rating("Alice") - 1216.0).abs() < 0.001);
        assert!((elo.rating("Bob") - 1184.0).abs() < 0.001);
    }

    #[test]
    fn test_elo_draw_no_change() {
        let mut elo = EloCalculator::new();
        elo.process_round(&record(1, &[("Alice", 7), ("Bob", 7)], true));
        assert!((elo.rating("Alice") - DEFAULT_ELO).abs() < 0.001);
    }

    #[test]
    fn test_elo_ignores_solo_rounds() {
        let mut elo = EloCalculator::new();
        elo.process_round(&record(1, &[("Alice", 30)], true));
        assert!(elo.leaderboard().is_empty());
    }

    #[test]
    fn test_elo_is_zero_sum() {
        let mut elo = EloCalculator::new();
        elo.process_round(&record(1, &[("A", 9), ("B", 4), ("C", 1)], false));
        let total: f64 = ["A", "B", "C"].iter().map(|p| elo.rating(p)).sum();
        assert!((total - 3.0 * DEFAULT_ELO).abs() < 0.001);
    }

    #[test]
    fn test_tracker_accumulates() {
        let mut tracker = StatsTracker::new();
        let mut first = record(1, &[("Alice", 12)], true);
        first.found = vec![
            ("Alice".to_string(), "FOI".to_string()),
            ("Alice".to_string(), "ESPÉRANCE".to_string()),
        ];
        tracker.process_round(&first);

        let mut second = record(2, &[("Alice", 5)], false);
        second.elapsed_secs = 40;
        tracker.process_round(&second);

        let stats = tracker.get("Alice").unwrap();
        assert_eq!(stats.rounds_played, 2);
        assert_eq!(stats.total_points, 17);
        assert_eq!(stats.best_score, 12);
        assert_eq!(stats.words_found, 2);
        assert_eq!(stats.longest_word, "ESPÉRANCE");
        assert_eq!(stats.puzzles_completed, 1);
        assert_eq!(stats.fastest_completion, Some(90));
        assert!((stats.average_score() - 8.5).abs() < 0.001);
    }

    #[test]
    fn test_tracker_wins_and_leaderboards() {
        let mut tracker = StatsTracker::new();
        tracker.process_round(&record(1, &[("Alice", 10), ("Bob", 4)], true));
        tracker.process_round(&record(2, &[("Bob", 9), ("Alice", 2)], false));

        assert_eq!(tracker.get("Alice").unwrap().wins, 1);
        assert_eq!(tracker.get("Bob").unwrap().wins, 1);

        let points = tracker.points_leaderboard();
        assert_eq!(points[0].handle, "Bob");
        assert_eq!(points[0].total_points, 13);

        // Bob beat the higher-rated Alice in round 2, so he ends up ahead.
        let elo = tracker.elo_leaderboard();
        assert_eq!(elo.len(), 2);
        assert_eq!(elo[0].0, "Bob");
        assert!((tracker.get("Bob").unwrap().elo - elo[0].1).abs() < 0.001);
    }

    #[test]
    fn test_rebuild_is_order_independent() {
        let mut records = vec![
            record(3, &[("Alice", 10), ("Bob", 4)], false),
            record(1, &[("Bob", 8), ("Alice", 6)], false),
            record(2, &[("Alice", 5), ("Bob", 5)], false),
        ];
        let mut shuffled = vec![records[1].clone(), records[2].clone(), records[0].clone()];

        let mut a = StatsTracker::new();
        a.rebuild_from_records(&mut records);
        let mut b = StatsTracker::new();
        b.rebuild_from_records(&mut shuffled);

        assert_eq!(a.get("Alice"), b.get("Alice"));
        assert_eq!(a.get("Bob"), b.get("Bob"));
    }
}
