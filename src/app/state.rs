//! Round state for the interactive game
//!
//! One `App` drives one round at a time: cursor and selection handling,
//! claim submission through the arbitrator, the timer, and reporting.
//! Starting the next round swaps in a brand new puzzle value.

use crate::game::arbitrator::{ClaimResult, RoundArbitrator};
use crate::game::progress::ProgressReporter;
use crate::game::PlayMode;
use crate::puzzle::selection::{extract_line, line_cells};
use crate::puzzle::{Coord, Grid, Placement, Puzzle};
use crate::stats::{RoundRecord, PAYLOAD_VERSION};
use crate::storage::now_millis;
use std::collections::VecDeque;

/// Default round duration in seconds
pub const DEFAULT_ROUND_DURATION: u32 = 300;

/// Name used when a round is started without players
pub const FALLBACK_PLAYER: &str = "Joueur";

/// A found word and the cells it covers, for highlighting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundLine {
    pub word: String,
    pub player: String,
    pub cells: Vec<Coord>,
}

/// A claim in the feed (visible to all players)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimFeedEntry {
    pub player_name: String,
    pub word: String,
    pub points: u32,
}

/// End-of-round summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundSummary {
    /// Scores, highest first
    pub scores: Vec<(String, u32)>,
    /// (player, word) in discovery order
    pub found: Vec<(String, String)>,
    /// Hidden words nobody found
    pub missed: Vec<String>,
    pub completed: bool,
    pub elapsed_secs: u32,
}

/// Main application state for one round
pub struct App {
    puzzle: Puzzle,
    arbitrator: RoundArbitrator,
    pub mode: PlayMode,
    pub theme: String,
    pub cursor: Coord,
    /// First end of a selection in progress
    pub anchor: Option<Coord>,
    found_lines: Vec<FoundLine>,
    /// Feedback message from last submission
    pub feedback: String,
    /// Seconds left; unused when the round is untimed
    pub time_remaining: u32,
    pub elapsed: u32,
    round_duration: u32,
    completed: bool,
    players: Vec<String>,
    active_player: usize,
    /// Recent claims (VecDeque for O(1) front removal)
    pub claim_feed: VecDeque<ClaimFeedEntry>,
    claim_feed_max: usize,
    reporter: Box<dyn ProgressReporter>,
}

impl App {
    /// Create the state for a first round. A `duration` of 0 means untimed.
    pub fn new(
        puzzle: Puzzle,
        mode: PlayMode,
        players: Vec<String>,
        theme: String,
        duration: u32,
        reporter: Box<dyn ProgressReporter>,
    ) -> Self {
        let players = if players.is_empty() {
            vec![FALLBACK_PLAYER.to_string()]
        } else {
            players
        };
        let arbitrator = RoundArbitrator::new(puzzle.placed_words(), &players);

        let mut app = Self {
            puzzle,
            arbitrator,
            mode,
            theme,
            cursor: Coord::new(0, 0),
            anchor: None,
            found_lines: Vec::new(),
            feedback: String::new(),
            time_remaining: duration,
            elapsed: 0,
            round_duration: duration,
            completed: false,
            players,
            active_player: 0,
            claim_feed: VecDeque::new(),
            claim_feed_max: 10,
            reporter,
        };
        app.check_empty_puzzle();
        app
    }

    /// Start a new round on a fresh puzzle, keeping players and settings
    pub fn start_round(&mut self, puzzle: Puzzle) {
        self.arbitrator = RoundArbitrator::new(puzzle.placed_words(), &self.players);
        self.puzzle = puzzle;
        self.cursor = Coord::new(0, 0);
        self.anchor = None;
        self.found_lines.clear();
        self.feedback.clear();
        self.time_remaining = self.round_duration;
        self.elapsed = 0;
        self.completed = false;
        self.active_player = 0;
        self.claim_feed.clear();
        self.check_empty_puzzle();
    }

    /// A puzzle where nothing could be placed is over before it starts
    fn check_empty_puzzle(&mut self) {
        if self.puzzle.placements().is_empty() {
            tracing::warn!("puzzle has no placed words");
            self.finish_round("NO WORDS FIT IN THIS GRID");
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn grid(&self) -> &Grid {
        self.puzzle.grid()
    }

    pub fn arbitrator(&self) -> &RoundArbitrator {
        &self.arbitrator
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn active_player(&self) -> &str {
        &self.players[self.active_player]
    }

    pub fn is_timed(&self) -> bool {
        self.round_duration > 0
    }

    pub fn is_round_over(&self) -> bool {
        !self.arbitrator.is_active()
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn found_lines(&self) -> &[FoundLine] {
        &self.found_lines
    }

    pub fn is_found_cell(&self, coord: Coord) -> bool {
        self.found_lines.iter().any(|l| l.cells.contains(&coord))
    }

    /// Placements of words nobody found (revealed once the round is over)
    pub fn missed_placements(&self) -> Vec<&Placement> {
        self.puzzle
            .placements()
            .iter()
            .filter(|p| !self.arbitrator.is_found(&p.word))
            .collect()
    }

    /// Pass the keyboard to the next player
    pub fn next_player(&mut self) {
        if self.is_round_over() {
            return;
        }
        self.active_player = (self.active_player + 1) % self.players.len();
        self.feedback = format!("{} TO PLAY", self.active_player().to_uppercase());
    }

    /// Move the cursor, clamped to the grid
    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let grid = self.puzzle.grid();
        let row = (self.cursor.row as isize + d_row).clamp(0, grid.height() as isize - 1);
        let col = (self.cursor.col as isize + d_col).clamp(0, grid.width() as isize - 1);
        self.cursor = Coord::new(row as usize, col as usize);
    }

    /// Cells of the selection in progress, from the anchor to the cursor
    pub fn preview_cells(&self) -> Vec<Coord> {
        self.anchor
            .and_then(|anchor| line_cells(anchor, self.cursor))
            .unwrap_or_default()
    }

    /// First press anchors a selection, second press submits it
    pub fn on_select(&mut self) {
        if self.is_round_over() {
            return;
        }
        match self.anchor.take() {
            None => {
                self.anchor = Some(self.cursor);
                self.feedback.clear();
            }
            Some(start) => self.submit_selection(start, self.cursor),
        }
    }

    pub fn cancel_selection(&mut self) {
        self.anchor = None;
    }

    fn submit_selection(&mut self, start: Coord, end: Coord) {
        let line = match extract_line(self.puzzle.grid(), start, end) {
            Ok(Some(line)) => line,
            Ok(None) => {
                self.feedback = "NOT A LINE".to_string();
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "selection outside grid");
                self.feedback = "NOT A LINE".to_string();
                return;
            }
        };

        let player = self.active_player().to_string();
        match self.arbitrator.try_claim(&line, &player) {
            ClaimResult::Accepted { word, points, claim_sequence } => {
                tracing::debug!(word = %word, player = %player, claim_sequence, "word found");
                self.feedback = format!("OK +{} ({})", points, word);
                self.found_lines.push(FoundLine {
                    word: word.clone(),
                    player: player.clone(),
                    cells: line_cells(start, end).unwrap_or_default(),
                });
                self.claim_feed.push_back(ClaimFeedEntry {
                    player_name: player.clone(),
                    word: word.clone(),
                    points,
                });
                while self.claim_feed.len() > self.claim_feed_max {
                    self.claim_feed.pop_front();
                }
                self.reporter.word_found(&player, &word, points);

                if self.arbitrator.is_complete() {
                    self.completed = true;
                    self.finish_round("ALL WORDS FOUND!");
                }
            }
            ClaimResult::AlreadyFound { word, by } => {
                self.feedback = format!("ALREADY FOUND ({} by {})", word, by);
            }
            ClaimResult::NoMatch => {
                self.feedback = "NOPE".to_string();
            }
            ClaimResult::RoundEnded => {
                self.feedback = "ROUND OVER".to_string();
            }
        }
    }

    /// Advance the clock one second; the round ends when time runs out
    pub fn tick(&mut self) {
        if self.is_round_over() {
            return;
        }
        self.elapsed += 1;
        if self.is_timed() && self.time_remaining > 0 {
            self.time_remaining -= 1;
            if self.time_remaining == 0 {
                self.finish_round("TIME'S UP!");
            }
        }
    }

    /// Stop the round and reveal the missing words
    pub fn give_up(&mut self) {
        self.finish_round("GAVE UP");
    }

    fn finish_round(&mut self, message: &str) {
        if self.is_round_over() {
            return;
        }
        self.anchor = None;
        self.arbitrator.end_round();
        self.feedback = message.to_string();

        let record = self.round_record();
        tracing::info!(
            completed = record.completed,
            found = record.found.len(),
            total = record.words_total,
            elapsed = record.elapsed_secs,
            "round finished"
        );
        self.reporter.round_finished(&record);
    }

    /// Snapshot of the round for the history log
    pub fn round_record(&self) -> RoundRecord {
        let grid = self.puzzle.grid();
        RoundRecord {
            version: PAYLOAD_VERSION,
            played_at: now_millis(),
            mode: self.mode,
            theme: self.theme.clone(),
            width: grid.width(),
            height: grid.height(),
            words_total: self.arbitrator.words().len(),
            scores: self.arbitrator.scores(),
            found: self
                .found_lines
                .iter()
                .map(|l| (l.player.clone(), l.word.clone()))
                .collect(),
            completed: self.completed,
            elapsed_secs: self.elapsed,
        }
    }

    pub fn round_summary(&self) -> RoundSummary {
        RoundSummary {
            scores: self.arbitrator.scores(),
            found: self
                .found_lines
                .iter()
                .map(|l| (l.player.clone(), l.word.clone()))
                .collect(),
            missed: self
                .arbitrator
                .remaining()
                .into_iter()
                .map(str::to_string)
                .collect(),
            completed: self.completed,
            elapsed_secs: self.elapsed,
        }
    }
}
