//! Word-search puzzle generation
//!
//! Builds a fully populated character grid and hides a word list in it
//! along the allowed directions. Placement is randomized with a bounded
//! number of attempts per word; words that never fit are dropped.

pub mod selection;

use rand::prelude::*;
use std::collections::HashSet;
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Default number of random placement attempts per word.
pub const DEFAULT_MAX_ATTEMPTS: usize = 50;

/// Letters used to backfill cells not covered by a word.
const FILLER_ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Errors raised when a puzzle cannot be generated at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error("invalid grid dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions { width: usize, height: usize },
}

/// A zero-based cell position, row 0 at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Move `steps` times along `(d_row, d_col)`. Returns None if the
    /// result would leave the non-negative quadrant.
    fn offset(self, (d_row, d_col): (isize, isize), steps: usize) -> Option<Coord> {
        let steps = steps as isize;
        let row = self.row as isize + d_row * steps;
        let col = self.col as isize + d_col * steps;
        if row < 0 || col < 0 {
            None
        } else {
            Some(Coord::new(row as usize, col as usize))
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The axis a word is written along.
///
/// Diagonal-up means the row decreases while the column increases. The
/// same unit vectors drive both placement and selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Direction {
    Horizontal,
    Vertical,
    DiagonalDown,
    DiagonalUp,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalDown,
        Direction::DiagonalUp,
    ];

    /// Unit step as `(d_row, d_col)`.
    pub fn step(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalDown => (1, 1),
            Direction::DiagonalUp => (-1, 1),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Horizontal => "horizontal",
            Direction::Vertical => "vertical",
            Direction::DiagonalDown => "diagonal-down",
            Direction::DiagonalUp => "diagonal-up",
        }
    }
}

/// A rectangular, fully populated grid of letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl Grid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.height && coord.col < self.width
    }

    pub fn get(&self, coord: Coord) -> Option<char> {
        if self.contains(coord) {
            Some(self.cells[coord.row * self.width + coord.col])
        } else {
            None
        }
    }

    /// One row of the grid, left to right.
    pub fn row(&self, row: usize) -> &[char] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }

    /// Build a grid from text rows (test fixtures). Rows are normalized the
    /// same way words are.
    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Result<Self, PuzzleError> {
        let rows: Vec<Vec<char>> = rows.iter().map(|r| normalize_word(r).chars().collect()).collect();
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if width == 0 || height == 0 || rows.iter().any(|r| r.len() != width) {
            return Err(PuzzleError::InvalidDimensions { width, height });
        }
        Ok(Grid {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            let line: Vec<String> = self.row(row).iter().map(|c| c.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Where a placed word lives in the grid.
///
/// `start` holds the word's first letter. When `reversed` is set the word
/// runs against the direction vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub word: String,
    pub start: Coord,
    pub direction: Direction,
    pub reversed: bool,
}

impl Placement {
    fn signed_step(&self) -> (isize, isize) {
        let (d_row, d_col) = self.direction.step();
        if self.reversed {
            (-d_row, -d_col)
        } else {
            (d_row, d_col)
        }
    }

    /// Cells covered by the word, in reading order.
    pub fn cells(&self) -> Vec<Coord> {
        let step = self.signed_step();
        (0..self.word.chars().count())
            .filter_map(|i| self.start.offset(step, i))
            .collect()
    }

    /// Cell holding the word's last letter.
    pub fn end(&self) -> Coord {
        self.cells().last().copied().unwrap_or(self.start)
    }
}

/// Options controlling grid generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleOptions {
    pub width: usize,
    pub height: usize,
    pub directions: Vec<Direction>,
    /// Allow words to be written backwards along a direction.
    pub allow_reversed: bool,
    /// Random placement attempts per word before it is dropped.
    pub max_attempts: usize,
}

impl Default for PuzzleOptions {
    fn default() -> Self {
        Self {
            width: 10,
            height: 12,
            directions: Direction::ALL.to_vec(),
            allow_reversed: true,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// A generated puzzle: an immutable grid plus the words hidden in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    grid: Grid,
    placements: Vec<Placement>,
}

impl Puzzle {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Words that made it into the grid, in placement order.
    pub fn placed_words(&self) -> Vec<String> {
        self.placements.iter().map(|p| p.word.clone()).collect()
    }

    pub fn placement(&self, word: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.word == word)
    }
}

/// Normalize a candidate word: NFC-compose, keep letters only, uppercase.
///
/// Accented letters survive as single characters.
pub fn normalize_word(word: &str) -> String {
    word.nfc()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Generate a puzzle using the thread-local RNG.
pub fn generate<S: AsRef<str>>(words: &[S], options: &PuzzleOptions) -> Result<Puzzle, PuzzleError> {
    generate_with_rng(words, options, &mut rand::rng())
}

/// Generate a puzzle using a specific RNG (for testing/seeding).
pub fn generate_with_rng<S: AsRef<str>, R: Rng + ?Sized>(
    words: &[S],
    options: &PuzzleOptions,
    rng: &mut R,
) -> Result<Puzzle, PuzzleError> {
    let (width, height) = (options.width, options.height);
    if width == 0 || height == 0 {
        return Err(PuzzleError::InvalidDimensions { width, height });
    }

    let mut directions: Vec<Direction> = Vec::new();
    for direction in &options.directions {
        if !directions.contains(direction) {
            directions.push(*direction);
        }
    }

    let mut cells: Vec<Option<char>> = vec![None; width * height];
    let mut placements = Vec::new();

    for word in ordered_candidates(words) {
        match place_word(&mut cells, width, height, &word, &directions, options, rng) {
            Some(placement) => placements.push(placement),
            None => tracing::debug!(word = %word, "dropping word that did not fit"),
        }
    }

    let cells = cells
        .into_iter()
        .map(|cell| cell.unwrap_or_else(|| random_filler(rng)))
        .collect();

    Ok(Puzzle {
        grid: Grid {
            width,
            height,
            cells,
        },
        placements,
    })
}

/// Normalized, deduplicated words, longest first. The sort is stable so
/// equal lengths keep their input order.
fn ordered_candidates<S: AsRef<str>>(words: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut candidates: Vec<String> = words
        .iter()
        .map(|w| normalize_word(w.as_ref()))
        .filter(|w| !w.is_empty())
        .filter(|w| seen.insert(w.clone()))
        .collect();
    candidates.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));
    candidates
}

fn place_word<R: Rng + ?Sized>(
    cells: &mut [Option<char>],
    width: usize,
    height: usize,
    word: &str,
    directions: &[Direction],
    options: &PuzzleOptions,
    rng: &mut R,
) -> Option<Placement> {
    let letters: Vec<char> = word.chars().collect();

    for _ in 0..options.max_attempts {
        let direction = *directions.choose(rng)?;
        let reversed = options.allow_reversed && rng.random_bool(0.5);
        let candidate = Placement {
            word: word.to_string(),
            start: Coord::new(0, 0),
            direction,
            reversed,
        };
        let Some(start) = random_start(&candidate, letters.len(), width, height, rng) else {
            continue;
        };
        let candidate = Placement { start, ..candidate };

        if fits(cells, width, &candidate, &letters) {
            for (coord, letter) in candidate.cells().into_iter().zip(&letters) {
                cells[coord.row * width + coord.col] = Some(*letter);
            }
            return Some(candidate);
        }
    }

    None
}

/// Pick a start cell so the whole word stays inside the grid, or None if
/// the word is too long for this direction.
fn random_start<R: Rng + ?Sized>(
    candidate: &Placement,
    len: usize,
    width: usize,
    height: usize,
    rng: &mut R,
) -> Option<Coord> {
    let (d_row, d_col) = candidate.signed_step();
    let row = random_axis_start(d_row, len, height, rng)?;
    let col = random_axis_start(d_col, len, width, rng)?;
    Some(Coord::new(row, col))
}

fn random_axis_start<R: Rng + ?Sized>(step: isize, len: usize, size: usize, rng: &mut R) -> Option<usize> {
    if len == 0 || (step != 0 && len > size) {
        return None;
    }
    let span = len - 1;
    let range = match step {
        0 => 0..size,
        s if s > 0 => 0..size - span,
        _ => span..size,
    };
    Some(rng.random_range(range))
}

/// Every cell on the path must be empty or already hold the same letter.
fn fits(cells: &[Option<char>], width: usize, candidate: &Placement, letters: &[char]) -> bool {
    let path = candidate.cells();
    path.len() == letters.len()
        && path
            .iter()
            .zip(letters)
            .all(|(coord, letter)| match cells[coord.row * width + coord.col] {
                None => true,
                Some(existing) => existing == *letter,
            })
}

fn random_filler<R: Rng + ?Sized>(rng: &mut R) -> char {
    FILLER_ALPHABET[rng.random_range(0..FILLER_ALPHABET.len())]
}
