//! Reading a player's selection back out of the grid
//!
//! A selection is a start/end cell pair. Straight lines (row, column or
//! exact diagonal) yield the letters between them; anything else is a
//! "bent" selection and yields nothing. This runs on every cursor move, so
//! bent lines are an ordinary outcome, not an error.

use super::{Coord, Grid};

/// Raised when a selection endpoint lies outside the grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("selection endpoint {coord} is outside the grid")]
    OutOfBounds { coord: Coord },
}

/// Cells from `start` to `end` inclusive, or None if they do not form a
/// straight line.
pub fn line_cells(start: Coord, end: Coord) -> Option<Vec<Coord>> {
    let d_row = end.row as isize - start.row as isize;
    let d_col = end.col as isize - start.col as isize;

    if d_row != 0 && d_col != 0 && d_row.abs() != d_col.abs() {
        return None;
    }

    let steps = d_row.abs().max(d_col.abs());
    let step = (d_row.signum(), d_col.signum());
    Some(
        (0..=steps)
            .map(|i| {
                Coord::new(
                    (start.row as isize + step.0 * i) as usize,
                    (start.col as isize + step.1 * i) as usize,
                )
            })
            .collect(),
    )
}

/// Letters along the straight line from `start` to `end`.
///
/// Returns `Ok(None)` for a bent selection.
pub fn extract_line(grid: &Grid, start: Coord, end: Coord) -> Result<Option<String>, SelectionError> {
    for coord in [start, end] {
        if !grid.contains(coord) {
            return Err(SelectionError::OutOfBounds { coord });
        }
    }

    Ok(line_cells(start, end).map(|cells| cells.iter().filter_map(|c| grid.get(*c)).collect()))
}

/// Whether a selected line spells `word` forwards or backwards.
pub fn matches_word(line: &str, word: &str) -> bool {
    line == word || line.chars().rev().eq(word.chars())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn fixture() -> Grid {
        let text = indoc! {"
            FOIXQ
            AMOUR
            PAIXÉ
            JOIEZ
        "};
        let rows: Vec<&str> = text.lines().collect();
        Grid::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_horizontal_line() {
        let grid = fixture();
        assert_eq!(
            extract_line(&grid, Coord::new(1, 0), Coord::new(1, 4)),
            Ok(Some("AMOUR".to_string()))
        );
    }

    #[test]
    fn test_vertical_line() {
        let grid = fixture();
        assert_eq!(
            extract_line(&grid, Coord::new(0, 0), Coord::new(3, 0)),
            Ok(Some("FAPJ".to_string()))
        );
    }

    #[test]
    fn test_diagonal_lines() {
        let grid = fixture();
        assert_eq!(
            extract_line(&grid, Coord::new(0, 0), Coord::new(3, 3)),
            Ok(Some("FMIE".to_string()))
        );
        // Diagonal-up: row decreases while column increases.
        assert_eq!(
            extract_line(&grid, Coord::new(3, 0), Coord::new(0, 3)),
            Ok(Some("JAOX".to_string()))
        );
    }

    #[test]
    fn test_single_cell_selection() {
        let grid = fixture();
        assert_eq!(
            extract_line(&grid, Coord::new(2, 4), Coord::new(2, 4)),
            Ok(Some("É".to_string()))
        );
    }

    #[test]
    fn test_reversal_symmetry() {
        let grid = fixture();
        let pairs = [
            (Coord::new(1, 0), Coord::new(1, 4)),
            (Coord::new(0, 4), Coord::new(3, 4)),
            (Coord::new(0, 1), Coord::new(2, 3)),
            (Coord::new(3, 1), Coord::new(1, 3)),
        ];
        for (a, b) in pairs {
            let forward = extract_line(&grid, a, b).unwrap().unwrap();
            let backward = extract_line(&grid, b, a).unwrap().unwrap();
            assert_eq!(forward.chars().rev().collect::<String>(), backward);
        }
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let grid = fixture();
        let a = extract_line(&grid, Coord::new(0, 0), Coord::new(0, 2));
        let b = extract_line(&grid, Coord::new(0, 0), Coord::new(0, 2));
        assert_eq!(a, b);
        assert_eq!(a, Ok(Some("FOI".to_string())));
    }

    #[test]
    fn test_bent_selection_rejected() {
        let grid = fixture();
        assert_eq!(extract_line(&grid, Coord::new(0, 0), Coord::new(1, 2)), Ok(None));
        assert_eq!(extract_line(&grid, Coord::new(3, 4), Coord::new(0, 2)), Ok(None));
        assert!(line_cells(Coord::new(0, 0), Coord::new(2, 1)).is_none());
    }

    #[test]
    fn test_out_of_bounds_is_error() {
        let grid = fixture();
        assert_eq!(
            extract_line(&grid, Coord::new(0, 0), Coord::new(0, 5)),
            Err(SelectionError::OutOfBounds {
                coord: Coord::new(0, 5)
            })
        );
        assert!(extract_line(&grid, Coord::new(4, 0), Coord::new(0, 0)).is_err());
    }

    #[test]
    fn test_matches_word_both_ways() {
        assert!(matches_word("AMOUR", "AMOUR"));
        assert!(matches_word("RUOMA", "AMOUR"));
        assert!(!matches_word("AMOU", "AMOUR"));
        assert!(matches_word("ÉCARG", "GRACÉ"));
    }
}
