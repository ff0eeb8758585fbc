//! Geometry rules for word selections.
//!
//! A selection is a set of cells the player highlighted. The order they
//! were clicked in never matters: the word is read left to right or top to
//! bottom.

use wordbattle_protocol::{CellRef, RejectReason};

use crate::Grid;

/// All cells share one row, or all share one column.
///
/// An empty selection is not a line.
pub fn is_straight_line(cells: &[CellRef]) -> bool {
    let Some(first) = cells.first() else {
        return false;
    };
    cells.iter().all(|c| c.row == first.row) || cells.iter().all(|c| c.col == first.col)
}

/// After sorting by row then column, each neighbour is exactly one step
/// away. Repeated cells count as a gap.
pub fn is_continuous(cells: &[CellRef]) -> bool {
    let mut sorted = cells.to_vec();
    sorted.sort_by_key(|c| (c.row, c.col));
    sorted.windows(2).all(|pair| {
        // Coordinates come off the wire unchecked, so any i32 is possible.
        let dr = u64::from(pair[1].row.abs_diff(pair[0].row));
        let dc = u64::from(pair[1].col.abs_diff(pair[0].col));
        dr + dc == 1
    })
}

/// Reads the letters under a selection in direction of travel.
///
/// Returns `None` if any selected cell is empty or off the grid.
pub fn build_word(cells: &[CellRef], grid: &Grid) -> Option<String> {
    let horizontal = cells.first().is_some_and(|first| cells.iter().all(|c| c.row == first.row));

    let mut sorted = cells.to_vec();
    if horizontal {
        sorted.sort_by_key(|c| c.col);
    } else {
        sorted.sort_by_key(|c| c.row);
    }

    sorted.iter().map(|c| grid.get_letter(c.row, c.col)).collect()
}

/// Runs the geometry checks in order and returns the word on success.
pub fn read_selection(cells: &[CellRef], grid: &Grid) -> Result<String, RejectReason> {
    if !is_straight_line(cells) {
        return Err(RejectReason::NotStraightLine);
    }
    if !is_continuous(cells) {
        return Err(RejectReason::NotContinuous);
    }
    build_word(cells, grid).ok_or(RejectReason::EmptyCell)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(coords: &[(i32, i32)]) -> Vec<CellRef> {
        coords.iter().map(|&(r, c)| CellRef::new(r, c)).collect()
    }

    fn grid_with(word: &str, row: i32, col: i32, horizontal: bool) -> Grid {
        let mut grid = Grid::new(5, 5);
        for (i, ch) in word.chars().enumerate() {
            let i = i as i32;
            let (r, c) = if horizontal { (row, col + i) } else { (row + i, col) };
            grid.place_letter(r, c, ch).unwrap();
        }
        grid
    }

    #[test]
    fn test_is_straight_line() {
        assert!(is_straight_line(&cells(&[(0, 0), (0, 1), (0, 2)])));
        assert!(is_straight_line(&cells(&[(0, 3), (1, 3)])));
        assert!(is_straight_line(&cells(&[(4, 4)])));
        assert!(!is_straight_line(&cells(&[(0, 0), (1, 1)])));
        assert!(!is_straight_line(&[]));
    }

    #[test]
    fn test_is_continuous_detects_gaps() {
        assert!(is_continuous(&cells(&[(0, 2), (0, 0), (0, 1)])));
        assert!(!is_continuous(&cells(&[(0, 0), (0, 2)])));
        assert!(!is_continuous(&cells(&[(1, 1), (1, 1)])));
    }

    #[test]
    fn test_is_continuous_extreme_coordinates_are_a_gap() {
        assert!(!is_continuous(&cells(&[(0, i32::MIN), (0, i32::MAX)])));
        assert!(!is_continuous(&cells(&[(i32::MIN, 0), (i32::MAX, 0)])));
        assert!(is_continuous(&cells(&[(0, i32::MAX - 1), (0, i32::MAX)])));
    }

    #[test]
    fn test_build_word_ignores_click_order() {
        let grid = grid_with("CAT", 0, 0, true);
        let word = build_word(&cells(&[(0, 2), (0, 0), (0, 1)]), &grid);
        assert_eq!(word.as_deref(), Some("CAT"));
    }

    #[test]
    fn test_build_word_vertical_reads_top_to_bottom() {
        let grid = grid_with("DOG", 1, 3, false);
        let word = build_word(&cells(&[(3, 3), (1, 3), (2, 3)]), &grid);
        assert_eq!(word.as_deref(), Some("DOG"));
    }

    #[test]
    fn test_build_word_with_empty_cell_is_none() {
        let grid = grid_with("CA", 0, 0, true);
        assert_eq!(build_word(&cells(&[(0, 0), (0, 1), (0, 2)]), &grid), None);
    }

    #[test]
    fn test_read_selection_reports_first_failure() {
        let grid = grid_with("CAT", 0, 0, true);
        assert_eq!(
            read_selection(&cells(&[(0, 0), (1, 1)]), &grid),
            Err(RejectReason::NotStraightLine)
        );
        assert_eq!(
            read_selection(&cells(&[(0, 0), (0, 2)]), &grid),
            Err(RejectReason::NotContinuous)
        );
        assert_eq!(
            read_selection(&cells(&[(0, 1), (0, 2), (0, 3)]), &grid),
            Err(RejectReason::EmptyCell)
        );
        assert_eq!(read_selection(&cells(&[(0, 0), (0, 1), (0, 2)]), &grid), Ok("CAT".into()));
    }
}
