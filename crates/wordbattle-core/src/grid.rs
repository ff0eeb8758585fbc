//! The shared letter grid.

use wordbattle_protocol::RejectReason;

/// A fixed-size matrix of letters.
///
/// Cells only ever go from empty to filled. There is no way to clear or
/// overwrite one, which is what makes a full grid a terminal condition.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<char>>,
    filled: usize,
}

impl Grid {
    /// Creates an empty grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
            filled: 0,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Fills one empty cell and returns the stored (uppercased) letter.
    ///
    /// # Errors
    ///
    /// - [`RejectReason::OutOfBounds`] if the coordinate is off the grid.
    /// - [`RejectReason::CellOccupied`] if the cell already holds a letter.
    /// - [`RejectReason::InvalidLetter`] if `letter` is not ASCII A-Z.
    pub fn place_letter(&mut self, row: i32, col: i32, letter: char) -> Result<char, RejectReason> {
        let index = self.index(row, col).ok_or(RejectReason::OutOfBounds)?;
        if self.cells[index].is_some() {
            return Err(RejectReason::CellOccupied);
        }
        if !letter.is_ascii_alphabetic() {
            return Err(RejectReason::InvalidLetter);
        }

        let stored = letter.to_ascii_uppercase();
        self.cells[index] = Some(stored);
        self.filled += 1;
        Ok(stored)
    }

    /// The letter at a coordinate. Off-grid coordinates read as empty.
    pub fn get_letter(&self, row: i32, col: i32) -> Option<char> {
        self.index(row, col).and_then(|i| self.cells[i])
    }

    /// Returns `true` once no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.filled == self.cells.len()
    }

    /// Number of filled cells.
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Row-major copy of every cell, for state snapshots.
    pub fn to_rows(&self) -> Vec<Vec<Option<char>>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.cells.chunks(self.cols).map(<[_]>::to_vec).collect()
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }
}
