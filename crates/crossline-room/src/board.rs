//! The 3×3 board: cell storage, move rules, and win/draw evaluation.

use crossline_protocol::Mark;

use crate::MoveError;

/// Number of cells on the board.
pub const CELLS: usize = 9;

/// Every line that wins: rows, then columns, then diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Marked(Mark),
}

impl Cell {
    fn symbol(self) -> char {
        match self {
            Self::Empty => '-',
            Self::Marked(Mark::X) => 'X',
            Self::Marked(Mark::O) => 'O',
        }
    }
}

/// Nine cells indexed 0–8, left-to-right then top-to-bottom.
///
/// A cell only ever goes from `Empty` to a mark; the only way back is
/// [`reset`](Board::reset).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: [Cell; CELLS],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `mark` at `position`.
    ///
    /// The position is taken as a signed integer so that anything a player
    /// types, including negatives, gets a precise rejection.
    ///
    /// # Errors
    /// - [`MoveError::InvalidMove`] if `position` is outside 0–8.
    /// - [`MoveError::CellOccupied`] if the cell already holds a mark.
    ///
    /// The board is untouched on error.
    pub fn apply(&mut self, position: i64, mark: Mark) -> Result<(), MoveError> {
        let index = usize::try_from(position)
            .ok()
            .filter(|i| *i < CELLS)
            .ok_or(MoveError::InvalidMove(position))?;

        match self.cells[index] {
            Cell::Empty => {
                self.cells[index] = Cell::Marked(mark);
                Ok(())
            }
            Cell::Marked(_) => Err(MoveError::CellOccupied(index)),
        }
    }

    /// Returns the mark on the first complete line, if any.
    ///
    /// Lines are checked rows first, then columns, then diagonals. A board
    /// reached by legal alternating play can have at most one winner, but a
    /// board with two complete lines still gets a deterministic answer.
    pub fn winner(&self) -> Option<Mark> {
        LINES.iter().find_map(|&[a, b, c]| match self.cells[a] {
            Cell::Marked(mark)
                if self.cells[b] == self.cells[a]
                    && self.cells[c] == self.cells[a] =>
            {
                Some(mark)
            }
            _ => None,
        })
    }

    /// Returns `true` when no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Clears every cell.
    pub fn reset(&mut self) {
        self.cells = [Cell::Empty; CELLS];
    }

    /// Returns the cell at `index`, or `None` past the board.
    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Renders the board as three `a | b | c` rows, each ending in `\n`.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(CELLS * 4);
        for row in self.cells.chunks(3) {
            for (col, cell) in row.iter().enumerate() {
                if col > 0 {
                    out.push_str(" | ");
                }
                out.push(cell.symbol());
            }
            out.push('\n');
        }
        out
    }
}
