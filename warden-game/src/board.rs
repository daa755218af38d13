/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Every triple of cell indices that wins the game: 3 rows, 3 columns, 2 diagonals.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// One of the two symbols a participant places. `A` always moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mark {
    A,
    B,
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Mark::A => Mark::B,
            Mark::B => Mark::A,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Mark::A => "X",
            Mark::B => "O",
        }
    }
}

/// A 3x3 grid stored row-major; `None` is an empty cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Mark>; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Option<Mark>; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Option<Mark>; CELL_COUNT] {
        &self.cells
    }

    /// Returns `None` for an out-of-range index, `Some(None)` for an empty cell.
    pub fn cell(&self, index: usize) -> Option<Option<Mark>> {
        self.cells.get(index).copied()
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        matches!(self.cell(index), Some(None))
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|cell| **cell == Some(mark)).count()
    }

    /// The mark holding a complete winning line, if any.
    pub fn winner(&self) -> Option<Mark> {
        WINNING_LINES.iter().find_map(|[a, b, c]| {
            let first = self.cells[*a]?;
            (self.cells[*b] == Some(first) && self.cells[*c] == Some(first)).then_some(first)
        })
    }

    /// The winning line itself, used to highlight the result.
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        WINNING_LINES.iter().copied().find(|[a, b, c]| {
            self.cells[*a].is_some()
                && self.cells[*a] == self.cells[*b]
                && self.cells[*b] == self.cells[*c]
        })
    }

    pub(crate) fn place(&mut self, index: usize, mark: Mark) {
        self.cells[index] = Some(mark);
    }
}

#[cfg(test)]
mod tests {
    use super::{Board, Mark};

    const A: Option<Mark> = Some(Mark::A);
    const B: Option<Mark> = Some(Mark::B);
    const E: Option<Mark> = None;

    #[test]
    fn detects_every_line_kind() {
        let row = Board::from_cells([E, E, E, B, B, B, E, E, E]);
        assert_eq!(row.winner(), Some(Mark::B));
        assert_eq!(row.winning_line(), Some([3, 4, 5]));

        let column = Board::from_cells([A, E, E, A, E, E, A, E, E]);
        assert_eq!(column.winner(), Some(Mark::A));

        let diagonal = Board::from_cells([E, E, A, E, A, E, A, E, E]);
        assert_eq!(diagonal.winner(), Some(Mark::A));
        assert_eq!(diagonal.winning_line(), Some([2, 4, 6]));
    }

    #[test]
    fn full_board_without_line_has_no_winner() {
        let board = Board::from_cells([A, B, A, A, B, B, B, A, A]);
        assert!(board.is_full());
        assert_eq!(board.winner(), None);
        assert_eq!(board.winning_line(), None);
    }

    #[test]
    fn cell_lookup_distinguishes_range_and_emptiness() {
        let board = Board::from_cells([A, E, E, E, E, E, E, E, E]);
        assert_eq!(board.cell(0), Some(A));
        assert_eq!(board.cell(1), Some(None));
        assert_eq!(board.cell(9), None);
        assert!(board.is_empty_at(1));
        assert!(!board.is_empty_at(0));
        assert!(!board.is_empty_at(42));
    }

    #[test]
    fn counts_marks() {
        let board = Board::from_cells([A, B, A, E, E, E, E, E, E]);
        assert_eq!(board.count(Mark::A), 2);
        assert_eq!(board.count(Mark::B), 1);
        assert_eq!(Mark::A.other(), Mark::B);
        assert_eq!(Mark::B.symbol(), "O");
    }
}
