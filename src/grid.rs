use std::fmt;

use crate::error::{Error, Result};

/// Row/column address of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position { row, col }
    }
}

/// Traversal state of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Unvisited,
    /// Sitting in a search frontier.
    Open,
    /// Expanded and finalized by a search.
    Closed,
    Blocked,
    Start,
    End,
    Path,
}

/// Down, up, right, left.
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Debug, Clone)]
pub struct Cell {
    position: Position,
    state: CellState,
    neighbors: Vec<Position>,
}

impl Cell {
    fn new(position: Position) -> Self {
        Cell {
            position,
            state: CellState::Unvisited,
            neighbors: Vec::new(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    /// Passable neighbors as of the last [`Grid::refresh_neighbors`].
    pub fn neighbors(&self) -> &[Position] {
        &self.neighbors
    }

    pub fn is_blocked(&self) -> bool {
        self.state == CellState::Blocked
    }

    pub fn is_start(&self) -> bool {
        self.state == CellState::Start
    }

    pub fn is_end(&self) -> bool {
        self.state == CellState::End
    }

    pub fn set_blocked(&mut self) {
        self.state = CellState::Blocked;
    }

    pub fn set_start(&mut self) {
        self.state = CellState::Start;
    }

    pub fn set_end(&mut self) {
        self.state = CellState::End;
    }

    pub fn reset(&mut self) {
        self.state = CellState::Unvisited;
    }

    pub(crate) fn set_open(&mut self) {
        self.state = CellState::Open;
    }

    pub(crate) fn set_closed(&mut self) {
        self.state = CellState::Closed;
    }

    pub(crate) fn set_path(&mut self) {
        self.state = CellState::Path;
    }
}

/// Square grid of cells stored row-major.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cell_size: usize,
    cells: Vec<Cell>,
    neighbors_stale: bool,
}

impl Grid {
    /// Allocates `rows` x `rows` unvisited cells. `cell_size` is the width of
    /// one cell on whatever surface the grid is drawn to.
    pub fn new(rows: usize, cell_size: usize) -> Result<Self> {
        if rows == 0 {
            return Err(Error::InvalidGridSize { rows });
        }

        let cells = (0..rows)
            .flat_map(|row| (0..rows).map(move |col| Cell::new(Position { row, col })))
            .collect();

        Ok(Grid {
            rows,
            cell_size: cell_size.max(1),
            cells,
            neighbors_stale: true,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.rows
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Result<&Cell> {
        let idx = self.checked_index(row, col)?;
        Ok(&self.cells[idx])
    }

    /// Mutable access to a cell. Any mutable access may change which cells
    /// are blocked, so neighbor caches are marked stale.
    pub fn cell_at_mut(&mut self, row: usize, col: usize) -> Result<&mut Cell> {
        let idx = self.checked_index(row, col)?;
        self.neighbors_stale = true;
        Ok(&mut self.cells[idx])
    }

    pub fn cell(&self, pos: Position) -> Result<&Cell> {
        self.cell_at(pos.row, pos.col)
    }

    pub fn cell_mut(&mut self, pos: Position) -> Result<&mut Cell> {
        self.cell_at_mut(pos.row, pos.col)
    }

    /// Maps a point on the drawing surface to the cell under it.
    /// The x axis selects the row and the y axis the column.
    pub fn position_at_point(&self, x: usize, y: usize) -> Result<Position> {
        let pos = Position {
            row: x / self.cell_size,
            col: y / self.cell_size,
        };
        self.checked_index(pos.row, pos.col)?;
        Ok(pos)
    }

    /// Whether any cell may have changed since the last neighbor refresh.
    pub fn neighbors_stale(&self) -> bool {
        self.neighbors_stale
    }

    /// Recomputes every cell's 4-directional passable neighbor list.
    pub fn refresh_neighbors(&mut self) {
        for idx in 0..self.cells.len() {
            let neighbors = self.passable_neighbors(self.cells[idx].position);
            self.cells[idx].neighbors = neighbors;
        }
        self.neighbors_stale = false;
        tracing::trace!(rows = self.rows, "refreshed neighbor caches");
    }

    /// Drops the marks left by a previous search, keeping walls and endpoints.
    pub fn clear_search_marks(&mut self) {
        for cell in &mut self.cells {
            if matches!(
                cell.state,
                CellState::Open | CellState::Closed | CellState::Path
            ) {
                cell.state = CellState::Unvisited;
            }
        }
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state == state).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Cells of one row, left to right.
    pub fn row_cells(&self, row: usize) -> Result<&[Cell]> {
        if row >= self.rows {
            return Err(Error::OutOfBounds {
                row,
                col: 0,
                rows: self.rows,
            });
        }
        let start = row * self.rows;
        Ok(&self.cells[start..start + self.rows])
    }

    /// Positions of all blocked cells, row-major.
    pub fn blocked(&self) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|c| c.is_blocked())
            .map(Cell::position)
            .collect()
    }

    /// Cell access for positions already validated by the caller; does not
    /// invalidate neighbor caches.
    pub(crate) fn cell_unchecked(&self, pos: Position) -> &Cell {
        &self.cells[pos.row * self.rows + pos.col]
    }

    pub(crate) fn cell_unchecked_mut(&mut self, pos: Position) -> &mut Cell {
        &mut self.cells[pos.row * self.rows + pos.col]
    }

    fn checked_index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.rows {
            return Err(Error::OutOfBounds {
                row,
                col,
                rows: self.rows,
            });
        }
        Ok(row * self.rows + col)
    }

    fn passable_neighbors(&self, pos: Position) -> Vec<Position> {
        DIRECTIONS
            .iter()
            .filter_map(|&(dr, dc)| {
                let row = pos.row.checked_add_signed(dr)?;
                let col = pos.col.checked_add_signed(dc)?;
                let next = Position { row, col };
                self.contains(next).then_some(next)
            })
            .filter(|&next| !self.cell_unchecked(next).is_blocked())
            .collect()
    }
}
