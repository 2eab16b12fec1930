use std::fmt;
use std::time::Duration;

use pathfinding::prelude::bfs;

use crate::algorithms::common::{SearchOutcome, SearchStatus};
use crate::algorithms::Algorithm;
use crate::grid::{Grid, Position};

/// Shortest path length in moves, computed by breadth-first search straight
/// from the blocked cells (independent of neighbor caches).
pub fn bfs_path_len(grid: &Grid, start: Position, end: Position) -> Option<usize> {
    let rows = grid.rows();
    let passable = |p: &Position| grid.cell(*p).map(|c| !c.is_blocked()).unwrap_or(false);
    let successors = |p: &Position| {
        let p = *p;
        let mut next = Vec::with_capacity(4);
        if p.row + 1 < rows {
            next.push(Position::new(p.row + 1, p.col));
        }
        if p.row > 0 {
            next.push(Position::new(p.row - 1, p.col));
        }
        if p.col + 1 < rows {
            next.push(Position::new(p.row, p.col + 1));
        }
        if p.col > 0 {
            next.push(Position::new(p.row, p.col - 1));
        }
        next.retain(|n| passable(n));
        next
    };

    bfs(&start, successors, |p| *p == end).map(|path| path.len() - 1)
}

#[derive(Debug, Clone)]
pub struct Statistics {
    pub algorithm: Algorithm,
    pub status: SearchStatus,
    pub steps: usize,
    pub opened: usize,
    pub path_len: Option<usize>,
    pub optimal_path_len: Option<usize>,
    pub grid_cells: usize,
    pub elapsed: Duration,
}

impl Statistics {
    pub fn new(
        algorithm: Algorithm,
        outcome: &SearchOutcome,
        optimal_path_len: Option<usize>,
        grid_cells: usize,
        elapsed: Duration,
    ) -> Self {
        Statistics {
            algorithm,
            status: outcome.status,
            steps: outcome.steps(),
            opened: outcome.opened,
            path_len: outcome.path_len(),
            optimal_path_len,
            grid_cells,
            elapsed,
        }
    }

    /// Fraction of the grid that was expanded.
    pub fn exploration_ratio(&self) -> f64 {
        if self.grid_cells == 0 {
            0.0
        } else {
            self.steps as f64 / self.grid_cells as f64
        }
    }

    /// Whether the found path is as short as the breadth-first reference.
    pub fn is_optimal(&self) -> bool {
        matches!((self.path_len, self.optimal_path_len), (Some(a), Some(b)) if a == b)
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm: {}", self.algorithm)?;
        writeln!(f, "Result: {:?}", self.status)?;
        writeln!(f, "Expanded cells: {}", self.steps)?;
        writeln!(f, "Opened cells: {}", self.opened)?;
        writeln!(
            f,
            "Exploration: {:.1}% of {} cells",
            self.exploration_ratio() * 100.0,
            self.grid_cells
        )?;
        match self.path_len {
            Some(len) => writeln!(f, "Path length: {}", len)?,
            None => writeln!(f, "Path length: -")?,
        }
        match self.optimal_path_len {
            Some(len) => writeln!(f, "Optimal path length (BFS): {}", len)?,
            None => writeln!(f, "Optimal path length (BFS): unreachable")?,
        }
        writeln!(f, "Search time: {:.2?}", self.elapsed)?;

        if self.path_len.is_some() && !self.is_optimal() {
            writeln!(f, "⚠ Path is longer than the BFS reference")?;
        }
        Ok(())
    }
}
