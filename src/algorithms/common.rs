use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::ops::ControlFlow;

use crate::error::{Error, RequestProblem, Result};
use crate::grid::{Grid, Position};

/// Receives a consistent view of the grid after every search step.
///
/// Returning [`ControlFlow::Break`] cancels the search; the engine returns
/// [`SearchStatus::Cancelled`] and leaves the grid marks as they are.
pub trait StepObserver {
    fn on_step(&mut self, grid: &Grid) -> ControlFlow<()>;
}

impl<F> StepObserver for F
where
    F: FnMut(&Grid) -> ControlFlow<()>,
{
    fn on_step(&mut self, grid: &Grid) -> ControlFlow<()> {
        self(grid)
    }
}

/// Observer for headless runs.
pub struct NoOpObserver;

impl StepObserver for NoOpObserver {
    fn on_step(&mut self, _grid: &Grid) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

pub trait SearchAlgorithm {
    fn name(&self) -> &'static str;

    /// Searches for a shortest path from `start` to `end`, marking cells on
    /// `grid` as they are opened, closed and finally put on the path.
    fn run(
        &self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        observer: &mut dyn StepObserver,
    ) -> Result<SearchOutcome>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of expansions before giving up.
    pub max_steps: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Found,
    NoPath,
    /// The observer asked to stop.
    Cancelled,
    /// The step budget ran out.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub status: SearchStatus,
    /// Full path including both endpoints; empty unless found.
    pub path: Vec<Position>,
    pub cost: Option<u32>,
    /// Cells in the order they were expanded.
    pub expanded: Vec<Position>,
    /// Number of cells moved into the frontier.
    pub opened: usize,
}

impl SearchOutcome {
    pub fn found(&self) -> bool {
        self.status == SearchStatus::Found
    }

    /// Number of expansions (observer notifications during the search phase).
    pub fn steps(&self) -> usize {
        self.expanded.len()
    }

    /// Path length in moves.
    pub fn path_len(&self) -> Option<usize> {
        self.found().then(|| self.path.len().saturating_sub(1))
    }
}

/// Bookkeeping shared by both variants while a run is in progress.
#[derive(Debug, Default)]
pub(crate) struct SearchTrace {
    pub expanded: Vec<Position>,
    pub opened: usize,
}

impl SearchTrace {
    pub fn finish(self, status: SearchStatus) -> SearchOutcome {
        SearchOutcome {
            status,
            path: Vec::new(),
            cost: None,
            expanded: self.expanded,
            opened: self.opened,
        }
    }

    pub fn found(self, path: Vec<Position>, cost: u32) -> SearchOutcome {
        SearchOutcome {
            status: SearchStatus::Found,
            path,
            cost: Some(cost),
            expanded: self.expanded,
            opened: self.opened,
        }
    }

    pub fn budget_spent(&self, options: &SearchOptions) -> bool {
        options
            .max_steps
            .is_some_and(|limit| self.expanded.len() >= limit)
    }
}

/// Rejects unsearchable requests and brings neighbor caches up to date.
pub(crate) fn prepare_search(grid: &mut Grid, start: Position, end: Position) -> Result<()> {
    let rejected = |problem: RequestProblem| -> Result<()> {
        tracing::warn!(%start, %end, %problem, "rejecting search request");
        Err(Error::InvalidSearchRequest(problem))
    };

    let start_blocked = grid.cell(start)?.is_blocked();
    let end_blocked = grid.cell(end)?.is_blocked();
    if start == end {
        return rejected(RequestProblem::SameEndpoints(start));
    }
    if start_blocked {
        return rejected(RequestProblem::BlockedStart(start));
    }
    if end_blocked {
        return rejected(RequestProblem::BlockedEnd(end));
    }

    if grid.neighbors_stale() {
        grid.refresh_neighbors();
    }
    grid.cell_unchecked_mut(start).set_start();
    Ok(())
}

/// Priority queue entry. Ordered by `(key, seq)` and reversed so that
/// `BinaryHeap` pops the smallest key first, oldest first among equal keys.
struct Entry<T> {
    key: u32,
    seq: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-priority queue with FIFO ordering among equal keys.
pub(crate) struct Frontier<T> {
    heap: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> Frontier<T> {
    pub fn new() -> Self {
        Frontier {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, key: u32, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { key, seq, item });
    }

    pub fn pop(&mut self) -> Option<(u32, T)> {
        self.heap.pop().map(|entry| (entry.key, entry.item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontier_pops_lowest_key_first() {
        let mut frontier = Frontier::new();
        frontier.push(5, 'a');
        frontier.push(1, 'b');
        frontier.push(3, 'c');
        assert_eq!(frontier.pop(), Some((1, 'b')));
        assert_eq!(frontier.pop(), Some((3, 'c')));
        assert_eq!(frontier.pop(), Some((5, 'a')));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn frontier_is_fifo_among_equal_keys() {
        let mut frontier = Frontier::new();
        for item in ["first", "second", "third", "fourth"] {
            frontier.push(7, item);
        }
        frontier.push(2, "urgent");

        let order: Vec<_> = std::iter::from_fn(|| frontier.pop().map(|(_, item)| item)).collect();
        assert_eq!(order, ["urgent", "first", "second", "third", "fourth"]);
    }

    #[test]
    fn prepare_rejects_same_endpoints() {
        let mut grid = Grid::new(3, 1).unwrap();
        let p = Position::new(1, 1);
        assert!(matches!(
            prepare_search(&mut grid, p, p),
            Err(Error::InvalidSearchRequest(RequestProblem::SameEndpoints(_)))
        ));
    }

    #[test]
    fn prepare_rejects_blocked_endpoints() {
        let mut grid = Grid::new(3, 1).unwrap();
        grid.cell_at_mut(2, 2).unwrap().set_blocked();
        assert!(matches!(
            prepare_search(&mut grid, Position::new(0, 0), Position::new(2, 2)),
            Err(Error::InvalidSearchRequest(RequestProblem::BlockedEnd(_)))
        ));
        assert!(matches!(
            prepare_search(&mut grid, Position::new(2, 2), Position::new(0, 0)),
            Err(Error::InvalidSearchRequest(RequestProblem::BlockedStart(_)))
        ));
    }

    #[test]
    fn prepare_rejects_out_of_bounds() {
        let mut grid = Grid::new(3, 1).unwrap();
        assert!(matches!(
            prepare_search(&mut grid, Position::new(0, 0), Position::new(3, 0)),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn prepare_refreshes_stale_neighbors() {
        let mut grid = Grid::new(3, 1).unwrap();
        grid.cell_at_mut(0, 1).unwrap().set_blocked();
        prepare_search(&mut grid, Position::new(0, 0), Position::new(2, 2)).unwrap();
        assert!(!grid.neighbors_stale());
        assert_eq!(grid.cell_at(0, 0).unwrap().neighbors(), &[Position::new(1, 0)]);
        assert!(grid.cell_at(0, 0).unwrap().is_start());
    }
}
