use std::ops::ControlFlow;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::algorithms::common::{
    prepare_search, Frontier, SearchAlgorithm, SearchOptions, SearchOutcome, SearchStatus,
    SearchTrace, StepObserver,
};
use crate::algorithms::heuristic::manhattan;
use crate::algorithms::reconstruct::mark_predecessors;
use crate::error::Result;
use crate::grid::{Grid, Position};

/// A* guided by the Manhattan distance to the goal.
#[derive(Debug, Clone, Default)]
pub struct AStar {
    options: SearchOptions,
}

impl AStar {
    pub fn new() -> Self {
        AStar::default()
    }

    pub fn with_options(options: SearchOptions) -> Self {
        AStar { options }
    }
}

impl SearchAlgorithm for AStar {
    fn name(&self) -> &'static str {
        "a_star"
    }

    /// Expands cells in `(best_cost + estimate, insertion order)` order.
    ///
    /// A cell whose cost improves while it is still queued gets a fresh
    /// entry; the outdated one is skipped when it surfaces.
    fn run(
        &self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        observer: &mut dyn StepObserver,
    ) -> Result<SearchOutcome> {
        prepare_search(grid, start, end)?;
        tracing::debug!(algorithm = self.name(), %start, %end, "search started");

        let mut best_cost: FxHashMap<Position, u32> = FxHashMap::default();
        let mut came_from: FxHashMap<Position, Position> = FxHashMap::default();
        let mut in_frontier: FxHashSet<Position> = FxHashSet::default();
        let mut frontier = Frontier::new();
        let mut trace = SearchTrace::default();

        best_cost.insert(start, 0);
        frontier.push(manhattan(start, end), start);
        in_frontier.insert(start);

        while let Some((estimated_total, current)) = frontier.pop() {
            let cost = best_cost[&current];
            if estimated_total > cost + manhattan(current, end) {
                continue;
            }
            in_frontier.remove(&current);

            if current == end {
                grid.cell_unchecked_mut(end).set_end();
                let ControlFlow::Continue(path) =
                    mark_predecessors(grid, &came_from, start, end, observer)
                else {
                    tracing::debug!(algorithm = self.name(), "cancelled during reconstruction");
                    return Ok(trace.finish(SearchStatus::Cancelled));
                };
                tracing::debug!(
                    algorithm = self.name(),
                    cost,
                    steps = trace.expanded.len(),
                    "path found"
                );
                return Ok(trace.found(path, cost));
            }

            if trace.budget_spent(&self.options) {
                tracing::debug!(algorithm = self.name(), "step budget exhausted");
                return Ok(trace.finish(SearchStatus::Exhausted));
            }
            trace.expanded.push(current);

            let candidate = cost + 1;
            let neighbors = grid.cell_unchecked(current).neighbors().to_vec();
            for neighbor in neighbors {
                if candidate >= best_cost.get(&neighbor).copied().unwrap_or(u32::MAX) {
                    continue;
                }
                came_from.insert(neighbor, current);
                best_cost.insert(neighbor, candidate);
                let estimate = candidate + manhattan(neighbor, end);

                frontier.push(estimate, neighbor);
                if in_frontier.insert(neighbor) {
                    grid.cell_unchecked_mut(neighbor).set_open();
                    trace.opened += 1;
                }
            }

            if observer.on_step(grid).is_break() {
                tracing::debug!(algorithm = self.name(), "cancelled by observer");
                return Ok(trace.finish(SearchStatus::Cancelled));
            }

            if current != start {
                grid.cell_unchecked_mut(current).set_closed();
            }
        }

        tracing::debug!(algorithm = self.name(), steps = trace.expanded.len(), "no path");
        Ok(trace.finish(SearchStatus::NoPath))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::common::NoOpObserver;
    use crate::grid::CellState;

    fn open_grid(rows: usize) -> Grid {
        let mut grid = Grid::new(rows, 1).unwrap();
        grid.refresh_neighbors();
        grid
    }

    #[test]
    fn finds_manhattan_path_on_open_grid() {
        let mut grid = open_grid(5);
        let outcome = AStar::new()
            .run(&mut grid, Position::new(0, 0), Position::new(4, 4), &mut NoOpObserver)
            .unwrap();

        assert!(outcome.found());
        assert_eq!(outcome.path_len(), Some(8));
        assert_eq!(outcome.cost, Some(8));
        assert!(outcome.steps() <= 25);
        assert_eq!(grid.count(CellState::Path), 7);
        assert!(grid.cell_at(4, 4).unwrap().is_end());
        assert!(grid.cell_at(0, 0).unwrap().is_start());
    }

    #[test]
    fn adjacent_endpoints_need_one_expansion() {
        let mut grid = open_grid(5);
        let mut frames = 0;
        let outcome = AStar::new()
            .run(&mut grid, Position::new(2, 2), Position::new(2, 3), &mut |_: &Grid| {
                frames += 1;
                ControlFlow::Continue(())
            })
            .unwrap();

        assert!(outcome.found());
        assert_eq!(outcome.path, vec![Position::new(2, 2), Position::new(2, 3)]);
        assert_eq!(outcome.expanded, vec![Position::new(2, 2)]);
        assert_eq!(frames, 1);
        assert_eq!(grid.count(CellState::Closed), 0);
        assert_eq!(grid.count(CellState::Path), 0);
    }

    #[test]
    fn start_is_never_closed() {
        let mut grid = open_grid(4);
        AStar::new()
            .run(&mut grid, Position::new(0, 0), Position::new(3, 3), &mut NoOpObserver)
            .unwrap();
        assert_eq!(grid.cell_at(0, 0).unwrap().state(), CellState::Start);
    }

    #[test]
    fn walled_off_goal_reports_no_path() {
        let mut grid = Grid::new(5, 1).unwrap();
        for pos in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            grid.cell_at_mut(pos.0, pos.1).unwrap().set_blocked();
        }
        let outcome = AStar::new()
            .run(&mut grid, Position::new(0, 0), Position::new(2, 2), &mut NoOpObserver)
            .unwrap();

        assert_eq!(outcome.status, SearchStatus::NoPath);
        assert!(outcome.path.is_empty());
        assert_eq!(grid.count(CellState::Path), 0);
    }

    #[test]
    fn step_budget_stops_the_search() {
        let mut grid = open_grid(10);
        let outcome = AStar::with_options(SearchOptions { max_steps: Some(3) })
            .run(&mut grid, Position::new(0, 0), Position::new(9, 9), &mut NoOpObserver)
            .unwrap();
        assert_eq!(outcome.status, SearchStatus::Exhausted);
        assert_eq!(outcome.steps(), 3);
    }

    #[test]
    fn observer_can_cancel() {
        let mut grid = open_grid(10);
        let mut frames = 0;
        let outcome = AStar::new()
            .run(&mut grid, Position::new(0, 0), Position::new(9, 9), &mut |_: &Grid| {
                frames += 1;
                if frames == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();

        assert_eq!(outcome.status, SearchStatus::Cancelled);
        assert_eq!(outcome.steps(), 2);
        assert_eq!(grid.count(CellState::Path), 0);
        // The second expansion is not closed: cancellation happens before it.
        assert_eq!(grid.count(CellState::Closed), 0);
    }
}
