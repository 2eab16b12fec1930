//! Marking the winning path on the grid once a search reaches its goal.

use std::ops::ControlFlow;

use rustc_hash::FxHashMap;

use crate::algorithms::common::StepObserver;
use crate::grid::{Grid, Position};

/// Walks `came_from` backward from `end` to `start`, marking every cell in
/// between as path and notifying the observer after each one. Endpoints are
/// never marked, so a path of `n` cells produces `n - 2` frames.
///
/// Returns the full path `start..=end`, or `Break` if the observer cancelled.
pub(crate) fn mark_predecessors(
    grid: &mut Grid,
    came_from: &FxHashMap<Position, Position>,
    start: Position,
    end: Position,
    observer: &mut dyn StepObserver,
) -> ControlFlow<(), Vec<Position>> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        let Some(&previous) = came_from.get(&current) else {
            break;
        };
        current = previous;
        path.push(current);
        if current != start {
            grid.cell_unchecked_mut(current).set_path();
            observer.on_step(grid)?;
        }
    }
    path.reverse();
    ControlFlow::Continue(path)
}

/// Marks an explicit `start..end` sequence (goal excluded) as path, front to
/// back, notifying the observer after each marked cell. The start is skipped
/// and produces no frame.
pub(crate) fn mark_sequence(
    grid: &mut Grid,
    sequence: &[Position],
    start: Position,
    observer: &mut dyn StepObserver,
) -> ControlFlow<()> {
    for &pos in sequence.iter().filter(|&&pos| pos != start) {
        grid.cell_unchecked_mut(pos).set_path();
        observer.on_step(grid)?;
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellState;

    fn line_grid() -> Grid {
        let mut grid = Grid::new(5, 1).unwrap();
        grid.cell_at_mut(0, 0).unwrap().set_start();
        grid.cell_at_mut(0, 4).unwrap().set_end();
        grid
    }

    #[test]
    fn predecessors_are_marked_from_goal_back() {
        let mut grid = line_grid();
        let came_from: FxHashMap<_, _> = (1..5)
            .map(|col| (Position::new(0, col), Position::new(0, col - 1)))
            .collect();

        let mut frames = Vec::new();
        let flow = mark_predecessors(
            &mut grid,
            &came_from,
            Position::new(0, 0),
            Position::new(0, 4),
            &mut |g: &Grid| {
                frames.push(g.count(CellState::Path));
                ControlFlow::Continue(())
            },
        );

        let ControlFlow::Continue(path) = flow else {
            panic!("reconstruction was not cancelled");
        };
        assert_eq!(path.first(), Some(&Position::new(0, 0)));
        assert_eq!(path.last(), Some(&Position::new(0, 4)));
        assert_eq!(path.len(), 5);
        assert_eq!(frames, vec![1, 2, 3]);
        assert!(grid.cell_at(0, 0).unwrap().is_start());
        assert!(grid.cell_at(0, 4).unwrap().is_end());
        assert_eq!(grid.cell_at(0, 3).unwrap().state(), CellState::Path);
    }

    #[test]
    fn sequence_skips_start() {
        let mut grid = line_grid();
        let sequence: Vec<_> = (0..4).map(|col| Position::new(0, col)).collect();
        let mut calls = 0;
        let flow = mark_sequence(&mut grid, &sequence, Position::new(0, 0), &mut |_: &Grid| {
            calls += 1;
            ControlFlow::Continue(())
        });
        assert!(flow.is_continue());
        assert_eq!(calls, 3);
        assert_eq!(grid.count(CellState::Path), 3);
        assert!(grid.cell_at(0, 0).unwrap().is_start());
    }

    #[test]
    fn cancelling_stops_marking() {
        let mut grid = line_grid();
        let sequence: Vec<_> = (0..4).map(|col| Position::new(0, col)).collect();
        let flow = mark_sequence(&mut grid, &sequence, Position::new(0, 0), &mut |_: &Grid| {
            ControlFlow::Break(())
        });
        assert!(flow.is_break());
        assert_eq!(grid.count(CellState::Path), 1);
    }
}
