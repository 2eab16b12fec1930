use std::ops::ControlFlow;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::algorithms::common::{
    prepare_search, Frontier, SearchAlgorithm, SearchOptions, SearchOutcome, SearchStatus,
    SearchTrace, StepObserver,
};
use crate::algorithms::reconstruct::mark_sequence;
use crate::error::Result;
use crate::grid::{Grid, Position};

/// Persistent path from the start to some cell. Queue entries share their
/// common prefix instead of copying it.
#[derive(Debug)]
struct Trail {
    pos: Position,
    prev: Option<Rc<Trail>>,
}

fn extend(trail: &Option<Rc<Trail>>, pos: Position) -> Option<Rc<Trail>> {
    Some(Rc::new(Trail {
        pos,
        prev: trail.clone(),
    }))
}

/// Positions along `trail`, start first.
fn unwind(trail: &Option<Rc<Trail>>) -> Vec<Position> {
    let mut positions = Vec::new();
    let mut link = trail.as_deref();
    while let Some(node) = link {
        positions.push(node.pos);
        link = node.prev.as_deref();
    }
    positions.reverse();
    positions
}

/// Uniform-cost search. Each frontier entry carries the path that reached it,
/// so no predecessor map is kept.
#[derive(Debug, Clone, Default)]
pub struct Dijkstra {
    options: SearchOptions,
}

impl Dijkstra {
    pub fn new() -> Self {
        Dijkstra::default()
    }

    pub fn with_options(options: SearchOptions) -> Self {
        Dijkstra { options }
    }
}

impl SearchAlgorithm for Dijkstra {
    fn name(&self) -> &'static str {
        "dijkstra"
    }

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
        let mut in_frontier: FxHashSet<Position> = FxHashSet::default();
        let mut frontier: Frontier<(Position, Option<Rc<Trail>>)> = Frontier::new();
        let mut trace = SearchTrace::default();

        best_cost.insert(start, 0);
        frontier.push(0, (start, None));
        in_frontier.insert(start);

        while let Some((cost, (current, trail))) = frontier.pop() {
            if cost > best_cost[&current] {
                continue;
            }
            in_frontier.remove(&current);

            if current == end {
                grid.cell_unchecked_mut(end).set_end();
                let sequence = unwind(&trail);
                if mark_sequence(grid, &sequence, start, observer).is_break() {
                    tracing::debug!(algorithm = self.name(), "cancelled during reconstruction");
                    return Ok(trace.finish(SearchStatus::Cancelled));
                }
                let mut path = sequence;
                path.push(end);
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

            let through_current = extend(&trail, current);
            let candidate = cost + 1;
            let neighbors = grid.cell_unchecked(current).neighbors().to_vec();
            for neighbor in neighbors {
                if candidate >= best_cost.get(&neighbor).copied().unwrap_or(u32::MAX) {
                    continue;
                }
                best_cost.insert(neighbor, candidate);

                frontier.push(candidate, (neighbor, through_current.clone()));
                if in_frontier.insert(neighbor) {
                    grid.cell_unchecked_mut(neighbor).set_open();
                    trace.opened += 1;
                }
            }

            if let ControlFlow::Break(()) = observer.on_step(grid) {
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
