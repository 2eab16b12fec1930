pub mod a_star;
pub mod common;
pub mod dijkstra;
pub mod heuristic;
mod reconstruct;

use std::fmt;

use clap::ValueEnum;

use crate::error::Result;
use crate::grid::{Grid, Position};
use a_star::AStar;
use common::{SearchAlgorithm, SearchOptions, SearchOutcome, StepObserver};
use dijkstra::Dijkstra;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Algorithm {
    AStar,
    Dijkstra,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::AStar, Algorithm::Dijkstra];

    pub fn build(self, options: SearchOptions) -> Box<dyn SearchAlgorithm> {
        match self {
            Algorithm::AStar => Box::new(AStar::with_options(options)),
            Algorithm::Dijkstra => Box::new(Dijkstra::with_options(options)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::AStar => f.write_str("a-star"),
            Algorithm::Dijkstra => f.write_str("dijkstra"),
        }
    }
}

/// Runs one search on `grid` with default options.
pub fn run_search(
    algorithm: Algorithm,
    grid: &mut Grid,
    start: Position,
    end: Position,
    observer: &mut dyn StepObserver,
) -> Result<SearchOutcome> {
    run_search_with(algorithm, SearchOptions::default(), grid, start, end, observer)
}

pub fn run_search_with(
    algorithm: Algorithm,
    options: SearchOptions,
    grid: &mut Grid,
    start: Position,
    end: Position,
    observer: &mut dyn StepObserver,
) -> Result<SearchOutcome> {
    algorithm.build(options).run(grid, start, end, observer)
}
