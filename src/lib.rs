pub mod algorithms;
pub mod config;
pub mod editor;
pub mod error;
pub mod grid;
pub mod logging;
pub mod render;
pub mod simulation;
pub mod statistics;

pub use algorithms::common::{
    NoOpObserver, SearchAlgorithm, SearchOptions, SearchOutcome, SearchStatus, StepObserver,
};
pub use algorithms::{run_search, run_search_with, Algorithm};
pub use editor::Editor;
pub use error::{Error, Result};
pub use grid::{Cell, CellState, Grid, Position};
