use clap::{Parser, ValueEnum};

use crate::algorithms::common::SearchOptions;
use crate::algorithms::Algorithm;
use crate::grid::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmChoice {
    AStar,
    Dijkstra,
    /// Run every algorithm on the same layout and compare them.
    All,
}

impl AlgorithmChoice {
    pub fn algorithms(self) -> Vec<Algorithm> {
        match self {
            AlgorithmChoice::AStar => vec![Algorithm::AStar],
            AlgorithmChoice::Dijkstra => vec![Algorithm::Dijkstra],
            AlgorithmChoice::All => Algorithm::ALL.to_vec(),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Watch A* and Dijkstra explore a grid", long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = 20)]
    pub rows: usize,

    /// Character width of one cell when drawn.
    #[arg(long, default_value_t = 2)]
    pub cell_size: usize,

    #[arg(long, value_enum, default_value_t = AlgorithmChoice::AStar)]
    pub algorithm: AlgorithmChoice,

    #[arg(long, default_value_t = 60)]
    pub walls: usize,

    /// Seed for wall placement; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start cell as ROW,COL. Defaults to the top-left corner.
    #[arg(long, value_parser = parse_position)]
    pub start: Option<Position>,

    /// End cell as ROW,COL. Defaults to the bottom-right corner.
    #[arg(long, value_parser = parse_position)]
    pub end: Option<Position>,

    #[arg(long, default_value_t = 30)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub no_color: bool,

    /// Give up after this many expansions.
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Read editor commands from stdin instead of running once.
    #[arg(long, default_value_t = false)]
    pub interactive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rows: 20,
            cell_size: 2,
            algorithm: AlgorithmChoice::AStar,
            walls: 60,
            seed: None,
            start: None,
            end: None,
            delay_ms: 30,
            no_visualization: false,
            no_color: false,
            max_steps: None,
            interactive: false,
        }
    }
}

impl Config {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            max_steps: self.max_steps,
        }
    }

    pub fn start_position(&self) -> Position {
        self.start.unwrap_or(Position::new(0, 0))
    }

    pub fn end_position(&self) -> Position {
        let last = self.rows.saturating_sub(1);
        self.end.unwrap_or(Position::new(last, last))
    }
}

/// Parses `ROW,COL`.
pub fn parse_position(value: &str) -> Result<Position, String> {
    let (row, col) = value
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got `{value}`"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|e| format!("invalid row `{row}`: {e}"))?;
    let col = col
        .trim()
        .parse()
        .map_err(|e| format!("invalid column `{col}`: {e}"))?;
    Ok(Position::new(row, col))
}
