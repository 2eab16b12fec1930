//! Translates user gestures into grid mutations while keeping a single start
//! and a single end cell.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::algorithms::common::{SearchOptions, SearchOutcome, StepObserver};
use crate::algorithms::{run_search_with, Algorithm};
use crate::error::{Endpoint, Error, Result};
use crate::grid::{CellState, Grid, Position};

#[derive(Debug, Clone)]
pub struct Editor {
    grid: Grid,
    start: Option<Position>,
    end: Option<Position>,
}

impl Editor {
    pub fn new(rows: usize, cell_size: usize) -> Result<Self> {
        Ok(Editor {
            grid: Grid::new(rows, cell_size)?,
            start: None,
            end: None,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn end(&self) -> Option<Position> {
        self.end
    }

    /// Primary-button gesture: the first paint places the start, the second
    /// the end, and every later paint blocks the cell. Endpoints are never
    /// painted over.
    pub fn paint(&mut self, pos: Position) -> Result<()> {
        if self.start.is_none() && Some(pos) != self.end {
            self.place_start(pos)
        } else if self.end.is_none() && Some(pos) != self.start {
            self.place_end(pos)
        } else if Some(pos) != self.start && Some(pos) != self.end {
            self.block(pos)
        } else {
            Ok(())
        }
    }

    /// Secondary-button gesture: resets the cell, forgetting it as an
    /// endpoint if it was one.
    pub fn erase(&mut self, pos: Position) -> Result<()> {
        self.grid.cell_mut(pos)?.reset();
        self.forget(pos);
        Ok(())
    }

    /// Moves the start to `pos`, resetting the previous start cell.
    pub fn place_start(&mut self, pos: Position) -> Result<()> {
        self.grid.cell(pos)?;
        if let Some(old) = self.start.take() {
            self.grid.cell_mut(old)?.reset();
        }
        self.forget(pos);
        self.grid.cell_mut(pos)?.set_start();
        self.start = Some(pos);
        Ok(())
    }

    /// Moves the end to `pos`, resetting the previous end cell.
    pub fn place_end(&mut self, pos: Position) -> Result<()> {
        self.grid.cell(pos)?;
        if let Some(old) = self.end.take() {
            self.grid.cell_mut(old)?.reset();
        }
        self.forget(pos);
        self.grid.cell_mut(pos)?.set_end();
        self.end = Some(pos);
        Ok(())
    }

    pub fn block(&mut self, pos: Position) -> Result<()> {
        self.grid.cell_mut(pos)?.set_blocked();
        self.forget(pos);
        Ok(())
    }

    /// Drops the whole grid and both endpoints.
    pub fn clear(&mut self) -> Result<()> {
        self.grid = Grid::new(self.grid.rows(), self.grid.cell_size())?;
        self.start = None;
        self.end = None;
        tracing::debug!(rows = self.grid.rows(), "grid cleared");
        Ok(())
    }

    /// Blocks up to `count` random free cells, never touching an endpoint.
    /// Returns how many walls were placed, at most the number of free cells.
    pub fn scatter_walls<R: Rng>(&mut self, count: usize, rng: &mut R) -> usize {
        let mut free: Vec<Position> = self
            .grid
            .iter()
            .filter(|c| c.state() == CellState::Unvisited)
            .map(|c| c.position())
            .filter(|&pos| Some(pos) != self.start && Some(pos) != self.end)
            .collect();
        let (chosen, _) = free.partial_shuffle(rng, count);
        let mut placed = 0;
        for &pos in chosen.iter() {
            if let Ok(cell) = self.grid.cell_mut(pos) {
                cell.set_blocked();
                placed += 1;
            }
        }
        tracing::debug!(requested = count, placed, "scattered walls");
        placed
    }

    /// Wipes the marks of any earlier search, refreshes neighbors and runs
    /// `algorithm` between the placed endpoints.
    pub fn search(
        &mut self,
        algorithm: Algorithm,
        options: SearchOptions,
        observer: &mut dyn StepObserver,
    ) -> Result<SearchOutcome> {
        let start = self.start.ok_or(Error::MissingEndpoint {
            which: Endpoint::Start,
        })?;
        let end = self.end.ok_or(Error::MissingEndpoint {
            which: Endpoint::End,
        })?;

        self.grid.clear_search_marks();
        self.grid.refresh_neighbors();
        run_search_with(algorithm, options, &mut self.grid, start, end, observer)
    }

    fn forget(&mut self, pos: Position) {
        if self.start == Some(pos) {
            self.start = None;
        }
        if self.end == Some(pos) {
            self.end = None;
        }
    }
}
