//! Terminal presentation: one glyph per cell, optionally tinted with the
//! cell state's color.

use std::fmt::{self, Write as _};
use std::io::{self, Write};

use crate::grid::{CellState, Grid};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";
const RESET: &str = "\x1B[0m";

pub const LEGEND: &str = "Legend: S=Start, E=End, #=Wall, o=Open, x=Closed, *=Path, .=Unvisited";

pub fn glyph(state: CellState) -> char {
    match state {
        CellState::Unvisited => '.',
        CellState::Open => 'o',
        CellState::Closed => 'x',
        CellState::Blocked => '#',
        CellState::Start => 'S',
        CellState::End => 'E',
        CellState::Path => '*',
    }
}

/// RGB color of each state.
pub fn color(state: CellState) -> (u8, u8, u8) {
    match state {
        CellState::Unvisited => (255, 255, 255),
        CellState::Open => (0, 255, 0),
        CellState::Closed => (255, 0, 0),
        CellState::Blocked => (0, 0, 0),
        CellState::Start => (255, 165, 0),
        CellState::End => (64, 224, 208),
        CellState::Path => (128, 0, 128),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub color: bool,
    /// Clear the terminal before each frame.
    pub clear: bool,
}

impl Renderer {
    pub fn plain() -> Self {
        Renderer {
            color: false,
            clear: false,
        }
    }

    /// Renders the grid with a column ruler and row numbers.
    pub fn render(&self, grid: &Grid) -> String {
        let width = grid.cell_size();
        let mut out = String::new();

        out.push_str("   ");
        for col in 0..grid.rows() {
            let _ = write!(out, "{:<width$}", col % 10);
        }
        end_line(&mut out);

        for row in 0..grid.rows() {
            let _ = write!(out, "{:2} ", row);
            for cell in grid.row_cells(row).unwrap_or(&[]) {
                let state = cell.state();
                if self.color {
                    let (r, g, b) = color(state);
                    let _ = write!(out, "\x1B[38;2;{r};{g};{b}m{:<width$}{RESET}", glyph(state));
                } else {
                    let _ = write!(out, "{:<width$}", glyph(state));
                }
            }
            end_line(&mut out);
        }
        out
    }

    /// Writes one frame: optional screen clear, the status lines, then the grid.
    pub fn draw<W: Write>(&self, out: &mut W, grid: &Grid, status: &[String]) -> io::Result<()> {
        if self.clear {
            out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        for line in status {
            writeln!(out, "{line}")?;
        }
        out.write_all(self.render(grid).as_bytes())?;
        out.flush()
    }
}

/// Drops the padding after the last cell of a line.
fn end_line(out: &mut String) {
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Renderer::plain().render(self))
    }
}
