use std::io::{BufRead, Write};
use std::ops::ControlFlow;
use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::algorithms::common::{NoOpObserver, SearchOptions, SearchOutcome, StepObserver};
use crate::algorithms::Algorithm;
use crate::config::{parse_position, Config};
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::grid::{CellState, Grid, Position};
use crate::render::{Renderer, LEGEND};
use crate::statistics::{bfs_path_len, Statistics};

/// Draws a frame after every search step, pausing between frames.
pub struct FrameObserver<'a, W: Write> {
    out: &'a mut W,
    renderer: Renderer,
    delay: Duration,
    algorithm: Algorithm,
    frames: usize,
}

impl<'a, W: Write> FrameObserver<'a, W> {
    pub fn new(out: &'a mut W, renderer: Renderer, delay: Duration, algorithm: Algorithm) -> Self {
        FrameObserver {
            out,
            renderer,
            delay,
            algorithm,
            frames: 0,
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl<W: Write> StepObserver for FrameObserver<'_, W> {
    fn on_step(&mut self, grid: &Grid) -> ControlFlow<()> {
        self.frames += 1;
        let status = vec![
            "=== PATHFINDING VISUALIZER ===".to_string(),
            format!(
                "Algorithm: {} | Frame: {} | Open: {} | Closed: {} | Path: {}",
                self.algorithm,
                self.frames,
                grid.count(CellState::Open),
                grid.count(CellState::Closed),
                grid.count(CellState::Path)
            ),
            LEGEND.to_string(),
        ];
        if let Err(err) = self.renderer.draw(self.out, grid, &status) {
            // A closed terminal or pipe ends the run instead of failing it.
            tracing::warn!(error = %err, "could not draw frame, stopping search");
            return ControlFlow::Break(());
        }
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        ControlFlow::Continue(())
    }
}

/// One command of the interactive editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start(Position),
    End(Position),
    Block(Position),
    Paint(Position),
    Erase(Position),
    Walls(usize),
    Run(Option<Algorithm>),
    Clear,
    Show,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command> {
        let invalid = |reason: String| Error::InvalidCommand(reason);
        let mut words = line.split_whitespace();
        let name = words
            .next()
            .ok_or_else(|| invalid("empty command".to_string()))?;
        let rest: Vec<&str> = words.collect();

        let position = |rest: &[&str]| -> Result<Position> {
            match rest {
                [row, col] => parse_position(&format!("{row},{col}")).map_err(invalid),
                [both] => parse_position(both).map_err(invalid),
                _ => Err(invalid(format!("`{name}` expects ROW COL"))),
            }
        };

        let command = match name {
            "start" | "s" => Command::Start(position(rest.as_slice())?),
            "end" | "e" => Command::End(position(rest.as_slice())?),
            "block" | "b" => Command::Block(position(rest.as_slice())?),
            "paint" | "p" => Command::Paint(position(rest.as_slice())?),
            "erase" | "x" => Command::Erase(position(rest.as_slice())?),
            "walls" | "w" => match rest.as_slice() {
                [count] => Command::Walls(
                    count
                        .parse()
                        .map_err(|e| invalid(format!("invalid wall count `{count}`: {e}")))?,
                ),
                _ => return Err(invalid("`walls` expects a count".to_string())),
            },
            "run" | "go" => match rest.as_slice() {
                [] => Command::Run(None),
                ["a-star" | "astar" | "a*"] => Command::Run(Some(Algorithm::AStar)),
                ["dijkstra"] => Command::Run(Some(Algorithm::Dijkstra)),
                [other] => return Err(invalid(format!("unknown algorithm `{other}`"))),
                _ => return Err(invalid("`run` takes at most one algorithm".to_string())),
            },
            "clear" | "c" => Command::Clear,
            "show" => Command::Show,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(invalid(format!("unknown command `{other}`"))),
        };
        Ok(command)
    }
}

pub struct Simulation {
    editor: Editor,
    config: Config,
    rng: StdRng,
}

impl Simulation {
    /// Builds the grid described by `config`: endpoints placed, walls
    /// scattered from the configured seed.
    pub fn new(config: Config) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        tracing::info!(seed, rows = config.rows, walls = config.walls, "building grid");
        let mut rng = StdRng::seed_from_u64(seed);

        let mut editor = Editor::new(config.rows, config.cell_size)?;
        editor.place_start(config.start_position())?;
        editor.place_end(config.end_position())?;
        editor.scatter_walls(config.walls, &mut rng);

        Ok(Simulation {
            editor,
            config,
            rng,
        })
    }

    /// Wraps an already prepared editor.
    pub fn with_editor(config: Config, editor: Editor) -> Self {
        let rng = StdRng::seed_from_u64(config.seed.unwrap_or_default());
        Simulation {
            editor,
            config,
            rng,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    fn renderer(&self) -> Renderer {
        Renderer {
            color: !self.config.no_color,
            clear: true,
        }
    }

    fn delay(&self) -> Duration {
        Duration::from_millis(self.config.delay_ms)
    }

    /// Runs one algorithm, drawing frames to `out` unless visualization is
    /// disabled.
    pub fn run<W: Write>(&mut self, algorithm: Algorithm, out: &mut W) -> Result<Statistics> {
        let options = self.config.options();
        if self.config.no_visualization {
            return self.run_observed(algorithm, options, &mut NoOpObserver);
        }

        let renderer = self.renderer();
        let mut observer = FrameObserver::new(out, renderer, self.delay(), algorithm);
        let stats = self.run_observed(algorithm, options, &mut observer)?;
        let frames = observer.frames();

        let mut status = vec![
            "=== SEARCH COMPLETE ===".to_string(),
            format!("Frames drawn: {frames}"),
        ];
        status.extend(stats.to_string().lines().map(str::to_string));
        renderer.draw(out, self.editor.grid(), &status)?;
        Ok(stats)
    }

    fn run_observed(
        &mut self,
        algorithm: Algorithm,
        options: SearchOptions,
        observer: &mut dyn StepObserver,
    ) -> Result<Statistics> {
        let optimal = self.reference_len();
        let started = Instant::now();
        let outcome: SearchOutcome = self.editor.search(algorithm, options, observer)?;
        let elapsed = started.elapsed();

        let grid_cells = self.editor.grid().rows().pow(2);
        let stats = Statistics::new(algorithm, &outcome, optimal, grid_cells, elapsed);
        tracing::info!(
            %algorithm,
            status = ?stats.status,
            steps = stats.steps,
            path_len = ?stats.path_len,
            "search finished"
        );
        Ok(stats)
    }

    fn reference_len(&self) -> Option<usize> {
        let start = self.editor.start()?;
        let end = self.editor.end()?;
        bfs_path_len(self.editor.grid(), start, end)
    }

    /// Runs every algorithm headless on its own copy of the current layout.
    pub fn run_all(&self, algorithms: &[Algorithm]) -> Result<Vec<Statistics>> {
        tracing::info!(count = algorithms.len(), "comparing algorithms");
        algorithms
            .iter()
            .map(|&algorithm| {
                let mut copy = Simulation {
                    editor: self.editor.clone(),
                    config: self.config.clone(),
                    rng: self.rng.clone(),
                };
                copy.run_observed(algorithm, self.config.options(), &mut NoOpObserver)
            })
            .collect()
    }

    /// Prints comparison results in a table.
    pub fn print_comparison_results<W: Write>(results: &[Statistics], out: &mut W) -> Result<()> {
        writeln!(out, "\n=== ALGORITHM COMPARISON RESULTS ===\n")?;
        writeln!(
            out,
            "{:<10} {:<10} {:<9} {:<8} {:<6} {:<8} {:<12}",
            "Algorithm", "Result", "Expanded", "Opened", "Path", "Optimal", "Time"
        )?;
        writeln!(out, "{}", "-".repeat(70))?;

        for result in results {
            let path = result
                .path_len
                .map_or_else(|| "-".to_string(), |len| len.to_string());
            let optimal = result
                .optimal_path_len
                .map_or_else(|| "-".to_string(), |len| len.to_string());
            writeln!(
                out,
                "{:<10} {:<10} {:<9} {:<8} {:<6} {:<8} {:<12}",
                result.algorithm.to_string(),
                format!("{:?}", result.status),
                result.steps,
                result.opened,
                path,
                optimal,
                format!("{:.2?}", result.elapsed)
            )?;
        }

        if let Some(best) = results
            .iter()
            .filter(|r| r.path_len.is_some())
            .min_by_key(|r| r.steps)
        {
            writeln!(
                out,
                "\nFewest expansions: {} ({} cells)",
                best.algorithm, best.steps
            )?;
        }
        Ok(())
    }

    /// Reads commands line by line from `input`, applying them to the editor
    /// and drawing the grid after each one, until `quit` or end of input.
    pub fn interactive<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        let plain = Renderer {
            clear: false,
            ..self.renderer()
        };
        let default_algorithm = self
            .config
            .algorithm
            .algorithms()
            .first()
            .copied()
            .unwrap_or(Algorithm::AStar);

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(err) => {
                    writeln!(out, "{err}")?;
                    continue;
                }
            };

            let applied = match command {
                Command::Quit => break,
                Command::Start(pos) => self.editor.place_start(pos),
                Command::End(pos) => self.editor.place_end(pos),
                Command::Block(pos) => self.editor.block(pos),
                Command::Paint(pos) => self.editor.paint(pos),
                Command::Erase(pos) => self.editor.erase(pos),
                Command::Walls(count) => {
                    let placed = self.editor.scatter_walls(count, &mut self.rng);
                    writeln!(out, "placed {placed} walls")?;
                    Ok(())
                }
                Command::Clear => self.editor.clear(),
                Command::Show => Ok(()),
                Command::Run(choice) => {
                    let algorithm = choice.unwrap_or(default_algorithm);
                    match self.run(algorithm, out) {
                        Ok(stats) => {
                            if self.config.no_visualization {
                                write!(out, "{stats}")?;
                            }
                            continue;
                        }
                        Err(err) => Err(err),
                    }
                }
            };

            match applied {
                Ok(()) => plain.draw(out, self.editor.grid(), &[])?,
                Err(Error::Io(err)) => return Err(Error::Io(err)),
                Err(err) => writeln!(out, "{err}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headless(rows: usize, walls: usize) -> Config {
        Config {
            rows,
            walls,
            seed: Some(42),
            no_visualization: true,
            no_color: true,
            delay_ms: 0,
            ..Config::default()
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            Command::parse("start 1 2").unwrap(),
            Command::Start(Position::new(1, 2))
        );
        assert_eq!(
            Command::parse("b 3,4").unwrap(),
            Command::Block(Position::new(3, 4))
        );
        assert_eq!(Command::parse("walls 12").unwrap(), Command::Walls(12));
        assert_eq!(
            Command::parse("run dijkstra").unwrap(),
            Command::Run(Some(Algorithm::Dijkstra))
        );
        assert_eq!(Command::parse("go").unwrap(), Command::Run(None));
        assert_eq!(Command::parse("q").unwrap(), Command::Quit);
    }

    #[test]
    fn rejects_bad_commands() {
        assert!(matches!(
            Command::parse("fly 1 2"),
            Err(Error::InvalidCommand(_))
        ));
        assert!(Command::parse("start 1").is_err());
        assert!(Command::parse("run bfs").is_err());
        assert!(Command::parse("walls many").is_err());
    }

    #[test]
    fn same_seed_builds_same_layout() {
        let a = Simulation::new(headless(15, 40)).unwrap();
        let b = Simulation::new(headless(15, 40)).unwrap();
        assert_eq!(a.editor().grid().blocked(), b.editor().grid().blocked());
    }

    #[test]
    fn headless_run_matches_bfs() {
        let mut sim = Simulation::new(headless(15, 0)).unwrap();
        let mut sink = Vec::new();
        let stats = sim.run(Algorithm::AStar, &mut sink).unwrap();
        assert!(sink.is_empty());
        assert_eq!(stats.path_len, Some(28));
        assert!(stats.is_optimal());
    }

    #[test]
    fn run_all_leaves_layout_untouched() {
        let sim = Simulation::new(headless(12, 30)).unwrap();
        let results = sim.run_all(&Algorithm::ALL).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].path_len, results[1].path_len);
        assert_eq!(sim.editor().grid().count(CellState::Path), 0);

        let mut table = Vec::new();
        Simulation::print_comparison_results(&results, &mut table).unwrap();
        let table = String::from_utf8(table).unwrap();
        assert!(table.contains("a-star"));
        assert!(table.contains("dijkstra"));
    }

    #[test]
    fn visual_run_draws_frames() {
        let config = Config {
            no_visualization: false,
            ..headless(5, 0)
        };
        let mut sim = Simulation::new(config).unwrap();
        let mut out = Vec::new();
        let stats = sim.run(Algorithm::Dijkstra, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Frame: 1"));
        assert!(text.contains("=== SEARCH COMPLETE ==="));
        assert_eq!(stats.path_len, Some(8));
    }

    #[test]
    fn interactive_session_edits_and_runs() {
        let mut sim = Simulation::with_editor(headless(5, 0), Editor::new(5, 1).unwrap());
        let script = "paint 0 0\npaint 4 4\nblock 2 2\nbogus\nrun a-star\nquit\nblock 1 1\n";
        let mut out = Vec::new();
        sim.interactive(script.as_bytes(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("unknown command `bogus`"));
        assert!(text.contains("Path length: 8"));
        let grid = sim.editor().grid();
        assert!(grid.cell_at(2, 2).unwrap().is_blocked());
        // Commands after `quit` are ignored.
        assert!(!grid.cell_at(1, 1).unwrap().is_blocked());
        assert_eq!(grid.count(CellState::Path), 7);
    }

    #[test]
    fn interactive_reports_editor_errors() {
        let mut sim = Simulation::with_editor(headless(5, 0), Editor::new(5, 1).unwrap());
        let mut out = Vec::new();
        sim.interactive("start 9 9\nrun\n".as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("outside the 5x5 grid"));
        assert!(text.contains("no start cell has been placed"));
    }

    #[test]
    fn interactive_walls_cap_at_free_cells() {
        let mut sim = Simulation::with_editor(headless(5, 0), Editor::new(5, 1).unwrap());
        let mut out = Vec::new();
        let script = format!("start 0 0\nend 4 4\nwalls {}\n", usize::MAX);
        sim.interactive(script.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("placed 23 walls"));
        assert_eq!(sim.editor().grid().count(CellState::Blocked), 23);
    }
}
