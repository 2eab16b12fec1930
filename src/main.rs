use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use gridpath::config::{AlgorithmChoice, Config};
use gridpath::logging::init_tracing;
use gridpath::simulation::Simulation;
use gridpath::Result;

fn main() -> ExitCode {
    init_tracing();
    let config = Config::parse();

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "gridpath failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<()> {
    tracing::info!(
        rows = config.rows,
        algorithm = ?config.algorithm,
        visualization = !config.no_visualization,
        "starting"
    );

    let mut simulation = Simulation::new(config.clone())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if config.interactive {
        let stdin = io::stdin();
        return simulation.interactive(stdin.lock(), &mut out);
    }

    let algorithms = config.algorithm.algorithms();
    if config.algorithm == AlgorithmChoice::All {
        let results = simulation.run_all(&algorithms)?;
        return Simulation::print_comparison_results(&results, &mut out);
    }

    for algorithm in algorithms {
        let stats = simulation.run(algorithm, &mut out)?;
        if config.no_visualization {
            writeln!(out, "\n=== FINAL RESULTS ===")?;
            write!(out, "{stats}")?;
        }
    }
    Ok(())
}
