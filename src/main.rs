use std::process::ExitCode;

use heat_equation::cli::Cli;
use heat_equation::output::{format_elapsed, format_grid};
use heat_equation::{Result, Simulation, SimulationConfig};
use tracing_subscriber::EnvFilter;

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(config: SimulationConfig) -> Result<()> {
    let mut sim = Simulation::new(config)?;
    sim.initialize()?;

    let print_grid = sim.config().print_grid;
    let print_time = sim.config().print_time;

    if print_grid {
        let grid = sim.grid();
        print!("{}", format_grid(grid.old(), grid.side()));
    }

    let report = sim.run()?;

    if print_time {
        println!("{}", format_elapsed(report.elapsed));
    }

    let grid = sim.finish();
    if print_grid {
        print!("{}", format_grid(&grid.interior(), grid.ncells()));
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::from_args();
    setup_logging(cli.verbose, cli.quiet);

    let result = cli.into_config().and_then(run);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
