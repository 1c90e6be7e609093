use clap::Parser;

use crate::config::{SimulationConfig, DEFAULT_ALPHA, DEFAULT_DT, DEFAULT_NCELLS, DEFAULT_NSTEPS};
use crate::error::Result;

#[derive(Parser, Debug)]
#[command(
    name = "heat-equation",
    version,
    about = "2D heat equation solved with tiled Jacobi iteration on a worker pool"
)]
pub struct Cli {
    /// Interior grid cells per side
    #[arg(long, default_value_t = DEFAULT_NCELLS)]
    pub ncells: usize,

    /// Number of time steps
    #[arg(long, default_value_t = DEFAULT_NSTEPS)]
    pub nsteps: usize,

    /// Diffusivity coefficient
    #[arg(long, default_value_t = DEFAULT_ALPHA)]
    pub alpha: f64,

    /// Time step size
    #[arg(long, default_value_t = DEFAULT_DT)]
    pub dt: f64,

    /// Tiles per phase and worker threads (default: available CPUs)
    #[arg(long, visible_alias = "nthreads")]
    pub ntiles: Option<usize>,

    /// Print the grid before the first and after the last step
    #[arg(long, alias = "print_grid")]
    pub print_grid: bool,

    /// Print elapsed wall-clock time in milliseconds
    #[arg(long, alias = "print_time")]
    pub print_time: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Resolve defaults and validate the numerical parameters.
    pub fn into_config(self) -> Result<SimulationConfig> {
        let ntiles = self.ntiles.unwrap_or_else(|| {
            let cpus = std::thread::available_parallelism().map_or(1, |n| n.get());
            cpus.min(self.ncells.saturating_mul(self.ncells)).max(1)
        });

        let config = SimulationConfig {
            ncells: self.ncells,
            nsteps: self.nsteps,
            alpha: self.alpha,
            dt: self.dt,
            ntiles,
            print_grid: self.print_grid,
            print_time: self.print_time,
        };
        config.validate()?;
        Ok(config)
    }
}
