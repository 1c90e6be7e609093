//! The driver: owns the grid, the worker pool and the pipeline, and runs
//! the sequential time loop.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::pipeline::TaskPipeline;
use crate::pool::WorkerPool;

/// Scalar state of the run, mutated only between pipeline executions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub time: f64,
    pub step: usize,
    pub alpha: f64,
    pub dt: f64,
    pub dx: f64,
    pub dy: f64,
}

impl SimulationState {
    /// Start at `t = 0` on the unit square, `dx = dy = 1 / (ncells - 1)`.
    pub fn new(alpha: f64, dt: f64, ncells: usize) -> Self {
        let spacing = 1.0 / (ncells as f64 - 1.0);
        Self {
            time: 0.0,
            step: 0,
            alpha,
            dt,
            dx: spacing,
            dy: spacing,
        }
    }

    pub fn advance(&mut self) {
        self.time += self.dt;
        self.step += 1;
    }
}

/// Outcome of [`Simulation::run`].
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub steps: usize,
    pub time: f64,
    pub elapsed: Duration,
}

pub struct Simulation {
    config: SimulationConfig,
    state: SimulationState,
    grid: Grid,
    pipeline: TaskPipeline,
    pool: WorkerPool,
    started: Instant,
}

impl Simulation {
    /// Validate `config`, allocate the grid, partition it and start the pool.
    ///
    /// Nothing is computed yet; call [`Simulation::initialize`] next.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let started = Instant::now();
        config.validate()?;

        let grid = Grid::new(config.ncells)?;
        let pipeline = TaskPipeline::new(grid.interior_len(), config.ntiles)?;
        let pool = WorkerPool::new(config.ntiles)?;
        let state = SimulationState::new(config.alpha, config.dt, config.ncells);

        info!(
            ncells = config.ncells,
            nsteps = config.nsteps,
            ntiles = config.ntiles,
            alpha = config.alpha,
            dt = config.dt,
            "simulation configured"
        );

        Ok(Self {
            config,
            state,
            grid,
            pipeline,
            pool,
            started,
        })
    }

    /// Set the initial condition and fill the halo.
    pub fn initialize(&mut self) -> Result<()> {
        self.pipeline
            .initialize(&self.pool, &mut self.grid, &self.state)
    }

    /// Run the configured number of steps, blocking on each one.
    ///
    /// The reported wall-clock time counts from [`Simulation::new`], so it
    /// includes pool startup and initialization.
    pub fn run(&mut self) -> Result<RunReport> {
        for _ in 0..self.config.nsteps {
            self.pipeline
                .step(&self.pool, &mut self.grid, &mut self.state)?;
            debug!(step = self.state.step, time = self.state.time, "step complete");
        }

        let report = RunReport {
            steps: self.state.step,
            time: self.state.time,
            elapsed: self.started.elapsed(),
        };
        info!(
            steps = report.steps,
            time = report.time,
            elapsed_ms = report.elapsed.as_secs_f64() * 1e3,
            "simulation finished"
        );
        Ok(report)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Release the pool, waiting for its workers, and hand back the grid.
    pub fn finish(self) -> Grid {
        self.pool.shutdown();
        self.grid
    }
}
