//! Per-step task composition.
//!
//! A step is four phases run back to back on the [`WorkerPool`]:
//!
//! ```text
//! Idle → BoundaryFilling → StencilUpdating → CopyingBack → TimeAdvanced → Idle
//! ```
//!
//! Boundary filling is one serial unit. Stencil update and copy-back
//! dispatch one unit per tile. Every phase returns only after all of its
//! units have completed, which is the barrier the next phase relies on:
//! the halo is written only while no tile reads it, and each tile writes a
//! disjoint slice of the target buffer.

use std::fmt;

use tracing::trace;

use crate::boundary;
use crate::error::Result;
use crate::grid::{Grid, GHOST_CELLS};
use crate::pool::WorkerPool;
use crate::simulation::SimulationState;
use crate::stencil::Stencil;
use crate::tile::{self, Tile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    BoundaryFilling,
    StencilUpdating,
    CopyingBack,
    TimeAdvanced,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::BoundaryFilling => "boundary fill",
            Phase::StencilUpdating => "stencil update",
            Phase::CopyingBack => "copy-back",
            Phase::TimeAdvanced => "time advance",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Width of the initial Gaussian bump.
const BUMP_WIDTH: f64 = 0.01;

/// Cell-centre coordinate of haloed index `i` on the `[-0.5, 0.5]` domain.
#[inline]
pub fn cell_center(i: usize, dx: f64) -> f64 {
    -0.5 + dx * (i as f64 - GHOST_CELLS as f64)
}

/// Initial condition `phi(x, y) = 1 + exp(-(x² + y²) / 0.01)`.
#[inline]
pub fn gaussian_bump(x: f64, y: f64) -> f64 {
    let r2 = (x * x + y * y) / BUMP_WIDTH;
    1.0 + (-r2).exp()
}

pub struct TaskPipeline {
    tiles: Vec<Tile>,
    phase: Phase,
}

impl TaskPipeline {
    /// Partition `total` cells into `tile_count` tiles once for the whole run.
    pub fn new(total: usize, tile_count: usize) -> Result<Self> {
        Ok(Self {
            tiles: tile::partition(total, tile_count)?,
            phase: Phase::Idle,
        })
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        trace!(from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }

    /// Fill the interior of `old` with the Gaussian bump, tile by tile, then
    /// fill its halo.
    pub fn initialize(&mut self, pool: &WorkerPool, grid: &mut Grid, state: &SimulationState) -> Result<()> {
        let ncells = grid.ncells();
        let (dx, dy) = (state.dx, state.dy);
        let segments = grid.interior_segments(&self.tiles);

        pool.submit("initialize", segments, |mut segment| {
            for pos in segment.tile().range() {
                let x = cell_center(GHOST_CELLS + pos / ncells, dx);
                let y = cell_center(GHOST_CELLS + pos % ncells, dy);
                segment.set(pos, gaussian_bump(x, y));
            }
        })?;

        self.fill_boundaries(pool, grid)?;
        self.enter(Phase::Idle);
        Ok(())
    }

    fn fill_boundaries(&mut self, pool: &WorkerPool, grid: &mut Grid) -> Result<()> {
        self.enter(Phase::BoundaryFilling);
        let side = grid.side();
        let old = grid.old_mut();
        pool.run(Phase::BoundaryFilling.name(), || boundary::fill(old, side, GHOST_CELLS))
    }

    /// Advance the simulation by one time step, returning once every phase
    /// has completed.
    ///
    /// A failing unit aborts the step with the error and leaves the pipeline
    /// in the phase that failed.
    pub fn step(&mut self, pool: &WorkerPool, grid: &mut Grid, state: &mut SimulationState) -> Result<()> {
        let ncells = grid.ncells();
        let stencil = Stencil::new(state.alpha, state.dt, state.dx, state.dy);

        self.fill_boundaries(pool, grid)?;

        self.enter(Phase::StencilUpdating);
        let (old, views) = grid.stencil_views(&self.tiles);
        pool.submit(Phase::StencilUpdating.name(), views, |(tile, out)| {
            stencil.update_tile(old, ncells, tile, out)
        })?;

        self.enter(Phase::CopyingBack);
        let (new, segments) = grid.copy_back_views(&self.tiles);
        pool.submit(Phase::CopyingBack.name(), segments, |mut segment| {
            segment.copy_from(new)
        })?;

        self.enter(Phase::TimeAdvanced);
        state.advance();

        self.enter(Phase::Idle);
        Ok(())
    }
}
