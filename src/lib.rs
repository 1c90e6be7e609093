//! Tiled explicit Jacobi solver for the 2D heat equation.
//!
//! Each time step fills the ghost halo, applies the 5-point stencil tile by
//! tile, copies the result back and advances time. Tiles run on a fixed
//! [`pool::WorkerPool`] and every phase completes before the next begins.

pub mod boundary;
pub mod cli;
pub mod config;
pub mod error;
pub mod grid;
pub mod output;
pub mod pipeline;
pub mod pool;
pub mod simulation;
pub mod stencil;
pub mod tile;

pub use config::SimulationConfig;
pub use error::{HeatError, Result};
pub use grid::Grid;
pub use simulation::{RunReport, Simulation, SimulationState};
