use crate::error::{HeatError, Result};

pub const DEFAULT_NCELLS: usize = 32; // interior cells per side
pub const DEFAULT_NSTEPS: usize = 100;
pub const DEFAULT_ALPHA: f64 = 0.5; // diffusivity
pub const DEFAULT_DT: f64 = 1.0e-5;

/// Validated run parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub ncells: usize,
    pub nsteps: usize,
    pub alpha: f64,
    pub dt: f64,
    /// Tiles per phase, also the worker count.
    pub ntiles: usize,
    pub print_grid: bool,
    pub print_time: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ncells: DEFAULT_NCELLS,
            nsteps: DEFAULT_NSTEPS,
            alpha: DEFAULT_ALPHA,
            dt: DEFAULT_DT,
            ntiles: 1,
            print_grid: false,
            print_time: false,
        }
    }
}

impl SimulationConfig {
    pub fn with_tiles(mut self, ntiles: usize) -> Self {
        self.ntiles = ntiles;
        self
    }

    /// Check the numerical parameters.
    ///
    /// Tile counts are checked when the pipeline partitions the grid.
    pub fn validate(&self) -> Result<()> {
        if self.ncells < 2 {
            return Err(HeatError::argument("ncells must be at least 2"));
        }
        if !(self.alpha > 0.0) {
            return Err(HeatError::argument("alpha must be > 0"));
        }
        if !(self.dt > 0.0) {
            return Err(HeatError::argument("dt must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_grid() {
        let config = SimulationConfig {
            ncells: 1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(HeatError::Argument(_))));
    }

    #[test]
    fn rejects_non_positive_coefficients() {
        let config = SimulationConfig {
            alpha: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            dt: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
