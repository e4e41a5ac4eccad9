use crate::config::EnsembleConfig;
use crate::error::Result;
use crate::integrate::{integrate, TimeGrid, Tolerances};
use crate::reduce::order_parameter_series;
use serde::{Deserialize, Serialize};

/// End-to-end configuration for the synchrony experiment: build the forced
/// ensemble, integrate it over a dense uniform grid, reduce to r(t).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynchronyConfig {
    pub ensemble: EnsembleConfig,
    /// Simulated duration, starting at t = 0.
    pub duration: f64,
    /// Number of reporting points across the duration.
    pub samples: usize,
    pub tolerances: Tolerances,
}

impl Default for SynchronyConfig {
    fn default() -> Self {
        Self {
            ensemble: EnsembleConfig::default(),
            duration: 100.0,
            samples: 1000,
            tolerances: Tolerances::default(),
        }
    }
}

/// Reduced output of one synchrony run, ready for a line renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynchronyTrace {
    pub times: Vec<f64>,
    pub order_parameter: Vec<f64>,
}

pub fn run_synchrony(config: &SynchronyConfig) -> Result<SynchronyTrace> {
    let (field, phases) = config.ensemble.build()?;
    let grid = TimeGrid::uniform(0.0, config.duration, config.samples)?;
    let trajectory = integrate(&field, &phases, &grid, config.tolerances)?;
    let order_parameter = order_parameter_series(&trajectory)?;
    Ok(SynchronyTrace {
        times: grid.times().to_vec(),
        order_parameter,
    })
}
