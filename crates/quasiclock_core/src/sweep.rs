use crate::clock::{Clock, ClockMode};
use crate::error::{Result, SimError};
use crate::integrate::{integrate, TimeGrid, Tolerances};
use crate::reduce::strobe;
use crate::vanderpol::VanDerPol;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Quasi-static amplitude sweep of the forced Van der Pol oscillator.
///
/// The sampling step is locked to the drive period divided into
/// `steps_per_cycle`, so stroboscopic samples fall on exact multiples of
/// the forcing period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Forcing amplitudes, visited in order with state carried forward.
    pub amplitudes: Vec<f64>,
    /// Nonlinear damping μ.
    pub damping: f64,
    /// Natural angular frequency ω₀.
    pub natural_frequency: f64,
    /// Rational (drive at ω₀) or golden (drive at φ·ω₀).
    pub mode: ClockMode,
    /// Settling window discarded before sampling, per amplitude.
    pub transient_time: f64,
    /// Sampling window, per amplitude.
    pub sampling_time: f64,
    /// Reporting steps per drive cycle; also the strobe stride.
    pub steps_per_cycle: usize,
    /// Seed state for the very first amplitude only.
    pub initial_state: [f64; 2],
    pub tolerances: Tolerances,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            amplitudes: amplitude_ramp(5.0, 200),
            damping: 1.0,
            natural_frequency: 1.0,
            mode: ClockMode::Rational,
            transient_time: 500.0,
            sampling_time: 100.0,
            steps_per_cycle: 50,
            initial_state: [0.1, 0.1],
            tolerances: Tolerances::default(),
        }
    }
}

/// `count` evenly spaced amplitudes from 0 to `max` inclusive. A count of
/// zero yields an empty ramp, which `SweepConfig::validate` rejects.
pub fn amplitude_ramp(max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let spacing = max / (count - 1) as f64;
            (0..count).map(|i| spacing * i as f64).collect()
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.amplitudes.is_empty() {
            return Err(SimError::configuration("sweep requires at least one amplitude"));
        }
        if self.amplitudes.iter().any(|a| !a.is_finite()) {
            return Err(SimError::configuration("amplitudes must be finite"));
        }
        if !self.damping.is_finite() {
            return Err(SimError::configuration("damping must be finite"));
        }
        if !(self.natural_frequency.is_finite() && self.natural_frequency > 0.0) {
            return Err(SimError::configuration("natural_frequency must be positive"));
        }
        if self.transient_time <= 0.0 || self.sampling_time <= 0.0 {
            return Err(SimError::configuration("sweep windows must be positive"));
        }
        if self.steps_per_cycle == 0 {
            return Err(SimError::configuration("steps_per_cycle must be at least 1"));
        }
        if self.initial_state.iter().any(|v| !v.is_finite()) {
            return Err(SimError::configuration("initial state must be finite"));
        }
        self.tolerances.validate()
    }

    /// Drive angular frequency implied by the clock mode.
    pub fn drive_frequency(&self) -> f64 {
        self.mode.frequency_multiple() * self.natural_frequency
    }

    /// One forcing period of the drive.
    pub fn drive_period(&self) -> f64 {
        TAU / self.drive_frequency()
    }
}

/// Outcome for one swept amplitude. `seed_state` is the state the step
/// started from; `final_state` seeds the next step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepStep {
    pub amplitude: f64,
    pub seed_state: [f64; 2],
    pub samples: Vec<f64>,
    pub final_state: [f64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BifurcationDiagram {
    pub steps: Vec<SweepStep>,
}

impl BifurcationDiagram {
    /// Flattens the diagram to parallel (amplitude, position) arrays, one
    /// entry per stroboscopic sample, ready for a scatter renderer.
    pub fn points(&self) -> (Vec<f64>, Vec<f64>) {
        let total: usize = self.steps.iter().map(|s| s.samples.len()).sum();
        let mut amplitudes = Vec::with_capacity(total);
        let mut positions = Vec::with_capacity(total);
        for step in &self.steps {
            for &x in &step.samples {
                amplitudes.push(step.amplitude);
                positions.push(x);
            }
        }
        (amplitudes, positions)
    }
}

/// Runs the sweep as an explicit fold over the amplitude ramp.
///
/// Per amplitude: settle for `transient_time`, then sample for
/// `sampling_time`, strobing the position once per drive period. The
/// sampling window's final state seeds the next amplitude, so results
/// depend on the sweep order. Each sub-integration restarts its clock at
/// t = 0, which keeps the drive phase aligned with the grid.
///
/// Any `IntegrationFailure` aborts the whole sweep; there is no skip or
/// retry for individual amplitudes.
pub fn run_sweep(config: &SweepConfig) -> Result<BifurcationDiagram> {
    config.validate()?;

    let dt = config.drive_period() / config.steps_per_cycle as f64;
    let transient_grid = TimeGrid::with_step(0.0, config.transient_time, dt)?;
    let sampling_grid = TimeGrid::with_step(0.0, config.sampling_time, dt)?;

    let mut state = config.initial_state;
    let mut steps = Vec::with_capacity(config.amplitudes.len());

    for &amplitude in &config.amplitudes {
        let field = VanDerPol {
            damping: config.damping,
            natural_frequency: config.natural_frequency,
            amplitude,
            clock: Clock::periodic(config.drive_frequency()),
        };
        let seed_state = state;

        let transient = integrate(&field, &state, &transient_grid, config.tolerances)?;
        state.copy_from_slice(transient.last_state());

        let sampled = integrate(&field, &state, &sampling_grid, config.tolerances)?;
        let samples = strobe(&sampled, 0, config.steps_per_cycle)?;
        state.copy_from_slice(sampled.last_state());

        steps.push(SweepStep {
            amplitude,
            seed_state,
            samples,
            final_state: state,
        });
    }

    Ok(BifurcationDiagram { steps })
}

#[cfg(test)]
mod tests {
    use super::{amplitude_ramp, run_sweep, SweepConfig};
    use crate::clock::ClockMode;
    use crate::integrate::TimeGrid;

    fn short_sweep() -> SweepConfig {
        SweepConfig {
            amplitudes: amplitude_ramp(1.0, 3),
            transient_time: 30.0,
            sampling_time: 15.0,
            steps_per_cycle: 20,
            ..SweepConfig::default()
        }
    }

    #[test]
    fn amplitude_ramp_covers_range_inclusively() {
        let ramp = amplitude_ramp(5.0, 200);
        assert_eq!(ramp.len(), 200);
        assert_eq!(ramp[0], 0.0);
        assert!((ramp[199] - 5.0).abs() < 1e-12);
        assert!((ramp[1] - 5.0 / 199.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_ramp_counts_fail_validation_not_panic() {
        assert!(amplitude_ramp(5.0, 0).is_empty());
        assert_eq!(amplitude_ramp(5.0, 1), vec![0.0]);

        let config = SweepConfig {
            amplitudes: amplitude_ramp(5.0, 0),
            ..SweepConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn strobe_spacing_equals_drive_period() {
        let config = short_sweep();
        let dt = config.drive_period() / config.steps_per_cycle as f64;
        let grid = TimeGrid::with_step(0.0, config.sampling_time, dt).unwrap();
        let times = grid.times();
        let stride = config.steps_per_cycle;
        let mut index = stride;
        while index < times.len() {
            let gap = times[index] - times[index - stride];
            assert!((gap - config.drive_period()).abs() < 1e-9);
            index += stride;
        }
    }

    #[test]
    fn golden_mode_shortens_the_drive_period() {
        let rational = SweepConfig::default();
        let golden = SweepConfig {
            mode: ClockMode::Golden,
            ..SweepConfig::default()
        };
        assert!(golden.drive_period() < rational.drive_period());
        assert!((rational.drive_period() - std::f64::consts::TAU).abs() < 1e-12);
    }

    #[test]
    fn sweep_chains_state_across_amplitudes() {
        let diagram = run_sweep(&short_sweep()).expect("sweep should succeed");
        assert_eq!(diagram.steps.len(), 3);
        assert_eq!(diagram.steps[0].seed_state, [0.1, 0.1]);
        for pair in diagram.steps.windows(2) {
            assert_eq!(pair[1].seed_state, pair[0].final_state);
        }
    }

    #[test]
    fn unforced_step_strobes_the_limit_cycle() {
        let config = SweepConfig {
            amplitudes: vec![0.0],
            ..short_sweep()
        };
        let diagram = run_sweep(&config).unwrap();
        let samples = &diagram.steps[0].samples;
        assert!(!samples.is_empty());
        // After the transient the orbit lives on the μ = 1 limit cycle.
        for &x in samples {
            assert!(x.abs() <= 2.1, "sample {x} off the limit cycle");
        }
    }

    #[test]
    fn points_flatten_one_pair_per_sample() {
        let diagram = run_sweep(&short_sweep()).unwrap();
        let per_step: usize = diagram.steps[0].samples.len();
        let (amplitudes, positions) = diagram.points();
        assert_eq!(amplitudes.len(), positions.len());
        assert_eq!(amplitudes.len(), 3 * per_step);
        assert_eq!(amplitudes[0], 0.0);
        assert!((amplitudes[amplitudes.len() - 1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_sweeps_are_rejected() {
        let mut config = SweepConfig {
            amplitudes: vec![],
            ..SweepConfig::default()
        };
        assert!(config.validate().is_err());

        config.amplitudes = vec![1.0];
        config.steps_per_cycle = 0;
        assert!(config.validate().is_err());

        config.steps_per_cycle = 50;
        config.natural_frequency = 0.0;
        assert!(config.validate().is_err());
    }
}
