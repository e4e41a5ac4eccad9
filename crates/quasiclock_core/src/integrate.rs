use crate::error::{Result, SimError};
use crate::solvers::Tsit5;
use crate::traits::VectorField;
use serde::{Deserialize, Serialize};

const SAFETY: f64 = 0.9;
const MIN_SHRINK: f64 = 0.2;
const MAX_GROWTH: f64 = 5.0;
// Inverse of the proposal order, for the proportional step controller.
const ERROR_EXPONENT: f64 = -0.2;
// Fraction of the grid span below which the step size counts as underflowed.
const MIN_STEP_FRACTION: f64 = 1e-12;

/// Ordered reporting times for one integration. The grid is fixed at
/// construction; the solver's internal step never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeGrid {
    times: Vec<f64>,
}

impl TimeGrid {
    /// Evenly spaced grid of `points` values covering [start, end] inclusive.
    pub fn uniform(start: f64, end: f64, points: usize) -> Result<Self> {
        if points < 2 {
            return Err(SimError::configuration(
                "time grid requires at least 2 points",
            ));
        }
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(SimError::configuration(
                "time grid requires finite start < end",
            ));
        }
        let spacing = (end - start) / (points - 1) as f64;
        let mut times: Vec<f64> = (0..points).map(|i| start + spacing * i as f64).collect();
        // Land the endpoint exactly.
        times[points - 1] = end;
        Ok(Self { times })
    }

    /// Half-open grid start, start + step, … covering `span` time units;
    /// the last point falls strictly below start + span.
    pub fn with_step(start: f64, span: f64, step: f64) -> Result<Self> {
        if !start.is_finite() || !span.is_finite() || !step.is_finite() {
            return Err(SimError::configuration("time grid bounds must be finite"));
        }
        if step <= 0.0 || span <= 0.0 {
            return Err(SimError::configuration(
                "time grid span and step must be positive",
            ));
        }
        let points = (span / step).ceil() as usize;
        if points < 2 {
            return Err(SimError::configuration(
                "time grid span must cover at least 2 steps",
            ));
        }
        let times = (0..points).map(|i| start + step * i as f64).collect();
        Ok(Self { times })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn first(&self) -> f64 {
        self.times[0]
    }

    pub fn last(&self) -> f64 {
        self.times[self.times.len() - 1]
    }
}

/// Mixed absolute/relative error tolerances for the adaptive driver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-8,
            rel: 1e-8,
        }
    }
}

impl Tolerances {
    pub fn validate(&self) -> Result<()> {
        if !(self.abs > 0.0 && self.rel > 0.0) {
            return Err(SimError::configuration("tolerances must be positive"));
        }
        Ok(())
    }
}

/// One state row per grid point, immutable once produced. The first row
/// equals the initial condition handed to `integrate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    dim: usize,
    times: Vec<f64>,
    states: Vec<f64>, // row-major, len = times.len() * dim
}

impl Trajectory {
    /// Assembles a trajectory from raw rows. Shape is validated; values are
    /// not, so reducers still police NaN/Inf (`NumericAnomaly`).
    pub fn from_rows(dim: usize, times: Vec<f64>, states: Vec<f64>) -> Result<Self> {
        if dim == 0 {
            return Err(SimError::configuration("trajectory dimension must be positive"));
        }
        if states.len() != times.len() * dim {
            return Err(SimError::configuration(format!(
                "trajectory shape mismatch: {} states for {} times of dimension {}",
                states.len(),
                times.len(),
                dim
            )));
        }
        Ok(Self { dim, times, states })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// State row at grid index `i`.
    pub fn state(&self, i: usize) -> &[f64] {
        &self.states[i * self.dim..(i + 1) * self.dim]
    }

    /// Single state component across the whole grid.
    pub fn component(&self, j: usize) -> Vec<f64> {
        (0..self.len()).map(|i| self.state(i)[j]).collect()
    }

    pub fn last_state(&self) -> &[f64] {
        self.state(self.len() - 1)
    }
}

/// Advances `initial` across `grid` under `field` with an embedded
/// Tsitouras 5(4) pair and proportional step-size control.
///
/// The internal step is decoupled from the reporting grid except that steps
/// are clamped to land exactly on each grid point. If the controller cannot
/// meet the tolerances before the step underflows (divergence, non-finite
/// states), the run aborts with `IntegrationFailure` at the current time.
pub fn integrate(
    field: &impl VectorField<f64>,
    initial: &[f64],
    grid: &TimeGrid,
    tol: Tolerances,
) -> Result<Trajectory> {
    let dim = field.dimension();
    if dim == 0 {
        return Err(SimError::configuration("vector field has zero dimension"));
    }
    if initial.len() != dim {
        return Err(SimError::configuration(format!(
            "initial state has dimension {}, field expects {}",
            initial.len(),
            dim
        )));
    }
    if initial.iter().any(|v| !v.is_finite()) {
        return Err(SimError::configuration("initial state must be finite"));
    }
    tol.validate()?;

    let times = grid.times();
    let span = grid.last() - grid.first();
    let min_step = span * MIN_STEP_FRACTION;

    let mut states = Vec::with_capacity(times.len() * dim);
    states.extend_from_slice(initial);

    let mut state = initial.to_vec();
    let mut t = times[0];
    let mut solver = Tsit5::new(dim);
    let mut dt = (times[1] - times[0]) / 10.0;

    for &target in &times[1..] {
        while t < target {
            let (step, lands_on_target) = if dt >= target - t {
                (target - t, true)
            } else {
                (dt, false)
            };

            solver.trial_step(field, t, &state, step);
            let err = error_norm(solver.error_estimate(), &state, solver.proposal(), tol);
            let accepted = err.is_finite() && err <= 1.0;

            if accepted {
                state.copy_from_slice(solver.proposal());
                t = if lands_on_target { target } else { t + step };
            }

            // An accepted step that was clamped to the grid point says nothing
            // about the natural step size; keep dt as-is in that case.
            if !(accepted && lands_on_target) {
                let factor = if err.is_finite() && err > 0.0 {
                    (SAFETY * err.powf(ERROR_EXPONENT)).clamp(MIN_SHRINK, MAX_GROWTH)
                } else if err == 0.0 {
                    MAX_GROWTH
                } else {
                    // Non-finite estimate: the proposal blew up, back off hard.
                    MIN_SHRINK
                };
                dt = step * factor;

                if dt < min_step {
                    return Err(SimError::IntegrationFailure {
                        time: t,
                        reason: "step size underflow while meeting error tolerances".into(),
                    });
                }
            }
        }
        states.extend_from_slice(&state);
    }

    Ok(Trajectory {
        dim,
        times: times.to_vec(),
        states,
    })
}

/// RMS of component errors scaled by atol + rtol·max(|y|, |y_proposed|).
/// Values ≤ 1 mean the step satisfies the requested tolerances.
fn error_norm(err: &[f64], y: &[f64], y_next: &[f64], tol: Tolerances) -> f64 {
    let mut sum = 0.0;
    for i in 0..err.len() {
        let scale = tol.abs + tol.rel * y[i].abs().max(y_next[i].abs());
        let ratio = err[i] / scale;
        sum += ratio * ratio;
    }
    (sum / err.len() as f64).sqrt()
}
