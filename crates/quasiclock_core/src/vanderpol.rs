use crate::clock::Clock;
use crate::traits::VectorField;

/// Forced Van der Pol oscillator on state (x, v):
///
/// dx/dt = v
/// dv/dt = μ(1 − x²)v − ω₀²x + F·clock(t)
///
/// Self-sustained for μ > 0; the unforced limit cycle has amplitude ≈ 2
/// for moderate μ regardless of the initial condition.
#[derive(Debug, Clone, Copy)]
pub struct VanDerPol {
    pub damping: f64,
    pub natural_frequency: f64,
    pub amplitude: f64,
    pub clock: Clock,
}

impl VectorField<f64> for VanDerPol {
    fn dimension(&self) -> usize {
        2
    }

    fn eval(&self, t: f64, state: &[f64], out: &mut [f64]) {
        let (x, v) = (state[0], state[1]);
        out[0] = v;
        out[1] = self.damping * (1.0 - x * x) * v
            - self.natural_frequency * self.natural_frequency * x
            + self.amplitude * self.clock.force(t);
    }
}
