use crate::clock::Clock;
use crate::traits::VectorField;
use num_complex::Complex;

/// Complex mean field z = ⟨exp(iθ_k)⟩ of a phase configuration.
///
/// |z| is the synchrony magnitude r ∈ [0, 1] and arg(z) the mean phase ψ.
/// The exponential makes the result invariant under phase wrapping, so
/// trajectories may carry unwrapped phases.
pub fn mean_field(phases: &[f64]) -> Complex<f64> {
    let mut z = Complex::new(0.0, 0.0);
    for &theta in phases {
        z += Complex::from_polar(1.0, theta);
    }
    z / phases.len() as f64
}

/// Kuramoto ensemble under mean-field coupling and an external clock.
///
/// dθ_k/dt = ω_k + K·r·sin(ψ − θ_k) + F·clock(t, θ_k)
///
/// where (r, ψ) is the instantaneous mean field. Phases are not wrapped
/// modulo 2π; every consumer of this field goes through the complex
/// exponential and is wrap-invariant.
#[derive(Debug, Clone)]
pub struct KuramotoEnsemble {
    omega: Vec<f64>,
    coupling: f64,
    clock_strength: f64,
    clock: Clock,
}

impl KuramotoEnsemble {
    pub fn new(omega: Vec<f64>, coupling: f64, clock_strength: f64, clock: Clock) -> Self {
        Self {
            omega,
            coupling,
            clock_strength,
            clock,
        }
    }

    pub fn natural_frequencies(&self) -> &[f64] {
        &self.omega
    }
}

impl VectorField<f64> for KuramotoEnsemble {
    fn dimension(&self) -> usize {
        self.omega.len()
    }

    fn eval(&self, t: f64, theta: &[f64], out: &mut [f64]) {
        let z = mean_field(theta);
        let r = z.norm();
        let psi = z.arg();

        for k in 0..theta.len() {
            let internal = self.coupling * r * (psi - theta[k]).sin();
            let external = self.clock_strength * self.clock.phase_drive(t, theta[k]);
            out[k] = self.omega[k] + internal + external;
        }
    }
}
