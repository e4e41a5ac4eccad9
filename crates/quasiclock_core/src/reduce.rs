use crate::ensemble::mean_field;
use crate::error::{Result, SimError};
use crate::integrate::Trajectory;

/// Order parameter r(t) = |⟨exp(iθ_k(t))⟩| for a trajectory of phase vectors.
///
/// r ≈ 1 signals global hyper-synchrony (lock-up); r fluctuating inside
/// (0, 1) signals metastable, non-locked dynamics. Non-finite phases are
/// reported as `NumericAnomaly` rather than silently reduced.
pub fn order_parameter_series(trajectory: &Trajectory) -> Result<Vec<f64>> {
    let mut series = Vec::with_capacity(trajectory.len());
    for i in 0..trajectory.len() {
        let phases = trajectory.state(i);
        if phases.iter().any(|p| !p.is_finite()) {
            return Err(SimError::NumericAnomaly {
                context: "order parameter phases",
                index: i,
            });
        }
        series.push(mean_field(phases).norm());
    }
    Ok(series)
}

/// Stroboscopic samples of one state component: every `stride`-th grid
/// point, starting at index 0. With the grid locked to the forcing period
/// this is a Poincaré section of the driven flow.
pub fn strobe(trajectory: &Trajectory, component: usize, stride: usize) -> Result<Vec<f64>> {
    if stride == 0 {
        return Err(SimError::configuration("strobe stride must be at least 1"));
    }
    if component >= trajectory.dim() {
        return Err(SimError::configuration(format!(
            "strobe component {} out of range for dimension {}",
            component,
            trajectory.dim()
        )));
    }
    let mut samples = Vec::new();
    let mut index = 0;
    while index < trajectory.len() {
        let value = trajectory.state(index)[component];
        if !value.is_finite() {
            return Err(SimError::NumericAnomaly {
                context: "stroboscopic sample",
                index,
            });
        }
        samples.push(value);
        index += stride;
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::{order_parameter_series, strobe};
    use crate::clock::Clock;
    use crate::ensemble::KuramotoEnsemble;
    use crate::error::SimError;
    use crate::integrate::{integrate, TimeGrid, Tolerances, Trajectory};
    use crate::traits::VectorField;

    struct Drift {
        rates: Vec<f64>,
    }

    impl VectorField<f64> for Drift {
        fn dimension(&self) -> usize {
            self.rates.len()
        }

        fn eval(&self, _t: f64, _x: &[f64], out: &mut [f64]) {
            out.copy_from_slice(&self.rates);
        }
    }

    fn drift_trajectory(rates: Vec<f64>, initial: &[f64]) -> Trajectory {
        let grid = TimeGrid::uniform(0.0, 10.0, 101).unwrap();
        integrate(&Drift { rates }, initial, &grid, Tolerances::default()).unwrap()
    }

    #[test]
    fn order_parameter_stays_in_unit_interval() {
        let traj = drift_trajectory(vec![0.3, -1.1, 2.7, 0.9], &[0.0, 1.0, 3.0, 5.5]);
        let series = order_parameter_series(&traj).expect("reduction should succeed");
        assert_eq!(series.len(), traj.len());
        for r in series {
            assert!((0.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn identical_phases_and_frequencies_stay_fully_synchronized() {
        // Perfect synchrony limit: the mean field collapses to a single phase
        // and r ≡ 1 whatever the drive does.
        let field = KuramotoEnsemble::new(vec![1.0; 5], 2.0, 5.0, Clock::golden(1.0));
        let grid = TimeGrid::uniform(0.0, 30.0, 301).unwrap();
        let traj = integrate(&field, &[0.8; 5], &grid, Tolerances::default()).unwrap();
        let series = order_parameter_series(&traj).unwrap();
        for (i, r) in series.into_iter().enumerate() {
            assert!((r - 1.0).abs() < 1e-7, "r = {r} at index {i}");
        }
    }

    #[test]
    fn non_finite_phase_is_reported_not_reduced() {
        let traj = Trajectory::from_rows(
            2,
            vec![0.0, 1.0, 2.0],
            vec![0.1, 0.2, f64::NAN, 0.4, 0.5, 0.6],
        )
        .unwrap();
        match order_parameter_series(&traj) {
            Err(SimError::NumericAnomaly { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected NumericAnomaly, got {other:?}"),
        }
        match strobe(&traj, 0, 1) {
            Err(SimError::NumericAnomaly { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected NumericAnomaly, got {other:?}"),
        }
    }

    #[test]
    fn strobe_takes_every_nth_sample() {
        let traj = drift_trajectory(vec![1.0], &[0.0]);
        let samples = strobe(&traj, 0, 25).expect("strobe should succeed");
        // Indices 0, 25, 50, 75, 100 of a 101-point grid.
        assert_eq!(samples.len(), 5);
        for (n, x) in samples.iter().enumerate() {
            let expected = 0.1 * 25.0 * n as f64; // rate 1.0, spacing 0.1
            assert!((x - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn strobe_rejects_bad_arguments() {
        let traj = drift_trajectory(vec![1.0], &[0.0]);
        match strobe(&traj, 0, 0) {
            Err(SimError::Configuration(message)) => assert!(message.contains("stride")),
            other => panic!("expected Configuration error, got {other:?}"),
        }
        match strobe(&traj, 3, 10) {
            Err(SimError::Configuration(message)) => assert!(message.contains("out of range")),
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }
}
