use serde::{Deserialize, Serialize};

/// The golden ratio φ = (1 + √5) / 2.
pub const GOLDEN_RATIO: f64 = 1.618033988749895;

/// Configuration-time selector between the two external clock regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockMode {
    /// Single-frequency periodic drive ("quartz clock").
    Rational,
    /// Golden-ratio drive: quasiperiodic for the ensemble, an irrational
    /// frequency multiple for the forced oscillator.
    Golden,
}

impl ClockMode {
    /// Drive frequency as a multiple of the system's base frequency.
    /// Rational drives sit exactly on the base; golden drives sit at φ times it.
    pub fn frequency_multiple(self) -> f64 {
        match self {
            ClockMode::Rational => 1.0,
            ClockMode::Golden => GOLDEN_RATIO,
        }
    }
}

/// An external forcing signal, selected once at configuration time and held
/// by the vector field as a value. Both variants are unit-amplitude; the
/// field scales them by its own forcing strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Clock {
    /// Single-tone drive at a fixed angular frequency.
    Periodic { frequency: f64 },
    /// Equal-weight superposition of two incommensurate tones, at `base`
    /// and `base * ratio`. With an irrational ratio the signal never repeats.
    Quasiperiodic { base: f64, ratio: f64 },
}

impl Clock {
    pub fn periodic(frequency: f64) -> Self {
        Clock::Periodic { frequency }
    }

    /// Two-tone quasiperiodic clock with the golden ratio between tones.
    pub fn golden(base: f64) -> Self {
        Clock::Quasiperiodic {
            base,
            ratio: GOLDEN_RATIO,
        }
    }

    /// Clock driving a phase-oscillator ensemble at `base_frequency`.
    pub fn for_ensemble(mode: ClockMode, base_frequency: f64) -> Self {
        match mode {
            ClockMode::Rational => Clock::periodic(base_frequency),
            ClockMode::Golden => Clock::golden(base_frequency),
        }
    }

    /// Drive felt by a phase oscillator currently at phase `theta`.
    /// sin(w·t − θ) for the periodic clock, the half-sum of the two tones
    /// for the quasiperiodic one.
    pub fn phase_drive(&self, t: f64, theta: f64) -> f64 {
        match *self {
            Clock::Periodic { frequency } => (frequency * t - theta).sin(),
            Clock::Quasiperiodic { base, ratio } => {
                0.5 * ((base * t - theta).sin() + (base * ratio * t - theta).sin())
            }
        }
    }

    /// Additive drive on a position-velocity oscillator: cos(w·t) for the
    /// periodic clock, the half-sum of the two tones otherwise.
    pub fn force(&self, t: f64) -> f64 {
        match *self {
            Clock::Periodic { frequency } => (frequency * t).cos(),
            Clock::Quasiperiodic { base, ratio } => {
                0.5 * ((base * t).cos() + (base * ratio * t).cos())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ClockMode, GOLDEN_RATIO};

    #[test]
    fn golden_ratio_satisfies_defining_identity() {
        // φ² = φ + 1
        assert!((GOLDEN_RATIO * GOLDEN_RATIO - GOLDEN_RATIO - 1.0).abs() < 1e-12);
    }

    #[test]
    fn frequency_multiple_matches_mode() {
        assert_eq!(ClockMode::Rational.frequency_multiple(), 1.0);
        assert_eq!(ClockMode::Golden.frequency_multiple(), GOLDEN_RATIO);
    }

    #[test]
    fn periodic_phase_drive_is_shifted_sine() {
        let clock = Clock::periodic(2.0);
        let t = 0.7;
        let theta = 0.3;
        assert!((clock.phase_drive(t, theta) - (2.0 * t - theta).sin()).abs() < 1e-15);
    }

    #[test]
    fn quasiperiodic_drive_averages_both_tones() {
        let clock = Clock::golden(1.0);
        let t = 1.3_f64;
        let expected = 0.5 * ((t - 0.2).sin() + (GOLDEN_RATIO * t - 0.2).sin());
        assert!((clock.phase_drive(t, 0.2) - expected).abs() < 1e-15);

        let expected_force = 0.5 * (t.cos() + (GOLDEN_RATIO * t).cos());
        assert!((clock.force(t) - expected_force).abs() < 1e-15);
    }

    #[test]
    fn ensemble_clock_selection_follows_mode() {
        assert_eq!(
            Clock::for_ensemble(ClockMode::Rational, 1.5),
            Clock::Periodic { frequency: 1.5 }
        );
        assert_eq!(
            Clock::for_ensemble(ClockMode::Golden, 1.5),
            Clock::Quasiperiodic {
                base: 1.5,
                ratio: GOLDEN_RATIO
            }
        );
    }
}
