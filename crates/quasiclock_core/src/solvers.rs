use crate::traits::{Scalar, VectorField};

/// Tsitouras 5(4) embedded Runge-Kutta pair.
///
/// Each trial step produces a 5th-order proposal plus a 4th-order embedded
/// error estimate; the integration driver owns the accept/reject decision
/// and the step-size controller. k7 is evaluated at the proposal and feeds
/// the error estimate only (FSAL reuse is deliberately not exploited).
pub struct Tsit5<T: Scalar> {
    k1: Vec<T>,
    k2: Vec<T>,
    k3: Vec<T>,
    k4: Vec<T>,
    k5: Vec<T>,
    k6: Vec<T>,
    k7: Vec<T>,
    tmp: Vec<T>,
    proposal: Vec<T>,
    error: Vec<T>,
}

impl<T: Scalar> Tsit5<T> {
    pub fn new(dim: usize) -> Self {
        let z = T::from_f64(0.0).unwrap();
        Self {
            k1: vec![z; dim],
            k2: vec![z; dim],
            k3: vec![z; dim],
            k4: vec![z; dim],
            k5: vec![z; dim],
            k6: vec![z; dim],
            k7: vec![z; dim],
            tmp: vec![z; dim],
            proposal: vec![z; dim],
            error: vec![z; dim],
        }
    }

    /// 5th-order state proposal from the most recent `trial_step`.
    pub fn proposal(&self) -> &[T] {
        &self.proposal
    }

    /// Per-component embedded error estimate from the most recent `trial_step`.
    pub fn error_estimate(&self) -> &[T] {
        &self.error
    }

    /// Evaluates one trial step of size `dt` from (`t0`, `state`) without
    /// committing it. The proposal and error estimate are read back through
    /// `proposal()` and `error_estimate()`.
    pub fn trial_step(&mut self, field: &impl VectorField<T>, t0: T, state: &[T], dt: T) {
        // Tsit5 coefficients
        let c2 = T::from_f64(0.161).unwrap();
        let c3 = T::from_f64(0.327).unwrap();
        let c4 = T::from_f64(0.9).unwrap();
        let c5 = T::from_f64(0.9800255409045097).unwrap();
        let c6 = T::from_f64(1.0).unwrap();

        let a21 = T::from_f64(0.161).unwrap();

        let a31 = T::from_f64(-0.008480655492356989).unwrap();
        let a32 = T::from_f64(0.335480655492357).unwrap();

        let a41 = T::from_f64(2.8971530571054935).unwrap();
        let a42 = T::from_f64(-6.359448489975075).unwrap();
        let a43 = T::from_f64(4.3622954328695815).unwrap();

        let a51 = T::from_f64(5.325864828459115).unwrap();
        let a52 = T::from_f64(-11.748883564062828).unwrap();
        let a53 = T::from_f64(7.4955393428898365).unwrap();
        let a54 = T::from_f64(-0.09249506636175525).unwrap();

        let a61 = T::from_f64(5.86145544294642).unwrap();
        let a62 = T::from_f64(-12.92096931784711).unwrap();
        let a63 = T::from_f64(8.159367898576159).unwrap();
        let a64 = T::from_f64(-0.071584973281401).unwrap();
        let a65 = T::from_f64(-0.028269050394068383).unwrap();

        // b coefficients (5th order)
        let b1 = T::from_f64(0.09646076681806523).unwrap();
        let b2 = T::from_f64(0.01).unwrap();
        let b3 = T::from_f64(0.4798896504144996).unwrap();
        let b4 = T::from_f64(1.379008574103742).unwrap();
        let b5 = T::from_f64(-3.290069515436099).unwrap();
        let b6 = T::from_f64(2.324710524099774).unwrap();

        // btilde = b − bhat, the 5th/4th difference weights
        let e1 = T::from_f64(-0.00178001105222577714).unwrap();
        let e2 = T::from_f64(-0.0008164344596567469).unwrap();
        let e3 = T::from_f64(0.007880878010261995).unwrap();
        let e4 = T::from_f64(-0.1447110071732629).unwrap();
        let e5 = T::from_f64(0.5823571654525552).unwrap();
        let e6 = T::from_f64(-0.45808210592918697).unwrap();
        let e7 = T::from_f64(0.015151515151515152).unwrap();

        // k1
        field.eval(t0, state, &mut self.k1);

        // k2
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * (a21 * self.k1[i]);
        }
        field.eval(t0 + c2 * dt, &self.tmp, &mut self.k2);

        // k3
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * (a31 * self.k1[i] + a32 * self.k2[i]);
        }
        field.eval(t0 + c3 * dt, &self.tmp, &mut self.k3);

        // k4
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * (a41 * self.k1[i] + a42 * self.k2[i] + a43 * self.k3[i]);
        }
        field.eval(t0 + c4 * dt, &self.tmp, &mut self.k4);

        // k5
        for i in 0..state.len() {
            self.tmp[i] = state[i]
                + dt * (a51 * self.k1[i] + a52 * self.k2[i] + a53 * self.k3[i] + a54 * self.k4[i]);
        }
        field.eval(t0 + c5 * dt, &self.tmp, &mut self.k5);

        // k6
        for i in 0..state.len() {
            self.tmp[i] = state[i]
                + dt * (a61 * self.k1[i]
                    + a62 * self.k2[i]
                    + a63 * self.k3[i]
                    + a64 * self.k4[i]
                    + a65 * self.k5[i]);
        }
        field.eval(t0 + c6 * dt, &self.tmp, &mut self.k6);

        // 5th-order proposal
        for i in 0..state.len() {
            self.proposal[i] = state[i]
                + dt * (b1 * self.k1[i]
                    + b2 * self.k2[i]
                    + b3 * self.k3[i]
                    + b4 * self.k4[i]
                    + b5 * self.k5[i]
                    + b6 * self.k6[i]);
        }

        // k7 at the proposal, then the embedded error estimate
        field.eval(t0 + dt, &self.proposal, &mut self.k7);
        for i in 0..state.len() {
            self.error[i] = dt
                * (e1 * self.k1[i]
                    + e2 * self.k2[i]
                    + e3 * self.k3[i]
                    + e4 * self.k4[i]
                    + e5 * self.k5[i]
                    + e6 * self.k6[i]
                    + e7 * self.k7[i]);
        }
    }
}
