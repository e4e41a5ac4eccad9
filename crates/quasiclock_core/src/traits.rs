use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types usable as scalars by the integration machinery.
/// Must support floating-point arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// The right-hand side of a non-autonomous ODE: dx/dt = f(t, x).
///
/// Implementations are pure maps from (time, state) to a derivative; the
/// solver owns all mutable buffers. Forcing terms are baked into the field
/// at configuration time, so `eval` never branches on a mode selector.
pub trait VectorField<T: Scalar> {
    /// Dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the derivative at (`t`, `x`) into `out`.
    /// `out` has length `dimension()`.
    fn eval(&self, t: T, x: &[T], out: &mut [T]);
}
