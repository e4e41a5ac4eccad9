//! The `quasiclock_core` crate is the numerical engine behind two
//! coupled-oscillator experiments that compare a periodic ("quartz") clock
//! against a golden-ratio one:
//!
//! - **Synchrony**: a forced Kuramoto ensemble reduced to its order
//!   parameter r(t).
//! - **Bifurcation**: a forced Van der Pol oscillator swept over drive
//!   amplitude and strobed once per drive period, with state carried
//!   forward across the sweep.
//!
//! Key components:
//! - **Traits**: `Scalar` (numeric type abstraction), `VectorField` (ODE
//!   right-hand sides).
//! - **Clock**: periodic / quasiperiodic forcing strategies, selected once
//!   at configuration time.
//! - **Integrate**: embedded Tsitouras 5(4) driver over fixed reporting
//!   grids.
//! - **Reduce / Sweep / Synchrony**: trajectory reducers and the two
//!   pipeline entry points.
//!
//! The crate produces numeric arrays only; rendering lives outside it.

pub mod clock;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod integrate;
pub mod reduce;
pub mod solvers;
pub mod sweep;
pub mod synchrony;
pub mod traits;
pub mod vanderpol;

pub use error::{Result, SimError};
