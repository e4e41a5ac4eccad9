use thiserror::Error;

/// Failure taxonomy for the simulation pipelines.
///
/// Every variant aborts the run that raised it; there is no partial-results
/// mode. A mid-sweep `IntegrationFailure` aborts the whole sweep rather than
/// skipping the offending amplitude.
#[derive(Debug, Error)]
pub enum SimError {
    /// Malformed parameter set, rejected before any integration begins.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The solver could not meet its error tolerances.
    #[error("integration failed at t = {time}: {reason}")]
    IntegrationFailure { time: f64, reason: String },

    /// A reducer encountered NaN/Inf where a finite value was required.
    #[error("non-finite value in {context} at index {index}")]
    NumericAnomaly {
        context: &'static str,
        index: usize,
    },
}

pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    pub fn configuration(message: impl Into<String>) -> Self {
        SimError::Configuration(message.into())
    }
}
