//! Stepper construction errors.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepperError {
    /// A stepper with zero steps would never fire.
    #[error("step count must be non-zero")]
    ZeroSteps,

    /// A zero period would fire continuously and starve the owner loop.
    #[error("step period must be non-zero, got {0:?}")]
    ZeroPeriod(Duration),
}
