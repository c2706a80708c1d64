//! Cancellable periodic step generation for LED animations.
//!
//! A [`Stepper`] owns the timing state of one animation: how many steps,
//! how far apart, and which step fires next. It is cooperative — nothing
//! sleeps here. The owner polls it from its event loop and sleeps for
//! [`Stepper::time_until_due`] in between, which keeps every step
//! callback on the same thread as the rest of the owner's work and makes
//! cancellation synchronous (drop the stepper or call
//! [`Stepper::stop`]; no further step can fire).

mod error;
mod stepper;

pub use error::StepperError;
pub use stepper::{StepMode, Stepper};
