//! Gamma correction and color math for Busylight LED output.
//!
//! LEDs are driven linearly but perceived logarithmically; the
//! [`GammaLut`] remaps requested channel intensity onto hardware duty so
//! that a 50% request looks half as bright instead of nearly full.
//! [`Color`] is the plain RGB triple every other crate in this workspace
//! trades in.

pub mod color;
pub mod gamma;

pub use color::Color;
pub use gamma::GammaLut;
