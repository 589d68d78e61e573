//! Readers for the text output of the supported simulation engines.
//!
//! Each engine writes its single-point energies in its own idiosyncratic format. The
//! readers here turn that text into a raw
//! [`EnergyBreakdown`](crate::core::energy::breakdown::EnergyBreakdown) keyed by the
//! engine's own term names, and fail loudly when the expected markers are missing
//! instead of silently producing zeros.

pub mod mdout;
pub mod traits;
pub mod xvg;
