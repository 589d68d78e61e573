//! # Core Module
//!
//! Stateless building blocks shared by the engine drivers and the workflows.
//!
//! - **Quantities** ([`units`]) - Energy values tagged with their physical unit
//! - **Energy Breakdowns** ([`energy`]) - Ordered term maps, canonicalization and diffing
//! - **Output Parsing** ([`io`]) - Readers for GROMACS `.xvg` and AMBER `mdout` files
//!
//! Nothing in this module spawns processes or touches engine binaries.

pub mod energy;
pub mod io;
pub mod units;
