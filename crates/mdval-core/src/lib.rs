//! # mdvalidate Core Library
//!
//! Checks that a molecular structure converted between molecular-dynamics file formats
//! still evaluates to the same potential energy under the external simulation engines
//! (GROMACS and AMBER/sander).
//!
//! ## Architectural Philosophy
//!
//! The library follows the same three-layer split used throughout:
//!
//! - **[`core`]: The Foundation.** Stateless energy quantities with explicit units,
//!   ordered energy breakdowns, the canonical term vocabulary, diffing, and the parsers
//!   for each engine's output format.
//!
//! - **[`engine`]: The Drivers.** Subprocess execution and the engine-specific command
//!   lines needed for a single-point energy evaluation, plus configuration and errors.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures that evaluate a reference
//!   and a converted input set, diff the canonical breakdowns and check the result
//!   against a tolerance, either for one case or for a discovered suite of cases.

pub mod core;
pub mod engine;
pub mod workflows;
