//! # Workflows Module
//!
//! End-to-end validation procedures built on the [`engine`](crate::engine) drivers and
//! the [`core`](crate::core) energy operations.
//!
//! - **Comparison** ([`compare`]) - Evaluate a reference and a converted input set, diff
//!   their canonical breakdowns and check the configured terms against the tolerance.
//! - **Suite** ([`suite`]) - Discover reference/converted cases below a directory and run
//!   them one after another, recording failures without stopping.

pub mod compare;
pub mod suite;
