//! # Energy Module
//!
//! Named decompositions of a structure's potential energy and the operations the
//! validation pipeline applies to them.
//!
//! - [`breakdown`] - The ordered, unique-keyed term map produced by every evaluation
//! - [`canonical`] - Engine-specific lookup tables and the fixed canonical vocabulary
//! - [`diff`] - Term-by-term signed differences and tolerance checks

pub mod breakdown;
pub mod canonical;
pub mod diff;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnergyError {
    #[error("Energy term '{0}' appears more than once in the breakdown")]
    DuplicateTerm(String),

    #[error("\"{0}\" energy present in reference but not in comparison")]
    MissingTerm(String),
}
