use crate::core::energy::canonical::CanonicalTerm;
use crate::core::energy::diff::Tolerance;
use crate::core::units::EnergyUnit;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default absolute tolerance on the checked terms, in kJ/mol.
pub const DEFAULT_TOLERANCE_KJ: f64 = 1.0e-6;
pub const DEFAULT_MAX_WARNINGS: u32 = 5;
pub const DEFAULT_THREADS: u32 = 1;
/// Number of `gmx energy` selections piped on stdin ("1 2 ... N 0").
pub const DEFAULT_ENERGY_SELECTION: usize = 19;

/// Marker in a case name that selects the vacuum run parameters.
pub const VACUUM_MARKER: &str = "_vacuum";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Engine run-parameter files (`.mdp` for GROMACS, `.in` for AMBER).
#[derive(Debug, Clone, PartialEq)]
pub struct RunParameters {
    pub standard: PathBuf,
    pub vacuum: Option<PathBuf>,
}

impl RunParameters {
    pub fn new(standard: PathBuf, vacuum: Option<PathBuf>) -> Self {
        Self { standard, vacuum }
    }

    /// Picks the vacuum parameters for cases whose name contains `_vacuum`.
    pub fn select(&self, case_name: &str) -> &Path {
        match &self.vacuum {
            Some(vacuum) if case_name.contains(VACUUM_MARKER) => vacuum,
            _ => &self.standard,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GromacsConfig {
    /// Explicit unified binary (e.g. `gmx_mpi`); skips discovery when set.
    pub binary: Option<String>,
    pub parameters: Option<RunParameters>,
    pub max_warnings: u32,
    pub threads: u32,
    pub energy_selection: usize,
}

impl Default for GromacsConfig {
    fn default() -> Self {
        Self {
            binary: None,
            parameters: None,
            max_warnings: DEFAULT_MAX_WARNINGS,
            threads: DEFAULT_THREADS,
            energy_selection: DEFAULT_ENERGY_SELECTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AmberConfig {
    /// Explicit `sander` executable; skips discovery when set.
    pub sander: Option<String>,
    pub parameters: Option<RunParameters>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonConfig {
    pub tolerance: Tolerance,
    /// Terms the tolerance is enforced on; an empty list enforces it on every term.
    pub checked_terms: Vec<CanonicalTerm>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::new(DEFAULT_TOLERANCE_KJ, EnergyUnit::KilojoulePerMole),
            checked_terms: vec![CanonicalTerm::Potential],
        }
    }
}

impl ComparisonConfig {
    pub fn checked_names(&self) -> Vec<&'static str> {
        self.checked_terms.iter().map(|t| t.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvaluationConfig {
    pub gromacs: GromacsConfig,
    pub amber: AmberConfig,
    pub comparison: ComparisonConfig,
}

#[derive(Default)]
pub struct EvaluationConfigBuilder {
    gromacs_binary: Option<String>,
    gromacs_parameters: Option<RunParameters>,
    max_warnings: Option<u32>,
    threads: Option<u32>,
    energy_selection: Option<usize>,
    sander: Option<String>,
    amber_parameters: Option<RunParameters>,
    tolerance: Option<Tolerance>,
    checked_terms: Option<Vec<CanonicalTerm>>,
}

impl EvaluationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gromacs_binary(mut self, binary: String) -> Self {
        self.gromacs_binary = Some(binary);
        self
    }
    pub fn gromacs_parameters(mut self, parameters: RunParameters) -> Self {
        self.gromacs_parameters = Some(parameters);
        self
    }
    pub fn max_warnings(mut self, n: u32) -> Self {
        self.max_warnings = Some(n);
        self
    }
    pub fn threads(mut self, n: u32) -> Self {
        self.threads = Some(n);
        self
    }
    pub fn energy_selection(mut self, n: usize) -> Self {
        self.energy_selection = Some(n);
        self
    }
    pub fn sander(mut self, sander: String) -> Self {
        self.sander = Some(sander);
        self
    }
    pub fn amber_parameters(mut self, parameters: RunParameters) -> Self {
        self.amber_parameters = Some(parameters);
        self
    }
    pub fn tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
    pub fn checked_terms(mut self, terms: Vec<CanonicalTerm>) -> Self {
        self.checked_terms = Some(terms);
        self
    }

    pub fn build(self) -> Result<EvaluationConfig, ConfigError> {
        let defaults = EvaluationConfig::default();

        let threads = self.threads.unwrap_or(defaults.gromacs.threads);
        if threads == 0 {
            return Err(ConfigError::InvalidValue {
                name: "threads",
                reason: "must be at least 1".to_string(),
            });
        }
        let energy_selection = self
            .energy_selection
            .unwrap_or(defaults.gromacs.energy_selection);
        if energy_selection == 0 {
            return Err(ConfigError::InvalidValue {
                name: "energy_selection",
                reason: "must select at least one term".to_string(),
            });
        }
        let tolerance = self.tolerance.unwrap_or(defaults.comparison.tolerance);
        if !(tolerance.value >= 0.0) {
            return Err(ConfigError::InvalidValue {
                name: "tolerance",
                reason: format!("must be a non-negative number, got {}", tolerance.value),
            });
        }

        Ok(EvaluationConfig {
            gromacs: GromacsConfig {
                binary: self.gromacs_binary,
                parameters: self.gromacs_parameters,
                max_warnings: self.max_warnings.unwrap_or(defaults.gromacs.max_warnings),
                threads,
                energy_selection,
            },
            amber: AmberConfig {
                sander: self.sander,
                parameters: self.amber_parameters,
            },
            comparison: ComparisonConfig {
                tolerance,
                checked_terms: self
                    .checked_terms
                    .unwrap_or(defaults.comparison.checked_terms),
            },
        })
    }
}
