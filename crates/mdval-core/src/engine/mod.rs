//! # Engine Module
//!
//! Drives the external simulation engines through a single-point energy evaluation.
//!
//! Each evaluation is a straight line: locate the binaries (failing fast when they are
//! missing), run the engine's command-line tools in the directory of the topology file,
//! append their output to `<engine>_stdout.txt`/`<engine>_stderr.txt`, parse the energy
//! output and canonicalize it. Every failure is terminal and propagated to the caller.
//!
//! - [`process`] - Subprocess execution and executable discovery
//! - [`gromacs`] / [`amber`] - Engine-specific command lines
//! - [`inputs`] - The file pairs each engine consumes
//! - [`config`] - Evaluation and comparison settings
//! - [`progress`] - Progress events for front ends

pub mod amber;
pub mod config;
pub mod error;
pub mod gromacs;
pub mod inputs;
pub mod process;
pub mod progress;

#[cfg(all(test, unix))]
pub(crate) mod testing;

use crate::core::energy::breakdown::EnergyBreakdown;
use crate::core::energy::canonical::Engine;
use amber::AmberEngine;
use config::EvaluationConfig;
use error::EngineError;
use gromacs::GromacsEngine;
use inputs::EngineInputs;
use progress::{Progress, ProgressReporter};
use std::path::Path;

/// A simulation engine able to evaluate the single-point energy of an input set.
pub trait EnergyEngine {
    fn engine(&self) -> Engine;

    /// Evaluates `inputs` with the run-parameter file `parameters` and returns the
    /// canonical energy breakdown in the engine's native unit.
    fn evaluate(
        &self,
        inputs: &EngineInputs,
        parameters: &Path,
        reporter: &ProgressReporter,
    ) -> Result<EnergyBreakdown, EngineError>;
}

pub fn evaluator_for(engine: Engine, config: &EvaluationConfig) -> Box<dyn EnergyEngine> {
    match engine {
        Engine::Gromacs => Box::new(GromacsEngine::new(config.gromacs.clone())),
        Engine::Amber => Box::new(AmberEngine::new(config.amber.clone())),
    }
}

/// Evaluates `inputs` with the engine they belong to, choosing the run parameters
/// configured for that engine by `case_name`.
pub fn evaluate(
    inputs: &EngineInputs,
    case_name: &str,
    config: &EvaluationConfig,
    reporter: &ProgressReporter,
) -> Result<EnergyBreakdown, EngineError> {
    let engine = inputs.engine();
    let parameters = match engine {
        Engine::Gromacs => config.gromacs.parameters.as_ref(),
        Engine::Amber => config.amber.parameters.as_ref(),
    }
    .ok_or(config::ConfigError::MissingParameter(match engine {
        Engine::Gromacs => "gromacs.mdp",
        Engine::Amber => "amber.mdin",
    }))?
    .select(case_name);

    reporter.report(Progress::EvaluationStart {
        engine,
        label: case_name.to_string(),
    });
    let result = evaluator_for(engine, config).evaluate(inputs, parameters, reporter);
    reporter.report(Progress::EvaluationFinish);
    result
}
