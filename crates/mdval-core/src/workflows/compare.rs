use crate::core::energy::EnergyError;
use crate::core::energy::breakdown::EnergyBreakdown;
use crate::core::energy::canonical::Engine;
use crate::core::energy::diff::{EnergyDiff, Tolerance, energy_diff};
use crate::core::units::Energy;
use crate::engine;
use crate::engine::config::{ComparisonConfig, EvaluationConfig};
use crate::engine::error::EngineError;
use crate::engine::inputs::EngineInputs;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

/// Outcome of comparing a converted input set against its reference.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub case_name: String,
    pub reference_engine: Engine,
    pub converted_engine: Engine,
    pub reference: EnergyBreakdown,
    /// Converted breakdown, expressed in the reference unit.
    pub converted: EnergyBreakdown,
    pub diff: EnergyDiff,
    pub tolerance: Tolerance,
    /// Checked terms whose difference the tolerance does not admit.
    pub violations: Vec<(String, Energy)>,
}

impl Comparison {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Diffs two canonical breakdowns and applies the tolerance check.
pub fn compare_breakdowns(
    case_name: &str,
    reference: (Engine, EnergyBreakdown),
    converted: (Engine, EnergyBreakdown),
    config: &ComparisonConfig,
) -> Result<Comparison, EnergyError> {
    let (reference_engine, reference) = reference;
    let (converted_engine, converted) = converted;
    let converted = converted.converted_to(reference_engine.native_unit());

    let diff = energy_diff(&reference, &converted)?;
    let violations = diff.exceeding(config.tolerance, &config.checked_names());

    for (term, delta) in &violations {
        warn!(
            "{}: {} energy differs by {:.6} (tolerance {} {})",
            case_name, term, delta, config.tolerance.value, config.tolerance.unit
        );
    }

    Ok(Comparison {
        case_name: case_name.to_string(),
        reference_engine,
        converted_engine,
        reference,
        converted,
        diff,
        tolerance: config.tolerance,
        violations,
    })
}

/// Evaluates both input sets and compares their canonical energies.
#[instrument(skip_all, name = "compare_workflow", fields(case = case_name))]
pub fn run(
    reference: &EngineInputs,
    converted: &EngineInputs,
    case_name: &str,
    config: &EvaluationConfig,
    reporter: &ProgressReporter,
) -> Result<Comparison, EngineError> {
    info!("Evaluating reference {}", reference);
    let reference_energy = engine::evaluate(reference, case_name, config, reporter)?;

    info!("Evaluating converted {}", converted);
    let converted_energy = engine::evaluate(converted, case_name, config, reporter)?;

    let comparison = compare_breakdowns(
        case_name,
        (reference.engine(), reference_energy),
        (converted.engine(), converted_energy),
        &config.comparison,
    )?;

    let verdict = if comparison.passed() { "passed" } else { "FAILED" };
    reporter.report(Progress::Message(format!(
        "{}: {} -> {} {}",
        case_name, comparison.reference_engine, comparison.converted_engine, verdict
    )));
    info!("Comparison for '{}' {}", case_name, verdict);
    Ok(comparison)
}
