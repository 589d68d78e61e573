use super::default_case_name;
use crate::cli::CompareArgs;
use crate::display::tables;
use crate::error::{CliError, Result};
use crate::report;
use crate::utils::progress::CliProgressHandler;
use mdvalidate::engine::{
    config::EvaluationConfig, inputs::EngineInputs, progress::ProgressReporter,
};
use mdvalidate::workflows;
use std::io;
use tracing::info;

pub fn run(args: CompareArgs, config: &EvaluationConfig) -> Result<()> {
    let reference = EngineInputs::infer(&args.reference)?;
    let converted = EngineInputs::infer(&args.converted)?;
    let name = args.name.unwrap_or_else(|| default_case_name(&reference));

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the comparison workflow for '{}'", name);
    let comparison = workflows::compare::run(&reference, &converted, &name, config, &reporter)?;

    tables::print_comparison(&mut io::stdout().lock(), &comparison)?;

    if let Some(path) = &args.report {
        report::write_report(path, [&comparison])?;
    }

    if comparison.passed() {
        Ok(())
    } else {
        let terms: Vec<_> = comparison
            .violations
            .iter()
            .map(|(term, _)| term.as_str())
            .collect();
        Err(CliError::ValidationFailed(format!(
            "'{}' differs beyond tolerance in: {}",
            name,
            terms.join(", ")
        )))
    }
}
