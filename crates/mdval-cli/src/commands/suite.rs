use crate::cli::SuiteArgs;
use crate::display::tables;
use crate::error::{CliError, Result};
use crate::report;
use crate::utils::progress::CliProgressHandler;
use mdvalidate::engine::{config::EvaluationConfig, progress::ProgressReporter};
use mdvalidate::workflows::suite::{self, CaseOutcome};
use std::io;
use tracing::{info, warn};

pub fn run(args: SuiteArgs, config: &EvaluationConfig) -> Result<()> {
    let cases = suite::discover(&args.dir)?;
    if cases.is_empty() {
        warn!("No validation cases found below {:?}", args.dir);
        println!("No validation cases found below {}", args.dir.display());
        return Ok(());
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Running {} case(s)", cases.len());
    let results = suite::run(&cases, config, &reporter);

    tables::print_suite_summary(&mut io::stdout().lock(), &results)?;

    if let Some(path) = &args.report {
        let comparisons = results.cases.iter().filter_map(|c| match &c.outcome {
            CaseOutcome::Compared(comparison) => Some(comparison),
            _ => None,
        });
        report::write_report(path, comparisons)?;
    }

    if results.all_passed() {
        Ok(())
    } else {
        let failed: Vec<_> = results.failed().map(|c| c.name.as_str()).collect();
        Err(CliError::ValidationFailed(format!(
            "{} of {} case(s) failed: {}",
            failed.len(),
            results.cases.len(),
            failed.join(", ")
        )))
    }
}
