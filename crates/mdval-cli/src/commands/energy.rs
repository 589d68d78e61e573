use super::default_case_name;
use crate::cli::EnergyArgs;
use crate::display::tables;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use mdvalidate::engine::{
    self, config::EvaluationConfig, inputs::EngineInputs, progress::ProgressReporter,
};
use std::io;
use tracing::info;

pub fn run(args: EnergyArgs, config: &EvaluationConfig) -> Result<()> {
    let inputs = EngineInputs::infer(&args.files)?;
    let name = args.name.unwrap_or_else(|| default_case_name(&inputs));
    info!("Evaluating '{}' with {}", name, inputs.engine());

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let energy = engine::evaluate(&inputs, &name, config, &reporter)?;

    tables::print_breakdown(
        &mut io::stdout().lock(),
        &format!("{} ({})", name, inputs.engine()),
        &energy,
    )?;
    Ok(())
}
