use super::EnergyEngine;
use super::config::AmberConfig;
use super::error::EngineError;
use super::gromacs::absolute;
use super::inputs::EngineInputs;
use super::process::{CommandLine, ProcessLogs, locate, run_subprocess};
use super::progress::{Progress, ProgressReporter};
use crate::core::energy::breakdown::EnergyBreakdown;
use crate::core::energy::canonical::{Engine, canonicalize};
use crate::core::io::mdout::MdoutFile;
use crate::core::io::traits::EnergyFile;
use std::path::Path;
use tracing::{debug, instrument};

const SANDER: &str = "sander";

/// Evaluates `.prmtop`/`.inpcrd` pairs with a single `sander` run.
#[derive(Debug, Clone, Default)]
pub struct AmberEngine {
    config: AmberConfig,
}

impl AmberEngine {
    pub fn new(config: AmberConfig) -> Self {
        Self { config }
    }

    #[instrument(skip_all, name = "amber_energy", fields(prmtop = %prmtop.display()))]
    pub fn energy(
        &self,
        prmtop: &Path,
        inpcrd: &Path,
        mdin: &Path,
        reporter: &ProgressReporter,
    ) -> Result<EnergyBreakdown, EngineError> {
        let sander = locate(self.config.sander.as_deref().unwrap_or(SANDER))?;

        let prmtop = absolute(prmtop)?;
        let inpcrd = absolute(inpcrd)?;
        let mdin = absolute(mdin)?;
        let dir = EngineInputs::amber(&prmtop, &inpcrd).working_dir();

        let mdout = dir.join("mdout");
        let restrt = dir.join("restrt");
        let mdinfo = dir.join("mdinfo");
        let logs = ProcessLogs::in_dir(&dir, "amber");

        reporter.report(Progress::StepStart { step: "sander" });
        let command = CommandLine::new(sander.to_string_lossy())
            .arg("-O")
            .arg("-i")
            .arg(&mdin)
            .arg("-p")
            .arg(&prmtop)
            .arg("-c")
            .arg(&inpcrd)
            .arg("-o")
            .arg(&mdout)
            .arg("-r")
            .arg(&restrt)
            .arg("-inf")
            .arg(&mdinfo);
        run_subprocess(&command, &logs, None, Some(&dir))?;

        let raw = MdoutFile::read_from_path(&mdout).map_err(|source| EngineError::Mdout {
            path: mdout.clone(),
            source,
        })?;
        debug!("Parsed {} raw AMBER terms from {:?}", raw.len(), mdout);
        Ok(canonicalize(&raw, Engine::Amber))
    }
}

impl EnergyEngine for AmberEngine {
    fn engine(&self) -> Engine {
        Engine::Amber
    }

    fn evaluate(
        &self,
        inputs: &EngineInputs,
        parameters: &Path,
        reporter: &ProgressReporter,
    ) -> Result<EnergyBreakdown, EngineError> {
        match inputs {
            EngineInputs::Amber { prmtop, inpcrd } => {
                self.energy(prmtop, inpcrd, parameters, reporter)
            }
            other => Err(EngineError::Input(format!("AMBER cannot evaluate {}", other))),
        }
    }
}
