use super::EnergyEngine;
use super::config::GromacsConfig;
use super::error::EngineError;
use super::inputs::EngineInputs;
use super::process::{CommandLine, ProcessLogs, is_available, locate, run_subprocess};
use super::progress::{Progress, ProgressReporter};
use crate::core::energy::breakdown::EnergyBreakdown;
use crate::core::energy::canonical::{Engine, canonicalize};
use crate::core::io::traits::EnergyFile;
use crate::core::io::xvg::XvgFile;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Single,
    Double,
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Precision::Single => "single",
            Precision::Double => "double",
        })
    }
}

/// The three GROMACS tools a single-point evaluation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GromacsBinaries {
    pub grompp: CommandLine,
    pub mdrun: CommandLine,
    pub energy: CommandLine,
    pub precision: Precision,
}

impl GromacsBinaries {
    /// A single `gmx`-style driver with `grompp`/`mdrun`/`energy` subcommands.
    pub fn unified(binary: &str, precision: Precision) -> Self {
        Self {
            grompp: CommandLine::new(binary).arg("grompp"),
            mdrun: CommandLine::new(binary).arg("mdrun"),
            energy: CommandLine::new(binary).arg("energy"),
            precision,
        }
    }

    /// Pre-5.0 layout with one executable per tool.
    pub fn split(grompp: &str, mdrun: &str, energy: &str, precision: Precision) -> Self {
        Self {
            grompp: CommandLine::new(grompp),
            mdrun: CommandLine::new(mdrun),
            energy: CommandLine::new(energy),
            precision,
        }
    }

    /// Locates the best available toolchain on `PATH`, preferring double precision.
    pub fn locate() -> Result<Self, EngineError> {
        Self::locate_with(is_available)
    }

    fn locate_with(available: impl Fn(&str) -> bool) -> Result<Self, EngineError> {
        let all = |names: &[&str]| names.iter().all(|&n| available(n));
        let binaries = if available("gmx_d") {
            Self::unified("gmx_d", Precision::Double)
        } else if all(&["grompp_d", "mdrun_d", "g_energy_d"][..]) {
            Self::split("grompp_d", "mdrun_d", "g_energy_d", Precision::Double)
        } else if available("gmx") {
            Self::unified("gmx", Precision::Single)
        } else if all(&["grompp", "mdrun", "g_energy"][..]) {
            Self::split("grompp", "mdrun", "g_energy", Precision::Single)
        } else {
            return Err(EngineError::MissingExecutable {
                program: "gmx_d, gmx or grompp/mdrun/g_energy".to_string(),
            });
        };
        info!("Using {} precision binaries for GROMACS", binaries.precision);
        Ok(binaries)
    }

    /// Uses the configured driver when one is set, otherwise searches `PATH`.
    pub fn from_config(config: &GromacsConfig) -> Result<Self, EngineError> {
        match &config.binary {
            Some(binary) => {
                let resolved = locate(binary)?;
                let precision = if binary.ends_with("_d") {
                    Precision::Double
                } else {
                    Precision::Single
                };
                debug!("Using configured GROMACS driver {:?}", resolved);
                Ok(Self::unified(&resolved.to_string_lossy(), precision))
            }
            None => Self::locate(),
        }
    }
}

/// The stdin answer to `gmx energy`'s interactive term prompt: "1 2 ... N 0 ".
pub fn energy_selection(count: usize) -> String {
    let mut select = (1..=count)
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    select.push_str(" 0 ");
    select
}

pub(crate) fn absolute(path: &Path) -> Result<PathBuf, EngineError> {
    std::path::absolute(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Evaluates `.top`/`.gro` pairs with `grompp`, `mdrun` and `energy`.
#[derive(Debug, Clone)]
pub struct GromacsEngine {
    config: GromacsConfig,
}

impl GromacsEngine {
    pub fn new(config: GromacsConfig) -> Self {
        Self { config }
    }

    /// Runs the three-step single-point evaluation and returns the canonical breakdown.
    #[instrument(skip_all, name = "gromacs_energy", fields(top = %top.display()))]
    pub fn energy(
        &self,
        top: &Path,
        gro: &Path,
        mdp: &Path,
        reporter: &ProgressReporter,
    ) -> Result<EnergyBreakdown, EngineError> {
        let binaries = GromacsBinaries::from_config(&self.config)?;

        let top = absolute(top)?;
        let gro = absolute(gro)?;
        let mdp = absolute(mdp)?;
        let dir = EngineInputs::gromacs(&top, &gro).working_dir();

        let tpr = dir.join("topol.tpr");
        let ener = dir.join("ener.edr");
        let ener_xvg = dir.join("energy.xvg");
        let conf = dir.join("confout.gro");
        let mdout = dir.join("mdout.mdp");
        let state = dir.join("state.cpt");
        let traj = dir.join("traj.trr");
        let log = dir.join("md.log");
        let logs = ProcessLogs::in_dir(&dir, "gromacs");

        reporter.report(Progress::StepStart { step: "grompp" });
        let grompp = binaries
            .grompp
            .clone()
            .arg("-f")
            .arg(&mdp)
            .arg("-c")
            .arg(&gro)
            .arg("-p")
            .arg(&top)
            .arg("-o")
            .arg(&tpr)
            .arg("-po")
            .arg(&mdout)
            .arg("-maxwarn")
            .arg(self.config.max_warnings.to_string());
        run_subprocess(&grompp, &logs, None, Some(&dir))?;

        reporter.report(Progress::StepStart { step: "mdrun" });
        let mdrun = binaries
            .mdrun
            .clone()
            .arg("-nt")
            .arg(self.config.threads.to_string())
            .arg("-s")
            .arg(&tpr)
            .arg("-o")
            .arg(&traj)
            .arg("-cpo")
            .arg(&state)
            .arg("-c")
            .arg(&conf)
            .arg("-e")
            .arg(&ener)
            .arg("-g")
            .arg(&log);
        run_subprocess(&mdrun, &logs, None, Some(&dir))?;

        reporter.report(Progress::StepStart { step: "energy" });
        let genergy = binaries
            .energy
            .clone()
            .arg("-f")
            .arg(&ener)
            .arg("-o")
            .arg(&ener_xvg)
            .arg("-dp");
        let select = energy_selection(self.config.energy_selection);
        run_subprocess(&genergy, &logs, Some(&select), Some(&dir))?;

        let raw = XvgFile::read_from_path(&ener_xvg).map_err(|source| EngineError::Xvg {
            path: ener_xvg.clone(),
            source,
        })?;
        debug!("Parsed {} raw GROMACS terms from {:?}", raw.len(), ener_xvg);
        Ok(canonicalize(&raw, Engine::Gromacs))
    }
}

impl EnergyEngine for GromacsEngine {
    fn engine(&self) -> Engine {
        Engine::Gromacs
    }

    fn evaluate(
        &self,
        inputs: &EngineInputs,
        parameters: &Path,
        reporter: &ProgressReporter,
    ) -> Result<EnergyBreakdown, EngineError> {
        match inputs {
            EngineInputs::Gromacs { top, gro } => self.energy(top, gro, parameters, reporter),
            other => Err(EngineError::Input(format!(
                "GROMACS cannot evaluate {}",
                other
            ))),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::energy::canonical::CanonicalTerm;
    use crate::core::units::Energy;
    use crate::engine::testing::{SAMPLE_XVG, fake_gmx, write_script};

    #[test]
    fn locate_prefers_double_precision_unified_driver() {
        let b = GromacsBinaries::locate_with(|n| n == "gmx_d" || n == "gmx").unwrap();
        assert_eq!(b.precision, Precision::Double);
        assert_eq!(b.grompp.to_string(), "gmx_d grompp");
    }

    #[test]
    fn locate_falls_back_through_split_and_single_precision() {
        let split_d = |n: &str| ["grompp_d", "mdrun_d", "g_energy_d", "gmx"].contains(&n);
        let b = GromacsBinaries::locate_with(split_d).unwrap();
        assert_eq!(b.precision, Precision::Double);
        assert_eq!(b.energy.to_string(), "g_energy_d");

        let b = GromacsBinaries::locate_with(|n| n == "gmx").unwrap();
        assert_eq!(b.precision, Precision::Single);
        assert_eq!(b.mdrun.to_string(), "gmx mdrun");

        let split = |n: &str| ["grompp", "mdrun", "g_energy"].contains(&n);
        let b = GromacsBinaries::locate_with(split).unwrap();
        assert_eq!(b.grompp.to_string(), "grompp");
    }

    #[test]
    fn incomplete_split_toolchain_is_missing() {
        let err = GromacsBinaries::locate_with(|n| n == "grompp" || n == "mdrun").unwrap_err();
        assert!(matches!(err, EngineError::MissingExecutable { .. }));
    }

    #[test]
    fn energy_selection_matches_interactive_prompt_format() {
        assert_eq!(energy_selection(3), "1 2 3 0 ");
        assert!(energy_selection(19).starts_with("1 2 3"));
        assert!(energy_selection(19).ends_with("18 19 0 "));
    }

    #[test]
    fn runs_pipeline_and_returns_canonical_energy() {
        let dir = tempfile::tempdir().unwrap();
        let gmx = fake_gmx(dir.path(), SAMPLE_XVG);
        let top = dir.path().join("sys.top");
        let gro = dir.path().join("sys.gro");
        let mdp = dir.path().join("grompp.mdp");
        for p in [&top, &gro, &mdp] {
            std::fs::write(p, "").unwrap();
        }

        let engine = GromacsEngine::new(GromacsConfig {
            binary: Some(gmx.to_string_lossy().into_owned()),
            ..Default::default()
        });
        let energy = engine
            .evaluate(
                &EngineInputs::gromacs(&top, &gro),
                &mdp,
                &ProgressReporter::new(),
            )
            .unwrap();

        assert_eq!(energy.len(), CanonicalTerm::ALL.len());
        assert_eq!(energy.get("bond"), Some(Energy::kj(10.0)));
        assert_eq!(energy.get("nonbonded"), Some(Energy::kj(-45.0)));
        assert!(dir.path().join("energy.xvg").exists());

        let stdout = std::fs::read_to_string(dir.path().join("gromacs_stdout.txt")).unwrap();
        assert!(stdout.contains("grompp"));
        assert!(stdout.contains("-maxwarn 5"));
        assert!(stdout.contains("mdrun -nt 1"));
        assert!(stdout.contains("selection: 1 2 3"));
    }

    #[test]
    fn failing_step_surfaces_process_error() {
        let dir = tempfile::tempdir().unwrap();
        let gmx = write_script(dir.path(), "gmx", "echo 'Fatal error' >&2\nexit 1\n");
        let engine = GromacsEngine::new(GromacsConfig {
            binary: Some(gmx.to_string_lossy().into_owned()),
            ..Default::default()
        });
        let err = engine
            .energy(
                &dir.path().join("a.top"),
                &dir.path().join("a.gro"),
                &dir.path().join("grompp.mdp"),
                &ProgressReporter::new(),
            )
            .unwrap_err();
        match err {
            EngineError::ProcessFailed { stderr_log, .. } => {
                assert_eq!(stderr_log, dir.path().join("gromacs_stderr.txt"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn amber_inputs_are_rejected() {
        let engine = GromacsEngine::new(GromacsConfig::default());
        let err = engine
            .evaluate(
                &EngineInputs::amber("a.prmtop", "a.crd"),
                Path::new("mdin.in"),
                &ProgressReporter::new(),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::Input(_)));
    }
}
