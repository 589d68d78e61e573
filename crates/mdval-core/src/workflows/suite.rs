use super::compare::{self, Comparison};
use crate::core::energy::breakdown::EnergyBreakdown;
use crate::engine;
use crate::engine::config::EvaluationConfig;
use crate::engine::error::EngineError;
use crate::engine::inputs::EngineInputs;
use crate::engine::progress::{Progress, ProgressReporter};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Prefix marking the converted counterpart of a reference input set.
pub const CONVERTED_PREFIX: &str = "out_";

const AMBER_COORDINATE_EXTENSIONS: [&str; 2] = ["crd", "inpcrd"];

/// A reference input set and, when present, its converted counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteCase {
    pub name: String,
    pub reference: EngineInputs,
    pub converted: Option<EngineInputs>,
}

#[derive(Debug)]
pub enum CaseOutcome {
    /// No converted counterpart; only the reference energy was evaluated.
    Evaluated(EnergyBreakdown),
    Compared(Comparison),
    Failed(EngineError),
}

#[derive(Debug)]
pub struct CaseResult {
    pub name: String,
    pub outcome: CaseOutcome,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        match &self.outcome {
            CaseOutcome::Evaluated(_) => true,
            CaseOutcome::Compared(comparison) => comparison.passed(),
            CaseOutcome::Failed(_) => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct SuiteReport {
    pub cases: Vec<CaseResult>,
}

impl SuiteReport {
    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &CaseResult> {
        self.cases.iter().filter(|c| !c.passed())
    }

    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(CaseResult::passed)
    }
}

fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, EngineError> {
    let io_err = |source| EngineError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = std::fs::read_dir(dir)
        .map_err(io_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;
    entries.sort();
    Ok(entries)
}

fn stems_with_extension(files: &[PathBuf], ext: &str) -> BTreeSet<String> {
    files
        .iter()
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(ext))
        .filter_map(|p| p.file_stem()?.to_str().map(str::to_string))
        .filter(|stem| !stem.starts_with(CONVERTED_PREFIX))
        .collect()
}

fn amber_coordinates(dir: &Path, stem: &str) -> Option<PathBuf> {
    AMBER_COORDINATE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", stem, ext)))
        .find(|p| p.is_file())
}

/// Looks for `out_<stem>` files of either engine next to a reference.
fn converted_counterpart(dir: &Path, stem: &str) -> Option<EngineInputs> {
    let out = format!("{}{}", CONVERTED_PREFIX, stem);
    let top = dir.join(format!("{}.top", out));
    let gro = dir.join(format!("{}.gro", out));
    if top.is_file() && gro.is_file() {
        return Some(EngineInputs::gromacs(top, gro));
    }
    let prmtop = dir.join(format!("{}.prmtop", out));
    if prmtop.is_file() {
        return amber_coordinates(dir, &out).map(|crd| EngineInputs::amber(prmtop, crd));
    }
    None
}

fn case_name(dir_name: &str, stem: &str) -> String {
    if dir_name == stem {
        stem.to_string()
    } else {
        format!("{}/{}", dir_name, stem)
    }
}

fn discover_in(dir: &Path) -> Result<Vec<SuiteCase>, EngineError> {
    let dir_name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let files = list_dir(dir)?;
    let mut cases = Vec::new();

    let gro = stems_with_extension(&files, "gro");
    let top = stems_with_extension(&files, "top");
    if gro != top {
        let unpaired: Vec<_> = gro.symmetric_difference(&top).cloned().collect();
        return Err(EngineError::Input(format!(
            "{}: .gro and .top files must share a basename (unpaired: {})",
            dir.display(),
            unpaired.join(", ")
        )));
    }
    for stem in &gro {
        cases.push(SuiteCase {
            name: case_name(&dir_name, stem),
            reference: EngineInputs::gromacs(
                dir.join(format!("{}.top", stem)),
                dir.join(format!("{}.gro", stem)),
            ),
            converted: converted_counterpart(dir, stem),
        });
    }

    let prmtop = dir.join(format!("{}.prmtop", dir_name));
    if prmtop.is_file() {
        let inpcrd = amber_coordinates(dir, &dir_name).ok_or_else(|| {
            EngineError::Input(format!(
                "{}: no {}.crd or {}.inpcrd next to {}",
                dir.display(),
                dir_name,
                dir_name,
                prmtop.display()
            ))
        })?;
        cases.push(SuiteCase {
            name: dir_name.clone(),
            reference: EngineInputs::amber(prmtop, inpcrd),
            converted: converted_counterpart(dir, &dir_name),
        });
    }

    Ok(cases)
}

/// Discovers validation cases in the immediate subdirectories of `root`.
///
/// GROMACS cases are `<root>/*/<name>.gro` files paired with `<name>.top`; AMBER cases
/// are `<root>/<case>/<case>.prmtop` with `<case>.crd` or `<case>.inpcrd`. A reference
/// whose `out_<name>` files exist is compared against them.
pub fn discover(root: &Path) -> Result<Vec<SuiteCase>, EngineError> {
    let mut cases = Vec::new();
    for dir in list_dir(root)?.into_iter().filter(|p| p.is_dir()) {
        let found = discover_in(&dir)?;
        debug!("Found {} case(s) in {:?}", found.len(), dir);
        cases.extend(found);
    }
    info!("Discovered {} case(s) below {:?}", cases.len(), root);
    Ok(cases)
}

fn run_case(
    case: &SuiteCase,
    config: &EvaluationConfig,
    reporter: &ProgressReporter,
) -> Result<CaseOutcome, EngineError> {
    match &case.converted {
        Some(converted) => {
            compare::run(&case.reference, converted, &case.name, config, reporter)
                .map(CaseOutcome::Compared)
        }
        None => engine::evaluate(&case.reference, &case.name, config, reporter)
            .map(CaseOutcome::Evaluated),
    }
}

/// Runs every case in order. A failing case is recorded and the suite moves on.
#[instrument(skip_all, name = "suite_workflow", fields(cases = cases.len()))]
pub fn run(
    cases: &[SuiteCase],
    config: &EvaluationConfig,
    reporter: &ProgressReporter,
) -> SuiteReport {
    reporter.report(Progress::SuiteStart {
        total_cases: cases.len() as u64,
    });

    let mut report = SuiteReport::default();
    for case in cases {
        let outcome = run_case(case, config, reporter).unwrap_or_else(|e| {
            warn!("Case '{}' failed: {}", case.name, e);
            CaseOutcome::Failed(e)
        });
        let result = CaseResult {
            name: case.name.clone(),
            outcome,
        };
        reporter.report(Progress::CaseFinish {
            name: result.name.clone(),
            passed: result.passed(),
        });
        report.cases.push(result);
    }

    info!(
        "Suite finished: {}/{} case(s) passed",
        report.passed_count(),
        report.cases.len()
    );
    report
}
