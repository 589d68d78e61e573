use crate::error::{CliError, Result};
use mdvalidate::core::energy::canonical::CanonicalTerm;
use mdvalidate::core::units::EnergyUnit;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileGromacsConfig {
    pub binary: Option<String>,
    pub mdp: Option<PathBuf>,
    pub vacuum_mdp: Option<PathBuf>,
    pub max_warnings: Option<u32>,
    pub threads: Option<u32>,
    pub energy_terms: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileAmberConfig {
    pub sander: Option<String>,
    pub mdin: Option<PathBuf>,
    pub vacuum_mdin: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileComparisonConfig {
    pub tolerance: Option<f64>,
    pub unit: Option<EnergyUnit>,
    pub terms: Option<Vec<CanonicalTerm>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub gromacs: Option<FileGromacsConfig>,
    pub amber: Option<FileAmberConfig>,
    pub comparison: Option<FileComparisonConfig>,
}

fn rebase(path: &mut Option<PathBuf>, base: &Path) {
    if let Some(p) = path.as_mut() {
        if p.is_relative() {
            *p = base.join(&*p);
        }
    }
}

impl FileConfig {
    /// Loads a config file. Relative run-parameter paths are taken relative to the
    /// file's own directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: FileConfig =
            toml::from_str(&content).map_err(|e| CliError::FileParsing {
                path: path.to_path_buf(),
                source: e.into(),
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        if let Some(g) = config.gromacs.as_mut() {
            rebase(&mut g.mdp, base);
            rebase(&mut g.vacuum_mdp, base);
        }
        if let Some(a) = config.amber.as_mut() {
            rebase(&mut a.mdin, base);
            rebase(&mut a.vacuum_mdin, base);
        }
        Ok(config)
    }
}
