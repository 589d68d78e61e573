use super::error::EngineError;
use crate::core::energy::canonical::Engine;
use std::fmt;
use std::path::{Path, PathBuf};

/// The on-disk file pair an engine evaluates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineInputs {
    Gromacs { top: PathBuf, gro: PathBuf },
    Amber { prmtop: PathBuf, inpcrd: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    GromacsTopology,
    GromacsCoordinates,
    AmberTopology,
    AmberCoordinates,
}

fn role_of(path: &Path) -> Option<Role> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "top" => Some(Role::GromacsTopology),
        "gro" => Some(Role::GromacsCoordinates),
        "prmtop" | "parm7" => Some(Role::AmberTopology),
        "inpcrd" | "crd" | "rst7" => Some(Role::AmberCoordinates),
        _ => None,
    }
}

impl EngineInputs {
    pub fn engine(&self) -> Engine {
        match self {
            EngineInputs::Gromacs { .. } => Engine::Gromacs,
            EngineInputs::Amber { .. } => Engine::Amber,
        }
    }

    /// Topology file; its directory is where the engine runs and writes its output.
    pub fn topology(&self) -> &Path {
        match self {
            EngineInputs::Gromacs { top, .. } => top,
            EngineInputs::Amber { prmtop, .. } => prmtop,
        }
    }

    pub fn coordinates(&self) -> &Path {
        match self {
            EngineInputs::Gromacs { gro, .. } => gro,
            EngineInputs::Amber { inpcrd, .. } => inpcrd,
        }
    }

    /// Directory the evaluation runs in (the topology's parent).
    pub fn working_dir(&self) -> PathBuf {
        match self.topology().parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Infers the engine from the extensions of exactly two files.
    ///
    /// Accepts `.top` + `.gro` for GROMACS and `.prmtop`/`.parm7` +
    /// `.inpcrd`/`.crd`/`.rst7` for AMBER, in either order.
    pub fn infer(paths: &[PathBuf]) -> Result<Self, EngineError> {
        let [a, b] = paths else {
            return Err(EngineError::Input(format!(
                "expected a topology and a coordinate file, got {} file(s)",
                paths.len()
            )));
        };
        let role = |p: &PathBuf| {
            role_of(p).ok_or_else(|| {
                EngineError::Input(format!("unrecognised file extension: {}", p.display()))
            })
        };
        match (role(a)?, role(b)?) {
            (Role::GromacsTopology, Role::GromacsCoordinates) => Ok(Self::gromacs(a, b)),
            (Role::GromacsCoordinates, Role::GromacsTopology) => Ok(Self::gromacs(b, a)),
            (Role::AmberTopology, Role::AmberCoordinates) => Ok(Self::amber(a, b)),
            (Role::AmberCoordinates, Role::AmberTopology) => Ok(Self::amber(b, a)),
            _ => Err(EngineError::Input(format!(
                "{} and {} do not form a GROMACS (.top/.gro) or AMBER (.prmtop/.inpcrd) pair",
                a.display(),
                b.display()
            ))),
        }
    }

    pub fn gromacs(top: impl Into<PathBuf>, gro: impl Into<PathBuf>) -> Self {
        EngineInputs::Gromacs {
            top: top.into(),
            gro: gro.into(),
        }
    }

    pub fn amber(prmtop: impl Into<PathBuf>, inpcrd: impl Into<PathBuf>) -> Self {
        EngineInputs::Amber {
            prmtop: prmtop.into(),
            inpcrd: inpcrd.into(),
        }
    }
}

impl fmt::Display for EngineInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}, {}]",
            self.engine(),
            self.topology().display(),
            self.coordinates().display()
        )
    }
}
