pub mod compare;
pub mod energy;
pub mod parse;
pub mod suite;

use mdvalidate::engine::inputs::EngineInputs;

/// Default case name: the topology's file stem.
pub(crate) fn default_case_name(inputs: &EngineInputs) -> String {
    inputs
        .topology()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "case".to_string())
}
