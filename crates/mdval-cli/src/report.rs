use crate::error::{CliError, Result};
use mdvalidate::workflows::compare::Comparison;
use serde::Serialize;
use std::path::Path;
use tracing::info;

const HEADER: [&str; 9] = [
    "case",
    "reference_engine",
    "converted_engine",
    "term",
    "reference",
    "converted",
    "difference",
    "unit",
    "within_tolerance",
];

/// One CSV row per canonical term of a comparison, in the reference unit.
#[derive(Debug, Serialize, PartialEq)]
pub struct ComparisonRow<'a> {
    pub case: &'a str,
    pub reference_engine: &'static str,
    pub converted_engine: &'static str,
    pub term: &'a str,
    pub reference: f64,
    pub converted: f64,
    pub difference: f64,
    pub unit: &'static str,
    pub within_tolerance: bool,
}

pub fn comparison_rows(comparison: &Comparison) -> Vec<ComparisonRow<'_>> {
    let unit = comparison.reference_engine.native_unit().symbol();
    comparison
        .diff
        .iter()
        .map(|(term, delta)| ComparisonRow {
            case: &comparison.case_name,
            reference_engine: comparison.reference_engine.name(),
            converted_engine: comparison.converted_engine.name(),
            term,
            reference: comparison.reference.get(term).map_or(0.0, |e| e.value),
            converted: comparison.converted.get(term).map_or(0.0, |e| e.value),
            difference: delta.value,
            unit,
            within_tolerance: !comparison.violations.iter().any(|(t, _)| t == term),
        })
        .collect()
}

pub fn write_report<'a>(
    path: &Path,
    comparisons: impl IntoIterator<Item = &'a Comparison>,
) -> Result<()> {
    let report_err = |source: csv::Error| CliError::Report {
        path: path.to_path_buf(),
        source,
    };

    // Header is present even when no case was compared.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(report_err)?;
    writer.write_record(HEADER).map_err(report_err)?;
    let mut rows = 0usize;
    for comparison in comparisons {
        for row in comparison_rows(comparison) {
            writer.serialize(row).map_err(report_err)?;
            rows += 1;
        }
    }
    writer
        .flush()
        .map_err(|e| report_err(csv::Error::from(e)))?;
    info!("Wrote {} report row(s) to {:?}", rows, path);
    Ok(())
}
