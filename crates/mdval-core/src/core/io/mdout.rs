use super::traits::EnergyFile;
use crate::core::energy::EnergyError;
use crate::core::energy::breakdown::EnergyBreakdown;
use crate::core::energy::canonical::Engine;
use crate::core::units::Energy;
use std::io::{self, BufRead};
use thiserror::Error;

/// Key under which the summary-line total potential is stored.
pub const TOTAL_ENERGY_TERM: &str = "ENERGY";

/// Column ranges of the three `NAME = value` fields on an mdout energy line.
const TERM_COLUMNS: [(usize, usize); 3] = [(1, 24), (26, 49), (51, 77)];

#[derive(Debug, Error)]
pub enum MdoutError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: MdoutParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(&'static str),
    #[error(transparent)]
    Energy(#[from] EnergyError),
}

#[derive(Debug, Error)]
pub enum MdoutParseErrorKind {
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Field in columns {columns} has no '=' separator")]
    MissingSeparator { columns: String },
    #[error("Energy summary line has no ENERGY column")]
    ShortSummary,
}

/// AMBER `mdout` as written by a `sander` minimisation run.
pub struct MdoutFile;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    SearchingHeader,
    Summary,
    SummaryGap,
    Terms,
}

fn columns_label(start: usize, end: usize) -> String {
    format!("{}-{}", start + 1, end)
}

fn parse_float(token: &str, line: usize, columns: String) -> Result<f64, MdoutError> {
    token.parse().map_err(|_| MdoutError::Parse {
        line,
        kind: MdoutParseErrorKind::InvalidFloat {
            columns,
            value: token.to_string(),
        },
    })
}

fn read_term_line(
    line: &str,
    line_num: usize,
    breakdown: &mut EnergyBreakdown,
) -> Result<(), MdoutError> {
    for (start, end) in TERM_COLUMNS {
        let Some(field) = line.get(start..end.min(line.len())) else {
            continue;
        };
        if field.trim().is_empty() {
            continue;
        }
        let (name, value) = field.split_once('=').ok_or_else(|| MdoutError::Parse {
            line: line_num,
            kind: MdoutParseErrorKind::MissingSeparator {
                columns: columns_label(start, end),
            },
        })?;
        let value = parse_float(value.trim(), line_num, columns_label(start, end))?;
        breakdown.try_insert(name.trim(), Energy::kcal(value))?;
    }
    Ok(())
}

impl EnergyFile for MdoutFile {
    const ENGINE: Engine = Engine::Amber;
    type Error = MdoutError;

    fn read_from(reader: &mut impl BufRead) -> Result<EnergyBreakdown, Self::Error> {
        let mut breakdown = EnergyBreakdown::new();
        let mut section = Section::SearchingHeader;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match section {
                Section::SearchingHeader => {
                    if line.contains("NSTEP") {
                        section = Section::Summary;
                    }
                }
                Section::Summary => {
                    let token = line
                        .split_whitespace()
                        .nth(1)
                        .ok_or(MdoutError::Parse {
                            line: line_num,
                            kind: MdoutParseErrorKind::ShortSummary,
                        })?;
                    let potential = parse_float(token, line_num, "ENERGY".to_string())?;
                    breakdown.try_insert(TOTAL_ENERGY_TERM, Energy::kcal(potential))?;
                    section = Section::SummaryGap;
                }
                Section::SummaryGap => section = Section::Terms,
                Section::Terms => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if !line.contains('=') {
                        break;
                    }
                    read_term_line(&line, line_num, &mut breakdown)?;
                }
            }
        }

        match section {
            Section::SearchingHeader => Err(MdoutError::MissingRecord("NSTEP energy header")),
            Section::Summary => Err(MdoutError::MissingRecord("energy summary line")),
            Section::SummaryGap | Section::Terms => Ok(breakdown),
        }
    }
}
