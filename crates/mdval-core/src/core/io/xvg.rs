use super::traits::EnergyFile;
use crate::core::energy::EnergyError;
use crate::core::energy::breakdown::EnergyBreakdown;
use crate::core::energy::canonical::Engine;
use crate::core::units::Energy;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XvgError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XvgParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(&'static str),
    #[error("Found {legends} legend(s) but {values} value(s) on the last data line")]
    CountMismatch { legends: usize, values: usize },
    #[error(transparent)]
    Energy(#[from] EnergyError),
}

#[derive(Debug, Error)]
pub enum XvgParseErrorKind {
    #[error("Legend directive has no quoted name")]
    UnquotedLegend,
    #[error("Invalid float value '{0}'")]
    InvalidFloat(String),
}

/// GROMACS `energy.xvg` as written by `gmx energy`.
///
/// Term names come from the `@ sN legend "Name"` directives; their values are taken
/// from the last data row, whose first column is the time and is skipped.
pub struct XvgFile;

/// Extracts the quoted name of a `@ sN legend "Name"` directive, or `None` for any other
/// directive.
fn legend_name(line: &str) -> Option<Result<String, XvgParseErrorKind>> {
    let rest = line.strip_prefix('@')?.trim_start();
    let mut tokens = rest.split_whitespace();
    let series = tokens.next()?;
    let is_series = series.len() > 1
        && series.starts_with('s')
        && series[1..].chars().all(|c| c.is_ascii_digit());
    if !is_series || tokens.next() != Some("legend") {
        return None;
    }
    let mut quoted = rest.split('"');
    quoted.next();
    Some(match quoted.next() {
        Some(name) if rest.matches('"').count() >= 2 => Ok(name.to_string()),
        _ => Err(XvgParseErrorKind::UnquotedLegend),
    })
}

impl EnergyFile for XvgFile {
    const ENGINE: Engine = Engine::Gromacs;
    type Error = XvgError;

    fn read_from(reader: &mut impl BufRead) -> Result<EnergyBreakdown, Self::Error> {
        let mut legends = Vec::new();
        let mut last_data: Option<(usize, String)> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.starts_with('@') {
                if let Some(name) = legend_name(trimmed) {
                    let name = name.map_err(|kind| XvgError::Parse {
                        line: line_num,
                        kind,
                    })?;
                    legends.push(name);
                }
                continue;
            }
            last_data = Some((line_num, line));
        }

        if legends.is_empty() {
            return Err(XvgError::MissingRecord("@ sN legend directives"));
        }
        let (line_num, data) = last_data.ok_or(XvgError::MissingRecord("data rows"))?;

        let values = data
            .split_whitespace()
            .skip(1)
            .map(|token| {
                token.parse::<f64>().map_err(|_| XvgError::Parse {
                    line: line_num,
                    kind: XvgParseErrorKind::InvalidFloat(token.to_string()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if values.len() != legends.len() {
            return Err(XvgError::CountMismatch {
                legends: legends.len(),
                values: values.len(),
            });
        }

        let mut breakdown = EnergyBreakdown::new();
        for (name, value) in legends.into_iter().zip(values) {
            breakdown.try_insert(name, Energy::kj(value))?;
        }
        Ok(breakdown)
    }
}
