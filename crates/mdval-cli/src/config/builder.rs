use super::defaults::DefaultsConfig;
use super::file::{FileComparisonConfig, FileConfig};
use crate::error::{CliError, Result};
use mdvalidate::core::energy::canonical::CanonicalTerm;
use mdvalidate::core::energy::diff::Tolerance;
use mdvalidate::core::units::EnergyUnit;
use mdvalidate::engine::config as core_config;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Merges defaults, the optional config file and `--set` overrides into the core
/// evaluation config.
pub fn build_config(
    config_path: Option<&Path>,
    set_values: &[String],
) -> Result<core_config::EvaluationConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match config_path {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let mut file_config = apply_set_values(file_config, set_values)?;
    debug!("Merged configuration sources: {:?}", file_config);

    let gromacs = file_config.gromacs.take().unwrap_or_default();
    let amber = file_config.amber.take().unwrap_or_default();
    let comparison = file_config.comparison.take().unwrap_or_default();

    let mut builder = core_config::EvaluationConfigBuilder::new()
        .max_warnings(gromacs.max_warnings.unwrap_or(defaults.max_warnings))
        .threads(gromacs.threads.unwrap_or(defaults.threads))
        .energy_selection(gromacs.energy_terms.unwrap_or(defaults.energy_terms))
        .tolerance(merge_tolerance(&comparison, &defaults))
        .checked_terms(comparison.terms.unwrap_or(defaults.checked_terms));

    if let Some(binary) = gromacs.binary {
        builder = builder.gromacs_binary(binary);
    }
    if let Some(parameters) = run_parameters(gromacs.mdp, gromacs.vacuum_mdp, "gromacs.mdp")? {
        builder = builder.gromacs_parameters(parameters);
    }
    if let Some(sander) = amber.sander {
        builder = builder.sander(sander);
    }
    if let Some(parameters) = run_parameters(amber.mdin, amber.vacuum_mdin, "amber.mdin")? {
        builder = builder.amber_parameters(parameters);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

fn run_parameters(
    standard: Option<PathBuf>,
    vacuum: Option<PathBuf>,
    key: &str,
) -> Result<Option<core_config::RunParameters>> {
    match (standard, vacuum) {
        (Some(standard), vacuum) => Ok(Some(core_config::RunParameters::new(standard, vacuum))),
        (None, Some(_)) => Err(CliError::Config(format!(
            "A vacuum parameter file was given without `{}`",
            key
        ))),
        (None, None) => Ok(None),
    }
}

fn merge_tolerance(file: &FileComparisonConfig, defaults: &DefaultsConfig) -> Tolerance {
    Tolerance::new(
        file.tolerance.unwrap_or(defaults.tolerance),
        file.unit.unwrap_or(defaults.tolerance_unit),
    )
}

fn parse_terms(value: &str) -> Result<Vec<CanonicalTerm>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| CanonicalTerm::from_str(t).map_err(|e| CliError::Config(e.to_string())))
        .collect()
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();
        let value_str = value_str.trim();

        match key {
            "gromacs.binary" => {
                config.gromacs.get_or_insert_with(Default::default).binary =
                    Some(value_str.to_string());
            }
            "gromacs.mdp" => {
                config.gromacs.get_or_insert_with(Default::default).mdp =
                    Some(PathBuf::from(value_str));
            }
            "gromacs.vacuum-mdp" => {
                config.gromacs.get_or_insert_with(Default::default).vacuum_mdp =
                    Some(PathBuf::from(value_str));
            }
            "gromacs.max-warnings" => {
                config.gromacs.get_or_insert_with(Default::default).max_warnings =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "gromacs.threads" => {
                config.gromacs.get_or_insert_with(Default::default).threads =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "gromacs.energy-terms" => {
                config.gromacs.get_or_insert_with(Default::default).energy_terms =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "amber.sander" => {
                config.amber.get_or_insert_with(Default::default).sander =
                    Some(value_str.to_string());
            }
            "amber.mdin" => {
                config.amber.get_or_insert_with(Default::default).mdin =
                    Some(PathBuf::from(value_str));
            }
            "amber.vacuum-mdin" => {
                config.amber.get_or_insert_with(Default::default).vacuum_mdin =
                    Some(PathBuf::from(value_str));
            }
            "comparison.tolerance" => {
                config.comparison.get_or_insert_with(Default::default).tolerance =
                    Some(parse_value(key, value_str, "float")?);
            }
            "comparison.unit" => {
                config.comparison.get_or_insert_with(Default::default).unit = Some(
                    EnergyUnit::from_str(value_str).map_err(|e| CliError::Config(e.to_string()))?,
                );
            }
            "comparison.terms" => {
                config.comparison.get_or_insert_with(Default::default).terms =
                    Some(parse_terms(value_str)?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn set(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_apply_without_file_or_overrides() {
        let cfg = build_config(None, &[]).expect("build ok");
        let defaults = DefaultsConfig::default();

        assert_eq!(cfg.gromacs.max_warnings, defaults.max_warnings);
        assert_eq!(cfg.gromacs.threads, defaults.threads);
        assert_eq!(cfg.gromacs.energy_selection, defaults.energy_terms);
        assert!(cfg.gromacs.binary.is_none());
        assert!(cfg.gromacs.parameters.is_none());
        assert!(cfg.amber.parameters.is_none());
        assert_eq!(cfg.comparison.checked_terms, vec![CanonicalTerm::Potential]);
        assert!((cfg.comparison.tolerance.value - 1e-6).abs() < 1e-15);
        assert_eq!(cfg.comparison.tolerance.unit, EnergyUnit::KilojoulePerMole);
    }

    #[test]
    fn build_config_reads_file_and_merges() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("mdval.toml");
        fs::write(
            &cfg_path,
            r#"
            [gromacs]
            mdp = "grompp.mdp"
            vacuum-mdp = "grompp_vacuum.mdp"
            threads = 2

            [amber]
            sander = "/opt/amber/bin/sander"
            mdin = "min.in"

            [comparison]
            tolerance = 0.01
            unit = "kcal/mol"
            terms = ["potential", "nonbonded"]
            "#,
        )
        .unwrap();

        let cfg = build_config(Some(&cfg_path), &[]).expect("build ok");

        let gromacs = cfg.gromacs.parameters.unwrap();
        assert_eq!(gromacs.select("ethane"), dir.path().join("grompp.mdp"));
        assert_eq!(
            gromacs.select("ethane_vacuum"),
            dir.path().join("grompp_vacuum.mdp")
        );
        assert_eq!(cfg.gromacs.threads, 2);
        assert_eq!(cfg.amber.sander.as_deref(), Some("/opt/amber/bin/sander"));
        assert_eq!(
            cfg.amber.parameters.unwrap().select("ethane_vacuum"),
            dir.path().join("min.in")
        );
        assert_eq!(cfg.comparison.tolerance.unit, EnergyUnit::KilocaloriePerMole);
        assert_eq!(
            cfg.comparison.checked_terms,
            vec![CanonicalTerm::Potential, CanonicalTerm::Nonbonded]
        );
    }

    #[test]
    fn set_values_override_file_values() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("mdval.toml");
        fs::write(
            &cfg_path,
            "[comparison]\ntolerance = 0.5\n[gromacs]\nenergy-terms = 12\n",
        )
        .unwrap();

        let cfg = build_config(
            Some(&cfg_path),
            &set(&[
                "comparison.tolerance=0.004",
                "comparison.unit=kj",
                "comparison.terms=bond, angle",
                "gromacs.energy-terms=25",
                "gromacs.binary=gmx_mpi",
                "amber.mdin=sp.in",
            ]),
        )
        .expect("build ok");

        assert!((cfg.comparison.tolerance.value - 0.004).abs() < 1e-12);
        assert_eq!(
            cfg.comparison.checked_terms,
            vec![CanonicalTerm::Bond, CanonicalTerm::Angle]
        );
        assert_eq!(cfg.gromacs.energy_selection, 25);
        assert_eq!(cfg.gromacs.binary.as_deref(), Some("gmx_mpi"));
        assert_eq!(
            cfg.amber.parameters.unwrap().standard,
            PathBuf::from("sp.in")
        );
    }

    #[test]
    fn empty_terms_override_checks_every_term() {
        let cfg = build_config(None, &set(&["comparison.terms="])).expect("build ok");
        assert!(cfg.comparison.checked_terms.is_empty());
    }

    #[test]
    fn invalid_overrides_are_config_errors() {
        for bad in [
            "comparison.tolerance=abc",
            "comparison.unit=hartree",
            "comparison.terms=potential,torsion",
            "gromacs.threads=0",
            "gromacs.vacuum-mdp=v.mdp",
            "optimization.num-solutions=3",
            "no-equals-sign",
        ] {
            let result = build_config(None, &set(&[bad]));
            assert!(
                matches!(result, Err(CliError::Config(_))),
                "expected config error for {}",
                bad
            );
        }
    }

    #[test]
    fn negative_tolerance_is_rejected_by_core_builder() {
        let result = build_config(None, &set(&["comparison.tolerance=-1"]));
        match result {
            Err(CliError::Config(msg)) => assert!(msg.contains("tolerance"), "{}", msg),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
