use super::breakdown::EnergyBreakdown;
use crate::core::units::{Energy, EnergyUnit};
use phf::{Map, Set, phf_map, phf_set};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{trace, warn};

/// The shared vocabulary every engine's output is mapped onto.
///
/// Deserializes through [`FromStr`], so config files accept the same
/// case-insensitive names as `--set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum CanonicalTerm {
    Bond,
    Angle,
    Dihedral,
    Improper,
    Vdw,
    Coulomb,
    Nonbonded,
    Restraint,
    Potential,
}

impl CanonicalTerm {
    pub const ALL: [CanonicalTerm; 9] = [
        CanonicalTerm::Bond,
        CanonicalTerm::Angle,
        CanonicalTerm::Dihedral,
        CanonicalTerm::Improper,
        CanonicalTerm::Vdw,
        CanonicalTerm::Coulomb,
        CanonicalTerm::Nonbonded,
        CanonicalTerm::Restraint,
        CanonicalTerm::Potential,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalTerm::Bond => "bond",
            CanonicalTerm::Angle => "angle",
            CanonicalTerm::Dihedral => "dihedral",
            CanonicalTerm::Improper => "improper",
            CanonicalTerm::Vdw => "vdw",
            CanonicalTerm::Coulomb => "coulomb",
            CanonicalTerm::Nonbonded => "nonbonded",
            CanonicalTerm::Restraint => "restraint",
            CanonicalTerm::Potential => "potential",
        }
    }
}

impl fmt::Display for CanonicalTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown canonical energy term '{0}'")]
pub struct UnknownTermError(pub String);

impl FromStr for CanonicalTerm {
    type Err = UnknownTermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        CanonicalTerm::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownTermError(s.to_string()))
    }
}

impl TryFrom<String> for CanonicalTerm {
    type Error = UnknownTermError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

use CanonicalTerm as C;

const BONDED: &[CanonicalTerm] = &[C::Bond];
const ANGLE: &[CanonicalTerm] = &[C::Angle];
const DIHEDRAL: &[CanonicalTerm] = &[C::Dihedral];
const IMPROPER: &[CanonicalTerm] = &[C::Improper];
const DISPERSIVE: &[CanonicalTerm] = &[C::Vdw, C::Nonbonded];
const ELECTROSTATIC: &[CanonicalTerm] = &[C::Coulomb, C::Nonbonded];
const RESTRAINT: &[CanonicalTerm] = &[C::Restraint];
const POTENTIAL: &[CanonicalTerm] = &[C::Potential];

static GROMACS_TO_CANONICAL: Map<&'static str, &'static [CanonicalTerm]> = phf_map! {
    "Bond" => BONDED,
    "G96Bond" => BONDED,
    "Morse" => BONDED,
    "Cubic Bonds" => BONDED,
    "FENE Bonds" => BONDED,
    "Harmonic Pot." => BONDED,
    "Angle" => ANGLE,
    "G96Angle" => ANGLE,
    "Restricted Angles" => ANGLE,
    "U-B" => ANGLE,
    "Quartic Angles" => ANGLE,
    "Proper Dih." => DIHEDRAL,
    "Ryckaert-Bell." => DIHEDRAL,
    "Restricted Dih." => DIHEDRAL,
    "Fourier Dih." => DIHEDRAL,
    "CMAP Dih." => DIHEDRAL,
    "Improper Dih." => IMPROPER,
    "Per. Imp. Dih." => IMPROPER,
    "LJ (SR)" => DISPERSIVE,
    "LJ (LR)" => DISPERSIVE,
    "LJ-14" => DISPERSIVE,
    "Buck.ham (SR)" => DISPERSIVE,
    "Disper. corr." => DISPERSIVE,
    "Coulomb (SR)" => ELECTROSTATIC,
    "Coulomb (LR)" => ELECTROSTATIC,
    "Coulomb-14" => ELECTROSTATIC,
    "Coul. recip." => ELECTROSTATIC,
    "RF excl." => ELECTROSTATIC,
    "Position Rest." => RESTRAINT,
    "Dis. Rest." => RESTRAINT,
    "Dih. Rest." => RESTRAINT,
    "Potential" => POTENTIAL,
};

// Thermodynamic observables g_energy reports alongside the energy terms.
static GROMACS_IGNORED: Set<&'static str> = phf_set! {
    "Kinetic En.",
    "Total Energy",
    "Conserved En.",
    "Temperature",
    "Volume",
    "Pressure",
    "Pres. DC",
    "Pres. DC (bar)",
    "Box-X",
    "Box-Y",
    "Box-Z",
    "Box-atomic_number",
    "Vir-XX",
    "Vir-XY",
    "Vir-XZ",
    "Vir-YX",
    "Vir-YY",
    "Vir-YZ",
    "Vir-ZX",
    "Vir-ZY",
    "Vir-ZZ",
    "pV",
    "Density",
    "Enthalpy",
    "Constr. rmsd",
};

static AMBER_TO_CANONICAL: Map<&'static str, &'static [CanonicalTerm]> = phf_map! {
    "BOND" => BONDED,
    "ANGLE" => ANGLE,
    "UB" => ANGLE,
    "DIHED" => DIHEDRAL,
    "CMAP" => DIHEDRAL,
    "IMP" => IMPROPER,
    "VDWAALS" => DISPERSIVE,
    "HBOND" => DISPERSIVE,
    "1-4 VDW" => DISPERSIVE,
    "1-4 NB" => DISPERSIVE,
    "EEL" => ELECTROSTATIC,
    "1-4 EEL" => ELECTROSTATIC,
    "RESTRAINT" => RESTRAINT,
    "ENERGY" => POTENTIAL,
};

static AMBER_IGNORED: Set<&'static str> = phf_set! {
    "EAMBER",
    "EKtot",
    "Etot",
    "TEMP(K)",
    "PRESS",
};

/// The simulation engines whose output can be evaluated and canonicalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    Gromacs,
    Amber,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown engine '{0}'. Expected 'gromacs' or 'amber'.")]
pub struct UnknownEngineError(pub String);

impl Engine {
    pub fn name(&self) -> &'static str {
        match self {
            Engine::Gromacs => "GROMACS",
            Engine::Amber => "AMBER",
        }
    }

    /// Unit the engine writes its energies in.
    pub fn native_unit(&self) -> EnergyUnit {
        match self {
            Engine::Gromacs => EnergyUnit::KilojoulePerMole,
            Engine::Amber => EnergyUnit::KilocaloriePerMole,
        }
    }

    /// Canonical buckets that the raw term `name` contributes to, if it is recognised.
    pub fn canonical_buckets(&self, name: &str) -> Option<&'static [CanonicalTerm]> {
        let table = match self {
            Engine::Gromacs => &GROMACS_TO_CANONICAL,
            Engine::Amber => &AMBER_TO_CANONICAL,
        };
        table.get(name.trim()).copied()
    }

    pub fn is_ignored_term(&self, name: &str) -> bool {
        let set = match self {
            Engine::Gromacs => &GROMACS_IGNORED,
            Engine::Amber => &AMBER_IGNORED,
        };
        set.contains(name.trim())
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Engine {
    type Err = UnknownEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gromacs" | "gmx" => Ok(Engine::Gromacs),
            "amber" | "sander" => Ok(Engine::Amber),
            _ => Err(UnknownEngineError(s.to_string())),
        }
    }
}

/// Maps a raw engine breakdown onto the canonical vocabulary.
///
/// The result always holds every [`CanonicalTerm`] in canonical order, expressed in the
/// engine's native unit. Terms with no raw contribution are zero. Raw terms that feed
/// several buckets (e.g. `LJ (SR)` into both `vdw` and `nonbonded`) are added to each.
pub fn canonicalize(raw: &EnergyBreakdown, engine: Engine) -> EnergyBreakdown {
    let unit = engine.native_unit();
    let mut canonical: EnergyBreakdown = CanonicalTerm::ALL
        .iter()
        .map(|t| (t.as_str().to_string(), Energy::zero(unit)))
        .collect();

    for (name, energy) in raw.iter() {
        match engine.canonical_buckets(name) {
            Some(buckets) => {
                for bucket in buckets {
                    canonical.accumulate(bucket.as_str(), energy);
                }
            }
            None if engine.is_ignored_term(name) => {
                trace!("Skipping non-energy {} term '{}'", engine, name);
            }
            None => {
                warn!(
                    "Unrecognised {} energy term '{}' ({}) left out of canonical breakdown",
                    engine, name, energy
                );
            }
        }
    }
    canonical
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(engine: Engine, terms: &[(&str, f64)]) -> EnergyBreakdown {
        let unit = engine.native_unit();
        let mut b = EnergyBreakdown::new();
        for (name, value) in terms {
            b.try_insert(*name, Energy::new(*value, unit)).unwrap();
        }
        b
    }

    fn value(b: &EnergyBreakdown, term: CanonicalTerm) -> f64 {
        b.get(term.as_str()).unwrap().value
    }

    #[test]
    fn gromacs_example_yields_expected_canonical_breakdown() {
        let input = raw(
            Engine::Gromacs,
            &[("Bond", 10.0), ("Coulomb (SR)", -50.0), ("LJ (SR)", 5.0)],
        );
        let out = canonicalize(&input, Engine::Gromacs);

        assert!((value(&out, C::Bond) - 10.0).abs() < 1e-12);
        assert!((value(&out, C::Coulomb) + 50.0).abs() < 1e-12);
        assert!((value(&out, C::Vdw) - 5.0).abs() < 1e-12);
        assert!((value(&out, C::Nonbonded) + 45.0).abs() < 1e-12);
        for term in [C::Angle, C::Dihedral, C::Improper, C::Restraint, C::Potential] {
            assert_eq!(value(&out, term), 0.0, "{} should be zero", term);
        }
        assert!(out.iter().all(|(_, e)| e.unit == EnergyUnit::KilojoulePerMole));
    }

    #[test]
    fn empty_input_is_zero_filled_in_canonical_order() {
        let out = canonicalize(&EnergyBreakdown::new(), Engine::Amber);
        let names: Vec<_> = out.terms().collect();
        let expected: Vec<_> = CanonicalTerm::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(names, expected);
        assert!(out.iter().all(|(_, e)| e.value == 0.0));
        assert!(
            out.iter()
                .all(|(_, e)| e.unit == EnergyUnit::KilocaloriePerMole)
        );
    }

    #[test]
    fn nonbonded_equals_sum_of_vdw_and_coulomb() {
        let input = raw(
            Engine::Amber,
            &[
                ("VDWAALS", -5.78),
                ("EEL", -394.57),
                ("HBOND", 0.25),
                ("1-4 VDW", 5.69),
                ("1-4 EEL", 50.36),
            ],
        );
        let out = canonicalize(&input, Engine::Amber);
        let sum = value(&out, C::Vdw) + value(&out, C::Coulomb);
        assert!((value(&out, C::Nonbonded) - sum).abs() < 1e-9);
        assert!((value(&out, C::Vdw) - (-5.78 + 0.25 + 5.69)).abs() < 1e-9);
        assert!((value(&out, C::Coulomb) - (-394.57 + 50.36)).abs() < 1e-9);
    }

    #[test]
    fn periodic_impropers_count_as_improper() {
        let input = raw(
            Engine::Gromacs,
            &[("Proper Dih.", 4.0), ("Per. Imp. Dih.", 3.0), ("Potential", 7.0)],
        );
        let out = canonicalize(&input, Engine::Gromacs);
        assert!((value(&out, C::Improper) - 3.0).abs() < 1e-12);
        assert!((value(&out, C::Dihedral) - 4.0).abs() < 1e-12);
        let bonded = value(&out, C::Improper) + value(&out, C::Dihedral);
        assert!((bonded - value(&out, C::Potential)).abs() < 1e-12);
    }

    #[test]
    fn multiple_dihedral_forms_accumulate_into_one_bucket() {
        let input = raw(
            Engine::Gromacs,
            &[("Proper Dih.", 1.5), ("Ryckaert-Bell.", 2.0), ("CMAP Dih.", -0.5)],
        );
        let out = canonicalize(&input, Engine::Gromacs);
        assert!((value(&out, C::Dihedral) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn amber_energy_maps_to_potential() {
        let input = raw(Engine::Amber, &[("ENERGY", -324.42)]);
        let out = canonicalize(&input, Engine::Amber);
        assert!((value(&out, C::Potential) + 324.42).abs() < 1e-12);
    }

    #[test]
    fn ignored_and_unknown_terms_do_not_leak_into_output() {
        let input = raw(
            Engine::Gromacs,
            &[("Temperature", 300.0), ("Mystery Term", 7.0), ("Potential", -1.0)],
        );
        let out = canonicalize(&input, Engine::Gromacs);
        assert_eq!(out.len(), CanonicalTerm::ALL.len());
        assert!(!out.contains("Temperature"));
        assert!(!out.contains("Mystery Term"));
        assert!((value(&out, C::Potential) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn raw_values_in_other_units_are_converted_on_accumulation() {
        let mut input = EnergyBreakdown::new();
        input.try_insert("Bond", Energy::kcal(1.0)).unwrap();
        let out = canonicalize(&input, Engine::Gromacs);
        assert!((value(&out, C::Bond) - 4.184).abs() < 1e-12);
    }

    #[test]
    fn lookup_trims_fixed_column_padding() {
        assert_eq!(Engine::Amber.canonical_buckets("BOND    "), Some(BONDED));
        assert!(Engine::Amber.canonical_buckets("bond").is_none());
    }

    #[test]
    fn term_and_engine_parse_case_insensitively() {
        assert_eq!("Potential".parse(), Ok(C::Potential));
        assert_eq!("NonBonded".parse(), Ok(C::Nonbonded));
        assert!("kinetic".parse::<CanonicalTerm>().is_err());
        assert_eq!("GROMACS".parse(), Ok(Engine::Gromacs));
        assert_eq!("sander".parse(), Ok(Engine::Amber));
    }

    #[test]
    fn terms_deserialize_like_they_parse() {
        use serde::Deserialize;
        use serde::de::{IntoDeserializer, value::Error};

        let de = |s: &'static str| CanonicalTerm::deserialize(s.into_deserializer());
        let ok: Result<CanonicalTerm, Error> = de("NonBonded");
        assert_eq!(ok.unwrap(), C::Nonbonded);
        let bad: Result<CanonicalTerm, Error> = de("torsion");
        assert!(bad.unwrap_err().to_string().contains("torsion"));
    }
}
