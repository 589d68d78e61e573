use serde::Deserialize;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;
use thiserror::Error;

pub const KJ_PER_KCAL: f64 = 4.184;

/// Deserializes through [`FromStr`], so `"kJ/mol"`, `"KJ"` and `"kj/mol"` are equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum EnergyUnit {
    KilojoulePerMole,
    KilocaloriePerMole,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown energy unit '{0}'. Expected 'kj/mol' or 'kcal/mol'.")]
pub struct UnknownUnitError(pub String);

impl EnergyUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            EnergyUnit::KilojoulePerMole => "kJ/mol",
            EnergyUnit::KilocaloriePerMole => "kcal/mol",
        }
    }

    /// Factor that turns a value in this unit into kJ/mol.
    #[inline]
    fn to_kj_factor(self) -> f64 {
        match self {
            EnergyUnit::KilojoulePerMole => 1.0,
            EnergyUnit::KilocaloriePerMole => KJ_PER_KCAL,
        }
    }

    #[inline]
    pub fn conversion_factor(self, target: EnergyUnit) -> f64 {
        if self == target {
            1.0
        } else {
            self.to_kj_factor() / target.to_kj_factor()
        }
    }
}

impl fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for EnergyUnit {
    type Err = UnknownUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kj" | "kj/mol" | "kilojoule_per_mole" => Ok(EnergyUnit::KilojoulePerMole),
            "kcal" | "kcal/mol" | "kilocalorie_per_mole" => Ok(EnergyUnit::KilocaloriePerMole),
            _ => Err(UnknownUnitError(s.to_string())),
        }
    }
}

impl TryFrom<String> for EnergyUnit {
    type Error = UnknownUnitError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A scalar energy together with the unit it is expressed in.
///
/// Arithmetic between two `Energy` values converts the right-hand side into the unit
/// of the left-hand side first, so magnitudes in different units are never mixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Energy {
    pub value: f64,
    pub unit: EnergyUnit,
}

impl Energy {
    pub fn new(value: f64, unit: EnergyUnit) -> Self {
        Self { value, unit }
    }

    pub fn zero(unit: EnergyUnit) -> Self {
        Self::new(0.0, unit)
    }

    pub fn kj(value: f64) -> Self {
        Self::new(value, EnergyUnit::KilojoulePerMole)
    }

    pub fn kcal(value: f64) -> Self {
        Self::new(value, EnergyUnit::KilocaloriePerMole)
    }

    #[inline]
    pub fn value_in(&self, unit: EnergyUnit) -> f64 {
        self.value * self.unit.conversion_factor(unit)
    }

    #[inline]
    pub fn to(self, unit: EnergyUnit) -> Self {
        Self::new(self.value_in(unit), unit)
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self::new(self.value.abs(), self.unit)
    }
}

impl Add for Energy {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.value + rhs.value_in(self.unit), self.unit)
    }
}

impl AddAssign for Energy {
    fn add_assign(&mut self, rhs: Self) {
        self.value += rhs.value_in(self.unit);
    }
}

impl Sub for Energy {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.value - rhs.value_in(self.unit), self.unit)
    }
}

impl Neg for Energy {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.value, self.unit)
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*} {}", p, self.value, self.unit),
            None => write!(f, "{} {}", self.value, self.unit),
        }
    }
}
