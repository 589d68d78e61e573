use super::EnergyError;
use super::breakdown::EnergyBreakdown;
use crate::core::units::{Energy, EnergyUnit};
use indexmap::IndexMap;

/// An absolute tolerance on energy differences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub value: f64,
    pub unit: EnergyUnit,
}

impl Tolerance {
    pub fn new(value: f64, unit: EnergyUnit) -> Self {
        Self { value, unit }
    }

    #[inline]
    pub fn admits(&self, difference: Energy) -> bool {
        difference.value_in(self.unit).abs() <= self.value
    }
}

/// Signed per-term difference `comparison - reference`, in reference order and unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyDiff {
    terms: IndexMap<String, Energy>,
}

impl EnergyDiff {
    pub fn get(&self, term: &str) -> Option<Energy> {
        self.terms.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Energy)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Term with the largest absolute difference.
    pub fn max_abs(&self) -> Option<(&str, Energy)> {
        self.iter().max_by(|(_, a), (_, b)| {
            a.value
                .abs()
                .partial_cmp(&b.value.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Terms among `checked` whose difference the tolerance does not admit.
    ///
    /// An empty `checked` slice checks every term of the diff.
    pub fn exceeding<S: AsRef<str>>(
        &self,
        tolerance: Tolerance,
        checked: &[S],
    ) -> Vec<(String, Energy)> {
        self.iter()
            .filter(|(name, _)| checked.is_empty() || checked.iter().any(|c| c.as_ref() == *name))
            .filter(|(_, diff)| !tolerance.admits(*diff))
            .map(|(name, diff)| (name.to_string(), diff))
            .collect()
    }
}

/// Differences every term of `reference` against `comparison`.
///
/// Each reference term must be present in `comparison`; terms that only exist in
/// `comparison` are not reported.
pub fn energy_diff(
    reference: &EnergyBreakdown,
    comparison: &EnergyBreakdown,
) -> Result<EnergyDiff, EnergyError> {
    let mut terms = IndexMap::with_capacity(reference.len());
    for (term, reference_energy) in reference.iter() {
        let comparison_energy = comparison
            .get(term)
            .ok_or_else(|| EnergyError::MissingTerm(term.to_string()))?;
        terms.insert(
            term.to_string(),
            comparison_energy.to(reference_energy.unit) - reference_energy,
        );
    }
    Ok(EnergyDiff { terms })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(terms: &[(&str, Energy)]) -> EnergyBreakdown {
        terms
            .iter()
            .map(|(name, e)| (name.to_string(), *e))
            .collect()
    }

    #[test]
    fn identical_breakdowns_diff_to_zero_everywhere() {
        let b = breakdown(&[
            ("bond", Energy::kj(10.0)),
            ("coulomb", Energy::kj(-50.0)),
            ("potential", Energy::kj(-40.0)),
        ]);
        let diff = energy_diff(&b, &b.clone()).unwrap();
        assert_eq!(diff.len(), 3);
        assert!(diff.iter().all(|(_, d)| d.value == 0.0));
    }

    #[test]
    fn missing_term_fails_with_its_name() {
        let reference = breakdown(&[("bond", Energy::kj(1.0)), ("angle", Energy::kj(2.0))]);
        let comparison = breakdown(&[("bond", Energy::kj(1.0))]);
        let err = energy_diff(&reference, &comparison).unwrap_err();
        assert_eq!(err, EnergyError::MissingTerm("angle".to_string()));
        assert!(err.to_string().contains("\"angle\""));
    }

    #[test]
    fn difference_is_signed_comparison_minus_reference() {
        let reference = breakdown(&[("bond", Energy::kj(10.0))]);
        let comparison = breakdown(&[("bond", Energy::kj(12.5))]);
        let diff = energy_diff(&reference, &comparison).unwrap();
        assert_eq!(diff.get("bond"), Some(Energy::kj(2.5)));
    }

    #[test]
    fn difference_is_expressed_in_reference_unit() {
        let reference = breakdown(&[("potential", Energy::kcal(-10.0))]);
        let comparison = breakdown(&[("potential", Energy::kj(-41.84))]);
        let diff = energy_diff(&reference, &comparison).unwrap();
        let d = diff.get("potential").unwrap();
        assert_eq!(d.unit, EnergyUnit::KilocaloriePerMole);
        assert!(d.value.abs() < 1e-12);
    }

    #[test]
    fn extra_comparison_terms_are_ignored() {
        let reference = breakdown(&[("bond", Energy::kj(1.0))]);
        let comparison = breakdown(&[("bond", Energy::kj(1.0)), ("angle", Energy::kj(3.0))]);
        let diff = energy_diff(&reference, &comparison).unwrap();
        assert_eq!(diff.len(), 1);
        assert!(diff.get("angle").is_none());
    }

    #[test]
    fn exceeding_reports_only_checked_terms_beyond_tolerance() {
        let reference = breakdown(&[
            ("bond", Energy::kj(0.0)),
            ("potential", Energy::kj(0.0)),
        ]);
        let comparison = breakdown(&[
            ("bond", Energy::kj(5.0)),
            ("potential", Energy::kj(-0.5)),
        ]);
        let diff = energy_diff(&reference, &comparison).unwrap();
        let tol = Tolerance::new(0.1, EnergyUnit::KilojoulePerMole);

        let only_potential = diff.exceeding(tol, &["potential"]);
        assert_eq!(only_potential, vec![("potential".to_string(), Energy::kj(-0.5))]);

        let all: Vec<String> = diff
            .exceeding::<&str>(tol, &[])
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(all, vec!["bond", "potential"]);
    }

    #[test]
    fn tolerance_compares_in_its_own_unit() {
        let tol = Tolerance::new(1.0, EnergyUnit::KilojoulePerMole);
        assert!(tol.admits(Energy::kcal(0.2)));
        assert!(!tol.admits(Energy::kcal(-0.3)));
    }

    #[test]
    fn max_abs_picks_largest_magnitude() {
        let reference = breakdown(&[("a", Energy::kj(0.0)), ("b", Energy::kj(0.0))]);
        let comparison = breakdown(&[("a", Energy::kj(1.0)), ("b", Energy::kj(-3.0))]);
        let diff = energy_diff(&reference, &comparison).unwrap();
        assert_eq!(diff.max_abs().map(|(n, _)| n), Some("b"));
    }
}
