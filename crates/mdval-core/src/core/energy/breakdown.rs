use super::EnergyError;
use crate::core::units::{Energy, EnergyUnit};
use indexmap::IndexMap;
use indexmap::map::Entry;

/// Ordered mapping from term name to energy, as reported by one engine invocation.
///
/// Term names are unique; insertion order is preserved so reports list terms in the
/// order the engine (or the canonical vocabulary) defines them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyBreakdown {
    terms: IndexMap<String, Energy>,
}

impl EnergyBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_insert(
        &mut self,
        term: impl Into<String>,
        energy: Energy,
    ) -> Result<(), EnergyError> {
        match self.terms.entry(term.into()) {
            Entry::Occupied(entry) => Err(EnergyError::DuplicateTerm(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(energy);
                Ok(())
            }
        }
    }

    /// Adds `energy` into the bucket named `term`, creating it on first use.
    pub fn accumulate(&mut self, term: &str, energy: Energy) {
        match self.terms.get_mut(term) {
            Some(existing) => *existing += energy,
            None => {
                self.terms.insert(term.to_string(), energy);
            }
        }
    }

    pub fn get(&self, term: &str) -> Option<Energy> {
        self.terms.get(term).copied()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Energy)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn converted_to(&self, unit: EnergyUnit) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .map(|(k, v)| (k.clone(), v.to(unit)))
                .collect(),
        }
    }
}

impl FromIterator<(String, Energy)> for EnergyBreakdown {
    /// Later entries overwrite earlier ones with the same name.
    fn from_iter<I: IntoIterator<Item = (String, Energy)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for EnergyBreakdown {
    type Item = (String, Energy);
    type IntoIter = indexmap::map::IntoIter<String, Energy>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_insert_rejects_duplicate_terms() {
        let mut b = EnergyBreakdown::new();
        b.try_insert("Bond", Energy::kj(1.0)).unwrap();
        let err = b.try_insert("Bond", Energy::kj(2.0)).unwrap_err();
        assert_eq!(err, EnergyError::DuplicateTerm("Bond".to_string()));
        assert_eq!(b.get("Bond"), Some(Energy::kj(1.0)));
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut b = EnergyBreakdown::new();
        for name in ["Potential", "Bond", "Angle"] {
            b.try_insert(name, Energy::kj(0.0)).unwrap();
        }
        let names: Vec<_> = b.terms().collect();
        assert_eq!(names, vec!["Potential", "Bond", "Angle"]);
    }

    #[test]
    fn accumulate_sums_into_existing_bucket_in_its_unit() {
        let mut b = EnergyBreakdown::new();
        b.accumulate("vdw", Energy::kj(4.184));
        b.accumulate("vdw", Energy::kcal(1.0));
        let vdw = b.get("vdw").unwrap();
        assert_eq!(vdw.unit, EnergyUnit::KilojoulePerMole);
        assert!((vdw.value - 8.368).abs() < 1e-12);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn converted_to_changes_every_term() {
        let b: EnergyBreakdown = vec![
            ("a".to_string(), Energy::kcal(1.0)),
            ("b".to_string(), Energy::kj(2.0)),
        ]
        .into_iter()
        .collect();
        let kj = b.converted_to(EnergyUnit::KilojoulePerMole);
        assert!(kj.iter().all(|(_, e)| e.unit == EnergyUnit::KilojoulePerMole));
        assert!((kj.get("a").unwrap().value - 4.184).abs() < 1e-12);
        assert_eq!(kj.get("b"), Some(Energy::kj(2.0)));
    }

    #[test]
    fn missing_term_lookup_returns_none() {
        let b = EnergyBreakdown::new();
        assert!(b.get("Bond").is_none());
        assert!(!b.contains("Bond"));
        assert!(b.is_empty());
    }
}
