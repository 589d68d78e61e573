use mdvalidate::core::energy::canonical::CanonicalTerm;
use mdvalidate::core::units::EnergyUnit;
use mdvalidate::engine::config as core_config;

pub struct DefaultsConfig {
    pub tolerance: f64,
    pub tolerance_unit: EnergyUnit,
    pub checked_terms: Vec<CanonicalTerm>,
    pub max_warnings: u32,
    pub threads: u32,
    pub energy_terms: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            tolerance: core_config::DEFAULT_TOLERANCE_KJ,
            tolerance_unit: EnergyUnit::KilojoulePerMole,
            checked_terms: vec![CanonicalTerm::Potential],
            max_warnings: core_config::DEFAULT_MAX_WARNINGS,
            threads: core_config::DEFAULT_THREADS,
            energy_terms: core_config::DEFAULT_ENERGY_SELECTION,
        }
    }
}
