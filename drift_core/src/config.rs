//! Simulation configuration.

use crate::error::DriftError;
use serde::{Deserialize, Serialize};

/// Largest allele count (`2N`) the binomial sampler handles exactly.
pub const MAX_ALLELE_COPIES: u64 = i32::MAX as u64;

/// Configuration for a drift simulation.
///
/// Built once from validated inputs and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of diploid individuals (2N allele copies per generation)
    pub population_size: u64,

    /// Number of generations simulated after generation 0
    pub generation_count: u64,

    /// Number of independent runs
    pub run_count: usize,

    /// Allele frequency at generation 0, shared by every run
    pub start_frequency: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generation_count: 100,
            run_count: 10,
            start_frequency: 0.5,
        }
    }
}

impl SimulationConfig {
    /// Checks every field constraint.
    pub fn validate(&self) -> Result<(), DriftError> {
        if self.population_size == 0 {
            return Err(DriftError::invalid("population_size must be positive"));
        }
        match self.allele_copies() {
            Some(copies) if copies <= MAX_ALLELE_COPIES => {}
            _ => {
                return Err(DriftError::invalid(format!(
                    "population_size {} exceeds the limit of {}",
                    self.population_size,
                    MAX_ALLELE_COPIES / 2
                )));
            }
        }
        if self.run_count == 0 {
            return Err(DriftError::invalid("run_count must be positive"));
        }
        if !(0.0..=1.0).contains(&self.start_frequency) {
            // NaN fails the range check as well
            return Err(DriftError::invalid(format!(
                "start_frequency {} outside [0, 1]",
                self.start_frequency
            )));
        }
        Ok(())
    }

    /// Total allele copies per generation (`2N`), if representable.
    pub fn allele_copies(&self) -> Option<u64> {
        self.population_size.checked_mul(2)
    }
}
