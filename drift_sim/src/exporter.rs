//! JSON exporter for finished simulations.
//!
//! Writes the config, seed and every trajectory so a run can be re-plotted or
//! analysed elsewhere.

use drift_core::{DriftSimulator, DriftSummary, EntropySource, SimulationConfig};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete simulation export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftExport {
    /// Engine parameters
    pub config: SimulationConfig,

    /// Seed used, absent for OS entropy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Last simulated generation
    pub generations: u64,

    /// Frequency history per run
    pub trajectories: Vec<Vec<f64>>,

    /// Outcome at the last generation
    pub summary: DriftSummary,
}

impl DriftExport {
    /// Captures the simulator's current state.
    pub fn from_simulator<E: EntropySource>(simulator: &DriftSimulator<E>) -> Self {
        Self {
            config: *simulator.config(),
            seed: simulator.entropy().seed(),
            generations: simulator.current_generation(),
            trajectories: simulator.trajectories().map(<[f64]>::to_vec).collect(),
            summary: simulator.summary(),
        }
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::SeededEntropy;

    #[test]
    fn test_export_captures_trajectories() {
        let config = SimulationConfig {
            population_size: 10,
            generation_count: 4,
            run_count: 3,
            start_frequency: 0.5,
        };
        let mut sim = DriftSimulator::new(config, SeededEntropy::new(8)).unwrap();
        while !sim.is_terminal() {
            sim.advance_generation().unwrap();
        }

        let export = DriftExport::from_simulator(&sim);
        assert_eq!(export.seed, Some(8));
        assert_eq!(export.generations, 4);
        assert_eq!(export.trajectories.len(), 3);
        assert!(export.trajectories.iter().all(|t| t.len() == 5));
    }

    #[test]
    fn test_export_file_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drift.json");

        let sim = DriftSimulator::new(SimulationConfig::default(), SeededEntropy::new(1)).unwrap();
        let export = DriftExport::from_simulator(&sim);
        export.write_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: DriftExport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, export);
    }
}
