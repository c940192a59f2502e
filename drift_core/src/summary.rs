//! Per-generation outcome counts across runs.

use serde::{Deserialize, Serialize};

/// Snapshot of where every run stands at one generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftSummary {
    /// Generation the counts refer to
    pub generation: u64,

    /// Runs at frequency 1.0
    pub fixed: usize,

    /// Runs at frequency 0.0
    pub lost: usize,

    /// Runs strictly between 0 and 1
    pub segregating: usize,

    /// Mean frequency across runs
    pub mean_frequency: f64,
}

impl DriftSummary {
    /// Tallies a generation's frequencies.
    pub fn from_frequencies(generation: u64, frequencies: &[f64]) -> Self {
        let fixed = frequencies.iter().filter(|&&p| p == 1.0).count();
        let lost = frequencies.iter().filter(|&&p| p == 0.0).count();
        let mean_frequency = if frequencies.is_empty() {
            0.0
        } else {
            frequencies.iter().sum::<f64>() / frequencies.len() as f64
        };

        Self {
            generation,
            fixed,
            lost,
            segregating: frequencies.len() - fixed - lost,
            mean_frequency,
        }
    }

    /// Returns true once no run is still segregating.
    pub fn all_absorbed(&self) -> bool {
        self.segregating == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_counts() {
        let summary = DriftSummary::from_frequencies(7, &[0.0, 1.0, 0.5, 1.0]);

        assert_eq!(summary.generation, 7);
        assert_eq!(summary.fixed, 2);
        assert_eq!(summary.lost, 1);
        assert_eq!(summary.segregating, 1);
        assert_relative_eq!(summary.mean_frequency, 0.625);
        assert!(!summary.all_absorbed());
    }

    #[test]
    fn test_all_absorbed() {
        let summary = DriftSummary::from_frequencies(3, &[0.0, 1.0]);
        assert!(summary.all_absorbed());
    }

    #[test]
    fn test_empty() {
        let summary = DriftSummary::from_frequencies(0, &[]);
        assert_eq!(summary.mean_frequency, 0.0);
        assert!(summary.all_absorbed());
    }
}
