//! The Wright-Fisher drift simulator.
//!
//! Owns one trajectory and one RNG stream per run and advances all of them a
//! generation at a time. The driving loop lives with the caller.

use crate::config::SimulationConfig;
use crate::entropy::{EntropySource, SeededEntropy};
use crate::error::DriftError;
use crate::summary::DriftSummary;
use rand_distr::{Binomial, Distribution};
use rayon::prelude::*;

/// A single independent run: its frequency history and its random stream.
struct DriftRun<R> {
    trajectory: Vec<f64>,
    rng: R,
}

impl<R: rand::RngCore> DriftRun<R> {
    /// Samples the next generation and appends its frequency.
    fn step(&mut self, allele_copies: u64) -> Result<(), DriftError> {
        // Never empty: seeded with the start frequency
        let p = self.trajectory[self.trajectory.len() - 1];

        let binomial = Binomial::new(allele_copies, p)
            .map_err(|e| DriftError::invalid(format!("frequency {} not samplable: {}", p, e)))?;
        let k = binomial.sample(&mut self.rng);

        self.trajectory.push(k as f64 / allele_copies as f64);
        Ok(())
    }
}

/// Evolves allele frequency across independent runs.
///
/// Frequencies `0.0` and `1.0` are absorbing: a binomial draw with success
/// probability 0 or 1 always returns 0 or `2N`.
pub struct DriftSimulator<E: EntropySource = SeededEntropy> {
    /// Immutable configuration
    config: SimulationConfig,

    /// 2N, checked at construction
    allele_copies: u64,

    /// Generation of the newest value in every trajectory
    current_generation: u64,

    /// One entry per run index
    runs: Vec<DriftRun<E::Rng>>,

    /// Source the run streams were drawn from
    entropy: E,
}

impl<E: EntropySource> DriftSimulator<E> {
    /// Creates a simulator with every run at `start_frequency`.
    pub fn new(config: SimulationConfig, entropy: E) -> Result<Self, DriftError> {
        config.validate()?;
        let allele_copies = config
            .allele_copies()
            .ok_or_else(|| DriftError::invalid("population_size overflows the allele count"))?;

        let capacity = usize::try_from(config.generation_count)
            .map(|g| g.saturating_add(1))
            .unwrap_or(usize::MAX)
            .min(1 << 16);

        let runs = (0..config.run_count)
            .map(|run_index| {
                let mut trajectory = Vec::with_capacity(capacity);
                trajectory.push(config.start_frequency);
                DriftRun {
                    trajectory,
                    rng: entropy.stream(run_index),
                }
            })
            .collect();

        Ok(Self {
            config,
            allele_copies,
            current_generation: 0,
            runs,
            entropy,
        })
    }

    /// Advances every run by one generation.
    ///
    /// Runs are sampled in parallel; each owns its trajectory and stream, so
    /// the result does not depend on scheduling.
    pub fn advance_generation(&mut self) -> Result<(), DriftError> {
        if self.is_terminal() {
            return Err(DriftError::AlreadyTerminal {
                generation: self.current_generation,
            });
        }

        let allele_copies = self.allele_copies;
        self.runs
            .par_iter_mut()
            .try_for_each(|run| run.step(allele_copies))?;

        self.current_generation += 1;
        Ok(())
    }

    /// Returns true once `generation_count` generations have been simulated.
    pub fn is_terminal(&self) -> bool {
        self.current_generation == self.config.generation_count
    }

    /// Returns the newest frequency of every run, ordered by run index.
    pub fn latest_frequencies(&self) -> Vec<f64> {
        self.runs
            .iter()
            .map(|run| run.trajectory[run.trajectory.len() - 1])
            .collect()
    }

    /// Returns the full history of one run.
    pub fn trajectory(&self, run_index: usize) -> Option<&[f64]> {
        self.runs.get(run_index).map(|run| run.trajectory.as_slice())
    }

    /// Iterates all trajectories in run order.
    pub fn trajectories(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.runs.iter().map(|run| run.trajectory.as_slice())
    }

    /// Tallies fixed, lost and segregating runs at the current generation.
    pub fn summary(&self) -> DriftSummary {
        DriftSummary::from_frequencies(self.current_generation, &self.latest_frequencies())
    }

    /// Returns the current generation.
    pub fn current_generation(&self) -> u64 {
        self.current_generation
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns the entropy source.
    pub fn entropy(&self) -> &E {
        &self.entropy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(population_size: u64, generation_count: u64, run_count: usize, start: f64) -> SimulationConfig {
        SimulationConfig {
            population_size,
            generation_count,
            run_count,
            start_frequency: start,
        }
    }

    #[test]
    fn test_initialize_seeds_every_run() {
        let sim = DriftSimulator::new(config(50, 10, 4, 0.3), SeededEntropy::new(42)).unwrap();

        assert_eq!(sim.current_generation(), 0);
        assert_eq!(sim.trajectories().len(), 4);
        for trajectory in sim.trajectories() {
            assert_eq!(trajectory, &[0.3]);
        }
        assert_eq!(sim.latest_frequencies(), vec![0.3; 4]);
    }

    #[test]
    fn test_initialize_rejects_invalid_config() {
        let result = DriftSimulator::new(config(0, 10, 4, 0.5), SeededEntropy::new(42));
        assert!(matches!(result, Err(DriftError::InvalidConfig(_))));

        let result = DriftSimulator::new(config(10, 10, 0, 0.5), SeededEntropy::new(42));
        assert!(matches!(result, Err(DriftError::InvalidConfig(_))));

        let result = DriftSimulator::new(config(10, 10, 2, 1.5), SeededEntropy::new(42));
        assert!(matches!(result, Err(DriftError::InvalidConfig(_))));
    }

    #[test]
    fn test_advance_grows_trajectories() {
        let mut sim = DriftSimulator::new(config(20, 3, 5, 0.5), SeededEntropy::new(7)).unwrap();

        sim.advance_generation().unwrap();
        assert_eq!(sim.current_generation(), 1);
        for trajectory in sim.trajectories() {
            assert_eq!(trajectory.len(), 2);
            assert_eq!(trajectory[0], 0.5);
        }
    }

    #[test]
    fn test_advance_past_terminal_fails() {
        let mut sim = DriftSimulator::new(config(20, 2, 3, 0.5), SeededEntropy::new(7)).unwrap();

        sim.advance_generation().unwrap();
        sim.advance_generation().unwrap();
        assert!(sim.is_terminal());

        let before: Vec<Vec<f64>> = sim.trajectories().map(|t| t.to_vec()).collect();
        assert_eq!(
            sim.advance_generation(),
            Err(DriftError::AlreadyTerminal { generation: 2 })
        );

        // State untouched by the failed call
        let after: Vec<Vec<f64>> = sim.trajectories().map(|t| t.to_vec()).collect();
        assert_eq!(before, after);
        assert_eq!(sim.current_generation(), 2);
    }

    #[test]
    fn test_zero_generations_is_terminal_immediately() {
        let mut sim = DriftSimulator::new(config(20, 0, 3, 0.5), SeededEntropy::new(7)).unwrap();

        assert!(sim.is_terminal());
        assert!(matches!(
            sim.advance_generation(),
            Err(DriftError::AlreadyTerminal { generation: 0 })
        ));
    }

    #[test]
    fn test_trajectory_out_of_range() {
        let sim = DriftSimulator::new(config(20, 2, 3, 0.5), SeededEntropy::new(7)).unwrap();

        assert!(sim.trajectory(2).is_some());
        assert!(sim.trajectory(3).is_none());
    }

    #[test]
    fn test_lost_allele_stays_lost() {
        let mut sim = DriftSimulator::new(config(25, 5, 3, 0.0), SeededEntropy::new(1)).unwrap();
        while !sim.is_terminal() {
            sim.advance_generation().unwrap();
        }

        for trajectory in sim.trajectories() {
            assert_eq!(trajectory, &[0.0; 6]);
        }
        assert_eq!(sim.summary().lost, 3);
    }

    #[test]
    fn test_fixed_allele_stays_fixed() {
        let mut sim = DriftSimulator::new(config(25, 5, 3, 1.0), SeededEntropy::new(1)).unwrap();
        while !sim.is_terminal() {
            sim.advance_generation().unwrap();
        }

        for trajectory in sim.trajectories() {
            assert_eq!(trajectory, &[1.0; 6]);
        }
        assert_eq!(sim.summary().fixed, 3);
    }

    #[test]
    fn test_population_beyond_sampler_limit_rejected() {
        let n = 1u64 << 30;
        let single_copy = 1.0 / (2 * n) as f64;

        let result = DriftSimulator::new(config(n, 5, 2000, single_copy), SeededEntropy::new(3));
        assert!(matches!(result, Err(DriftError::InvalidConfig(_))));
    }

    #[test]
    fn test_large_population_single_copy_advances() {
        let n = 1_000_000_000u64;
        let single_copy = 1.0 / (2 * n) as f64;
        let mut sim = DriftSimulator::new(config(n, 2, 200, single_copy), SeededEntropy::new(3)).unwrap();

        sim.advance_generation().unwrap();
        sim.advance_generation().unwrap();

        let step = 1.0 / (2 * n) as f64;
        for p in sim.latest_frequencies() {
            assert!((0.0..=1.0).contains(&p));
            // Counts stay tiny: one copy rarely grows past a handful
            assert!(p < 100.0 * step);
        }
    }

    #[test]
    fn test_entropy_accessor() {
        let sim = DriftSimulator::new(config(5, 1, 1, 0.5), SeededEntropy::new(99)).unwrap();
        assert_eq!(sim.entropy().seed(), Some(99));
    }
}
