//! Drift Core - Wright-Fisher Genetic Drift Engine
//!
//! This library evolves the frequency of a single allele in a finite diploid
//! population, one discrete generation at a time, across many independent runs.
//!
//! # Core Principle: Binomial Resampling
//!
//! Every generation, each run draws the number of allele copies carried by the
//! next generation from `Binomial(2N, p)`, where `p` is the run's current
//! frequency. Frequencies `0.0` and `1.0` are absorbing: once an allele is lost
//! or fixed it stays that way.
//!
//! All entropy comes from an injectable [`EntropySource`] that hands every run
//! its own RNG stream, so a seeded simulation is fully reproducible and runs can
//! be advanced in parallel.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                    DriftSimulator                     │
//! │                                                       │
//! │  ┌──────────────┐  ┌──────────────┐                   │
//! │  │   run #0     │  │   run #1     │     ...           │
//! │  │ trajectory   │  │ trajectory   │                   │
//! │  │ rng stream   │  │ rng stream   │                   │
//! │  └──────▲───────┘  └──────▲───────┘                   │
//! │         └────────┬────────┘                           │
//! │         ┌────────┴─────────┐                          │
//! │         │  EntropySource   │ (seeded or OS entropy)   │
//! │         └──────────────────┘                          │
//! └───────────────────────────────────────────────────────┘
//!            │ latest_frequencies() per generation
//!            ▼
//!      renderer / persistence (caller-owned)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use drift_core::{DriftSimulator, SeededEntropy, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     population_size: 50,
//!     generation_count: 100,
//!     ..Default::default()
//! };
//!
//! let mut sim = DriftSimulator::new(config, SeededEntropy::new(42))?;
//! while !sim.is_terminal() {
//!     sim.advance_generation()?;
//!     println!("{:?}", sim.latest_frequencies());
//! }
//! ```

pub mod config;
pub mod entropy;
pub mod error;
pub mod simulator;
pub mod summary;

// Re-export key types for convenience
pub use config::{SimulationConfig, MAX_ALLELE_COPIES};
pub use entropy::{EntropySource, OsEntropy, SeededEntropy};
pub use error::DriftError;
pub use simulator::DriftSimulator;
pub use summary::DriftSummary;
