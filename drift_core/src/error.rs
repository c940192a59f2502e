//! Error types for the drift engine.

use thiserror::Error;

/// Errors raised by the drift simulator.
///
/// Both kinds are fatal to the current simulation: a stochastic run cannot be
/// meaningfully retried after a failure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DriftError {
    /// A configuration value violates its constraint
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The simulation already reached its final generation
    #[error("Simulation already terminal at generation {generation}")]
    AlreadyTerminal { generation: u64 },
}

impl DriftError {
    /// Creates an invalid config error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
