//! Error types for the simulation harness.

use drift_core::DriftError;
use thiserror::Error;

/// Errors that abort a simulation invocation.
///
/// Frame persistence failures are not here: they are logged and counted by
/// the frame writer instead.
#[derive(Debug, Error)]
pub enum SimError {
    /// The drift engine rejected the config or was over-advanced
    #[error(transparent)]
    Drift(#[from] DriftError),

    /// Terminal setup or drawing failed
    #[error("Render error: {0}")]
    Render(String),

    /// Underlying I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Trajectory export failed
    #[error("Export error: {0}")]
    Export(String),
}

impl SimError {
    /// Creates a render error.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
