//! Renderers consuming one new point per run each generation.

mod headless;
mod terminal;

pub use headless::LogRenderer;
pub use terminal::TerminalRenderer;

use crate::error::SimError;
use drift_core::SimulationConfig;

/// The newest frequency of every run at one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationFrame {
    /// Generation index (0 = starting frequency)
    pub generation: u64,

    /// Latest frequency per run, by run index
    pub frequencies: Vec<f64>,
}

/// Axis bounds implied by the config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    /// Upper generation bound (at least 1 so the axis never collapses)
    pub x_max: f64,

    /// Frequency bounds, always [0, 1]
    pub y: [f64; 2],
}

impl PlotBounds {
    /// Bounds for `x ∈ [0, generation_count]`, `y ∈ [0, 1]`.
    pub fn for_config(config: &SimulationConfig) -> Self {
        Self {
            x_max: (config.generation_count as f64).max(1.0),
            y: [0.0, 1.0],
        }
    }

    /// X-axis bounds as a pair.
    pub fn x(&self) -> [f64; 2] {
        [0.0, self.x_max]
    }
}

/// Something that draws trajectories as they grow.
///
/// Owned by the driving loop; holds one line per run index.
pub trait FrameRenderer {
    /// Prepares one line per run.
    fn begin(&mut self, bounds: PlotBounds, run_count: usize) -> Result<(), SimError>;

    /// Appends the frame's points and redraws.
    fn draw(&mut self, frame: &GenerationFrame) -> Result<(), SimError>;

    /// Waits between frames. Headless renderers return immediately.
    fn pause(&mut self) -> Result<(), SimError> {
        Ok(())
    }

    /// Called once after the final generation.
    fn finish(&mut self) -> Result<(), SimError>;
}
