//! The generation loop tying the simulator to its collaborators.

use crate::error::SimError;
use crate::frames::{FrameSnapshot, FrameWriter, PersistStats};
use crate::render::{FrameRenderer, GenerationFrame, PlotBounds};
use drift_core::{DriftSimulator, DriftSummary, EntropySource};
use serde::Serialize;
use tracing::{debug, info};

/// Outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Master seed, if the entropy source was seeded
    pub seed: Option<u64>,

    /// Frames handed to the renderer (generation 0 included)
    pub frames_rendered: u64,

    /// Frame persistence counts, if persistence was on
    pub persistence: Option<PersistStats>,

    /// First generation at which no run was segregating
    pub absorbed_at: Option<u64>,

    /// Outcome at the final generation
    pub summary: DriftSummary,
}

/// Drives a simulator from generation 0 to its last generation.
///
/// Each generation is drawn by the renderer and, when a writer is attached,
/// queued for persistence. Nothing flows back into the simulator.
pub struct DriftRunner<E: EntropySource, R: FrameRenderer> {
    simulator: DriftSimulator<E>,
    renderer: R,
    writer: Option<FrameWriter>,
}

impl<E: EntropySource, R: FrameRenderer> DriftRunner<E, R> {
    /// Creates a runner that renders every generation.
    pub fn new(simulator: DriftSimulator<E>, renderer: R) -> Self {
        Self {
            simulator,
            renderer,
            writer: None,
        }
    }

    /// Also persists every rendered generation.
    pub fn with_frame_writer(mut self, writer: FrameWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Runs to the final generation.
    ///
    /// Produces exactly `generation_count + 1` frames.
    pub fn run(&mut self) -> Result<RunReport, SimError> {
        let config = *self.simulator.config();
        let bounds = PlotBounds::for_config(&config);

        self.renderer.begin(bounds, config.run_count)?;

        let mut frames_rendered = 0;
        let mut absorbed_at = None;
        loop {
            self.publish(bounds)?;
            frames_rendered += 1;

            if absorbed_at.is_none() && self.simulator.summary().all_absorbed() {
                let generation = self.simulator.current_generation();
                info!("Every run fixed or lost by generation {}", generation);
                absorbed_at = Some(generation);
            }

            if self.simulator.is_terminal() {
                break;
            }
            self.simulator.advance_generation()?;
        }

        self.renderer.finish()?;

        let persistence = self.writer.take().map(FrameWriter::finish);
        debug!("Run complete: {} frames, persistence={:?}", frames_rendered, persistence);

        Ok(RunReport {
            seed: self.simulator.entropy().seed(),
            frames_rendered,
            persistence,
            absorbed_at,
            summary: self.simulator.summary(),
        })
    }

    /// Draws the current generation, queues it for saving, then pauses.
    fn publish(&mut self, bounds: PlotBounds) -> Result<(), SimError> {
        let frame = GenerationFrame {
            generation: self.simulator.current_generation(),
            frequencies: self.simulator.latest_frequencies(),
        };
        self.renderer.draw(&frame)?;

        if let Some(writer) = self.writer.as_mut() {
            writer.submit(FrameSnapshot {
                generation: frame.generation,
                x_max: bounds.x_max,
                lines: self.simulator.trajectories().map(<[f64]>::to_vec).collect(),
            });
        }

        self.renderer.pause()
    }

    /// Returns the simulator.
    pub fn simulator(&self) -> &DriftSimulator<E> {
        &self.simulator
    }

    /// Returns the renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
