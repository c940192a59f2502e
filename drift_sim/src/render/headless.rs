//! Headless renderer that reports each generation through tracing.

use super::{FrameRenderer, GenerationFrame, PlotBounds};
use crate::error::SimError;
use drift_core::DriftSummary;
use tracing::{debug, info};

/// Logs a one-line summary per generation.
#[derive(Debug, Default)]
pub struct LogRenderer {
    /// Points received per run
    lines: Vec<usize>,

    /// Frames drawn so far
    frames: u64,

    /// Latest summary
    last: Option<DriftSummary>,
}

impl LogRenderer {
    /// Creates a log renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of frames drawn.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Returns the most recent summary.
    pub fn last_summary(&self) -> Option<&DriftSummary> {
        self.last.as_ref()
    }
}

impl FrameRenderer for LogRenderer {
    fn begin(&mut self, bounds: PlotBounds, run_count: usize) -> Result<(), SimError> {
        self.lines = vec![0; run_count];
        debug!(
            "Plot bounds: x=[{}, {}] y=[{}, {}]",
            0.0, bounds.x_max, bounds.y[0], bounds.y[1]
        );
        Ok(())
    }

    fn draw(&mut self, frame: &GenerationFrame) -> Result<(), SimError> {
        for (points, _) in self.lines.iter_mut().zip(&frame.frequencies) {
            *points += 1;
        }

        let summary = DriftSummary::from_frequencies(frame.generation, &frame.frequencies);
        info!(
            "gen {:>4} | mean={:.3} | fixed={} lost={} segregating={}",
            summary.generation, summary.mean_frequency, summary.fixed, summary.lost, summary.segregating
        );

        self.last = Some(summary);
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SimError> {
        debug!("Log renderer drew {} frames", self.frames);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_renderer_counts_frames() {
        let mut renderer = LogRenderer::new();
        renderer.begin(PlotBounds { x_max: 2.0, y: [0.0, 1.0] }, 2).unwrap();

        renderer
            .draw(&GenerationFrame { generation: 0, frequencies: vec![0.5, 0.5] })
            .unwrap();
        renderer
            .draw(&GenerationFrame { generation: 1, frequencies: vec![1.0, 0.25] })
            .unwrap();
        renderer.finish().unwrap();

        assert_eq!(renderer.frames(), 2);
        assert_eq!(renderer.lines, vec![2, 2]);

        let last = renderer.last_summary().unwrap();
        assert_eq!(last.generation, 1);
        assert_eq!(last.fixed, 1);
        assert_eq!(last.segregating, 1);
    }
}
