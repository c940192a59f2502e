//! Run configuration: the engine config plus presentation settings.

use clap::ValueEnum;
use drift_core::SimulationConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Directory saved frames land in unless overridden.
pub const DEFAULT_OUTPUT_DIR: &str = "drift_simulation";

/// Highest accepted frame resolution.
pub const MAX_DPI: u32 = 2400;

/// How generations are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RendererKind {
    /// Live line chart in the terminal
    #[default]
    Tui,

    /// One log line per generation (headless)
    Log,
}

/// Settings read only by the renderer and the frame writer.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationConfig {
    /// Save every rendered generation as a PNG
    pub persist_frames: bool,

    /// Saved frame resolution in dots per inch
    pub image_resolution: u32,

    /// TrueType font for frame labels; searched for when absent
    pub label_font: Option<PathBuf>,

    /// Directory for saved frames
    pub output_dir: PathBuf,

    /// Pause between interactive frames
    pub frame_delay: Duration,

    /// Renderer to use
    pub renderer: RendererKind,

    /// Optional JSON trajectory export path
    pub export_path: Option<PathBuf>,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            persist_frames: false,
            image_resolution: 300,
            label_font: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            frame_delay: Duration::from_millis(50),
            renderer: RendererKind::Tui,
            export_path: None,
        }
    }
}

/// Everything one invocation needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunConfig {
    /// Engine parameters
    pub simulation: SimulationConfig,

    /// Presentation parameters
    pub presentation: PresentationConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presentation_defaults() {
        let presentation = PresentationConfig::default();

        assert!(!presentation.persist_frames);
        assert_eq!(presentation.image_resolution, 300);
        assert_eq!(presentation.output_dir, PathBuf::from("drift_simulation"));
        assert_eq!(presentation.renderer, RendererKind::Tui);
    }

    #[test]
    fn test_renderer_kind_from_cli_name() {
        assert_eq!(RendererKind::from_str("log", true), Ok(RendererKind::Log));
        assert_eq!(RendererKind::from_str("TUI", true), Ok(RendererKind::Tui));
        assert!(RendererKind::from_str("gif", true).is_err());
    }
}
