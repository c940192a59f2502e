//! Drift Simulation Harness
//!
//! Drives a [`drift_core::DriftSimulator`] generation by generation and feeds
//! the newest frequencies to the presentation layer.
//!
//! # Core Principle: Render Always, Persist Optionally
//!
//! Every generation, including generation 0, is drawn by the active renderer.
//! When frame persistence is on, a snapshot of all trajectories is also handed
//! to a background writer that saves it as `frame_NNN.png`. Write failures are
//! logged and counted but never stop the simulation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       DriftRunner                        │
//! │                                                          │
//! │   DriftSimulator ──advance──► GenerationFrame            │
//! │                                    │                     │
//! │                   ┌────────────────┴───────────┐         │
//! │                   ▼                            ▼         │
//! │           FrameRenderer                 FrameWriter      │
//! │        (ratatui chart / log)      (crossbeam ─► worker   │
//! │                                     ─► plotters PNG)     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use drift_core::{DriftSimulator, SeededEntropy, SimulationConfig};
//! use drift_sim::{DriftRunner, LogRenderer};
//!
//! let sim = DriftSimulator::new(SimulationConfig::default(), SeededEntropy::new(42))?;
//! let mut runner = DriftRunner::new(sim, LogRenderer::new());
//! let report = runner.run()?;
//! ```

mod config;
mod error;
mod exporter;
mod frames;
mod render;
mod runner;

pub use config::{PresentationConfig, RendererKind, RunConfig, DEFAULT_OUTPUT_DIR, MAX_DPI};
pub use error::SimError;
pub use exporter::DriftExport;
pub use frames::{
    find_label_font, frame_file_name, register_label_font, FrameError, FrameSink, FrameSnapshot,
    FrameWriter, PersistStats, PngFrameSink,
};
pub use render::{FrameRenderer, GenerationFrame, LogRenderer, PlotBounds, TerminalRenderer};
pub use runner::{DriftRunner, RunReport};
