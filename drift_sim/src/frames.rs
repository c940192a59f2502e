//! Frame persistence.
//!
//! Snapshots of all trajectories are queued to a background thread that
//! renders them with plotters and writes `frame_NNN.png` files. A failed write
//! is logged and counted; it never reaches the simulation loop.

use crossbeam::channel::{bounded, Receiver, Sender};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Snapshots allowed in flight before `submit` waits for the writer.
const QUEUE_DEPTH: usize = 32;

/// Figure size in inches; pixels are this times the DPI.
const FIGURE_INCHES: (u32, u32) = (6, 4);

/// Family name frame text is drawn with.
const LABEL_FAMILY: &str = "sans-serif";

/// Usual install locations of a sans-serif TrueType font.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// File name for a generation's frame: `frame_000.png`, `frame_001.png`, ...
pub fn frame_file_name(generation: u64) -> String {
    format!("frame_{:03}.png", generation)
}

/// Returns the first installed font from the usual locations.
pub fn find_label_font() -> Option<PathBuf> {
    FONT_CANDIDATES.iter().map(PathBuf::from).find(|path| path.is_file())
}

/// Loads a TrueType/OpenType font for frame text.
///
/// The font stays registered for the rest of the process.
pub fn register_label_font(path: &Path) -> Result<(), FrameError> {
    let bytes: &'static [u8] = Box::leak(fs::read(path)?.into_boxed_slice());
    register_font(LABEL_FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| FrameError::Draw(format!("{} is not a usable font", path.display())))?;
    debug!("Frame labels use {}", path.display());
    Ok(())
}

/// Errors writing a single frame.
#[derive(Debug, Error)]
pub enum FrameError {
    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Plot rendering or encoding failure
    #[error("Draw error: {0}")]
    Draw(String),
}

fn draw_err(e: impl std::fmt::Display) -> FrameError {
    FrameError::Draw(e.to_string())
}

/// Everything needed to draw one frame, detached from the simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// Generation this frame shows
    pub generation: u64,

    /// Upper bound of the generation axis
    pub x_max: f64,

    /// Full trajectory of every run up to `generation`
    pub lines: Vec<Vec<f64>>,
}

/// Writes a rendered frame to a path.
pub trait FrameSink: Send + 'static {
    /// Renders `snapshot` and stores it at `path`.
    fn write_frame(&mut self, snapshot: &FrameSnapshot, path: &Path) -> Result<(), FrameError>;
}

/// PNG output through the plotters bitmap backend.
#[derive(Debug, Clone, Copy)]
pub struct PngFrameSink {
    dpi: u32,

    /// Draw title, axis titles and tick labels
    labels: bool,
}

impl PngFrameSink {
    /// Creates a sink rendering at `dpi` dots per inch, without text.
    pub fn new(dpi: u32) -> Self {
        Self {
            dpi: dpi.max(1),
            labels: false,
        }
    }

    /// Adds text to every frame. Needs a font from [`register_label_font`].
    pub fn with_labels(mut self) -> Self {
        self.labels = true;
        self
    }

    /// Image size in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (
            FIGURE_INCHES.0.saturating_mul(self.dpi),
            FIGURE_INCHES.1.saturating_mul(self.dpi),
        )
    }
}

impl FrameSink for PngFrameSink {
    fn write_frame(&mut self, snapshot: &FrameSnapshot, path: &Path) -> Result<(), FrameError> {
        let (width, height) = self.dimensions();
        // The RGB buffer is indexed with u32
        if width.checked_mul(height).and_then(|px| px.checked_mul(3)).is_none() {
            return Err(FrameError::Draw(format!(
                "{}x{} image at {} dpi is too large",
                width, height, self.dpi
            )));
        }

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let margin = (self.dpi / 10).max(2) as i32;
        let font = (self.dpi / 6).max(8) as i32;
        let mut builder = ChartBuilder::on(&root);
        builder.margin(margin);
        if self.labels {
            builder
                .caption("Genetic Drift Simulation", (LABEL_FAMILY, font))
                .x_label_area_size(font * 3)
                .y_label_area_size(font * 4);
        }

        let mut chart = builder
            .build_cartesian_2d(0f64..snapshot.x_max, 0f64..1f64)
            .map_err(draw_err)?;

        let mut mesh = chart.configure_mesh();
        mesh.x_labels(10).y_labels(11);
        if self.labels {
            mesh.x_desc("Generations")
                .y_desc("Allele Frequency")
                .label_style((LABEL_FAMILY, font * 3 / 4))
                .axis_desc_style((LABEL_FAMILY, font));
        }
        mesh.draw().map_err(draw_err)?;

        let stroke = (self.dpi / 150).max(1);
        for (run, line) in snapshot.lines.iter().enumerate() {
            let points = line.iter().enumerate().map(|(g, &p)| (g as f64, p));
            chart
                .draw_series(LineSeries::new(points, Palette99::pick(run).stroke_width(stroke)))
                .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }
}

/// Outcome counts of a persistence session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct PersistStats {
    /// Frames written successfully
    pub written: u64,

    /// Frames that failed or were dropped
    pub failed: u64,
}

struct FrameJob {
    snapshot: FrameSnapshot,
    path: PathBuf,
}

/// Background frame writer fed through a bounded channel.
pub struct FrameWriter {
    dir: PathBuf,
    tx: Option<Sender<FrameJob>>,
    worker: Option<JoinHandle<PersistStats>>,

    /// Frames handed to the worker
    submitted: u64,

    /// Frames the worker has saved, readable even if it dies
    written: Arc<AtomicU64>,

    /// Frames that never reached the worker
    dropped: u64,
}

impl FrameWriter {
    /// Creates the output directory and starts the writer thread.
    pub fn spawn<S: FrameSink>(dir: impl Into<PathBuf>, sink: S) -> Result<Self, FrameError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let (tx, rx) = bounded::<FrameJob>(QUEUE_DEPTH);
        let written = Arc::new(AtomicU64::new(0));
        let worker_written = Arc::clone(&written);
        let worker = thread::Builder::new()
            .name("frame-writer".to_string())
            .spawn(move || write_loop(rx, sink, &worker_written))?;

        info!("Saving frames to {}", dir.display());
        Ok(Self {
            dir,
            tx: Some(tx),
            worker: Some(worker),
            submitted: 0,
            written,
            dropped: 0,
        })
    }

    /// Queues a snapshot for writing.
    pub fn submit(&mut self, snapshot: FrameSnapshot) {
        let generation = snapshot.generation;
        let path = self.dir.join(frame_file_name(generation));

        let sent = match &self.tx {
            Some(tx) => tx.send(FrameJob { snapshot, path }).is_ok(),
            None => false,
        };
        if sent {
            self.submitted += 1;
        } else {
            warn!("Frame writer stopped; dropping frame {}", generation);
            self.dropped += 1;
        }
    }

    /// Waits for queued frames and returns the counts.
    pub fn finish(mut self) -> PersistStats {
        self.shutdown()
    }

    fn shutdown(&mut self) -> PersistStats {
        // Closing the channel ends the worker loop
        drop(self.tx.take());

        let mut stats = match self.worker.take() {
            Some(handle) => handle.join().unwrap_or_else(|_| {
                // Everything handed over but not saved is lost
                let written = self.written.load(Ordering::Acquire);
                error!("Frame writer thread panicked after {} frames", written);
                PersistStats {
                    written,
                    failed: self.submitted.saturating_sub(written),
                }
            }),
            None => PersistStats::default(),
        };
        stats.failed += std::mem::take(&mut self.dropped);
        stats
    }
}

impl Drop for FrameWriter {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

fn write_loop<S: FrameSink>(rx: Receiver<FrameJob>, mut sink: S, written: &AtomicU64) -> PersistStats {
    let mut stats = PersistStats::default();

    for job in rx.iter() {
        match sink.write_frame(&job.snapshot, &job.path) {
            Ok(()) => {
                info!("Saved: {}", job.path.display());
                stats.written += 1;
                written.fetch_add(1, Ordering::Release);
            }
            Err(e) => {
                warn!("Failed to save {}: {}", job.path.display(), e);
                stats.failed += 1;
            }
        }
    }

    stats
}
