//! Drift Simulator CLI
//!
//! Simulate genetic drift under the Wright-Fisher model and watch the allele
//! frequency of every run evolve live.

use clap::Parser;
use drift_core::{DriftSimulator, EntropySource, OsEntropy, SeededEntropy, SimulationConfig};
use drift_sim::{
    find_label_font, register_label_font, DriftExport, DriftRunner, FrameRenderer, FrameWriter,
    LogRenderer, PngFrameSink, PresentationConfig, RendererKind, RunConfig, RunReport, SimError,
    TerminalRenderer, DEFAULT_OUTPUT_DIR, MAX_DPI,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Wright-Fisher genetic drift simulator
#[derive(Parser, Debug)]
#[command(name = "drift-sim")]
#[command(about = "Simulate genetic drift.", long_about = None)]
struct Args {
    /// Population size (diploid individuals)
    #[arg(short, long = "pop-size", alias = "pop_size")]
    pop_size: u64,

    /// Number of generations
    #[arg(short, long)]
    generations: u64,

    /// Number of simulations
    #[arg(short, long, default_value = "10")]
    simulations: usize,

    /// Starting allele frequency
    #[arg(short = 'f', long = "start-freq", alias = "start_freq", default_value = "0.5", allow_negative_numbers = true)]
    start_freq: f64,

    /// Save each frame as a PNG file
    #[arg(long = "save-png", alias = "save_png")]
    save_png: bool,

    /// DPI (resolution) for the saved frames
    #[arg(long, default_value = "300", value_parser = clap::value_parser!(u32).range(1..=MAX_DPI as i64))]
    dpi: u32,

    /// TrueType font for frame labels (a system font is searched for if omitted)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Directory for saved frames
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Master seed for reproducible runs (OS entropy if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Renderer: live terminal chart or headless log
    #[arg(long, value_enum, default_value_t = RendererKind::Tui)]
    renderer: RendererKind,

    /// Pause between frames in milliseconds
    #[arg(long, default_value = "50")]
    frame_delay_ms: u64,

    /// Export trajectories to a JSON file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON summary on stdout
    #[arg(long)]
    json: bool,
}

impl Args {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            simulation: SimulationConfig {
                population_size: self.pop_size,
                generation_count: self.generations,
                run_count: self.simulations,
                start_frequency: self.start_freq,
            },
            presentation: PresentationConfig {
                persist_frames: self.save_png,
                image_resolution: self.dpi,
                label_font: self.font.clone(),
                output_dir: self.output_dir.clone(),
                frame_delay: Duration::from_millis(self.frame_delay_ms),
                renderer: self.renderer,
                export_path: self.export.clone(),
            },
        }
    }
}

fn init_tracing(args: &Args) {
    // Keep the live chart clean unless asked otherwise
    let level = if args.verbose {
        "debug"
    } else if args.renderer == RendererKind::Tui {
        "warn"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Builds the simulator and collaborators, then runs to the last generation.
fn execute<E: EntropySource>(config: &RunConfig, entropy: E) -> Result<RunReport, SimError> {
    // Invalid configs fail here, before any output exists
    let simulator = DriftSimulator::new(config.simulation, entropy)?;
    let presentation = &config.presentation;

    let writer = if presentation.persist_frames {
        let sink = label_frames(PngFrameSink::new(presentation.image_resolution), presentation);
        match FrameWriter::spawn(&presentation.output_dir, sink) {
            Ok(writer) => Some(writer),
            Err(e) => {
                error!(
                    "Cannot save frames to {}: {} (continuing without)",
                    presentation.output_dir.display(),
                    e
                );
                None
            }
        }
    } else {
        None
    };

    match presentation.renderer {
        RendererKind::Tui => {
            let renderer = TerminalRenderer::interactive(presentation.frame_delay).map_err(|e| {
                SimError::render(format!("cannot open terminal ({}); try --renderer log", e))
            })?;
            drive(simulator, renderer, writer, presentation)
        }
        RendererKind::Log => drive(simulator, LogRenderer::new(), writer, presentation),
    }
}

/// Turns on frame text when a font can be loaded.
fn label_frames(sink: PngFrameSink, presentation: &PresentationConfig) -> PngFrameSink {
    let Some(font) = presentation.label_font.clone().or_else(find_label_font) else {
        warn!("No font found; frames are saved without labels (see --font)");
        return sink;
    };

    match register_label_font(&font) {
        Ok(()) => sink.with_labels(),
        Err(e) => {
            warn!("Cannot use font {}: {} (frames saved without labels)", font.display(), e);
            sink
        }
    }
}

fn drive<E: EntropySource, R: FrameRenderer>(
    simulator: DriftSimulator<E>,
    renderer: R,
    writer: Option<FrameWriter>,
    presentation: &PresentationConfig,
) -> Result<RunReport, SimError> {
    let mut runner = DriftRunner::new(simulator, renderer);
    if let Some(writer) = writer {
        runner = runner.with_frame_writer(writer);
    }

    let report = runner.run()?;

    if let Some(path) = &presentation.export_path {
        DriftExport::from_simulator(runner.simulator())
            .write_to_file(path)
            .map_err(|e| SimError::Export(format!("{}: {}", path.display(), e)))?;
        info!("Exported trajectories to {}", path.display());
    }

    Ok(report)
}

fn print_report(report: &RunReport) {
    let summary = &report.summary;
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    match report.seed {
        Some(seed) => println!("Generations: {} (seed={})", summary.generation, seed),
        None => println!("Generations: {}", summary.generation),
    }
    println!(
        "Fixed: {}  Lost: {}  Segregating: {}  Mean frequency: {:.3}",
        summary.fixed, summary.lost, summary.segregating, summary.mean_frequency
    );
    if let Some(generation) = report.absorbed_at {
        println!("Every run absorbed by generation {}", generation);
    }
    if let Some(stats) = report.persistence {
        println!("Frames saved: {}  failed: {}", stats.written, stats.failed);
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(&args);

    let config = args.run_config();
    info!("Drift Simulator v{}", env!("CARGO_PKG_VERSION"));

    let result = match args.seed {
        Some(seed) => execute(&config, SeededEntropy::new(seed)),
        None => execute(&config, OsEntropy),
    };

    match result {
        Ok(report) => {
            if args.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => error!("Failed to encode report: {}", e),
                }
            } else {
                print_report(&report);
            }
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["drift-sim", "-p", "50", "-g", "100"]).unwrap();
        let config = args.run_config();

        assert_eq!(config.simulation.population_size, 50);
        assert_eq!(config.simulation.generation_count, 100);
        assert_eq!(config.simulation.run_count, 10);
        assert_eq!(config.simulation.start_frequency, 0.5);
        assert!(!config.presentation.persist_frames);
        assert_eq!(config.presentation.image_resolution, 300);
        assert_eq!(config.presentation.output_dir, PathBuf::from("drift_simulation"));
        assert_eq!(config.presentation.renderer, RendererKind::Tui);
        assert_eq!(config.presentation.frame_delay, Duration::from_millis(50));
        assert!(args.seed.is_none());
    }

    #[test]
    fn test_original_flag_spellings() {
        let args = Args::try_parse_from([
            "drift-sim", "--pop_size", "20", "--generations", "5", "--simulations", "3",
            "--start_freq", "0.1", "--save_png", "--dpi", "72",
        ])
        .unwrap();

        assert_eq!(args.pop_size, 20);
        assert_eq!(args.simulations, 3);
        assert_eq!(args.start_freq, 0.1);
        assert!(args.save_png);
        assert_eq!(args.dpi, 72);
    }

    #[test]
    fn test_required_and_ranged_flags() {
        assert!(Args::try_parse_from(["drift-sim", "-g", "10"]).is_err());
        assert!(Args::try_parse_from(["drift-sim", "-p", "10"]).is_err());
        assert!(Args::try_parse_from(["drift-sim", "-p", "10", "-g", "5", "--dpi", "0"]).is_err());
        assert!(Args::try_parse_from(["drift-sim", "-p", "10", "-g", "5", "--dpi", "20000"]).is_err());
        assert!(Args::try_parse_from(["drift-sim", "-p", "10", "-g", "5", "--dpi", "2400"]).is_ok());
        assert!(Args::try_parse_from(["drift-sim", "-p", "10", "-g", "-5"]).is_err());
    }

    #[test]
    fn test_invalid_config_fails_before_rendering() {
        let args = Args::try_parse_from(["drift-sim", "-p", "0", "-g", "5", "--renderer", "log"]).unwrap();
        let result = execute(&args.run_config(), SeededEntropy::new(1));

        assert!(matches!(result, Err(SimError::Drift(_))));
    }

    #[test]
    fn test_unusable_font_falls_back_to_plain_frames() {
        let dir = tempfile::tempdir().unwrap();
        let frames = dir.path().join("frames");
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();

        let args = Args::try_parse_from([
            "drift-sim", "-p", "10", "-g", "2", "-s", "2", "--renderer", "log", "--save-png",
            "--dpi", "10", "--font", bogus.to_str().unwrap(), "-o", frames.to_str().unwrap(),
        ])
        .unwrap();

        let report = execute(&args.run_config(), SeededEntropy::new(5)).unwrap();
        assert_eq!(report.persistence, Some(drift_sim::PersistStats { written: 3, failed: 0 }));
        assert!(frames.join("frame_002.png").is_file());
    }

    #[test]
    fn test_headless_execute_with_export() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("run.json");
        let args = Args::try_parse_from([
            "drift-sim", "-p", "15", "-g", "8", "-s", "4", "--renderer", "log", "--seed", "11",
            "--export", export.to_str().unwrap(),
        ])
        .unwrap();

        let report = execute(&args.run_config(), SeededEntropy::new(11)).unwrap();
        assert_eq!(report.frames_rendered, 9);
        assert_eq!(report.seed, Some(11));
        assert!(report.persistence.is_none());
        assert!(export.is_file());
    }
}
