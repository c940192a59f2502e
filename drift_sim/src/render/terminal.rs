//! Live terminal chart.
//! ====================
//!
//! Draws every run as a braille line chart with Ratatui, redrawing once per
//! generation. Crossterm drives raw mode, the alternate screen and key input.
//!
//! Keys:
//! - `q` / `Esc` / `Ctrl-C` while running: skip the remaining pauses
//! - `q` / `Esc` after the last generation: close the chart

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};

use super::{FrameRenderer, GenerationFrame, PlotBounds};
use crate::error::SimError;

const RUN_COLORS: [Color; 8] = [
    Color::Red,
    Color::Blue,
    Color::Yellow,
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::LightRed,
    Color::LightBlue,
];

/// Ratatui line chart holding one dataset per run.
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,

    /// (generation, frequency) points per run
    lines: Vec<Vec<(f64, f64)>>,

    bounds: PlotBounds,
    generation: u64,
    frame_delay: Duration,

    /// Owns raw mode and the alternate screen
    interactive: bool,

    /// User asked to skip the animation
    fast_forward: bool,

    restored: bool,
}

impl TerminalRenderer<CrosstermBackend<Stdout>> {
    /// Takes over stdout: raw mode plus alternate screen.
    pub fn interactive(frame_delay: Duration) -> Result<Self, SimError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self::build(terminal, frame_delay, true))
    }
}

impl<B: Backend> TerminalRenderer<B> {
    /// Wraps an existing terminal without touching input or screen modes.
    pub fn with_terminal(terminal: Terminal<B>) -> Self {
        Self::build(terminal, Duration::ZERO, false)
    }

    fn build(terminal: Terminal<B>, frame_delay: Duration, interactive: bool) -> Self {
        Self {
            terminal,
            lines: Vec::new(),
            bounds: PlotBounds { x_max: 1.0, y: [0.0, 1.0] },
            generation: 0,
            frame_delay,
            interactive,
            fast_forward: false,
            restored: false,
        }
    }

    /// Returns the underlying terminal.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    fn redraw(&mut self, footer: &str) -> Result<(), SimError> {
        let lines = &self.lines;
        let bounds = self.bounds;
        let generation = self.generation;

        self.terminal
            .draw(|f| draw_chart(f, lines, bounds, generation, footer))?;
        Ok(())
    }

    fn restore(&mut self) -> Result<(), SimError> {
        if self.interactive && !self.restored {
            self.restored = true;
            disable_raw_mode()?;
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.terminal.show_cursor()?;
        }
        Ok(())
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

impl<B: Backend> FrameRenderer for TerminalRenderer<B> {
    fn begin(&mut self, bounds: PlotBounds, run_count: usize) -> Result<(), SimError> {
        self.bounds = bounds;
        self.lines = vec![Vec::new(); run_count];
        if self.interactive {
            self.terminal.clear()?;
        }
        Ok(())
    }

    fn draw(&mut self, frame: &GenerationFrame) -> Result<(), SimError> {
        let x = frame.generation as f64;
        for (line, &p) in self.lines.iter_mut().zip(&frame.frequencies) {
            line.push((x, p));
        }
        self.generation = frame.generation;

        let footer = if self.fast_forward {
            "Skipping animation..."
        } else {
            "Press 'q' to skip the animation"
        };
        self.redraw(footer)
    }

    fn pause(&mut self) -> Result<(), SimError> {
        if !self.interactive || self.fast_forward {
            return Ok(());
        }

        let deadline = Instant::now() + self.frame_delay;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            if event::poll(deadline - now)? {
                if let Event::Key(key) = event::read()? {
                    if is_quit(&key) {
                        self.fast_forward = true;
                        return Ok(());
                    }
                }
            }
        }
    }

    fn finish(&mut self) -> Result<(), SimError> {
        if self.interactive && !self.fast_forward {
            // Hold the final chart until dismissed
            self.redraw("Done. Press 'q' to quit")?;
            loop {
                if let Event::Key(key) = event::read()? {
                    if is_quit(&key) {
                        break;
                    }
                }
            }
        }
        self.restore()
    }
}

impl<B: Backend> Drop for TerminalRenderer<B> {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Renders the chart and footer into one frame.
fn draw_chart(
    f: &mut Frame,
    lines: &[Vec<(f64, f64)>],
    bounds: PlotBounds,
    generation: u64,
    footer: &str,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());

    let datasets: Vec<Dataset> = lines
        .iter()
        .enumerate()
        .map(|(run, points)| {
            Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(RUN_COLORS[run % RUN_COLORS.len()]))
                .data(points)
        })
        .collect();

    let axis_style = Style::default().fg(Color::Gray);
    let title = Line::from(vec![
        Span::styled("Genetic Drift Simulation", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  |  "),
        Span::styled(format!("generation {}", generation), Style::default().fg(Color::Cyan)),
    ]);

    let chart = Chart::new(datasets)
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title("Generations")
                .style(axis_style)
                .bounds(bounds.x())
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.0}", bounds.x_max / 2.0)),
                    Span::raw(format!("{:.0}", bounds.x_max)),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Allele Frequency")
                .style(axis_style)
                .bounds(bounds.y)
                .labels(vec![Span::raw("0.0"), Span::raw("0.5"), Span::raw("1.0")]),
        );
    f.render_widget(chart, chunks[0]);

    let footer = Paragraph::new(footer).style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, chunks[1]);
}
