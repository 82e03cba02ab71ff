use std::io;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{Event, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::style::Color;

use term_rview::components::ComponentContext;
use term_rview::components::toolbar::{ButtonRole, ViewFlags};
use term_rview::container::RemoteViewContainer;
use term_rview::drivers::OutputDriver;
use term_rview::drivers::scripted::BufferOutputDriver;
use term_rview::geometry::{CellMetrics, Size};
use term_rview::icons::IconSet;
use term_rview::remote::TestPatternView;
use term_rview::screens::Desktop;
use term_rview::session::ViewerSession;

#[derive(Parser, Debug)]
#[command(
    name = "rview-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Headless benchmark sweeping the pointer across the viewer toolbar"
)]
struct BenchCli {
    /// How long to run the benchmark.
    #[arg(
        short = 'd',
        long = "duration",
        value_name = "SECONDS",
        default_value_t = 5.0
    )]
    duration_seconds: f64,

    /// Target frames per second. Zero renders as fast as possible.
    #[arg(short = 'f', long = "fps", value_name = "FPS", default_value_t = 0.0)]
    target_fps: f64,

    /// Terminal width in cells.
    #[arg(long, default_value_t = 120)]
    columns: u16,

    /// Terminal height in cells.
    #[arg(long, default_value_t = 40)]
    rows: u16,
}

struct BenchConfig {
    duration: Duration,
    target_fps: f64,
    frame_budget: Option<Duration>,
    columns: u16,
    rows: u16,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(0.5..=600.0).contains(&cli.duration_seconds) {
            return Err("duration must be between 0.5 and 600 seconds".to_string());
        }
        if cli.target_fps != 0.0 && !(1.0..=1000.0).contains(&cli.target_fps) {
            return Err("fps must be 0 or between 1 and 1000".to_string());
        }
        if !(90..=1000).contains(&cli.columns) || !(10..=500).contains(&cli.rows) {
            return Err("terminal must be at least 90x10 and at most 1000x500 cells".to_string());
        }
        Ok(Self {
            duration: Duration::from_secs_f64(cli.duration_seconds),
            target_fps: cli.target_fps,
            frame_budget: (cli.target_fps > 0.0)
                .then(|| Duration::from_secs_f64(1.0 / cli.target_fps)),
            columns: cli.columns,
            rows: cli.rows,
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;
    let icons = IconSet::load().map_err(io::Error::other)?;
    let stats = run_benchmark(&config, icons)?;
    println!("{}", stats.final_report(&config));
    Ok(())
}

fn run_benchmark(config: &BenchConfig, icons: IconSet) -> io::Result<BenchStats> {
    let remote = TestPatternView::new(Duration::from_millis(300), Some("bench".to_string()));
    let container = RemoteViewContainer::new(
        remote,
        icons,
        "bench-host",
        ViewFlags {
            key_interception: true,
            ..ViewFlags::default()
        },
    );
    let ctx = ComponentContext::new(CellMetrics::default());
    let mut session = ViewerSession::new(
        container,
        Desktop::single(Size::default()),
        ctx,
        Instant::now(),
    );
    let mut output = BufferOutputDriver::new(config.columns, config.rows)?;
    let (columns, rows) = output.size()?;
    session.resize_cells(columns, rows);
    session.start_connection();

    let sweep = PointerSweep::new(&session);
    let mut stats = BenchStats::new();
    let mut tick: u64 = 0;

    while stats.elapsed() < config.duration {
        let frame_start = Instant::now();
        if let Some(event) = sweep.event_at(tick) {
            session.handle_event(&event);
        }
        session.tick(frame_start);
        if session.container().tooltip().is_some() {
            stats.tooltip_frames += 1;
        }
        output.draw(|mut frame| session.render(&mut frame))?;
        let draw_time = frame_start.elapsed();
        stats.record_frame(painted_cells(output.buffer()), draw_time);

        if let Some(budget) = config.frame_budget {
            std::thread::sleep(budget.saturating_sub(draw_time));
        }
        tick = tick.wrapping_add(1);
    }

    stats.mark_completed();
    Ok(stats)
}

/// Touches the top edge, moves the pointer along the button row, then drops
/// it to the bottom of the window so the toolbar hides before the next pass.
struct PointerSweep {
    row: u16,
    first_column: u16,
    last_column: u16,
    park_row: u16,
}

impl PointerSweep {
    fn new(session: &ViewerSession<TestPatternView>) -> Self {
        let metrics = session.context().metrics();
        let cw = metrics.cell_width() as i32;
        let ch = metrics.cell_height() as i32;
        let toolbar = session.container().toolbar();
        let first = toolbar.button_for(ButtonRole::ALL[0]).map(|b| b.bounds());
        let last = toolbar
            .button_for(ButtonRole::Quit)
            .map(|b| b.bounds())
            .or(first);
        let (row, first_column, last_column) = match (first, last) {
            (Some(first), Some(last)) => (
                ((first.y + first.height / 2) / ch) as u16,
                (first.x / cw) as u16,
                (last.right() / cw) as u16,
            ),
            _ => (1, 0, 1),
        };
        let size = session.container().size();
        Self {
            row,
            first_column,
            last_column: last_column.max(first_column + 1),
            park_row: ((size.height / ch) - 1).max(row as i32 + 1) as u16,
        }
    }

    fn event_at(&self, tick: u64) -> Option<Event> {
        let span = (self.last_column - self.first_column) as u64;
        let period = span + 9;
        let step = tick % period;
        let (column, row) = if step == 0 {
            (self.first_column, 0)
        } else if step <= span {
            (self.first_column + (step - 1) as u16, self.row)
        } else if step == span + 1 {
            (self.last_column, self.park_row)
        } else {
            return None;
        };
        Some(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }))
    }
}

fn painted_cells(buffer: &Buffer) -> u64 {
    buffer
        .content()
        .iter()
        .filter(|cell| cell.bg != Color::Reset || cell.symbol() != " ")
        .count() as u64
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    frame_count: u64,
    cell_updates: u64,
    tooltip_frames: u64,
    total_draw_time: Duration,
    fastest_frame: Duration,
    slowest_frame: Duration,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            frame_count: 0,
            cell_updates: 0,
            tooltip_frames: 0,
            total_draw_time: Duration::ZERO,
            fastest_frame: Duration::MAX,
            slowest_frame: Duration::ZERO,
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_frame(&mut self, cells: u64, draw_time: Duration) {
        self.frame_count = self.frame_count.saturating_add(1);
        self.cell_updates = self.cell_updates.saturating_add(cells);
        self.total_draw_time += draw_time;
        self.fastest_frame = self.fastest_frame.min(draw_time);
        self.slowest_frame = self.slowest_frame.max(draw_time);
    }

    fn frame_ms(&self, d: Duration) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        d.as_secs_f64() * 1_000.0
    }

    fn average_frame_ms(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        self.frame_ms(self.total_draw_time) / self.frame_count as f64
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let elapsed = self.elapsed().as_secs_f64();
        let fps_avg = if elapsed > 0.0 {
            self.frame_count as f64 / elapsed
        } else {
            0.0
        };
        let target = if config.target_fps > 0.0 {
            format!("{:.1}", config.target_fps)
        } else {
            "unpaced".to_string()
        };

        indoc::formatdoc!(
            r#"
            Viewer bench on {columns}x{rows} cells.
            Duration: {elapsed:.2}s (target {duration:.2}s)
            Frames: {frames} | Avg FPS: {fps:.1} (target {target})
            Avg frame: {avg:.2} ms | Best: {best:.2} ms | Worst: {worst:.2} ms
            Painted cells: {cells} total | Frames with tooltip: {tooltips}
            "#,
            columns = config.columns,
            rows = config.rows,
            elapsed = elapsed,
            duration = config.duration.as_secs_f64(),
            frames = self.frame_count,
            fps = fps_avg,
            target = target,
            avg = self.average_frame_ms(),
            best = self.frame_ms(self.fastest_frame),
            worst = self.frame_ms(self.slowest_frame),
            cells = self.cell_updates,
            tooltips = self.tooltip_frames,
        )
    }
}
