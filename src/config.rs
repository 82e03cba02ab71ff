//! Command-line surface of the `term-rview` binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use indoc::indoc;

use crate::error::{Result, ViewerError};
use crate::geometry::{CellMetrics, Point, PxRect};
use crate::screens::{Desktop, Screen};

const AFTER_HELP: &str = indoc! {"
    Pointer:
      Move to the top edge of the window to show the toolbar. Hover a button
      for its tooltip.

    Keys (when not captured by the remote side):
      Ctrl+Alt+K  toggle key capture
      F11         toggle full screen
      Ctrl+Q      quit

    Screens:
      --screen 1920x1080+0+0 --screen 1280x1024+1920+0
      describes a two-monitor desktop; the first one is primary.
"};

#[derive(Parser, Debug)]
#[command(
    name = "term-rview",
    version = env!("CARGO_PKG_VERSION"),
    about = "Terminal remote-desktop viewer with an auto-hiding toolbar",
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Host to connect to.
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Watch only; never send keys or pointer input.
    #[arg(long)]
    pub view_only: bool,

    /// Start without the status row.
    #[arg(long)]
    pub full_screen: bool,

    /// Never show button tooltips.
    #[arg(long)]
    pub no_tooltips: bool,

    /// Start connecting right away.
    #[arg(long)]
    pub connect: bool,

    /// Skip the toolbar reveal at startup.
    #[arg(long)]
    pub no_reveal: bool,

    /// Pixel size of one terminal cell, overriding what the terminal reports.
    #[arg(long, value_name = "WxH")]
    pub cell_size: Option<String>,

    /// Monitor of the desktop; repeat for multi-monitor layouts.
    #[arg(long = "screen", value_name = "WxH+X+Y")]
    pub screens: Vec<String>,

    /// Window position on the desktop.
    #[arg(long, value_name = "X,Y")]
    pub window_origin: Option<String>,

    /// User reported as logged in on the remote side.
    #[arg(long, value_name = "NAME")]
    pub user: Option<String>,

    /// How long the remote side takes to accept a connection.
    #[arg(long, value_name = "MS", default_value_t = 1200)]
    pub connect_delay_ms: u64,

    /// Append logs to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Validated startup options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerOptions {
    pub host: String,
    pub view_only: bool,
    pub full_screen: bool,
    pub tooltips: bool,
    pub connect: bool,
    pub reveal: bool,
    pub cell_metrics: Option<CellMetrics>,
    pub screens: Vec<Screen>,
    pub window_origin: Point,
    pub user: Option<String>,
    pub connect_delay: Duration,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

impl ViewerOptions {
    /// Desktop described by `--screen`, or a single screen that follows the
    /// terminal window.
    pub fn desktop(&self) -> Desktop {
        if self.screens.is_empty() {
            Desktop::single(Default::default())
        } else {
            Desktop::new(self.screens.clone())
        }
    }
}

impl TryFrom<&Cli> for ViewerOptions {
    type Error = ViewerError;

    fn try_from(cli: &Cli) -> Result<Self> {
        let cell_metrics = cli.cell_size.as_deref().map(parse_cell_size).transpose()?;
        let screens = cli
            .screens
            .iter()
            .map(|spec| parse_screen(spec).map(Screen::from_geometry))
            .collect::<Result<Vec<_>>>()?;
        let window_origin = cli
            .window_origin
            .as_deref()
            .map(parse_window_origin)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            host: cli.host.clone(),
            view_only: cli.view_only,
            full_screen: cli.full_screen,
            tooltips: !cli.no_tooltips,
            connect: cli.connect,
            reveal: !cli.no_reveal,
            cell_metrics,
            screens,
            window_origin,
            user: cli.user.clone(),
            connect_delay: Duration::from_millis(cli.connect_delay_ms),
            log_file: cli.log_file.clone(),
            verbose: cli.verbose,
        })
    }
}

fn parse_dims(spec: &str) -> Option<(i32, i32)> {
    let (w, h) = spec.split_once(['x', 'X'])?;
    let w: i32 = w.trim().parse().ok()?;
    let h: i32 = h.trim().parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}

/// Parse `WxH`, e.g. `9x18`.
pub fn parse_cell_size(spec: &str) -> Result<CellMetrics> {
    parse_dims(spec)
        .filter(|(w, h)| *w <= u16::MAX as i32 && *h <= u16::MAX as i32)
        .map(|(w, h)| CellMetrics::new(w as u16, h as u16))
        .ok_or_else(|| ViewerError::CellSize(spec.to_string()))
}

/// Parse an X11-style geometry `WxH+X+Y`. Offsets may be negative, as in
/// `1920x1080-1920+0` for a monitor left of the primary.
pub fn parse_screen(spec: &str) -> Result<PxRect> {
    let err = || ViewerError::ScreenSpec(spec.to_string());
    let offsets_at = spec.find(['+', '-']).ok_or_else(err)?;
    let (dims, offsets) = spec.split_at(offsets_at);
    let (width, height) = parse_dims(dims).ok_or_else(err)?;
    let second = offsets[1..].find(['+', '-']).ok_or_else(err)? + 1;
    let (x, y) = offsets.split_at(second);
    let x: i32 = x.trim_start_matches('+').parse().map_err(|_| err())?;
    let y: i32 = y.trim_start_matches('+').parse().map_err(|_| err())?;
    Ok(PxRect::new(x, y, width, height))
}

/// Parse `X,Y`.
pub fn parse_window_origin(spec: &str) -> Result<Point> {
    let err = || ViewerError::WindowOrigin(spec.to_string());
    let (x, y) = spec.split_once(',').ok_or_else(err)?;
    let x: i32 = x.trim().parse().map_err(|_| err())?;
    let y: i32 = y.trim().parse().map_err(|_| err())?;
    Ok(Point::new(x, y))
}
