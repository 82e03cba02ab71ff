use std::time::{Duration, Instant};

use clap::Parser;

use term_rview::components::toolbar::ViewFlags;
use term_rview::components::{ComponentContext, set_tooltips_disabled};
use term_rview::config::{Cli, ViewerOptions};
use term_rview::container::RemoteViewContainer;
use term_rview::drivers::OutputDriver;
use term_rview::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_rview::geometry::CellMetrics;
use term_rview::icons::IconSet;
use term_rview::remote::TestPatternView;
use term_rview::runner::run_viewer;
use term_rview::session::ViewerSession;
use term_rview::{Result, tracing_sub};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = ViewerOptions::try_from(&cli)?;
    tracing_sub::init(options.log_file.as_deref(), options.verbose)?;
    set_tooltips_disabled(!options.tooltips);

    let icons = IconSet::load()?;
    let host = display_host(&options.host);
    let remote = TestPatternView::new(options.connect_delay, options.user.clone());
    let container = RemoteViewContainer::new(
        remote,
        icons,
        host.clone(),
        ViewFlags {
            view_only: options.view_only,
            key_interception: true,
            full_screen: options.full_screen,
        },
    );

    let metrics = options.cell_metrics.unwrap_or_else(CellMetrics::detect);
    let ctx = ComponentContext::new(metrics).with_window_origin(options.window_origin);
    let mut session = ViewerSession::new(container, options.desktop(), ctx, Instant::now());
    if options.reveal {
        session.reveal_toolbar();
    }
    if options.connect {
        session.start_connection();
    }
    tracing::info!(
        host = %host,
        view_only = options.view_only,
        screens = session.desktop().screens().len(),
        "viewer starting"
    );

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut input = ConsoleInputDriver::new();
    let result = run_viewer(&mut input, &mut output, &mut session, POLL_INTERVAL);
    output.exit()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "viewer stopped");
    }
    result?;
    Ok(())
}

/// Loopback hosts are shown under the machine's own name.
fn display_host(host: &str) -> String {
    if !matches!(host, "localhost" | "127.0.0.1" | "::1") {
        return host.to_string();
    }
    hostname::get()
        .ok()
        .and_then(|s| s.into_string().ok())
        .unwrap_or_else(|| host.to_string())
}
