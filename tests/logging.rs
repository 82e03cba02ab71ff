use std::fs;

use term_rview::tracing_sub;

#[test]
fn init_routes_global_logs_to_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rview.log");
    tracing_sub::init(Some(&path), true).unwrap();
    tracing::debug!(button = "Quit", "toolbar shown");

    // A second init keeps the first subscriber.
    tracing_sub::init(None, false).unwrap();
    tracing::info!("still routed");

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("toolbar shown"));
    assert!(text.contains("still routed"));
    assert!(!text.contains("\u{1b}["), "no ANSI colors in the log file");
}
