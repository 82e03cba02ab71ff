use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;

use crate::error::{Result, ViewerError};

/// Where log lines end up. The terminal belongs to the UI while the viewer
/// runs, so there is no stderr target.
#[derive(Clone, Debug)]
pub enum LogTarget {
    File(Arc<File>),
    Discard,
}

impl LogTarget {
    /// Open `path` for appending, creating it if needed.
    pub fn append_to(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| ViewerError::Logging(format!("{}: {err}", path.display())))?;
        Ok(LogTarget::File(Arc::new(file)))
    }
}

pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    File(Arc<File>),
    Sink(io::Sink),
}

impl DelegatingWriter {
    fn new(target: &LogTarget) -> Self {
        let inner = match target {
            LogTarget::File(file) => DelegatingInner::File(Arc::clone(file)),
            LogTarget::Discard => DelegatingInner::Sink(io::sink()),
        };
        DelegatingWriter { inner }
    }
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::File(f) => (&**f).write(buf),
            DelegatingInner::Sink(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::File(f) => (&**f).flush(),
            DelegatingInner::Sink(s) => s.flush(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SubscriberMakeWriter {
    target: LogTarget,
}

impl SubscriberMakeWriter {
    pub fn new(target: LogTarget) -> Self {
        Self { target }
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DelegatingWriter::new(&self.target)
    }
}

/// Compact subscriber writing to `target`; debug level when `verbose`.
pub fn subscriber(
    target: LogTarget,
    verbose: bool,
) -> impl tracing::Subscriber + Send + Sync + 'static {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(SubscriberMakeWriter::new(target))
        .with_target(false)
        .with_thread_names(false)
        .with_ansi(false)
        .compact()
        .finish()
}

/// Install the global subscriber. Logs go to `log_file` when given and are
/// discarded otherwise. Safe to call multiple times; later calls leave the
/// first subscriber in place.
pub fn init(log_file: Option<&Path>, verbose: bool) -> Result<()> {
    let target = match log_file {
        Some(path) => LogTarget::append_to(path)?,
        None => LogTarget::Discard,
    };
    let _ = tracing::subscriber::set_global_default(subscriber(target, verbose));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn scoped_subscriber_appends_compact_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.log");
        fs::write(&path, "earlier line\n").unwrap();
        let target = LogTarget::append_to(&path).unwrap();
        tracing::subscriber::with_default(subscriber(target, false), || {
            tracing::info!(host = "lab-pc-07", "connection requested");
            tracing::debug!("hidden at info level");
        });
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("earlier line\n"));
        assert!(text.contains("connection requested"));
        assert!(text.contains("host=\"lab-pc-07\"") || text.contains("host=lab-pc-07"));
        assert!(!text.contains("hidden at info level"));
    }

    #[test]
    fn unwritable_log_path_is_a_logging_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("viewer.log");
        assert!(matches!(
            LogTarget::append_to(&path),
            Err(ViewerError::Logging(_))
        ));
    }
}
