use std::io;
use std::time::{Duration, Instant};

use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::remote::RemoteView;
use crate::session::ViewerSession;

/// Run a viewer session until it asks to quit.
///
/// Input events go straight to the session. Each idle pass advances the
/// session clock to the wall clock, publishes a changed window title and
/// redraws.
pub fn run_viewer<D, O, V>(
    driver: &mut D,
    output: &mut O,
    session: &mut ViewerSession<V>,
    poll_interval: Duration,
) -> io::Result<()>
where
    D: InputDriver,
    O: OutputDriver,
    V: RemoteView,
{
    let (columns, rows) = output.size()?;
    session.resize_cells(columns, rows);

    let mut event_loop = EventLoop::new(driver, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;

    let result = event_loop.run(|_driver, event| {
        match event {
            Some(event) => {
                session.handle_event(&event);
            }
            None => {
                session.tick(Instant::now());
                if let Some(title) = session.take_title_change() {
                    output.set_title(&title)?;
                }
                output.draw(|mut frame| session.render(&mut frame))?;
            }
        }
        Ok(if session.should_quit() {
            ControlFlow::Quit
        } else {
            ControlFlow::Continue
        })
    });

    event_loop.driver().set_mouse_capture(false)?;
    if result.is_ok() {
        tracing::info!(host = session.container().host(), "viewer closed");
    }
    result
}
