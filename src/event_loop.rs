use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// Upper bound on input events handled back to back before the loop yields
/// an idle tick, so animations keep moving during a long drag.
const MAX_BURST: usize = 64;

/// Drives the UI thread: the only place that polls the input driver.
///
/// The handler sees `Some(event)` for every input event and `None` once per
/// iteration. The idle call is where timers fire, the remote side is polled
/// and the frame is drawn.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn poll(&mut self) -> io::Result<Option<Event>> {
        if self.driver.poll(self.poll_interval)? {
            Ok(Some(self.driver.read()?))
        } else {
            Ok(None)
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(&mut self.driver, None)? {
                break;
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain bursts (mouse motion, pastes) without redrawing after
                // every single event.
                for _ in 0..MAX_BURST {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(&mut self.driver, Some(event))? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::scripted::ScriptedInputDriver;

    #[test]
    fn idle_tick_runs_before_and_between_bursts() {
        let driver = ScriptedInputDriver::new((0..3).map(|_| Event::FocusGained));
        let mut event_loop = EventLoop::new(driver, Duration::ZERO);
        let mut log = Vec::new();
        event_loop
            .run(|_, event| {
                log.push(event.is_some());
                let idle_after_script = event.is_none() && log.len() > 1;
                Ok(if idle_after_script {
                    ControlFlow::Quit
                } else {
                    ControlFlow::Continue
                })
            })
            .unwrap();
        assert_eq!(log, vec![false, true, true, true, false]);
    }

    #[test]
    fn long_bursts_yield_to_idle() {
        let driver = ScriptedInputDriver::new((0..MAX_BURST + 1).map(|_| Event::FocusLost));
        let mut event_loop = EventLoop::new(driver, Duration::ZERO);
        let mut idle_seen_with_events_left = false;
        event_loop
            .run(|driver, event| {
                if event.is_none() {
                    if driver.remaining() > 0 && driver.remaining() < MAX_BURST {
                        idle_seen_with_events_left = true;
                    }
                    if driver.remaining() == 0 {
                        return Ok(ControlFlow::Quit);
                    }
                }
                Ok(ControlFlow::Continue)
            })
            .unwrap();
        assert!(idle_seen_with_events_left);
    }
}
