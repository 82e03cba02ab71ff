//! Drivers that replay canned input and render into an in-memory buffer,
//! so the whole viewer can run headless.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::Event;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;

use super::{InputDriver, OutputDriver};
use crate::ui::UiFrame;

/// Replays a fixed list of events, one per read, then reports idle forever.
#[derive(Debug, Default)]
pub struct ScriptedInputDriver {
    events: VecDeque<Event>,
    mouse_capture: bool,
    idle_polls: usize,
}

impl ScriptedInputDriver {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
            mouse_capture: false,
            idle_polls: 0,
        }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    pub fn mouse_capture(&self) -> bool {
        self.mouse_capture
    }

    /// Polls that found nothing to read.
    pub fn idle_polls(&self) -> usize {
        self.idle_polls
    }
}

impl InputDriver for ScriptedInputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        if self.events.is_empty() {
            self.idle_polls += 1;
            if !timeout.is_zero() {
                std::thread::sleep(timeout);
            }
            return Ok(false);
        }
        Ok(true)
    }

    fn read(&mut self) -> io::Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        self.mouse_capture = enabled;
        Ok(())
    }
}

/// Renders into a `TestBackend` and remembers the titles it was given.
pub struct BufferOutputDriver {
    terminal: Terminal<TestBackend>,
    titles: Vec<String>,
    frames: usize,
}

impl BufferOutputDriver {
    pub fn new(columns: u16, rows: u16) -> io::Result<Self> {
        let terminal = Terminal::new(TestBackend::new(columns, rows))
            .map_err(|err| io::Error::other(err.to_string()))?;
        Ok(Self {
            terminal,
            titles: Vec::new(),
            frames: 0,
        })
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Rendered text of one row.
    pub fn row_text(&self, row: u16) -> String {
        let buffer = self.buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, row)].symbol().to_string())
            .collect()
    }
}

impl OutputDriver for BufferOutputDriver {
    type Backend = TestBackend;

    fn enter(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn size(&mut self) -> io::Result<(u16, u16)> {
        let area = self.buffer().area;
        Ok((area.width, area.height))
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        self.titles.push(title.to_string());
        Ok(())
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>),
    {
        self.frames += 1;
        self.terminal
            .draw(move |frame| f(UiFrame::new(frame)))
            .map(|_| ())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}
