use std::io;

use ratatui::backend::Backend;

use crate::ui::UiFrame;

pub trait OutputDriver {
    type Backend: Backend;

    fn enter(&mut self) -> io::Result<()>;
    fn exit(&mut self) -> io::Result<()>;

    /// Current size in cells, as `(columns, rows)`.
    fn size(&mut self) -> io::Result<(u16, u16)>;

    fn set_title(&mut self, _title: &str) -> io::Result<()> {
        Ok(())
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>);
}
