//! Error type for the fallible edges of the viewer: terminal I/O, icon
//! rasterization, command-line validation and logging setup.
//!
//! The overlay core itself never fails; geometry edge cases degrade silently.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to rasterize icon `{name}`: {reason}")]
    Icon { name: &'static str, reason: String },

    #[error("invalid screen geometry `{0}`, expected WIDTHxHEIGHT+X+Y")]
    ScreenSpec(String),

    #[error("invalid cell size `{0}`, expected WIDTHxHEIGHT")]
    CellSize(String),

    #[error("invalid window origin `{0}`, expected X,Y")]
    WindowOrigin(String),

    #[error("frame of {width}x{height} needs {expected} bytes, got {actual}")]
    Frame {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("logging setup failed: {0}")]
    Logging(String),
}

pub type Result<T, E = ViewerError> = std::result::Result<T, E>;
