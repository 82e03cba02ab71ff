pub mod colors;
pub mod component_context;
pub mod components;
pub mod config;
pub mod constants;
pub mod container;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod geometry;
pub mod icons;
pub mod keybindings;
pub mod keys;
pub mod remote;
pub mod runner;
pub mod scheduler;
pub mod screens;
pub mod session;
pub mod signals;
pub mod text;
pub mod theme;
pub mod tracing_sub;
pub mod ui;

pub use error::{Result, ViewerError};
