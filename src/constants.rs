//! Shared crate-wide layout and timing constants.
//!
//! Geometry is expressed in device pixels. The terminal renderer maps pixels
//! onto cells through [`crate::geometry::CellMetrics`].

use std::time::Duration;

/// Fixed button footprint.
pub const BUTTON_WIDTH: i32 = 88;
pub const BUTTON_HEIGHT: i32 = 48;

/// Edge length of the raster a button icon is scaled to.
pub const BUTTON_ICON_SIZE: u32 = 32;

/// Vertical offset of the button icon from the button's top edge.
pub const BUTTON_ICON_TOP: i32 = 3;

/// Corner radius of the button's paint and hit mask.
pub const BUTTON_CORNER_RADIUS: i32 = 5;

/// Amount the colorize level moves per fade step.
pub const FADE_STEP: u8 = 10;

/// Delay between two fade steps.
pub const FADE_INTERVAL: Duration = Duration::from_millis(10);

/// Inner margin of the tooltip panel, also used between icon, title and
/// description.
pub const TOOLTIP_MARGIN: i32 = 10;

/// Edge length of the raster a tooltip icon is scaled to.
pub const TOOLTIP_ICON_SIZE: u32 = 72;

/// Width at which tooltip descriptions are word-wrapped.
pub const TOOLTIP_WRAP_WIDTH: i32 = 250;

/// Corner radius of the tooltip's paint and hit mask.
pub const TOOLTIP_CORNER_RADIUS: i32 = 10;

/// Leftward nudge applied when the tooltip would cross the right screen edge.
///
/// Only hides a one-pixel seam; the real clamp happens later in placement.
pub const TOOLTIP_EDGE_NUDGE: i32 = 4;

/// Extra gap used when the tooltip has to flip above its anchor.
pub const TOOLTIP_FLIP_GAP: i32 = 30;

/// Offset from the clamped anchor to the displayed tooltip origin. Puts the
/// panel below-right of the anchor, overlapping its bottom edge so the
/// connector notch can join the two.
pub const TOOLTIP_OFFSET_X: i32 = -4;
pub const TOOLTIP_OFFSET_Y: i32 = 46;

/// Edge length of the connector notch, and the `dx` range that enables it.
pub const CONNECTOR_NOTCH_SIZE: i32 = 10;

/// Toolbar padding around the button row.
pub const TOOLBAR_PADDING_X: i32 = 8;
pub const TOOLBAR_PADDING_Y: i32 = 16;

/// Gap between neighbouring toolbar buttons.
pub const TOOLBAR_SPACING: i32 = 8;

/// Width of the caption column (host and user) right of the buttons.
pub const TOOLBAR_CAPTION_WIDTH: i32 = 160;

/// Distance between the container's top edge and the toolbar.
pub const TOOLBAR_TOP_MARGIN: i32 = 0;

/// Height of the strip along the container's top edge that reveals the
/// toolbar. One text row at the default cell size.
pub const ACTIVATION_STRIP_HEIGHT: i32 = 16;

/// How long the toolbar stays revealed after startup before auto-hiding.
pub const STARTUP_REVEAL: Duration = Duration::from_millis(1500);

/// Tick and period of the connect button's busy pulse.
pub const CONNECT_PULSE_INTERVAL: Duration = Duration::from_millis(50);
pub const CONNECT_PULSE_PERIOD_MS: u128 = 1000;

/// Rows reserved below the remote view for the status line outside of
/// full-screen mode.
pub const STATUS_ROWS: u16 = 1;

/// Pixel size of a terminal cell when the terminal does not report one.
pub const DEFAULT_CELL_WIDTH: u16 = 8;
pub const DEFAULT_CELL_HEIGHT: u16 = 16;

/// Screen size assumed when a desktop is built without any screens.
pub const FALLBACK_SCREEN_WIDTH: i32 = 1920;
pub const FALLBACK_SCREEN_HEIGHT: i32 = 1080;
