use ratatui::style::Color;

use crate::colors::{Ramp, Rgb};

// Centralized overlay palette. Widgets ask for `Rgb` values so they can blend
// before mapping to a terminal color.

/// Resting button gradient.
pub const BUTTON_NORMAL_RAMP: Ramp<4> = Ramp::new([
    (0.0, Rgb::new(64, 128, 255)),
    (0.38, Rgb::new(32, 64, 192)),
    (0.42, Rgb::new(16, 32, 128)),
    (1.0, Rgb::new(0, 16, 64)),
]);

/// Hover gradient, blended over the resting one by the colorize level.
pub const BUTTON_HIGHLIGHT_RAMP: Ramp<4> = Ramp::new([
    (0.0, Rgb::new(255, 224, 0)),
    (0.38, Rgb::new(224, 192, 0)),
    (0.42, Rgb::new(192, 160, 0)),
    (1.0, Rgb::new(96, 48, 0)),
]);

/// Coverage of the black veil over a pressed or checked button.
pub const BUTTON_ACTIVE_VEIL: u8 = 128;

/// Coverage of the light top edge and dark bottom edge of a button.
pub const BUTTON_EDGE_ALPHA: u8 = 64;

pub const TOOLTIP_FRAME_RGB: Rgb = Rgb::new(48, 48, 48);

/// Base window color the tooltip gradient is derived from.
pub const WINDOW_RGB: Rgb = Rgb::new(212, 208, 200);

pub fn tooltip_top() -> Rgb {
    WINDOW_RGB.scaled(120)
}

pub fn tooltip_bottom() -> Rgb {
    WINDOW_RGB.scaled(80)
}

pub const TOOLTIP_TEXT_RGB: Rgb = Rgb::BLACK;

pub const TOOLBAR_BG_RGB: Rgb = Rgb::new(16, 16, 24);
pub const TOOLBAR_CAPTION_RGB: Rgb = Rgb::new(224, 224, 224);
pub const TOOLBAR_CAPTION_DIM_RGB: Rgb = Rgb::new(150, 150, 160);

pub const BUTTON_LABEL_RGB: Rgb = Rgb::WHITE;

pub fn rgb_to_color(rgb: Rgb) -> Color {
    rgb.to_color()
}

// Status line
pub fn status_bg() -> Color {
    Color::DarkGray
}
pub fn status_fg() -> Color {
    Color::White
}
pub fn status_accent() -> Color {
    rgb_to_color(Rgb::new(255, 165, 0))
}

// Remote view placeholder while no frame has arrived
pub fn idle_view_fg() -> Color {
    Color::Gray
}
