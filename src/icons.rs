//! Embedded toolbar glyphs, rasterized once at startup.
//!
//! Each glyph is rendered twice: at the button size and at the tooltip size.
//! Widgets receive clones, so a button can tint its copy freely.

use crate::components::raster::RasterImage;
use crate::constants::{BUTTON_ICON_SIZE, TOOLTIP_ICON_SIZE};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    Connect,
    Busy,
    ViewOnly,
    Keyboard,
    FullScreen,
    Quit,
}

impl IconKind {
    pub const ALL: [IconKind; 6] = [
        IconKind::Connect,
        IconKind::Busy,
        IconKind::ViewOnly,
        IconKind::Keyboard,
        IconKind::FullScreen,
        IconKind::Quit,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            IconKind::Connect => "connect",
            IconKind::Busy => "busy",
            IconKind::ViewOnly => "view_only",
            IconKind::Keyboard => "keyboard",
            IconKind::FullScreen => "full_screen",
            IconKind::Quit => "quit",
        }
    }

    fn svg(self) -> &'static [u8] {
        match self {
            IconKind::Connect => include_bytes!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/assets/icons/connect.svg"
            )),
            IconKind::Busy => {
                include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/icons/busy.svg"))
            }
            IconKind::ViewOnly => include_bytes!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/assets/icons/view_only.svg"
            )),
            IconKind::Keyboard => include_bytes!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/assets/icons/keyboard.svg"
            )),
            IconKind::FullScreen => include_bytes!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/assets/icons/full_screen.svg"
            )),
            IconKind::Quit => {
                include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/icons/quit.svg"))
            }
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone)]
struct IconPair {
    button: RasterImage,
    tooltip: RasterImage,
}

#[derive(Debug, Clone)]
pub struct IconSet {
    icons: Vec<IconPair>,
}

impl IconSet {
    pub fn load() -> Result<Self> {
        let icons = IconKind::ALL
            .iter()
            .map(|kind| {
                Ok(IconPair {
                    button: RasterImage::from_svg(kind.name(), kind.svg(), BUTTON_ICON_SIZE)?,
                    tooltip: RasterImage::from_svg(kind.name(), kind.svg(), TOOLTIP_ICON_SIZE)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { icons })
    }

    /// A set of empty rasters, for hosts that do not paint icons.
    pub fn blank() -> Self {
        let icons = IconKind::ALL
            .iter()
            .map(|_| IconPair {
                button: RasterImage::new(),
                tooltip: RasterImage::new(),
            })
            .collect();
        Self { icons }
    }

    pub fn button_icon(&self, kind: IconKind) -> RasterImage {
        self.icons
            .get(kind.index())
            .map(|pair| pair.button.clone())
            .unwrap_or_default()
    }

    pub fn tooltip_icon(&self, kind: IconKind) -> RasterImage {
        self.icons
            .get(kind.index())
            .map(|pair| pair.tooltip.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_icons_rasterize_at_both_sizes() {
        let set = IconSet::load().unwrap();
        for kind in IconKind::ALL {
            assert_eq!(
                set.button_icon(kind).dimensions(),
                (BUTTON_ICON_SIZE, BUTTON_ICON_SIZE),
                "{}",
                kind.name()
            );
            assert_eq!(
                set.tooltip_icon(kind).dimensions(),
                (TOOLTIP_ICON_SIZE, TOOLTIP_ICON_SIZE)
            );
        }
    }

    #[test]
    fn blank_set_hands_out_empty_rasters() {
        let set = IconSet::blank();
        assert!(set.button_icon(IconKind::Quit).is_empty());
    }
}
