use crossterm::event::Event;

use crate::geometry::PxRect;
use crate::ui::UiFrame;

pub mod button;
pub mod raster;
pub mod status_bar;
pub mod toolbar;
pub mod tooltip;

pub use button::{AnimatedButton, ButtonHandle};
pub use raster::{RasterImage, RenderMode};
pub use status_bar::StatusBar;
pub use toolbar::{OverlayToolbar, ToolbarAction};
pub use tooltip::{HoverTooltip, set_tooltips_disabled, tooltips_disabled};

pub use crate::component_context::{ComponentContext, EventContext};

/// Common surface of every overlay widget.
///
/// Bounds are in device pixels. Buttons and the toolbar use window-local
/// coordinates; popups live on the desktop and use global ones.
pub trait Component {
    fn resize(&mut self, _bounds: PxRect, _ctx: &ComponentContext) {}

    fn render(&mut self, frame: &mut UiFrame<'_>, ctx: &ComponentContext);

    fn pointer_enter(&mut self, _cx: &mut EventContext<'_>) {}

    fn pointer_leave(&mut self, _cx: &mut EventContext<'_>) {}

    fn handle_event(&mut self, _event: &Event, _cx: &mut EventContext<'_>) -> bool {
        false
    }
}
