use geo_types::Point;
use geojson::Feature;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::events::RulerEvent;

/// Stable identifier the controller assigns to each handle it creates. Never reused
/// within one controller, so stale ids from an earlier session resolve to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HandleId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Listener {
    Click,
    StyleLoad,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandleStyle {
    pub size_px: u32,
    pub border_px: u32,
    pub border_color: String,
    pub fill_color: String,
    pub draggable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupOptions {
    pub close_button: bool,
    pub close_on_click: bool,
    pub font: Vec<String>,
    pub font_size: u32,
    pub font_halo: u32,
}

/// Everything the ruler needs from the host map. The host owns rendering; the
/// ruler only describes what should be on screen.
///
/// Drags on a handle created through [`MapSurface::create_handle`] must be reported
/// back through [`crate::RulerInput::on_drag`] with the same [`HandleId`].
pub trait MapSurface {
    type Handle;

    fn add_line_source(&mut self, source_id: &str, data: Feature);
    fn has_line_source(&self, source_id: &str) -> bool;
    fn remove_line_source(&mut self, source_id: &str);
    fn set_line_data(&mut self, source_id: &str, data: Feature);

    fn add_line_layer(&mut self, layer_id: &str, source_id: &str, style: &LineStyle);
    fn has_line_layer(&self, layer_id: &str) -> bool;
    fn remove_line_layer(&mut self, layer_id: &str);

    fn create_handle(&mut self, id: HandleId, position: Point, style: &HandleStyle) -> Self::Handle;
    fn attach_popup(&mut self, handle: &mut Self::Handle, options: &PopupOptions);
    fn set_popup_html(&mut self, handle: &mut Self::Handle, html: &str);
    fn remove_handle(&mut self, handle: Self::Handle);

    fn subscribe(&mut self, listener: Listener);
    fn unsubscribe(&mut self, listener: Listener);

    fn set_cursor(&mut self, cursor: Cursor);
    fn set_button_active(&mut self, active: bool);
    fn set_button_disabled(&mut self, disabled: bool);

    fn fire(&mut self, event: RulerEvent);
}
