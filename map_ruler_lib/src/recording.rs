//! In-memory [`MapSurface`] that keeps the state a real map would show. Used by the
//! replay CLI and by tests.

use std::collections::{BTreeMap, BTreeSet};

use geo_types::Point;
use geojson::Feature;

use crate::{
    events::RulerEvent,
    geometry::line_coordinates,
    surface::{Cursor, HandleId, HandleStyle, LineStyle, Listener, MapSurface, PopupOptions},
};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedHandle {
    pub position: Point,
    pub style: HandleStyle,
    pub popup: Option<RecordedPopup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPopup {
    pub options: PopupOptions,
    pub html: String,
    pub writes: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLayer {
    pub source_id: String,
    pub style: LineStyle,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub sources: BTreeMap<String, Feature>,
    pub layers: BTreeMap<String, RecordedLayer>,
    pub handles: BTreeMap<HandleId, RecordedHandle>,
    pub listeners: BTreeSet<Listener>,
    pub cursor: Cursor,
    pub button_active: bool,
    pub button_disabled: bool,
    pub events: Vec<RulerEvent>,
    pub removed_handles: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every custom source and layer, like a map does on style change.
    pub fn reload_style(&mut self) {
        self.sources.clear();
        self.layers.clear();
    }

    /// Moves a handle the way a user drag would, before the drag is reported.
    pub fn move_handle(&mut self, id: HandleId, position: Point) {
        if let Some(handle) = self.handles.get_mut(&id) {
            handle.position = position;
        }
    }

    pub fn line(&self, source_id: &str) -> Option<Vec<(f64, f64)>> {
        self.sources.get(source_id).and_then(line_coordinates)
    }

    pub fn popup_html(&self, id: HandleId) -> Option<&str> {
        self.handles.get(&id)?.popup.as_ref().map(|p| p.html.as_str())
    }

    pub fn take_events(&mut self) -> Vec<RulerEvent> {
        std::mem::take(&mut self.events)
    }
}

impl MapSurface for RecordingSurface {
    type Handle = HandleId;

    fn add_line_source(&mut self, source_id: &str, data: Feature) {
        self.sources.insert(source_id.to_string(), data);
    }

    fn has_line_source(&self, source_id: &str) -> bool {
        self.sources.contains_key(source_id)
    }

    fn remove_line_source(&mut self, source_id: &str) {
        self.sources.remove(source_id);
    }

    fn set_line_data(&mut self, source_id: &str, data: Feature) {
        if let Some(source) = self.sources.get_mut(source_id) {
            *source = data;
        }
    }

    fn add_line_layer(&mut self, layer_id: &str, source_id: &str, style: &LineStyle) {
        self.layers.insert(
            layer_id.to_string(),
            RecordedLayer {
                source_id: source_id.to_string(),
                style: style.clone(),
            },
        );
    }

    fn has_line_layer(&self, layer_id: &str) -> bool {
        self.layers.contains_key(layer_id)
    }

    fn remove_line_layer(&mut self, layer_id: &str) {
        self.layers.remove(layer_id);
    }

    fn create_handle(&mut self, id: HandleId, position: Point, style: &HandleStyle) -> HandleId {
        self.handles.insert(
            id,
            RecordedHandle {
                position,
                style: style.clone(),
                popup: None,
            },
        );
        id
    }

    fn attach_popup(&mut self, handle: &mut HandleId, options: &PopupOptions) {
        if let Some(recorded) = self.handles.get_mut(&*handle) {
            recorded.popup = Some(RecordedPopup {
                options: options.clone(),
                html: String::new(),
                writes: 0,
            });
        }
    }

    fn set_popup_html(&mut self, handle: &mut HandleId, html: &str) {
        if let Some(popup) = self.handles.get_mut(&*handle).and_then(|h| h.popup.as_mut()) {
            popup.html = html.to_string();
            popup.writes += 1;
        }
    }

    fn remove_handle(&mut self, handle: HandleId) {
        if self.handles.remove(&handle).is_some() {
            self.removed_handles += 1;
        }
    }

    fn subscribe(&mut self, listener: Listener) {
        self.listeners.insert(listener);
    }

    fn unsubscribe(&mut self, listener: Listener) {
        self.listeners.remove(&listener);
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn set_button_active(&mut self, active: bool) {
        self.button_active = active;
    }

    fn set_button_disabled(&mut self, disabled: bool) {
        self.button_disabled = disabled;
    }

    fn fire(&mut self, event: RulerEvent) {
        self.events.push(event);
    }
}
