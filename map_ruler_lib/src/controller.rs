use chrono::Utc;
use geo_types::Point;
use tracing::{debug, info, warn};

use crate::{
    config::RulerOptions,
    events::RulerEvent,
    geometry::line_feature,
    labels::compute_labels,
    measure_point::MeasurePoint,
    session::{PointHandle, Session},
    surface::{Cursor, HandleId, Listener, MapSurface},
    units::Unit,
    RulerError,
};

/// Inbound events from the host surface.
pub trait RulerInput {
    /// The user clicked the map at `coordinate` (lon, lat).
    fn on_capture(&mut self, coordinate: Point);
    /// A handle created by the ruler was dragged to `coordinate`.
    fn on_drag(&mut self, handle: HandleId, coordinate: Point);
    /// The host discarded custom layers, e.g. after a style change.
    fn on_surface_reload(&mut self);
}

/// Measurement session controller. Owns the session and drives the host surface.
pub struct RulerControl<S: MapSurface> {
    surface: S,
    options: RulerOptions,
    session: Session<S::Handle>,
    enabled: bool,
    next_handle: u64,
}

impl<S: MapSurface> RulerControl<S> {
    pub fn new(surface: S, options: RulerOptions) -> Result<Self, RulerError> {
        options.validate()?;

        Ok(Self {
            surface,
            options,
            session: Session::new(),
            enabled: true,
            next_handle: 1,
        })
    }

    pub fn start(&mut self) {
        let was_measuring = self.session.is_active();
        for stale in self.session.begin(Utc::now()) {
            self.surface.remove_handle(stale.handle);
        }

        self.surface.set_cursor(Cursor::Crosshair);
        self.surface.set_button_active(true);
        self.draw_line();
        if !was_measuring {
            self.surface.subscribe(Listener::Click);
            self.surface.subscribe(Listener::StyleLoad);
        }

        info!("Measuring started");
        self.surface.fire(RulerEvent::MeasuringStarted);
    }

    pub fn stop(&mut self) {
        self.surface.set_cursor(Cursor::Default);
        self.surface.set_button_active(false);

        let layer_id = &self.options.layer_id;
        if self.surface.has_line_layer(layer_id) {
            self.surface.remove_line_layer(layer_id);
        }
        let source_id = &self.options.source_id;
        if self.surface.has_line_source(source_id) {
            self.surface.remove_line_source(source_id);
        }

        let released = self.session.end();
        let n = released.len();
        for handle in released {
            self.surface.remove_handle(handle.handle);
        }

        self.surface.unsubscribe(Listener::Click);
        self.surface.unsubscribe(Listener::StyleLoad);

        info!("Measuring stopped, released {} handles", n);
        self.surface.fire(RulerEvent::MeasuringStopped);
    }

    /// Button press. Does nothing while disabled.
    pub fn toggle(&mut self) {
        if !self.enabled {
            debug!("Toggle ignored, ruler is disabled");
            return;
        }

        if self.session.is_active() {
            self.stop();
        } else {
            self.start();
        }

        let measuring = self.session.is_active();
        self.surface.fire(RulerEvent::ButtonClicked { measuring });
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        self.surface.set_button_disabled(false);
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.stop();
        self.surface.set_button_disabled(true);
    }

    /// Removes the ruler from the host. Stops an ongoing measurement.
    pub fn detach(&mut self) {
        if self.session.is_active() {
            self.stop();
        }
        self.surface.unsubscribe(Listener::Click);
    }

    /// Takes effect on the next capture or drag; labels on screen are left as is.
    pub fn set_units(&mut self, units: Unit) {
        debug!("Units set to {}", units);
        self.options.units = units;
    }

    pub fn units(&self) -> Unit {
        self.options.units
    }

    pub fn options(&self) -> &RulerOptions {
        &self.options
    }

    pub fn is_measuring(&self) -> bool {
        self.session.is_active()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn session(&self) -> &Session<S::Handle> {
        &self.session
    }

    pub fn points(&self) -> &[MeasurePoint] {
        self.session.points()
    }

    pub fn labels(&self) -> &[String] {
        self.session.labels()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn allocate_handle_id(&mut self) -> HandleId {
        let id = HandleId(self.next_handle);
        self.next_handle += 1;
        id
    }

    // Adds the line source and layer, replacing whatever the host still holds.
    fn draw_line(&mut self) {
        let layer_id = &self.options.layer_id;
        let source_id = &self.options.source_id;

        if self.surface.has_line_layer(layer_id) {
            self.surface.remove_line_layer(layer_id);
        }
        if self.surface.has_line_source(source_id) {
            self.surface.remove_line_source(source_id);
        }

        self.surface.add_line_source(source_id, line_feature(self.session.points()));
        self.surface.add_line_layer(layer_id, source_id, &self.options.line_style());
    }

    fn push_geometry(&mut self) {
        let source_id = &self.options.source_id;
        if self.surface.has_line_source(source_id) {
            self.surface.set_line_data(source_id, line_feature(self.session.points()));
        } else {
            warn!("Line source {} missing, geometry not pushed", source_id);
        }
    }

    fn refresh_labels(&mut self) {
        let labels = compute_labels(self.session.points(), self.options.units, &self.options.label_format);
        self.session.set_labels(labels);
        debug_assert!(self.session.is_consistent());
    }
}

impl<S: MapSurface> RulerInput for RulerControl<S> {
    fn on_capture(&mut self, coordinate: Point) {
        if !self.session.is_active() {
            return;
        }

        let first = self.session.is_empty();
        let id = self.allocate_handle_id();
        let style = self.options.handle_style(first);
        let handle = self.surface.create_handle(id, coordinate, &style);
        self.session.push(MeasurePoint::now(coordinate), PointHandle::new(id, handle));

        self.refresh_labels();
        self.push_geometry();

        if !first {
            let popup = self.options.popup_options();
            if let Some((handle, label)) = self.session.last_handle_with_label_mut() {
                self.surface.attach_popup(&mut handle.handle, &popup);
                self.surface.set_popup_html(&mut handle.handle, label);
                handle.has_popup = true;
            }
        }

        debug!(
            "Captured point {} at ({}, {})",
            self.session.len(),
            coordinate.x(),
            coordinate.y()
        );
    }

    fn on_drag(&mut self, handle: HandleId, coordinate: Point) {
        if !self.session.is_active() {
            return;
        }

        let Some(index) = self.session.index_of(handle) else {
            warn!("Drag on unknown handle {:?} ignored", handle);
            return;
        };

        self.session.replace_point(index, MeasurePoint::now(coordinate));
        self.refresh_labels();

        for (point_handle, label) in self.session.handles_with_labels_mut() {
            if point_handle.has_popup {
                self.surface.set_popup_html(&mut point_handle.handle, label);
            }
        }

        self.push_geometry();
        debug!("Moved point {} to ({}, {})", index, coordinate.x(), coordinate.y());
    }

    fn on_surface_reload(&mut self) {
        if !self.session.is_active() {
            return;
        }
        debug!("Surface reloaded, redrawing line");
        self.draw_line();
    }
}

impl<S: MapSurface> Drop for RulerControl<S> {
    fn drop(&mut self) {
        if self.session.is_active() {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{config::SOURCE_LINE, labels::LabelFormat, recording::RecordingSurface};

    fn ruler() -> RulerControl<RecordingSurface> {
        RulerControl::new(RecordingSurface::new(), RulerOptions::default()).unwrap()
    }

    fn measuring(coords: &[(f64, f64)]) -> RulerControl<RecordingSurface> {
        let mut ruler = ruler();
        ruler.start();
        for &(lon, lat) in coords {
            ruler.on_capture(Point::new(lon, lat));
        }
        ruler.surface_mut().take_events();
        ruler
    }

    fn handle_id(ruler: &RulerControl<RecordingSurface>, index: usize) -> HandleId {
        ruler.session().handles()[index].id
    }

    #[test]
    fn invalid_options_fail_fast() {
        let options = RulerOptions {
            secondary_color: "white".into(),
            ..Default::default()
        };
        assert!(RulerControl::new(RecordingSurface::new(), options).is_err());
    }

    #[test]
    fn start_prepares_surface() {
        let mut ruler = ruler();
        ruler.start();

        let surface = ruler.surface();
        assert!(ruler.is_measuring());
        assert_eq!(surface.cursor, Cursor::Crosshair);
        assert!(surface.button_active);
        assert!(surface.listeners.contains(&Listener::Click));
        assert!(surface.listeners.contains(&Listener::StyleLoad));
        assert_eq!(surface.line(SOURCE_LINE), Some(vec![]));
        assert_eq!(surface.layers["controls-layer-line"].style.color, "#263238");
        assert_eq!(surface.events, vec![RulerEvent::MeasuringStarted]);
    }

    #[test]
    fn captures_build_line_and_popups() {
        let ruler = measuring(&[(0., 0.), (0., 1.), (1., 1.)]);
        let surface = ruler.surface();

        assert_eq!(ruler.points().len(), 3);
        assert_eq!(ruler.session().handles().len(), 3);
        assert_eq!(ruler.labels().len(), 3);
        assert_eq!(surface.line(SOURCE_LINE), Some(vec![(0., 0.), (0., 1.), (1., 1.)]));

        let first = handle_id(&ruler, 0);
        let second = handle_id(&ruler, 1);
        assert_eq!(surface.handles[&first].style.fill_color, "#0f0");
        assert_eq!(surface.handles[&second].style.fill_color, "#fff");
        assert!(surface.handles[&first].style.draggable);

        assert_eq!(surface.popup_html(first), None);
        assert_eq!(surface.popup_html(second), Some("+ 111.20 km<br/>= 111.20 km"));
        let popup = surface.handles[&second].popup.as_ref().unwrap();
        assert!(!popup.options.close_button);
        assert!(!popup.options.close_on_click);
    }

    #[test]
    fn capture_ignored_while_inactive() {
        let mut ruler = ruler();
        ruler.on_capture(Point::new(1., 1.));
        ruler.on_surface_reload();
        assert!(ruler.points().is_empty());
        assert!(ruler.surface().handles.is_empty());
        assert!(ruler.surface().sources.is_empty());
    }

    #[test]
    fn drag_recomputes_every_label() {
        let mut ruler = measuring(&[(0., 0.), (0., 1.), (0., 2.)]);
        let before = ruler.labels().to_vec();
        let last = handle_id(&ruler, 2);

        ruler.on_drag(last, Point::new(0., 3.));

        let labels = ruler.labels();
        assert_eq!(labels[0], before[0]);
        assert_eq!(labels[1], before[1]);
        assert_eq!(labels[2], "+ 222.39 km<br/>= 333.59 km");

        let surface = ruler.surface();
        // Capture wrote each popup once, the drag rewrote all of them.
        assert_eq!(surface.handles[&handle_id(&ruler, 1)].popup.as_ref().unwrap().writes, 2);
        assert_eq!(surface.handles[&last].popup.as_ref().unwrap().writes, 2);
        assert_eq!(surface.popup_html(last), Some(labels[2].as_str()));
        assert_eq!(surface.line(SOURCE_LINE), Some(vec![(0., 0.), (0., 1.), (0., 3.)]));
    }

    #[test]
    fn dragging_the_origin_updates_downstream_sums() {
        let mut ruler = measuring(&[(0., 0.), (0., 1.), (0., 2.)]);
        ruler.on_drag(handle_id(&ruler, 0), Point::new(0., -1.));

        let total = ruler.session().total(Unit::Kilometers);
        assert_abs_diff_eq!(total, 3. * 111.195, epsilon = 0.01);
        assert_eq!(ruler.surface().popup_html(handle_id(&ruler, 1)), Some("+ 222.39 km<br/>= 222.39 km"));
    }

    #[test]
    fn drag_on_unknown_handle_is_a_no_op() {
        let mut ruler = measuring(&[(0., 0.), (0., 1.)]);
        let labels = ruler.labels().to_vec();

        ruler.on_drag(HandleId(999), Point::new(5., 5.));

        assert_eq!(ruler.labels(), labels.as_slice());
        assert_eq!(ruler.surface().line(SOURCE_LINE), Some(vec![(0., 0.), (0., 1.)]));
    }

    #[test]
    fn stale_handle_from_previous_session() {
        let mut ruler = measuring(&[(0., 0.), (0., 1.)]);
        let old = handle_id(&ruler, 1);
        ruler.stop();
        ruler.start();
        ruler.on_capture(Point::new(3., 3.));

        ruler.on_drag(old, Point::new(9., 9.));
        assert_eq!(ruler.points()[0].position, Point::new(3., 3.));
    }

    #[test]
    fn stop_tears_everything_down() {
        let mut ruler = measuring(&[(0., 0.), (0., 1.), (1., 1.)]);
        ruler.stop();

        let surface = ruler.surface();
        assert!(!ruler.is_measuring());
        assert_eq!(surface.cursor, Cursor::Default);
        assert!(!surface.button_active);
        assert!(surface.sources.is_empty());
        assert!(surface.layers.is_empty());
        assert!(surface.handles.is_empty());
        assert_eq!(surface.removed_handles, 3);
        assert!(surface.listeners.is_empty());
        assert!(ruler.session().is_empty());
        assert!(ruler.session().is_consistent());
        assert_eq!(surface.events, vec![RulerEvent::MeasuringStopped]);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut ruler = measuring(&[(0., 0.), (0., 1.)]);
        ruler.stop();
        ruler.stop();

        let surface = ruler.surface();
        assert!(!ruler.is_measuring());
        assert!(ruler.session().handles().is_empty());
        assert_eq!(surface.removed_handles, 2);
        assert!(surface.sources.is_empty());
    }

    #[test]
    fn stop_after_style_reload_removed_line() {
        let mut ruler = measuring(&[(0., 0.), (0., 1.)]);
        ruler.surface_mut().reload_style();
        ruler.stop();
        assert!(ruler.surface().handles.is_empty());
        assert!(!ruler.is_measuring());
    }

    #[test]
    fn surface_reload_redraws_line() {
        let mut ruler = measuring(&[(0., 0.), (0., 1.)]);
        let labels = ruler.labels().to_vec();

        ruler.surface_mut().reload_style();
        assert!(ruler.surface().sources.is_empty());

        ruler.on_surface_reload();
        assert_eq!(ruler.surface().line(SOURCE_LINE), Some(vec![(0., 0.), (0., 1.)]));
        assert!(ruler.surface().has_line_layer("controls-layer-line"));
        assert_eq!(ruler.labels(), labels.as_slice());
        assert_eq!(ruler.points().len(), 2);
    }

    #[test]
    fn restart_resets_the_session() {
        let mut ruler = measuring(&[(0., 0.), (0., 1.)]);
        ruler.start();

        assert!(ruler.is_measuring());
        assert!(ruler.points().is_empty());
        assert!(ruler.surface().handles.is_empty());
        assert_eq!(ruler.surface().line(SOURCE_LINE), Some(vec![]));

        ruler.on_capture(Point::new(4., 4.));
        let first = handle_id(&ruler, 0);
        assert_eq!(ruler.surface().handles[&first].style.fill_color, "#0f0");
    }

    #[test]
    fn units_apply_on_next_edit_only() {
        let mut ruler = measuring(&[(0., 0.), (0., 1.)]);
        let km_labels = ruler.labels().to_vec();
        let second = handle_id(&ruler, 1);

        ruler.set_units(Unit::NauticalMiles);
        assert_eq!(ruler.units(), Unit::NauticalMiles);
        assert_eq!(ruler.labels(), km_labels.as_slice());
        assert_eq!(ruler.surface().popup_html(second), Some(km_labels[1].as_str()));

        ruler.on_capture(Point::new(0., 2.));
        assert_eq!(ruler.labels()[1], "+ 60.04 nmi<br/>= 60.04 nmi");
        assert_eq!(ruler.labels()[2], "+ 60.04 nmi<br/>= 120.08 nmi");
        // Existing popups are only rewritten by a drag.
        assert_eq!(ruler.surface().popup_html(second), Some(km_labels[1].as_str()));

        ruler.on_drag(second, Point::new(0., 1.));
        assert_eq!(ruler.surface().popup_html(second), Some("+ 60.04 nmi<br/>= 60.04 nmi"));
    }

    #[test]
    fn toggle_flips_state_and_notifies() {
        let mut ruler = ruler();
        ruler.toggle();
        assert!(ruler.is_measuring());
        ruler.toggle();
        assert!(!ruler.is_measuring());

        assert_eq!(
            ruler.surface().events,
            vec![
                RulerEvent::MeasuringStarted,
                RulerEvent::ButtonClicked { measuring: true },
                RulerEvent::MeasuringStopped,
                RulerEvent::ButtonClicked { measuring: false },
            ]
        );
    }

    #[test]
    fn toggle_while_disabled_does_nothing() {
        let mut ruler = ruler();
        ruler.disable();
        assert!(ruler.surface().button_disabled);
        ruler.surface_mut().take_events();

        ruler.toggle();

        assert!(!ruler.is_measuring());
        assert!(ruler.session().handles().is_empty());
        assert!(ruler.surface().events.is_empty());

        ruler.enable();
        assert!(!ruler.surface().button_disabled);
        ruler.toggle();
        assert!(ruler.is_measuring());
    }

    #[test]
    fn disable_stops_measuring() {
        let mut ruler = measuring(&[(0., 0.), (0., 1.)]);
        ruler.disable();
        assert!(!ruler.is_measuring());
        assert!(ruler.surface().handles.is_empty());
        assert_eq!(ruler.surface().events, vec![RulerEvent::MeasuringStopped]);
    }

    #[test]
    fn detach_releases_handles() {
        let mut ruler = measuring(&[(0., 0.), (0., 1.)]);
        ruler.detach();
        assert!(!ruler.is_measuring());
        assert!(ruler.surface().handles.is_empty());
        assert!(ruler.surface().listeners.is_empty());

        // Detaching an idle ruler fires nothing.
        ruler.surface_mut().take_events();
        ruler.detach();
        assert!(ruler.surface().events.is_empty());
    }

    #[test]
    fn sum_only_format() {
        let mut ruler = RulerControl::new(
            RecordingSurface::new(),
            RulerOptions::default()
                .with_units(Unit::Miles)
                .with_label_format(LabelFormat::SumOnly),
        )
        .unwrap();
        ruler.start();
        ruler.on_capture(Point::new(0., 0.));
        ruler.on_capture(Point::new(0., 1.));
        assert_eq!(ruler.labels().to_vec(), vec!["0.00 mi", "69.09 mi"]);
    }
}
