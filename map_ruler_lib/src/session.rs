use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{labels::compute_segments, measure_point::MeasurePoint, surface::HandleId, units::Unit};

/// A host handle owned by the session, with the id the host reports drags under.
#[derive(Debug)]
pub struct PointHandle<H> {
    pub id: HandleId,
    pub handle: H,
    pub has_popup: bool,
}

impl<H> PointHandle<H> {
    pub fn new(id: HandleId, handle: H) -> Self {
        Self {
            id,
            handle,
            has_popup: false,
        }
    }
}

/// One measuring interaction. `points`, `handles` and `labels` are index-aligned.
#[derive(Debug)]
pub struct Session<H> {
    active: bool,
    started_at: Option<DateTime<Utc>>,
    points: Vec<MeasurePoint>,
    handles: Vec<PointHandle<H>>,
    labels: Vec<String>,
    index: HashMap<HandleId, usize>,
}

impl<H> Default for Session<H> {
    fn default() -> Self {
        Self {
            active: false,
            started_at: None,
            points: Vec::new(),
            handles: Vec::new(),
            labels: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<H> Session<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates a fresh session. Returns the handles of the previous one so the
    /// caller can release them on the host.
    pub fn begin(&mut self, started_at: DateTime<Utc>) -> Vec<PointHandle<H>> {
        let stale = self.clear();
        self.active = true;
        self.started_at = Some(started_at);
        stale
    }

    /// Deactivates and empties the session, returning the handles to release.
    pub fn end(&mut self) -> Vec<PointHandle<H>> {
        self.active = false;
        self.clear()
    }

    fn clear(&mut self) -> Vec<PointHandle<H>> {
        self.points.clear();
        self.labels.clear();
        self.index.clear();
        std::mem::take(&mut self.handles)
    }

    pub fn push(&mut self, point: MeasurePoint, handle: PointHandle<H>) {
        self.index.insert(handle.id, self.handles.len());
        self.points.push(point);
        self.handles.push(handle);
    }

    /// Position of the handle in the session, if it still exists.
    pub fn index_of(&self, id: HandleId) -> Option<usize> {
        self.index
            .get(&id)
            .copied()
            .filter(|&i| i < self.points.len() && i < self.handles.len())
    }

    pub fn replace_point(&mut self, index: usize, point: MeasurePoint) -> bool {
        match self.points.get_mut(index) {
            Some(slot) => {
                *slot = point;
                true
            }
            None => false,
        }
    }

    pub fn set_labels(&mut self, labels: Vec<String>) {
        self.labels = labels;
    }

    pub fn handles_with_labels_mut(&mut self) -> impl Iterator<Item = (&mut PointHandle<H>, &str)> {
        self.handles.iter_mut().zip(self.labels.iter().map(String::as_str))
    }

    pub fn last_handle_with_label_mut(&mut self) -> Option<(&mut PointHandle<H>, &str)> {
        self.handles_with_labels_mut().last()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn points(&self) -> &[MeasurePoint] {
        &self.points
    }

    pub fn handles(&self) -> &[PointHandle<H>] {
        &self.handles
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total path length in `unit`.
    pub fn total(&self, unit: Unit) -> f64 {
        compute_segments(&self.points, unit).last().map_or(0., |s| s.sum)
    }

    pub fn is_consistent(&self) -> bool {
        self.points.len() == self.handles.len()
            && self.handles.len() == self.labels.len()
            && (self.active || self.points.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(n: u64) -> Session<()> {
        let mut session = Session::new();
        session.begin(Utc::now());
        for i in 0..n {
            session.push(MeasurePoint::from((i as f64, 0.)), PointHandle::new(HandleId(i + 10), ()));
        }
        session.set_labels((0..n).map(|i| i.to_string()).collect());
        session
    }

    #[test]
    fn index_lookup_by_id() {
        let session = session_with(3);
        assert_eq!(session.index_of(HandleId(10)), Some(0));
        assert_eq!(session.index_of(HandleId(12)), Some(2));
        assert_eq!(session.index_of(HandleId(13)), None);
        assert!(session.is_consistent());
    }

    #[test]
    fn end_releases_handles() {
        let mut session = session_with(3);
        let released = session.end();
        assert_eq!(released.len(), 3);
        assert!(!session.is_active());
        assert!(session.is_empty());
        assert_eq!(session.index_of(HandleId(10)), None);
        assert!(session.is_consistent());
    }

    #[test]
    fn replace_out_of_range_is_rejected() {
        let mut session = session_with(2);
        assert!(!session.replace_point(5, MeasurePoint::from((1., 1.))));
        assert!(session.replace_point(1, MeasurePoint::from((1., 1.))));
        assert_eq!(session.points()[1].latitude(), 1.);
    }

    #[test]
    fn total_of_empty_session() {
        let session: Session<()> = Session::new();
        assert_eq!(session.total(Unit::Miles), 0.);
        assert!(session_with(2).total(Unit::Kilometers) > 111.);
    }
}
