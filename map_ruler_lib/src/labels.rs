use std::{fmt, rc::Rc};

use crate::{distance::great_circle_distance, measure_point::MeasurePoint, units::Unit};

/// Distance to the previous point and running total, both in the display unit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Segment {
    pub delta: f64,
    pub sum: f64,
}

/// How a [`Segment`] is rendered into the popup text.
#[derive(Clone, Default)]
pub enum LabelFormat {
    /// `+ 1.23 km<br/>= 4.56 km`
    #[default]
    DeltaAndSum,
    /// `4.56 km`
    SumOnly,
    Custom(Rc<dyn Fn(f64, f64, Unit) -> String>),
}

impl LabelFormat {
    pub fn custom(format: impl Fn(f64, f64, Unit) -> String + 'static) -> Self {
        Self::Custom(Rc::new(format))
    }

    pub fn format(&self, delta: f64, sum: f64, unit: Unit) -> String {
        match self {
            LabelFormat::DeltaAndSum => format!("+ {delta:.2} {unit}<br/>= {sum:.2} {unit}"),
            LabelFormat::SumOnly => format!("{sum:.2} {unit}"),
            LabelFormat::Custom(format) => format(delta, sum, unit),
        }
    }
}

impl fmt::Debug for LabelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelFormat::DeltaAndSum => f.write_str("DeltaAndSum"),
            LabelFormat::SumOnly => f.write_str("SumOnly"),
            LabelFormat::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Per-point deltas and running sums. The first point is the origin (0, 0).
///
/// Each kilometer delta is converted to `unit` before it is accumulated.
pub fn compute_segments(points: &[MeasurePoint], unit: Unit) -> Vec<Segment> {
    let mut sum = 0.;
    let mut segments = Vec::with_capacity(points.len());

    for (i, point) in points.iter().enumerate() {
        if i == 0 {
            segments.push(Segment::default());
            continue;
        }

        let raw_km = great_circle_distance(points[i - 1].position, point.position) / 1000.;
        let delta = unit.from_kilometers(raw_km);
        sum += delta;
        segments.push(Segment { delta, sum });
    }

    segments
}

pub fn compute_labels(points: &[MeasurePoint], unit: Unit, format: &LabelFormat) -> Vec<String> {
    compute_segments(points, unit)
        .into_iter()
        .map(|segment| format.format(segment.delta, segment.sum, unit))
        .collect()
}
