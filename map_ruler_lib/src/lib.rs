pub mod config;
pub mod controller;
pub mod distance;
pub mod error;
pub mod events;
pub mod geometry;
pub mod labels;
pub mod measure_point;
pub mod recording;
pub mod session;
pub mod surface;
pub mod units;

pub use config::RulerOptions;
pub use controller::{RulerControl, RulerInput};
pub use error::RulerError;
pub use events::RulerEvent;
pub use labels::{compute_labels, compute_segments, LabelFormat, Segment};
pub use measure_point::MeasurePoint;
pub use surface::{HandleId, MapSurface};
pub use units::Unit;
