#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lifecycle notifications fired on the host surface. Each carries the measuring
/// state that resulted from the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum RulerEvent {
    MeasuringStarted,
    MeasuringStopped,
    ButtonClicked { measuring: bool },
}

impl RulerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RulerEvent::MeasuringStarted => "ruler.on",
            RulerEvent::MeasuringStopped => "ruler.off",
            RulerEvent::ButtonClicked { .. } => "ruler.buttonclick",
        }
    }

    pub fn measuring(&self) -> bool {
        match self {
            RulerEvent::MeasuringStarted => true,
            RulerEvent::MeasuringStopped => false,
            RulerEvent::ButtonClicked { measuring } => *measuring,
        }
    }
}
