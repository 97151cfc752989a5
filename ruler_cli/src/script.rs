use std::path::Path;

use anyhow::{Context, Result};
use geo_types::Point;
use map_ruler_lib::{recording::RecordingSurface, RulerControl, RulerInput, RulerOptions, Unit};
use serde::Deserialize;

/// One host interaction in a replay script.
///
/// ```json
/// ["toggle", {"capture": [10.2, 56.1]}, {"drag": {"index": 0, "to": [10.3, 56.2]}}, {"units": "mi"}, "reload"]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    Start,
    Stop,
    Toggle,
    Enable,
    Disable,
    /// Host style change: drops the line, then notifies the ruler.
    Reload,
    Capture([f64; 2]),
    Drag { index: usize, to: [f64; 2] },
    Units(Unit),
}

pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>> {
    serde_json::from_str(json).context("Invalid replay script")
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_script(&json)
}

pub fn load_options(path: &Path) -> Result<RulerOptions> {
    let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).context("Invalid ruler options")
}

pub fn run(ruler: &mut RulerControl<RecordingSurface>, steps: &[ScriptStep]) {
    for step in steps {
        tracing::trace!("Step {:?}", step);
        match step {
            ScriptStep::Start => ruler.start(),
            ScriptStep::Stop => ruler.stop(),
            ScriptStep::Toggle => ruler.toggle(),
            ScriptStep::Enable => ruler.enable(),
            ScriptStep::Disable => ruler.disable(),
            ScriptStep::Reload => {
                ruler.surface_mut().reload_style();
                ruler.on_surface_reload();
            }
            ScriptStep::Capture([lon, lat]) => ruler.on_capture(Point::new(*lon, *lat)),
            ScriptStep::Drag { index, to: [lon, lat] } => {
                let Some(id) = ruler.session().handles().get(*index).map(|h| h.id) else {
                    tracing::warn!("No handle at index {}, drag skipped", index);
                    continue;
                };
                let to = Point::new(*lon, *lat);
                ruler.surface_mut().move_handle(id, to);
                ruler.on_drag(id, to);
            }
            ScriptStep::Units(unit) => ruler.set_units(*unit),
        }
    }
}
