#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    labels::LabelFormat,
    surface::{HandleStyle, LineStyle, PopupOptions},
    units::Unit,
    RulerError,
};

pub const LAYER_LINE: &str = "controls-layer-line";
pub const SOURCE_LINE: &str = "controls-source-line";
pub const MAIN_COLOR: &str = "#263238";
pub const HALO_COLOR: &str = "#fff";
pub const FIRST_POINT_COLOR: &str = "#0f0";

const HANDLE_SIZE_PX: u32 = 12;
const HANDLE_BORDER_PX: u32 = 2;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RulerOptions {
    pub units: Unit,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub label_format: LabelFormat,
    pub main_color: String,
    pub secondary_color: String,
    /// Fill of the first handle. `None` draws it like every other handle.
    pub alt_color: Option<String>,
    pub font: Vec<String>,
    pub font_size: u32,
    pub font_halo: u32,
    pub line_width: f64,
    pub layer_id: String,
    pub source_id: String,
}

impl Default for RulerOptions {
    fn default() -> Self {
        Self {
            units: Unit::Kilometers,
            label_format: LabelFormat::DeltaAndSum,
            main_color: MAIN_COLOR.into(),
            secondary_color: HALO_COLOR.into(),
            alt_color: Some(FIRST_POINT_COLOR.into()),
            font: vec!["Noto Sans Regular".into()],
            font_size: 12,
            font_halo: 1,
            line_width: 2.,
            layer_id: LAYER_LINE.into(),
            source_id: SOURCE_LINE.into(),
        }
    }
}

impl RulerOptions {
    pub fn with_units(mut self, units: Unit) -> Self {
        self.units = units;
        self
    }

    pub fn with_label_format(mut self, label_format: LabelFormat) -> Self {
        self.label_format = label_format;
        self
    }

    pub fn validate(&self) -> Result<(), RulerError> {
        check_color("main_color", &self.main_color)?;
        check_color("secondary_color", &self.secondary_color)?;
        if let Some(alt) = &self.alt_color {
            check_color("alt_color", alt)?;
        }
        if self.font_size == 0 {
            return Err(RulerError::InvalidFontSize);
        }
        if !(self.line_width.is_finite() && self.line_width > 0.) {
            return Err(RulerError::InvalidLineWidth(self.line_width));
        }
        if self.layer_id.trim().is_empty() {
            return Err(RulerError::EmptyIdentifier("layer_id"));
        }
        if self.source_id.trim().is_empty() {
            return Err(RulerError::EmptyIdentifier("source_id"));
        }
        Ok(())
    }

    pub(crate) fn line_style(&self) -> LineStyle {
        LineStyle {
            color: self.main_color.clone(),
            width: self.line_width,
        }
    }

    pub(crate) fn handle_style(&self, first: bool) -> HandleStyle {
        let fill = match (&self.alt_color, first) {
            (Some(alt), true) => alt.clone(),
            _ => self.secondary_color.clone(),
        };

        HandleStyle {
            size_px: HANDLE_SIZE_PX,
            border_px: HANDLE_BORDER_PX,
            border_color: self.main_color.clone(),
            fill_color: fill,
            draggable: true,
        }
    }

    pub(crate) fn popup_options(&self) -> PopupOptions {
        PopupOptions {
            close_button: false,
            close_on_click: false,
            font: self.font.clone(),
            font_size: self.font_size,
            font_halo: self.font_halo,
        }
    }
}

// #rgb or #rrggbb
fn check_color(field: &'static str, value: &str) -> Result<(), RulerError> {
    let valid = value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));

    if valid {
        Ok(())
    } else {
        Err(RulerError::InvalidColor {
            field,
            value: value.to_string(),
        })
    }
}
