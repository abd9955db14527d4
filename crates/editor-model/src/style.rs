//! Overlay style: rotation, font size, box size, and alignment.
//!
//! Every numeric field is clamped into its documented range when it is
//! set, so a stored `OverlayStyle` is always within bounds.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::editor::EditorError;
use crate::geometry::BoxSize;

pub const ROTATION_RANGE: RangeInclusive<f64> = 0.0..=360.0;
pub const FONT_SIZE_RANGE: RangeInclusive<f64> = 8.0..=200.0;
pub const BOX_DIMENSION_RANGE: RangeInclusive<f64> = 50.0..=1000.0;

/// Horizontal alignment of text inside the overlay box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

impl fmt::Display for TextAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextAlign {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(TextAlign::Left),
            "center" | "centre" => Ok(TextAlign::Center),
            "right" => Ok(TextAlign::Right),
            other => Err(EditorError::UnknownAlign(other.to_string())),
        }
    }
}

/// Visual parameters of the overlay box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    rotation_degrees: f64,
    font_size_px: f64,
    box_width_px: f64,
    box_height_px: f64,
    align: TextAlign,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            rotation_degrees: 0.0,
            font_size_px: 24.0,
            box_width_px: 300.0,
            box_height_px: 100.0,
            align: TextAlign::Left,
        }
    }
}

impl OverlayStyle {
    /// Build a style from raw values, clamping each into range.
    pub fn new(
        rotation_degrees: f64,
        font_size_px: f64,
        box_width_px: f64,
        box_height_px: f64,
        align: TextAlign,
    ) -> Result<Self, EditorError> {
        let mut style = Self {
            align,
            ..Self::default()
        };
        style.set_rotation(rotation_degrees)?;
        style.set_font_size(font_size_px)?;
        style.set_box_size(box_width_px, box_height_px)?;
        Ok(style)
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    pub fn font_size_px(&self) -> f64 {
        self.font_size_px
    }

    pub fn box_size(&self) -> BoxSize {
        BoxSize {
            width: self.box_width_px,
            height: self.box_height_px,
        }
    }

    pub fn align(&self) -> TextAlign {
        self.align
    }

    /// Set rotation; returns the value actually stored.
    pub fn set_rotation(&mut self, degrees: f64) -> Result<f64, EditorError> {
        self.rotation_degrees = clamp_field("rotation", degrees, ROTATION_RANGE)?;
        Ok(self.rotation_degrees)
    }

    /// Set font size; returns the value actually stored.
    pub fn set_font_size(&mut self, px: f64) -> Result<f64, EditorError> {
        self.font_size_px = clamp_field("font size", px, FONT_SIZE_RANGE)?;
        Ok(self.font_size_px)
    }

    /// Set both box dimensions; returns the size actually stored.
    pub fn set_box_size(&mut self, width: f64, height: f64) -> Result<BoxSize, EditorError> {
        let width = clamp_field("box width", width, BOX_DIMENSION_RANGE)?;
        let height = clamp_field("box height", height, BOX_DIMENSION_RANGE)?;
        self.box_width_px = width;
        self.box_height_px = height;
        Ok(self.box_size())
    }

    pub fn set_align(&mut self, align: TextAlign) {
        self.align = align;
    }

    /// Re-apply range clamping, e.g. after deserializing a hand-edited file.
    pub fn sanitized(self) -> Result<Self, EditorError> {
        Self::new(
            self.rotation_degrees,
            self.font_size_px,
            self.box_width_px,
            self.box_height_px,
            self.align,
        )
    }
}

fn clamp_field(
    field: &'static str,
    value: f64,
    range: RangeInclusive<f64>,
) -> Result<f64, EditorError> {
    if !value.is_finite() {
        return Err(EditorError::NonFinite { field });
    }
    Ok(value.clamp(*range.start(), *range.end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_matches_editor_defaults() {
        let style = OverlayStyle::default();
        assert_eq!(style.font_size_px(), 24.0);
        assert_eq!(style.box_size().width, 300.0);
        assert_eq!(style.box_size().height, 100.0);
        assert_eq!(style.rotation_degrees(), 0.0);
        assert_eq!(style.align(), TextAlign::Left);
    }

    #[test]
    fn test_rotation_is_clamped() {
        let mut style = OverlayStyle::default();
        assert_eq!(style.set_rotation(720.0).unwrap(), 360.0);
        assert_eq!(style.set_rotation(-45.0).unwrap(), 0.0);
        assert_eq!(style.set_rotation(90.5).unwrap(), 90.5);
    }

    #[test]
    fn test_font_and_box_are_clamped() {
        let mut style = OverlayStyle::default();
        assert_eq!(style.set_font_size(2.0).unwrap(), 8.0);
        assert_eq!(style.set_font_size(500.0).unwrap(), 200.0);

        let size = style.set_box_size(10.0, 5000.0).unwrap();
        assert_eq!(size.width, 50.0);
        assert_eq!(size.height, 1000.0);
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let mut style = OverlayStyle::default();
        assert!(matches!(
            style.set_font_size(f64::NAN),
            Err(EditorError::NonFinite { field: "font size" })
        ));
        // Rejected values leave the previous setting in place.
        assert_eq!(style.font_size_px(), 24.0);
    }

    #[test]
    fn test_sanitized_clamps_deserialized_values() {
        let raw = r#"{"rotation_degrees":-90,"font_size_px":1000,"box_width_px":20,"box_height_px":100,"align":"center"}"#;
        let style: OverlayStyle = serde_json::from_str(raw).unwrap();
        let style = style.sanitized().unwrap();
        assert_eq!(style.rotation_degrees(), 0.0);
        assert_eq!(style.font_size_px(), 200.0);
        assert_eq!(style.box_size().width, 50.0);
        assert_eq!(style.align(), TextAlign::Center);
    }

    #[test]
    fn test_align_parses_case_insensitively() {
        assert_eq!("Right".parse::<TextAlign>().unwrap(), TextAlign::Right);
        assert!("justify".parse::<TextAlign>().is_err());
    }
}
