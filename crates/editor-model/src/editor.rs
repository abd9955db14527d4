//! Editor state: the loaded video, overlay text, box position, and style.

use serde::{Deserialize, Serialize};

use crate::geometry::{Container, Position};
use crate::segment::{self, SegmentPreview};
use crate::style::{OverlayStyle, TextAlign};
use crate::video::{AspectRatio, VideoSource};

/// Errors raised by editor mutations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("Unknown text alignment: {0} (expected left, center, or right)")]
    UnknownAlign(String),

    #[error("No video loaded")]
    NoVideo,
}

/// Everything the user can edit, as one snapshot-able record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EditorState {
    video: Option<VideoSource>,

    #[serde(default)]
    overlay_text: String,

    #[serde(default)]
    position: Position,

    #[serde(default)]
    style: OverlayStyle,

    /// Frozen at load time; follows the video rather than the style.
    #[serde(default)]
    aspect_ratio: Option<AspectRatio>,
}

impl EditorState {
    pub fn new(style: OverlayStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Load (or replace) the source video and derive the preview aspect ratio.
    /// The position is re-clamped into the new frame.
    pub fn load_video(&mut self, video: VideoSource) {
        self.aspect_ratio = video.aspect_ratio();
        self.video = Some(video);
        self.reclamp_position();
    }

    pub fn video(&self) -> Option<&VideoSource> {
        self.video.as_ref()
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    /// Preview aspect ratio, `16/9` until a video is loaded.
    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio.unwrap_or_default()
    }

    pub fn overlay_text(&self) -> &str {
        &self.overlay_text
    }

    pub fn set_overlay_text(&mut self, text: impl Into<String>) {
        self.overlay_text = text.into();
    }

    /// Current segments, recomputed from the overlay text.
    pub fn segments(&self) -> Vec<String> {
        segment::split_segments(&self.overlay_text)
    }

    pub fn segment_preview(&self) -> SegmentPreview {
        SegmentPreview::from_text(&self.overlay_text)
    }

    pub fn preview_text(&self) -> &str {
        segment::preview_text(&self.overlay_text)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Drag the box within the loaded video's frame.
    pub fn drag_to(&mut self, x: f64, y: f64) -> Result<Position, EditorError> {
        let container = self
            .video
            .as_ref()
            .map(VideoSource::container)
            .ok_or(EditorError::NoVideo)?;
        Ok(self.drag_within(x, y, container))
    }

    /// Drag the box within an explicit container, e.g. a scaled preview.
    pub fn drag_within(&mut self, x: f64, y: f64, container: Container) -> Position {
        self.position = Position::bounded(x, y, self.style.box_size(), container);
        self.position
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    pub fn set_rotation(&mut self, degrees: f64) -> Result<f64, EditorError> {
        self.style.set_rotation(degrees)
    }

    pub fn set_font_size(&mut self, px: f64) -> Result<f64, EditorError> {
        self.style.set_font_size(px)
    }

    /// Resize the box. The position is re-clamped when a video is loaded so
    /// a grown box cannot hang over the frame edge.
    pub fn set_box_size(&mut self, width: f64, height: f64) -> Result<(), EditorError> {
        self.style.set_box_size(width, height)?;
        self.reclamp_position();
        Ok(())
    }

    pub fn set_align(&mut self, align: TextAlign) {
        self.style.set_align(align);
    }

    /// Re-apply style and position clamping after loading from disk.
    pub fn sanitize(&mut self) -> Result<(), EditorError> {
        self.style = self.style.sanitized()?;
        if self.aspect_ratio.is_none() {
            self.aspect_ratio = self.video.as_ref().and_then(VideoSource::aspect_ratio);
        }
        self.reclamp_position();
        Ok(())
    }

    fn reclamp_position(&mut self) {
        if let Some(container) = self.video.as_ref().map(VideoSource::container) {
            let Position { x, y } = self.position;
            self.drag_within(x, y, container);
        }
    }
}
