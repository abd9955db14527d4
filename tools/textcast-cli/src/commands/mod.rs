pub mod check;
pub mod edit;
pub mod export;
pub mod info;
pub mod init;
pub mod segments;

use std::path::PathBuf;

use textcast_editor_model::{EditorState, TextAlign};

/// Overlay settings shared by `init` and `edit`. Unset flags leave the
/// current value alone.
#[derive(Debug, Default, clap::Args)]
pub struct OverlayArgs {
    /// Overlay text. A line containing only `..` separates segments; each
    /// segment becomes its own exported video
    #[arg(short, long)]
    pub text: Option<String>,

    /// Read the overlay text from a file
    #[arg(long, conflicts_with = "text")]
    pub text_file: Option<PathBuf>,

    /// Horizontal offset of the text box in video pixels
    #[arg(short)]
    pub x: Option<f64>,

    /// Vertical offset of the text box in video pixels
    #[arg(short)]
    pub y: Option<f64>,

    /// Font size in pixels (8-200)
    #[arg(long)]
    pub font_size: Option<f64>,

    /// Rotation in degrees (0-360)
    #[arg(long)]
    pub rotation: Option<f64>,

    /// Text box width in pixels (50-1000)
    #[arg(long)]
    pub box_width: Option<f64>,

    /// Text box height in pixels (50-1000)
    #[arg(long)]
    pub box_height: Option<f64>,

    /// Text alignment: left|center|right
    #[arg(long)]
    pub align: Option<String>,
}

impl OverlayArgs {
    /// Apply every flag that was given to `state`.
    pub fn apply(&self, state: &mut EditorState) -> anyhow::Result<()> {
        if let Some(ref file) = self.text_file {
            let text = std::fs::read_to_string(file)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", file.display()))?;
            state.set_overlay_text(text);
        } else if let Some(ref text) = self.text {
            state.set_overlay_text(text.as_str());
        }

        if let Some(size) = self.font_size {
            state.set_font_size(size)?;
        }
        if let Some(degrees) = self.rotation {
            state.set_rotation(degrees)?;
        }
        if self.box_width.is_some() || self.box_height.is_some() {
            let current = state.style().box_size();
            state.set_box_size(
                self.box_width.unwrap_or(current.width),
                self.box_height.unwrap_or(current.height),
            )?;
        }
        if let Some(ref align) = self.align {
            state.set_align(align.parse::<TextAlign>()?);
        }

        // Box size first: the drag bound depends on it.
        if self.x.is_some() || self.y.is_some() {
            let current = state.position();
            let placed = state.drag_to(self.x.unwrap_or(current.x), self.y.unwrap_or(current.y))?;
            tracing::debug!(x = placed.x, y = placed.y, "Overlay placed");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcast_editor_model::VideoSource;

    fn state() -> EditorState {
        let mut state = EditorState::default();
        state.load_video(VideoSource::new("clip.mp4", 640, 360));
        state
    }

    #[test]
    fn test_apply_sets_only_given_fields() {
        let mut state = state();
        let args = OverlayArgs {
            text: Some("one\n..\ntwo".to_string()),
            font_size: Some(500.0),
            ..OverlayArgs::default()
        };
        args.apply(&mut state).unwrap();

        assert_eq!(state.segments(), ["one", "two"]);
        assert_eq!(state.style().font_size_px(), 200.0);
        assert_eq!(state.style().rotation_degrees(), 0.0);
    }

    #[test]
    fn test_apply_clamps_position_with_new_box() {
        let mut state = state();
        let args = OverlayArgs {
            x: Some(10_000.0),
            y: Some(-5.0),
            box_width: Some(200.0),
            ..OverlayArgs::default()
        };
        args.apply(&mut state).unwrap();

        let position = state.position();
        assert_eq!(position.x, 440.0);
        assert_eq!(position.y, 0.0);
    }

    #[test]
    fn test_apply_rejects_unknown_align() {
        let args = OverlayArgs {
            align: Some("justify".to_string()),
            ..OverlayArgs::default()
        };
        assert!(args.apply(&mut state()).is_err());
    }
}
