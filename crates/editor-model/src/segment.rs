//! Splitting overlay text into per-video segments.
//!
//! A line holding exactly `..`, with a newline on both sides, separates
//! segments. Each segment is trimmed and blank segments are dropped.
//! There is no escape syntax: a segment can never contain the delimiter
//! line itself.

use std::fmt;

/// The separator between two segments, newlines included.
pub const SEGMENT_DELIMITER: &str = "\n..\n";

/// Text shown in the overlay preview when there are no segments.
pub const PREVIEW_PLACEHOLDER: &str = "Drag me!";

/// Iterate the segments of `text` in order.
///
/// The iterator borrows from `text`; calling this again restarts it.
pub fn segments(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.split(SEGMENT_DELIMITER)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

/// Collect the segments of `text` into owned strings.
pub fn split_segments(text: &str) -> Vec<String> {
    segments(text).map(str::to_string).collect()
}

/// Text rendered inside the draggable preview box.
pub fn preview_text(text: &str) -> &str {
    segments(text).next().unwrap_or(PREVIEW_PLACEHOLDER)
}

/// Caption of the export control.
pub fn export_label(segment_count: usize) -> String {
    format!("Export ({segment_count} videos)")
}

/// Numbered listing of segments, one per exported video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPreview {
    entries: Vec<String>,
}

impl SegmentPreview {
    pub fn from_text(text: &str) -> Self {
        Self {
            entries: split_segments(text),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The listing is only worth showing once there is more than one video.
    pub fn is_collapsible(&self) -> bool {
        self.entries.len() > 1
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn title(&self) -> String {
        format!("Video Prompts ({})", self.entries.len())
    }
}

impl fmt::Display for SegmentPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            writeln!(f, "{}. {}", index + 1, entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_segments() {
        assert_eq!(split_segments("a\n..\nb\n..\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_segments("").is_empty());
    }

    #[test]
    fn test_no_delimiter_is_single_trimmed_segment() {
        assert_eq!(split_segments("  hello\nworld \n"), vec!["hello\nworld"]);
        assert!(split_segments("   \n\t ").is_empty());
    }

    #[test]
    fn test_blank_segments_are_dropped() {
        assert_eq!(split_segments("a\n..\n   \n..\nb"), vec!["a", "b"]);
    }

    #[test]
    fn test_delimiter_needs_newlines_on_both_sides() {
        assert_eq!(split_segments("..\nfirst"), vec!["..\nfirst"]);
        assert_eq!(split_segments("last\n.."), vec!["last\n.."]);
        assert_eq!(split_segments("a\n...\nb"), vec!["a\n...\nb"]);
    }

    #[test]
    fn test_adjacent_delimiters_scan_left_to_right() {
        assert_eq!(split_segments("a\n..\n..\nb"), vec!["a", "..\nb"]);
    }

    #[test]
    fn test_iterator_is_restartable() {
        let text = "one\n..\ntwo";
        let first: Vec<_> = segments(text).collect();
        let second: Vec<_> = segments(text).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_preview_text_falls_back_to_placeholder() {
        assert_eq!(preview_text(""), PREVIEW_PLACEHOLDER);
        assert_eq!(preview_text(" x \n..\ny"), "x");
    }

    #[test]
    fn test_segment_preview_listing() {
        let preview = SegmentPreview::from_text("alpha\n..\nbeta");
        assert!(preview.is_collapsible());
        assert_eq!(preview.title(), "Video Prompts (2)");
        assert_eq!(preview.to_string(), "1. alpha\n2. beta\n");
        assert_eq!(export_label(preview.len()), "Export (2 videos)");
    }
}
