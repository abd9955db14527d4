//! Source video reference and its intrinsic geometry.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::geometry::Container;

/// File extensions accepted as video input.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "webm", "avi", "m4v"];

/// A loaded source video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    /// Path to the media file.
    pub path: PathBuf,

    /// Intrinsic width in pixels.
    pub width: u32,

    /// Intrinsic height in pixels.
    pub height: u32,
}

impl VideoSource {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }

    /// The area the overlay box can be dragged within.
    pub fn container(&self) -> Container {
        Container::new(self.width as f64, self.height as f64)
    }

    /// Aspect ratio derived from the intrinsic dimensions.
    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        AspectRatio::new(self.width, self.height)
    }
}

/// Whether `path` carries a video file extension.
pub fn is_video_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Preview aspect ratio, stored reduced (1920x1080 becomes 16/9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Ratio used before any video is loaded.
    pub const DEFAULT: AspectRatio = AspectRatio {
        width: 16,
        height: 9,
    };

    /// Returns `None` for degenerate (zero) dimensions.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let divisor = gcd(width, height);
        Some(Self {
            width: width / divisor,
            height: height / divisor,
        })
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.width, self.height)
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
