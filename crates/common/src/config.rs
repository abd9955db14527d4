//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where exported videos are delivered.
    pub downloads_dir: PathBuf,

    /// Initial overlay style for new projects.
    #[serde(default)]
    pub editor: EditorDefaults,

    /// Export pipeline settings.
    #[serde(default)]
    pub export: ExportSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Overlay style applied to freshly created projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorDefaults {
    pub font_size_px: f64,
    pub box_width_px: f64,
    pub box_height_px: f64,
    pub rotation_degrees: f64,

    /// One of "left", "center", "right".
    pub align: String,
}

/// How user-supplied overlay text is placed into the filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPolicy {
    /// Escape every character the filter parsers treat specially.
    #[default]
    Escape,
    /// Refuse segments that contain filter-special characters.
    Reject,
}

/// Fixed parameters of every export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Name the source video is uploaded under in the engine workspace.
    pub input_name: String,

    /// Prefix of delivered files (`<prefix>-<n>.<container>`).
    pub output_prefix: String,

    /// Output container extension.
    pub container: String,

    /// Font file referenced by the drawtext filter.
    pub font_file: PathBuf,

    pub font_color: String,
    pub border_color: String,
    pub border_width: u32,

    #[serde(default)]
    pub text_policy: TextPolicy,

    /// ffmpeg binary used by the native engine.
    pub ffmpeg_binary: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "textcast=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            downloads_dir: dirs_default_downloads(),
            editor: EditorDefaults::default(),
            export: ExportSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            font_size_px: 24.0,
            box_width_px: 300.0,
            box_height_px: 100.0,
            rotation_degrees: 0.0,
            align: "left".to_string(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            input_name: "input.mp4".to_string(),
            output_prefix: "edited-video".to_string(),
            container: "mp4".to_string(),
            font_file: PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
            font_color: "white".to_string(),
            border_color: "black".to_string(),
            border_width: 2,
            text_policy: TextPolicy::Escape,
            ffmpeg_binary: "ffmpeg".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ExportSettings {
    /// File name the engine writes for the zero-based segment `index`.
    pub fn engine_output_name(&self, index: usize) -> String {
        format!("output_{index}.{}", self.container)
    }

    /// File name delivered to the user for the zero-based segment `index`.
    pub fn download_name(&self, index: usize) -> String {
        format!("{}-{}.{}", self.output_prefix, index + 1, self.container)
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("textcast").join("config.json")
}

/// Default delivery directory for exported videos.
fn dirs_default_downloads() -> PathBuf {
    let base = std::env::var("XDG_DOWNLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join("Downloads")
        });
    base.join("textcast")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names_are_one_based() {
        let settings = ExportSettings::default();
        assert_eq!(settings.engine_output_name(0), "output_0.mp4");
        assert_eq!(settings.download_name(0), "edited-video-1.mp4");
        assert_eq!(settings.download_name(4), "edited-video-5.mp4");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"downloads_dir": "/tmp/out"}"#).unwrap();
        assert_eq!(parsed.downloads_dir, PathBuf::from("/tmp/out"));
        assert_eq!(parsed.export.border_width, 2);
        assert_eq!(parsed.export.text_policy, TextPolicy::Escape);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn test_text_policy_serializes_lowercase() {
        let json = serde_json::to_string(&TextPolicy::Reject).unwrap();
        assert_eq!(json, "\"reject\"");
    }
}
