//! Project file: a saved editor session.
//!
//! A project is a single JSON document (`textcast.json` by convention)
//! holding the editor state so that overlay text, placement, and style can
//! be prepared once and exported repeatedly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::editor::{EditorError, EditorState};

/// Current schema version.
pub const PROJECT_VERSION: &str = "1.0";

/// Conventional file name for a project.
pub const PROJECT_FILE_NAME: &str = "textcast.json";

/// Top-level project document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorProject {
    /// Schema version.
    pub version: String,

    /// Human-readable project name.
    pub name: String,

    /// Creation timestamp (RFC 3339).
    pub created_at: String,

    /// Last modified timestamp (RFC 3339).
    pub modified_at: String,

    /// The saved editor state.
    pub editor: EditorState,
}

impl EditorProject {
    pub fn new(name: impl Into<String>, editor: EditorState) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: PROJECT_VERSION.to_string(),
            name: name.into(),
            created_at: now.clone(),
            modified_at: now,
            editor,
        }
    }

    /// Resolve a path argument to a project file: directories get the
    /// conventional file name appended.
    pub fn resolve_path(path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_dir() {
            path.join(PROJECT_FILE_NAME)
        } else {
            path.to_path_buf()
        }
    }

    /// Load a project, re-clamping its style into valid ranges.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = Self::resolve_path(path);
        let content = std::fs::read_to_string(&path).map_err(|e| ProjectError::IoError {
            path: path.clone(),
            source: e,
        })?;
        let mut project: EditorProject =
            serde_json::from_str(&content).map_err(|e| ProjectError::ParseError {
                path: path.clone(),
                source: e,
            })?;

        if project.version != PROJECT_VERSION {
            return Err(ProjectError::ValidationError {
                message: format!(
                    "unsupported project version {} (expected {PROJECT_VERSION})",
                    project.version
                ),
            });
        }

        project
            .editor
            .sanitize()
            .map_err(|source| ProjectError::InvalidState { path, source })?;
        Ok(project)
    }

    /// Save the project, bumping `modified_at`.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<PathBuf, ProjectError> {
        let path = Self::resolve_path(path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ProjectError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        self.modified_at = chrono::Utc::now().to_rfc3339();
        let json = serde_json::to_string_pretty(self).map_err(|e| ProjectError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        std::fs::write(&path, json).map_err(|e| ProjectError::IoError {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    /// Report problems that would make an export a no-op or fail.
    pub fn validate_sources(&self) -> Vec<String> {
        let mut errors = vec![];

        match self.editor.video() {
            None => errors.push("No video loaded".to_string()),
            Some(video) => {
                if !video.path.exists() {
                    errors.push(format!("Video source missing: {}", video.path.display()));
                }
                if video.width == 0 || video.height == 0 {
                    errors.push(format!(
                        "Video has degenerate dimensions {}x{}",
                        video.width, video.height
                    ));
                }
            }
        }

        if self.editor.segments().is_empty() {
            errors.push("Overlay text has no segments".to_string());
        }

        errors
    }
}

/// Errors that can occur when working with project files.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid editor state in {path}: {source}")]
    InvalidState { path: PathBuf, source: EditorError },

    #[error("Invalid project: {message}")]
    ValidationError { message: String },
}
