//! Delivery of finished outputs ("downloads").

use std::path::{Path, PathBuf};

use serde::Serialize;

use textcast_common::error::{TextcastError, TextcastResult};

/// Record of one delivered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    /// File name the output was delivered under.
    pub file_name: String,

    /// Where it landed, for sinks backed by a filesystem.
    pub location: Option<PathBuf>,

    /// Size in bytes.
    pub bytes: usize,
}

/// Receives each finished output as soon as it is produced.
#[async_trait::async_trait]
pub trait DownloadSink: Send {
    async fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> TextcastResult<Delivery>;
}

/// Writes outputs into a directory, creating it on first delivery.
/// Existing files with the same name are overwritten.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait::async_trait]
impl DownloadSink for DirectorySink {
    async fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> TextcastResult<Delivery> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            TextcastError::export(format!(
                "Failed to create download directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            TextcastError::export(format!("Failed to write {}: {e}", path.display()))
        })?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Delivered export");
        Ok(Delivery {
            file_name: file_name.to_string(),
            location: Some(path),
            bytes: bytes.len(),
        })
    }
}

/// Keeps outputs in memory, in delivery order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[(String, Vec<u8>)] {
        &self.files
    }

    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(|(name, _)| name.as_str()).collect()
    }
}

#[async_trait::async_trait]
impl DownloadSink for MemorySink {
    async fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> TextcastResult<Delivery> {
        self.files.push((file_name.to_string(), bytes.to_vec()));
        Ok(Delivery {
            file_name: file_name.to_string(),
            location: None,
            bytes: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_directory_sink_writes_files() {
        let dir = std::env::temp_dir().join("textcast_test_sink");
        let _ = std::fs::remove_dir_all(&dir);

        let mut sink = DirectorySink::new(&dir);
        let delivery = sink.deliver("edited-video-1.mp4", b"frames").await.unwrap();

        assert_eq!(delivery.bytes, 6);
        assert_eq!(delivery.location, Some(dir.join("edited-video-1.mp4")));
        assert_eq!(std::fs::read(dir.join("edited-video-1.mp4")).unwrap(), b"frames");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        sink.deliver("a.mp4", b"1").await.unwrap();
        sink.deliver("b.mp4", b"2").await.unwrap();
        assert_eq!(sink.names(), ["a.mp4", "b.mp4"]);
    }
}
