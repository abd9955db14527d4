//! Native ffmpeg engine and ffprobe helpers.
//!
//! The engine's file namespace is a private working directory; `run`
//! executes the ffmpeg binary inside it.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

use textcast_common::error::{TextcastError, TextcastResult};
use textcast_editor_model::VideoSource;

use crate::engine::{CancelFlag, EngineExit, TranscodeEngine};

/// Flags prepended to every invocation: overwrite outputs from earlier
/// jobs, keep stderr to errors, report progress on stdout.
const BASE_ARGS: &[&str] = &[
    "-y",
    "-hide_banner",
    "-loglevel",
    "error",
    "-nostdin",
    "-nostats",
    "-progress",
    "pipe:1",
];

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(100);

static WORKDIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Transcoding engine backed by the `ffmpeg` binary.
#[derive(Debug)]
pub struct FfmpegEngine {
    binary: String,
    workdir: PathBuf,
}

impl FfmpegEngine {
    /// Check that `binary` runs and create a fresh working directory.
    pub async fn initialize(binary: impl Into<String>) -> TextcastResult<Self> {
        let binary = binary.into();
        if !command_exists(&binary).await {
            return Err(TextcastError::engine(format!(
                "{binary} not found in PATH"
            )));
        }

        let workdir = std::env::temp_dir().join(format!(
            "textcast-engine-{}-{}",
            std::process::id(),
            WORKDIR_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        tokio::fs::create_dir_all(&workdir).await.map_err(|e| {
            TextcastError::engine(format!(
                "Failed to create engine workdir {}: {e}",
                workdir.display()
            ))
        })?;

        tracing::debug!(binary = %binary, workdir = %workdir.display(), "ffmpeg engine ready");
        Ok(Self { binary, workdir })
    }

    /// Map an engine file name to a path inside the working directory.
    /// Only bare file names are accepted.
    fn resolve(&self, name: &str) -> TextcastResult<PathBuf> {
        let bare = Path::new(name)
            .file_name()
            .map(|file| file == name)
            .unwrap_or(false);
        if name.is_empty() || !bare || name == ".." {
            return Err(TextcastError::engine(format!(
                "Invalid engine file name {name:?}"
            )));
        }
        Ok(self.workdir.join(name))
    }
}

impl Drop for FfmpegEngine {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_dir_all(&self.workdir) {
            tracing::debug!(error = %err, workdir = %self.workdir.display(), "Failed to remove engine workdir");
        }
    }
}

#[async_trait::async_trait]
impl TranscodeEngine for FfmpegEngine {
    async fn write_input(&mut self, name: &str, bytes: &[u8]) -> TextcastResult<()> {
        let path = self.resolve(name)?;
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            TextcastError::engine(format!("Failed to write {}: {e}", path.display()))
        })
    }

    async fn run(&mut self, args: &[String], cancel: &CancelFlag) -> TextcastResult<EngineExit> {
        tracing::debug!(args = ?args, "Running ffmpeg");
        let mut cmd = Command::new(&self.binary);
        cmd.args(BASE_ARGS)
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start = Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|e| TextcastError::engine(format!("Failed to start ffmpeg: {e}")))?;

        tracing::debug!(pid = child.id(), args_len = args.len(), "ffmpeg process started");

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TextcastError::engine("Failed to capture ffmpeg stdout"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| TextcastError::engine("Failed to capture ffmpeg stderr"))?;

        // Drain stderr concurrently so ffmpeg never blocks on a full pipe.
        let stderr_task = tokio::spawn(async move {
            let mut output = String::new();
            match stderr.read_to_string(&mut output).await {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        let mut lines = BufReader::new(stdout).lines();
        let mut progress = ProgressState::default();
        let mut poll = tokio::time::interval(CANCEL_POLL_INTERVAL);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let line = line.map_err(|e| {
                        TextcastError::engine(format!("Failed reading ffmpeg progress: {e}"))
                    })?;
                    let Some(line) = line else { break };
                    if let Some((key, value)) = line.trim().split_once('=') {
                        progress.update(key, value);
                        if key == "progress" {
                            tracing::trace!(
                                out_time_secs = progress.out_time_secs,
                                complete = progress.complete,
                                "ffmpeg progress"
                            );
                        }
                    }
                }
                _ = poll.tick() => {
                    if cancel.is_cancelled() {
                        tracing::warn!(pid = child.id(), "Cancelling ffmpeg");
                        if let Err(err) = child.kill().await {
                            tracing::debug!(error = %err, "Failed to kill ffmpeg");
                        }
                        stderr_task.abort();
                        return Err(TextcastError::Cancelled);
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| TextcastError::engine(format!("Failed to wait on ffmpeg: {e}")))?;

        let stderr_output = stderr_task
            .await
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());

        tracing::debug!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            out_time_secs = progress.out_time_secs,
            status = %status,
            "ffmpeg process finished"
        );

        Ok(EngineExit {
            code: status.code().unwrap_or(-1),
            stderr: stderr_output.trim().to_string(),
        })
    }

    async fn read_output(&mut self, name: &str) -> TextcastResult<Vec<u8>> {
        let path = self.resolve(name)?;
        tokio::fs::read(&path).await.map_err(|e| {
            TextcastError::engine(format!("Failed to read {}: {e}", path.display()))
        })
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

#[derive(Debug, Default)]
struct ProgressState {
    out_time_secs: f64,
    complete: bool,
}

impl ProgressState {
    fn update(&mut self, key: &str, value: &str) {
        match key {
            "out_time_ms" | "out_time_us" => {
                if let Ok(us) = value.parse::<f64>() {
                    self.out_time_secs = us / 1_000_000.0;
                }
            }
            "progress" => {
                self.complete = value == "end";
            }
            _ => {}
        }
    }
}

/// Whether `binary` can be executed.
pub async fn command_exists(binary: &str) -> bool {
    Command::new(binary)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Probe a video file's intrinsic dimensions with ffprobe.
pub async fn probe_video(path: &Path) -> TextcastResult<VideoSource> {
    if !path.exists() {
        return Err(TextcastError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "csv=p=0:s=x",
        ])
        .arg(path)
        .output()
        .await
        .map_err(|e| TextcastError::probe(format!("Failed to run ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(TextcastError::probe(format!(
            "ffprobe failed on {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    let (width, height) = parse_dimensions(&raw).ok_or_else(|| {
        TextcastError::probe(format!("No video stream found in {}", path.display()))
    })?;
    Ok(VideoSource::new(path, width, height))
}

/// Parse ffprobe's `WIDTHxHEIGHT` output.
fn parse_dimensions(raw: &str) -> Option<(u32, u32)> {
    let line = raw.lines().next()?.trim();
    let (w, h) = line.split_once('x')?;
    let width = w.parse::<u32>().ok()?;
    let height = h.parse::<u32>().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(parse_dimensions("1920x1080\n"), Some((1920, 1080)));
        assert_eq!(parse_dimensions("0x1080"), None);
        assert_eq!(parse_dimensions(""), None);
        assert_eq!(parse_dimensions("garbage"), None);
    }

    #[test]
    fn test_progress_state_tracks_out_time() {
        let mut state = ProgressState::default();
        state.update("out_time_us", "2500000");
        assert!((state.out_time_secs - 2.5).abs() < 1e-9);
        state.update("progress", "continue");
        assert!(!state.complete);
        state.update("progress", "end");
        assert!(state.complete);
    }

    #[tokio::test]
    async fn test_missing_binary_fails_to_initialize() {
        let err = FfmpegEngine::initialize("textcast-no-such-ffmpeg")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_probe_missing_file() {
        let err = probe_video(Path::new("/nonexistent/clip.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, TextcastError::FileNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cancel_kills_running_process() {
        use std::os::unix::fs::PermissionsExt;

        let dir = std::env::temp_dir().join(format!("textcast-cancel-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let script = dir.join("slow-ffmpeg.sh");
        std::fs::write(&script, "#!/bin/sh\nsleep 30\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut engine = FfmpegEngine {
            binary: script.to_string_lossy().into_owned(),
            workdir: dir.join("work"),
        };
        std::fs::create_dir_all(&engine.workdir).unwrap();

        let cancel = CancelFlag::new();
        cancel.cancel();
        let started = Instant::now();
        let err = engine
            .run(&["-i".to_string(), "input.mp4".to_string()], &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, TextcastError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(10));
        drop(engine);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_resolve_rejects_paths() {
        let engine = FfmpegEngine {
            binary: "ffmpeg".to_string(),
            workdir: std::env::temp_dir().join("textcast-resolve-test"),
        };
        assert!(engine.resolve("input.mp4").is_ok());
        assert!(engine.resolve("../escape.mp4").is_err());
        assert!(engine.resolve("/etc/passwd").is_err());
        assert!(engine.resolve("").is_err());
        assert!(engine.resolve("..").is_err());
    }
}
