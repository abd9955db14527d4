//! Editor session: owns the editor state plus the transient playback and
//! processing flags, and drives exports.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use textcast_common::config::{EditorDefaults, ExportSettings};
use textcast_common::error::{TextcastError, TextcastResult};
use textcast_editor_model::{EditorState, OverlayStyle, TextAlign, VideoSource};

use crate::engine::{CancelFlag, EngineHandle, EngineStatus, TranscodeEngine};
use crate::export::{run_export, ExportOutcome, ExportPlan, ExportReport, ProgressCallback, SkipReason};
use crate::sink::DownloadSink;

/// Build the initial overlay style from configured defaults.
pub fn style_from_defaults(defaults: &EditorDefaults) -> TextcastResult<OverlayStyle> {
    let align: TextAlign = defaults
        .align
        .parse()
        .map_err(|e: textcast_editor_model::EditorError| TextcastError::config(e.to_string()))?;
    OverlayStyle::new(
        defaults.rotation_degrees,
        defaults.font_size_px,
        defaults.box_width_px,
        defaults.box_height_px,
        align,
    )
    .map_err(|e| TextcastError::config(e.to_string()))
}

/// Read-only view of the processing flag for observers (progress UIs,
/// tests) that do not own the session.
#[derive(Debug, Clone)]
pub struct ProcessingFlag(Arc<AtomicBool>);

impl ProcessingFlag {
    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Raises the processing flag for its lifetime, so every exit path from an
/// export (including a dropped future) clears it.
struct ProcessingGuard(Arc<AtomicBool>);

impl ProcessingGuard {
    fn engage(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(Arc::clone(flag))
    }
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The editor surface: state plus the actions a user can take on it.
#[derive(Debug)]
pub struct EditorSession {
    state: EditorState,
    settings: ExportSettings,
    playing: bool,
    processing: Arc<AtomicBool>,
    last_error: Option<String>,
}

impl EditorSession {
    pub fn new(state: EditorState, settings: ExportSettings) -> Self {
        Self {
            state,
            settings,
            playing: false,
            processing: Arc::new(AtomicBool::new(false)),
            last_error: None,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Mutable access for edits. Unavailable while an export borrows the
    /// session, which keeps the exported segments equal to the previewed
    /// ones.
    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Load or replace the source video. Playback stops.
    pub fn load_video(&mut self, video: VideoSource) {
        tracing::info!(
            path = %video.path.display(),
            width = video.width,
            height = video.height,
            "Video loaded"
        );
        self.state.load_video(video);
        self.playing = false;
    }

    /// Flip play/pause. Without a video there is nothing to play.
    pub fn toggle_play(&mut self) -> bool {
        if self.state.has_video() {
            self.playing = !self.playing;
        }
        self.playing
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    pub fn processing_flag(&self) -> ProcessingFlag {
        ProcessingFlag(Arc::clone(&self.processing))
    }

    /// Message of the most recent failed export or engine initialization.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn segments(&self) -> Vec<String> {
        self.state.segments()
    }

    /// Snapshot the current state into an export plan.
    pub fn plan(&self) -> TextcastResult<ExportPlan> {
        ExportPlan::from_state(&self.state, &self.settings)
    }

    /// Export one video per segment.
    ///
    /// Without a loaded video or a ready engine this is a no-op reported as
    /// [`ExportOutcome::Skipped`]. Runtime failures are reported in the
    /// returned [`ExportReport`] and recorded as [`Self::last_error`]; only
    /// a plan that cannot be built is returned as `Err`.
    pub async fn export<E, S>(
        &mut self,
        engine: &mut EngineHandle<E>,
        sink: &mut S,
        cancel: &CancelFlag,
        progress: Option<&ProgressCallback>,
    ) -> TextcastResult<ExportReport>
    where
        E: TranscodeEngine,
        S: DownloadSink + ?Sized,
    {
        if !self.state.has_video() {
            tracing::debug!("Export skipped: no video loaded");
            return Ok(ExportReport::skipped(SkipReason::NoVideo));
        }

        let engine = match engine.status() {
            EngineStatus::Ready => match engine.engine_mut() {
                Some(engine) => engine,
                None => return Ok(ExportReport::skipped(SkipReason::EngineUninitialized)),
            },
            EngineStatus::Uninitialized => {
                tracing::debug!("Export skipped: engine not initialized");
                return Ok(ExportReport::skipped(SkipReason::EngineUninitialized));
            }
            EngineStatus::Failed(message) => {
                tracing::debug!(error = %message, "Export skipped: engine failed to initialize");
                self.last_error = Some(message.clone());
                return Ok(ExportReport::skipped(SkipReason::EngineFailed(message)));
            }
        };

        let _processing = ProcessingGuard::engage(&self.processing);

        let plan = match self.plan() {
            Ok(plan) => plan,
            Err(err) => {
                self.last_error = Some(err.to_string());
                return Err(err);
            }
        };

        let report = run_export(&plan, engine, sink, cancel, progress).await;

        self.last_error = match &report.outcome {
            ExportOutcome::Failed { segment, message } => {
                Some(format!("Segment {segment} failed: {message}"))
            }
            _ => None,
        };

        Ok(report)
    }
}
