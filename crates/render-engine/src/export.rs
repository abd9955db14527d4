//! Export planning and the sequential export runner.
//!
//! An [`ExportPlan`] is a frozen snapshot of the editor: one [`SegmentJob`]
//! per segment, each carrying its finished filter expression and engine
//! arguments. [`run_export`] then drives the engine through the jobs one at
//! a time: upload, run, read back, deliver, and only then move on.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use textcast_common::config::ExportSettings;
use textcast_common::error::{TextcastError, TextcastResult};
use textcast_editor_model::{EditorError, EditorState};

use crate::drawtext::{segment_args, DrawText};
use crate::engine::{CancelFlag, TranscodeEngine};
use crate::sink::{Delivery, DownloadSink};

/// One unit of export work.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentJob {
    /// Zero-based position of the segment.
    pub index: usize,

    /// Trimmed segment text.
    pub text: String,

    /// Rendered drawtext expression.
    pub filter: String,

    /// Full engine argument list.
    pub args: Vec<String>,

    /// File the engine writes.
    pub output_name: String,

    /// File name handed to the sink.
    pub download_name: String,
}

/// Everything needed to export, captured before the first engine call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    /// Source video on disk.
    pub source: PathBuf,

    /// Name the source is uploaded under in the engine namespace.
    pub input_name: String,

    pub jobs: Vec<SegmentJob>,
}

impl ExportPlan {
    /// Snapshot `state` into a plan.
    ///
    /// Fails if no video is loaded or a segment cannot be rendered into a
    /// filter expression (e.g. under the reject text policy).
    pub fn from_state(state: &EditorState, settings: &ExportSettings) -> TextcastResult<Self> {
        let video = state
            .video()
            .ok_or_else(|| TextcastError::model(EditorError::NoVideo.to_string()))?;
        let position = state.position();
        let style = state.style();

        let jobs = state
            .segments()
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                let filter = DrawText::new(text.as_str())
                    .styled(settings)
                    .position(position.x, position.y)
                    .font_size(style.font_size_px())
                    .rotate(style.rotation_degrees())
                    .build(settings.text_policy)
                    .map_err(|e| TextcastError::filter(format!("segment {}: {e}", index + 1)))?;
                let output_name = settings.engine_output_name(index);
                Ok(SegmentJob {
                    index,
                    args: segment_args(&settings.input_name, &filter, &output_name),
                    text,
                    filter,
                    output_name,
                    download_name: settings.download_name(index),
                })
            })
            .collect::<TextcastResult<Vec<_>>>()?;

        Ok(Self {
            source: video.path.clone(),
            input_name: settings.input_name.clone(),
            jobs,
        })
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Per-segment progress callback.
pub type ProgressCallback = Box<dyn Fn(SegmentProgress) + Send + Sync>;

/// Progress report for one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentProgress {
    /// Zero-based segment index.
    pub index: usize,

    /// Number of segments in the export.
    pub total: usize,

    pub stage: SegmentStage,
}

/// Stages a segment passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStage {
    Uploading,
    Encoding,
    Reading,
    Delivered,
    Failed,
}

/// Why an export did nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "message", rename_all = "snake_case")]
pub enum SkipReason {
    NoVideo,
    EngineUninitialized,
    EngineFailed(String),
}

/// How an export ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportOutcome {
    /// Every segment was delivered.
    Completed,

    /// Preconditions were not met; nothing ran.
    Skipped { reason: SkipReason },

    /// The cancel flag was raised; `completed` segments had been delivered.
    Cancelled { completed: usize },

    /// Segment `segment` (one-based) failed; later segments never ran.
    Failed { segment: usize, message: String },
}

/// Result of an export: the outcome plus everything delivered before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub total: usize,
    pub delivered: Vec<Delivery>,
    pub outcome: ExportOutcome,
}

impl ExportReport {
    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            total: 0,
            delivered: Vec::new(),
            outcome: ExportOutcome::Skipped { reason },
        }
    }

    pub fn is_complete(&self) -> bool {
        self.outcome == ExportOutcome::Completed
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> TextcastResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Run every job in `plan`, strictly one after another.
///
/// The first failure stops the export; outputs delivered before it stay
/// delivered.
pub async fn run_export<E, S>(
    plan: &ExportPlan,
    engine: &mut E,
    sink: &mut S,
    cancel: &CancelFlag,
    progress: Option<&ProgressCallback>,
) -> ExportReport
where
    E: TranscodeEngine + ?Sized,
    S: DownloadSink + ?Sized,
{
    let started = Instant::now();
    let total = plan.len();
    let mut delivered = Vec::with_capacity(total);

    tracing::info!(
        engine = engine.name(),
        source = %plan.source.display(),
        segments = total,
        "Starting export"
    );

    let report = |delivered: Vec<Delivery>, outcome: ExportOutcome| ExportReport {
        total,
        delivered,
        outcome,
    };

    if plan.is_empty() {
        return report(delivered, ExportOutcome::Completed);
    }

    let source = match tokio::fs::read(&plan.source).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let message = format!("Failed to read source {}: {e}", plan.source.display());
            tracing::error!(error = %message, "Export failed before the first segment");
            return report(
                delivered,
                ExportOutcome::Failed {
                    segment: 1,
                    message,
                },
            );
        }
    };

    for job in &plan.jobs {
        if cancel.is_cancelled() {
            let completed = delivered.len();
            tracing::warn!(completed, "Export cancelled");
            return report(delivered, ExportOutcome::Cancelled { completed });
        }

        match run_job(plan, job, &source, engine, sink, cancel, progress, total).await {
            Ok(delivery) => delivered.push(delivery),
            Err(TextcastError::Cancelled) => {
                tracing::warn!(
                    segment = job.index + 1,
                    completed = delivered.len(),
                    "Export cancelled mid-segment"
                );
                let completed = delivered.len();
                return report(delivered, ExportOutcome::Cancelled { completed });
            }
            Err(err) => {
                tracing::error!(
                    segment = job.index + 1,
                    error = %err,
                    "Error during video processing"
                );
                emit(progress, job.index, total, SegmentStage::Failed);
                return report(
                    delivered,
                    ExportOutcome::Failed {
                        segment: job.index + 1,
                        message: err.to_string(),
                    },
                );
            }
        }
    }

    tracing::info!(
        segments = total,
        elapsed_secs = started.elapsed().as_secs_f64(),
        "Export finished"
    );
    report(delivered, ExportOutcome::Completed)
}

#[allow(clippy::too_many_arguments)]
async fn run_job<E, S>(
    plan: &ExportPlan,
    job: &SegmentJob,
    source: &[u8],
    engine: &mut E,
    sink: &mut S,
    cancel: &CancelFlag,
    progress: Option<&ProgressCallback>,
    total: usize,
) -> TextcastResult<Delivery>
where
    E: TranscodeEngine + ?Sized,
    S: DownloadSink + ?Sized,
{
    let started = Instant::now();

    // The engine namespace is shared across jobs, so the source is uploaded
    // again for every segment.
    emit(progress, job.index, total, SegmentStage::Uploading);
    engine.write_input(&plan.input_name, source).await?;

    emit(progress, job.index, total, SegmentStage::Encoding);
    let exit = engine.run(&job.args, cancel).await?;
    if !exit.success() {
        return Err(TextcastError::engine(format!(
            "{} exited with status {}: {}",
            engine.name(),
            exit.code,
            exit.stderr
        )));
    }

    emit(progress, job.index, total, SegmentStage::Reading);
    let output = engine.read_output(&job.output_name).await?;
    let delivery = sink.deliver(&job.download_name, &output).await?;

    emit(progress, job.index, total, SegmentStage::Delivered);
    tracing::info!(
        segment = job.index + 1,
        of = total,
        file = %job.download_name,
        bytes = delivery.bytes,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Segment exported"
    );
    Ok(delivery)
}

fn emit(progress: Option<&ProgressCallback>, index: usize, total: usize, stage: SegmentStage) {
    if let Some(cb) = progress {
        cb(SegmentProgress {
            index,
            total,
            stage,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textcast_common::config::TextPolicy;
    use textcast_editor_model::VideoSource;

    fn state_with(text: &str) -> EditorState {
        let mut state = EditorState::default();
        state.load_video(VideoSource::new("/videos/clip.mp4", 1280, 720));
        state.set_overlay_text(text);
        state.drag_to(40.0, 60.0).unwrap();
        state.set_rotation(30.0).unwrap();
        state
    }

    #[test]
    fn test_plan_has_one_job_per_segment() {
        let plan =
            ExportPlan::from_state(&state_with("a\n..\nb\n..\nc"), &ExportSettings::default())
                .unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.input_name, "input.mp4");
        assert_eq!(plan.source, PathBuf::from("/videos/clip.mp4"));

        let names: Vec<_> = plan.jobs.iter().map(|j| j.download_name.as_str()).collect();
        assert_eq!(
            names,
            ["edited-video-1.mp4", "edited-video-2.mp4", "edited-video-3.mp4"]
        );
        assert_eq!(plan.jobs[2].output_name, "output_2.mp4");
    }

    #[test]
    fn test_plan_embeds_snapshot_in_filter() {
        let plan =
            ExportPlan::from_state(&state_with("Hello"), &ExportSettings::default()).unwrap();
        let job = &plan.jobs[0];
        assert!(job.filter.starts_with("drawtext=text='Hello':x=40:y=60:fontsize=24:"));
        assert!(job.filter.ends_with(":rotate=30"));
        assert_eq!(job.args[0], "-i");
        assert_eq!(job.args[3], job.filter);
        assert_eq!(job.args[4..6], ["-c:a".to_string(), "copy".to_string()]);
    }

    #[test]
    fn test_plan_without_video_fails() {
        let mut state = EditorState::default();
        state.set_overlay_text("text");
        assert!(ExportPlan::from_state(&state, &ExportSettings::default()).is_err());
    }

    #[test]
    fn test_reject_policy_names_offending_segment() {
        let settings = ExportSettings {
            text_policy: TextPolicy::Reject,
            ..ExportSettings::default()
        };
        let err = ExportPlan::from_state(&state_with("fine\n..\nit's"), &settings).unwrap_err();
        assert!(err.to_string().contains("segment 2"));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let state = state_with("x\n..\ny");
        let settings = ExportSettings::default();
        assert_eq!(
            ExportPlan::from_state(&state, &settings).unwrap(),
            ExportPlan::from_state(&state, &settings).unwrap()
        );
    }
}
