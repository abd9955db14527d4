//! Export one video per segment.

use std::path::PathBuf;

use textcast_common::config::AppConfig;
use textcast_editor_model::{export_label, EditorProject};
use textcast_render_engine::{
    CancelFlag, DirectorySink, EditorSession, EngineHandle, ExportOutcome, FfmpegEngine,
    ProgressCallback, SegmentStage, SkipReason,
};

pub async fn run(
    config: &AppConfig,
    path: PathBuf,
    output: Option<PathBuf>,
    report_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!("Exporting project at: {}", path.display());

    let project =
        EditorProject::load(&path).map_err(|e| anyhow::anyhow!("Failed to load project: {e}"))?;
    for issue in project.validate_sources() {
        println!("  Warning: {issue}");
    }

    let downloads = output.unwrap_or_else(|| config.downloads_dir.clone());
    let mut session = EditorSession::new(project.editor, config.export.clone());
    println!("  Output: {}", downloads.display());
    println!("  {}", export_label(session.segments().len()));

    let mut engine = EngineHandle::new();
    if let Err(e) = engine
        .initialize(FfmpegEngine::initialize(config.export.ffmpeg_binary.clone()))
        .await
    {
        println!("  Engine: {e}");
    }

    let cancel = CancelFlag::new();
    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                println!("\nCancelling export...");
                cancel.cancel();
            }
        }
    });

    let progress_cb: ProgressCallback = Box::new(|p| {
        let stage = match p.stage {
            SegmentStage::Uploading => "uploading",
            SegmentStage::Encoding => "encoding",
            SegmentStage::Reading => "reading",
            SegmentStage::Delivered => "done",
            SegmentStage::Failed => "failed",
        };
        println!("  [{}/{}] {stage}", p.index + 1, p.total);
    });

    let mut sink = DirectorySink::new(&downloads);
    let result = session
        .export(&mut engine, &mut sink, &cancel, Some(&progress_cb))
        .await;
    ctrl_c.abort();
    let report = result?;

    if let Some(ref report_path) = report_path {
        report.write_json(report_path)?;
        tracing::info!(path = %report_path.display(), "Wrote export report");
    }

    for delivery in &report.delivered {
        if let Some(ref location) = delivery.location {
            println!("  Saved {} ({} bytes)", location.display(), delivery.bytes);
        }
    }

    match report.outcome {
        ExportOutcome::Completed => {
            println!("\nExport complete: {} video(s)", report.delivered.len());
            Ok(())
        }
        ExportOutcome::Skipped { reason } => {
            let why = match reason {
                SkipReason::NoVideo => "no video loaded".to_string(),
                SkipReason::EngineUninitialized => "engine not initialized".to_string(),
                SkipReason::EngineFailed(message) => message,
            };
            Err(anyhow::anyhow!("Export skipped: {why}"))
        }
        ExportOutcome::Cancelled { completed } => {
            println!("\nExport cancelled after {completed} of {} video(s)", report.total);
            Ok(())
        }
        ExportOutcome::Failed { .. } => Err(anyhow::anyhow!(
            "Export failed: {}",
            session.last_error().unwrap_or("unknown error")
        )),
    }
}
