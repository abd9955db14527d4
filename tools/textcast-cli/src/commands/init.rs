//! Create a project for a video.

use std::path::PathBuf;

use textcast_common::config::AppConfig;
use textcast_editor_model::{export_label, is_video_path, EditorProject, EditorState};
use textcast_render_engine::{probe_video, style_from_defaults};

use super::OverlayArgs;

pub async fn run(
    config: &AppConfig,
    video: PathBuf,
    name: Option<String>,
    output: PathBuf,
    overlay: OverlayArgs,
) -> anyhow::Result<()> {
    if !is_video_path(&video) {
        return Err(anyhow::anyhow!(
            "{} does not look like a video file",
            video.display()
        ));
    }

    let source = probe_video(&video).await?;
    let name = name.unwrap_or_else(|| {
        video
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string())
    });
    println!("Creating project '{}' for {}", name, video.display());

    let mut state = EditorState::new(style_from_defaults(&config.editor)?);
    state.load_video(source);
    overlay.apply(&mut state)?;

    let mut project = EditorProject::new(&name, state);
    let path = project
        .save(&output)
        .map_err(|e| anyhow::anyhow!("Failed to create project: {e}"))?;

    let editor = &project.editor;
    let position = editor.position();
    println!("Project created successfully:");
    println!("  File: {}", path.display());
    if let Some(video) = editor.video() {
        println!(
            "  Video: {}x{} (aspect {})",
            video.width,
            video.height,
            editor.aspect_ratio()
        );
    }
    println!("  Position: ({}, {})", position.x, position.y);
    println!("  Segments: {}", editor.segments().len());
    println!();
    println!("Next:");
    println!("  textcast segments {}", path.display());
    println!(
        "  textcast export {}   ({})",
        path.display(),
        export_label(editor.segments().len())
    );

    Ok(())
}
