//! Show and validate a project.

use std::path::PathBuf;

use textcast_editor_model::{export_label, EditorProject};

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let project =
        EditorProject::load(&path).map_err(|e| anyhow::anyhow!("Failed to load project: {e}"))?;
    let editor = &project.editor;

    println!("Project: {}", project.name);
    println!("  Version: {}", project.version);
    println!("  Created: {}", project.created_at);
    println!("  Modified: {}", project.modified_at);
    println!();

    println!("Video:");
    match editor.video() {
        Some(video) => {
            println!("  Source: {}", video.path.display());
            println!("  Size: {}x{}", video.width, video.height);
            println!("  Preview aspect: {}", editor.aspect_ratio());
        }
        None => println!("  (none)"),
    }
    println!();

    let style = editor.style();
    let box_size = style.box_size();
    let position = editor.position();
    println!("Overlay:");
    println!("  Preview text: {}", editor.preview_text());
    println!("  Position: ({}, {})", position.x, position.y);
    println!("  Box: {}x{}", box_size.width, box_size.height);
    println!("  Font size: {}px", style.font_size_px());
    println!("  Rotation: {}°", style.rotation_degrees());
    println!("  Align: {}", style.align());
    println!("  {}", export_label(editor.segments().len()));
    println!();

    let errors = project.validate_sources();
    if errors.is_empty() {
        println!("Project is ready to export.");
    } else {
        println!("Validation issues:");
        for error in &errors {
            println!("  - {error}");
        }
        println!(
            "\n{} issue(s) found. Export will not produce every video.",
            errors.len()
        );
    }

    Ok(())
}
