//! Change the overlay of an existing project.

use std::path::PathBuf;

use textcast_editor_model::EditorProject;

use super::OverlayArgs;

pub fn run(path: PathBuf, overlay: OverlayArgs) -> anyhow::Result<()> {
    let mut project =
        EditorProject::load(&path).map_err(|e| anyhow::anyhow!("Failed to load project: {e}"))?;

    overlay.apply(&mut project.editor)?;
    let saved = project
        .save(&path)
        .map_err(|e| anyhow::anyhow!("Failed to save project: {e}"))?;

    let style = project.editor.style();
    let position = project.editor.position();
    let box_size = style.box_size();
    println!("Updated {}", saved.display());
    println!("  Position: ({}, {})", position.x, position.y);
    println!(
        "  Style: {}px, {}°, box {}x{}, {}",
        style.font_size_px(),
        style.rotation_degrees(),
        box_size.width,
        box_size.height,
        style.align()
    );
    println!("  Segments: {}", project.editor.segments().len());

    Ok(())
}
