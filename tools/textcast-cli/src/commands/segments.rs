//! Preview the segments an export would produce.

use std::path::PathBuf;

use serde::Serialize;

use textcast_editor_model::{export_label, EditorProject};

#[derive(Serialize)]
struct SegmentListing<'a> {
    preview: &'a str,
    label: String,
    segments: &'a [String],
}

pub fn run(path: PathBuf, json: bool) -> anyhow::Result<()> {
    let project =
        EditorProject::load(&path).map_err(|e| anyhow::anyhow!("Failed to load project: {e}"))?;

    let preview = project.editor.segment_preview();
    let label = export_label(preview.len());

    if json {
        let listing = SegmentListing {
            preview: project.editor.preview_text(),
            label,
            segments: preview.entries(),
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("Preview: {}", project.editor.preview_text());
    println!();
    if preview.is_empty() {
        println!("No segments. Export would produce nothing.");
    } else if preview.is_collapsible() {
        println!("{}", preview.title());
        print!("{preview}");
    } else {
        println!("Single video:");
        print!("{preview}");
    }
    println!();
    println!("[{label}]");

    Ok(())
}
