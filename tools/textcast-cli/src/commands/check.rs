//! Check that the external tools an export needs are available.

use textcast_common::config::{config_file_path, AppConfig};
use textcast_render_engine::command_exists;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Textcast System Check");
    println!("{}", "=".repeat(50));

    let ffmpeg = &config.export.ffmpeg_binary;
    let ffmpeg_ok = command_exists(ffmpeg).await;
    report(ffmpeg_ok, &format!("Transcoder: {ffmpeg}"));

    let ffprobe_ok = command_exists("ffprobe").await;
    report(ffprobe_ok, "Prober: ffprobe");

    let font = &config.export.font_file;
    report(font.exists(), &format!("Font file: {}", font.display()));

    println!();
    println!("Config: {}", config_file_path().display());
    println!("Downloads: {}", config.downloads_dir.display());
    println!("Text policy: {:?}", config.export.text_policy);

    println!();
    if ffmpeg_ok && ffprobe_ok {
        println!("All required tools are available. Textcast is ready.");
    } else {
        println!("Some required tools are missing. Install ffmpeg (which ships ffprobe).");
    }

    Ok(())
}

fn report(ok: bool, what: &str) {
    if ok {
        println!("[OK] {what}");
    } else {
        println!("[MISSING] {what}");
    }
}
