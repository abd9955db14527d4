//! Textcast Render Engine
//!
//! Turns an editor snapshot into one exported video per text segment by
//! driving an external transcoding engine.
//!
//! # Pipeline Architecture
//!
//! ```text
//! EditorState ──snapshot──► ExportPlan (one SegmentJob per segment)
//!                                │
//!            ┌───────────────────┘   strictly one job at a time
//!            ▼
//!   write_input(input.mp4) ──► run(-vf drawtext=…) ──► read_output(output_N.mp4)
//!                                                            │
//!                                                            ▼
//!                                            DownloadSink: edited-video-N.mp4
//! ```

pub mod drawtext;
pub mod engine;
pub mod export;
pub mod ffmpeg;
pub mod session;
pub mod sink;

pub use drawtext::*;
pub use engine::*;
pub use export::*;
pub use ffmpeg::{command_exists, probe_video, FfmpegEngine};
pub use session::*;
pub use sink::*;
