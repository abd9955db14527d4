//! Textcast Editor Model
//!
//! Defines the data contracts of the overlay editor:
//! - **Editor state:** loaded video, overlay text, box position, and style
//! - **Style:** rotation, font size, box size, and alignment, clamped on write
//! - **Segments:** overlay text split on `..` lines, one per exported video
//! - **Project:** the editor state saved as a JSON document
//!
//! Geometry is expressed in source-video pixels.

pub mod editor;
pub mod geometry;
pub mod project;
pub mod segment;
pub mod style;
pub mod video;

pub use editor::*;
pub use geometry::*;
pub use project::*;
pub use segment::*;
pub use style::*;
pub use video::*;
