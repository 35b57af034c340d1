//! Small, pure helpers shared by rendering and generation.

pub mod date;
pub mod html;
pub mod markdown;
pub mod minify;
pub mod video;
