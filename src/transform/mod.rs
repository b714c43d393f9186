//! Content transforms applied while rendering chapters.

pub mod inline;

pub use inline::{image_sources, normalize_colons, render_inline, render_paragraph};
