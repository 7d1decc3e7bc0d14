//! Chalkboard Render Library
//!
//! CPU raster backend for the whiteboard surface, built on tiny-skia.

mod pixmap;

pub use pixmap::{PixmapSurface, RenderError, RenderResult};
