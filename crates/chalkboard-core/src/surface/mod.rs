//! Raster surface abstraction.

mod recording;

pub use recording::{DrawOp, RecordingSurface};

use crate::color::Rgba8;
use kurbo::BezPath;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Surface errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Could not allocate a {width}x{height} surface")]
    Allocation { width: u32, height: u32 },
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Pixel dimensions of a surface or its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero-area size cannot back a surface.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Stroke end cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// Stroke corner join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

/// Stroke parameters for a single paint call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    pub color: Rgba8,
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl Pen {
    /// Round-capped, round-joined pen, as used for all user drawing.
    pub fn new(color: Rgba8, width: f64) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Round,
            join: LineJoin::Round,
        }
    }

    /// Square-ended pen for guide lines.
    pub fn hairline(color: Rgba8, width: f64) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
        }
    }
}

/// Drawing-context handle over a mutable pixel buffer.
///
/// A surface without a size is uninitialized; every paint call on it must be
/// a silent no-op.
///
/// The checkpoint calls give the surface a second logical layer: after
/// `checkpoint`, `rollback` restores the content as it was at the checkpoint,
/// discarding anything painted since. `release_checkpoint` drops the saved copy
/// and keeps whatever is currently painted.
pub trait Surface {
    /// Current pixel size, or `None` when uninitialized.
    fn size(&self) -> Option<SurfaceSize>;

    /// Reallocate to `size`. Destroys all content, including any checkpoint.
    fn resize(&mut self, size: SurfaceSize) -> SurfaceResult<()>;

    /// Drop the pixel buffer; the surface becomes uninitialized.
    fn release(&mut self);

    /// Fill the whole surface with an opaque color.
    fn fill(&mut self, color: Rgba8);

    /// Stroke a path.
    fn stroke_path(&mut self, path: &BezPath, pen: &Pen);

    /// Fill a path using the non-zero rule.
    fn fill_path(&mut self, path: &BezPath, color: Rgba8);

    /// Save the committed content.
    fn checkpoint(&mut self);

    /// Restore the content saved by the last `checkpoint`. No-op without one.
    fn rollback(&mut self);

    /// Forget the saved content, keeping the current pixels.
    fn release_checkpoint(&mut self);

    /// Whether paint calls currently have any effect.
    fn is_initialized(&self) -> bool {
        self.size().is_some()
    }
}
