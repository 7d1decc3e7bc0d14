//! In-memory surface that records a display list instead of rasterizing.

use super::{Pen, Surface, SurfaceError, SurfaceResult, SurfaceSize};
use crate::color::Rgba8;
use kurbo::BezPath;

/// One recorded paint call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill(Rgba8),
    Stroke { path: BezPath, pen: Pen },
    FillPath { path: BezPath, color: Rgba8 },
}

/// Surface that keeps the ordered paint calls made since the last resize.
///
/// Two recording surfaces with equal display lists would rasterize to the same
/// pixels, which makes this useful for backend-independent tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Option<SurfaceSize>,
    ops: Vec<DrawOp>,
    checkpoint: Option<usize>,
    resize_count: usize,
}

impl RecordingSurface {
    /// Create an uninitialized surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint calls currently making up the visible content.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Stroke calls only.
    pub fn strokes(&self) -> impl Iterator<Item = (&BezPath, &Pen)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Stroke { path, pen } => Some((path, pen)),
            _ => None,
        })
    }

    /// Number of successful resizes.
    pub fn resize_count(&self) -> usize {
        self.resize_count
    }

    pub fn has_checkpoint(&self) -> bool {
        self.checkpoint.is_some()
    }

    fn record(&mut self, op: DrawOp) {
        if self.size.is_some() {
            self.ops.push(op);
        }
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Option<SurfaceSize> {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) -> SurfaceResult<()> {
        self.ops.clear();
        self.checkpoint = None;
        if size.is_empty() {
            self.size = None;
            return Err(SurfaceError::InvalidSize {
                width: size.width,
                height: size.height,
            });
        }
        self.size = Some(size);
        self.resize_count += 1;
        Ok(())
    }

    fn release(&mut self) {
        self.size = None;
        self.ops.clear();
        self.checkpoint = None;
    }

    fn fill(&mut self, color: Rgba8) {
        // A full fill hides everything beneath it.
        if self.size.is_some() && self.checkpoint.is_none() {
            self.ops.clear();
        }
        self.record(DrawOp::Fill(color));
    }

    fn stroke_path(&mut self, path: &BezPath, pen: &Pen) {
        self.record(DrawOp::Stroke {
            path: path.clone(),
            pen: *pen,
        });
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.record(DrawOp::FillPath {
            path: path.clone(),
            color,
        });
    }

    fn checkpoint(&mut self) {
        if self.size.is_some() {
            self.checkpoint = Some(self.ops.len());
        }
    }

    fn rollback(&mut self) {
        if let Some(len) = self.checkpoint {
            self.ops.truncate(len);
        }
    }

    fn release_checkpoint(&mut self) {
        self.checkpoint = None;
    }
}
