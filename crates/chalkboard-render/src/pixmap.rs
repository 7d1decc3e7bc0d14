//! tiny-skia implementation of the drawing surface.

use chalkboard_core::surface::{LineCap, LineJoin};
use chalkboard_core::{Pen, Rgba8, Surface, SurfaceError, SurfaceResult, SurfaceSize};
use kurbo::{BezPath, PathEl};
use thiserror::Error;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Surface is not initialized")]
    Uninitialized,
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// CPU raster surface.
///
/// A second pixmap holds the committed content while a shape preview is on
/// screen.
#[derive(Debug, Clone, Default)]
pub struct PixmapSurface {
    pixmap: Option<Pixmap>,
    committed: Option<Pixmap>,
}

impl PixmapSurface {
    /// Create an uninitialized surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface already sized to `size`.
    pub fn with_size(size: SurfaceSize) -> SurfaceResult<Self> {
        let mut surface = Self::new();
        surface.resize(size)?;
        Ok(surface)
    }

    /// Premultiplied RGBA bytes, row-major.
    pub fn data(&self) -> Option<&[u8]> {
        self.pixmap.as_ref().map(Pixmap::data)
    }

    /// Straight-alpha color of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        let color = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some(Rgba8::new(color.red(), color.green(), color.blue(), color.alpha()))
    }

    /// Straight-alpha RGBA bytes, row-major.
    pub fn to_rgba8(&self) -> Option<Vec<u8>> {
        let pixmap = self.pixmap.as_ref()?;
        let mut bytes = Vec::with_capacity(pixmap.data().len());
        for pixel in pixmap.pixels() {
            let c = pixel.demultiply();
            bytes.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Some(bytes)
    }

    /// Encode the current content as PNG.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let size = self.size().ok_or(RenderError::Uninitialized)?;
        let rgba = self.to_rgba8().ok_or(RenderError::Uninitialized)?;

        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, size.width, size.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder
                .write_header()
                .map_err(|e| RenderError::Encode(e.to_string()))?;
            writer
                .write_image_data(&rgba)
                .map_err(|e| RenderError::Encode(e.to_string()))?;
            writer
                .finish()
                .map_err(|e| RenderError::Encode(e.to_string()))?;
        }
        Ok(png_data)
    }
}

impl Surface for PixmapSurface {
    fn size(&self) -> Option<SurfaceSize> {
        self.pixmap
            .as_ref()
            .map(|p| SurfaceSize::new(p.width(), p.height()))
    }

    fn resize(&mut self, size: SurfaceSize) -> SurfaceResult<()> {
        self.committed = None;
        self.pixmap = None;
        if size.is_empty() {
            return Err(SurfaceError::InvalidSize {
                width: size.width,
                height: size.height,
            });
        }
        self.pixmap = Pixmap::new(size.width, size.height);
        if self.pixmap.is_none() {
            return Err(SurfaceError::Allocation {
                width: size.width,
                height: size.height,
            });
        }
        log::trace!("Allocated {}x{} pixmap", size.width, size.height);
        Ok(())
    }

    fn release(&mut self) {
        self.pixmap = None;
        self.committed = None;
    }

    fn fill(&mut self, color: Rgba8) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(Color::from_rgba8(color.r, color.g, color.b, color.a));
        }
    }

    fn stroke_path(&mut self, path: &BezPath, pen: &Pen) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let Some(path) = to_skia_path(path) else {
            return;
        };
        let stroke = Stroke {
            width: pen.width as f32,
            line_cap: match pen.cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match pen.join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            ..Stroke::default()
        };
        pixmap.stroke_path(
            &path,
            &paint(pen.color),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let Some(path) = to_skia_path(path) else {
            return;
        };
        pixmap.fill_path(
            &path,
            &paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    fn checkpoint(&mut self) {
        self.committed = self.pixmap.clone();
    }

    fn rollback(&mut self) {
        if let (Some(pixmap), Some(committed)) = (self.pixmap.as_mut(), self.committed.as_ref()) {
            pixmap.data_mut().copy_from_slice(committed.data());
        }
    }

    fn release_checkpoint(&mut self) {
        self.committed = None;
    }
}

fn paint(color: Rgba8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// Convert a kurbo path. Returns `None` for paths tiny-skia cannot represent,
/// such as a lone move-to.
fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();

    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => builder.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => builder.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chalkboard_core::{
        Background, BoundingBox, PointerEvent, ToolConfig, ToolKind, TouchEvent, Whiteboard,
        apply_background,
    };
    use kurbo::Point;
    use std::ops::RangeInclusive;

    const SIZE: SurfaceSize = SurfaceSize {
        width: 200,
        height: 120,
    };

    fn base(background: Background, size: SurfaceSize) -> PixmapSurface {
        let mut surface = PixmapSurface::with_size(size).unwrap();
        apply_background(&mut surface, background);
        surface
    }

    fn board(presenter: bool) -> Whiteboard<PixmapSurface> {
        let mut board = Whiteboard::new(PixmapSurface::new(), presenter);
        board.mount(SIZE);
        board
    }

    fn is_white(surface: &PixmapSurface, x: u32, y: u32) -> bool {
        surface.pixel(x, y) == Some(Rgba8::WHITE)
    }

    fn any_inked(
        surface: &PixmapSurface,
        xs: RangeInclusive<u32>,
        ys: RangeInclusive<u32>,
    ) -> bool {
        xs.flat_map(|x| ys.clone().map(move |y| (x, y)))
            .any(|(x, y)| !is_white(surface, x, y))
    }

    fn drag(board: &mut Whiteboard<PixmapSurface>, config: &ToolConfig, points: &[(f64, f64)]) {
        let (first, rest) = points.split_first().unwrap();
        board.pointer_down(Point::new(first.0, first.1), config);
        for p in rest {
            board.pointer_move(Point::new(p.0, p.1));
        }
        board.pointer_up();
    }

    #[test]
    fn test_backgrounds_are_deterministic() {
        for pattern in Background::ALL {
            assert_eq!(base(pattern, SIZE).data(), base(pattern, SIZE).data());
        }
    }

    #[test]
    fn test_blank_is_all_white() {
        let surface = base(Background::Blank, SIZE);
        assert!(surface.to_rgba8().unwrap().iter().all(|b| *b == 255));
    }

    #[test]
    fn test_grid_lines_fall_on_multiples_of_20() {
        let surface = base(Background::Grid, SIZE);
        assert!(is_white(&surface, 10, 10));
        assert!(is_white(&surface, 30, 50));
        assert!(any_inked(&surface, 19..=20, 10..=10));
        assert!(any_inked(&surface, 10..=10, 39..=40));
    }

    #[test]
    fn test_ruled_lines_start_at_30() {
        let surface = base(Background::Lines, SIZE);
        assert!(is_white(&surface, 50, 15));
        assert!(is_white(&surface, 50, 0));
        assert!(any_inked(&surface, 50..=50, 29..=30));
        assert!(any_inked(&surface, 50..=50, 59..=60));
        // no vertical guides
        assert!(is_white(&surface, 20, 45));
    }

    #[test]
    fn test_dots_lattice() {
        let surface = base(Background::Dots, SIZE);
        assert!(any_inked(&surface, 19..=20, 19..=20));
        assert!(any_inked(&surface, 39..=40, 59..=60));
        assert!(is_white(&surface, 30, 30));
        assert!(is_white(&surface, 0, 0));
    }

    #[test]
    fn test_graph_major_lines_are_darker() {
        let surface = base(Background::Graph, SIZE);
        let darkest = |x0: u32, x1: u32| {
            (x0..=x1)
                .filter_map(|x| surface.pixel(x, 50))
                .map(|c| c.r)
                .min()
                .unwrap()
        };
        assert!(darkest(99, 100) < darkest(39, 40));
        assert!(darkest(39, 40) < 255);
    }

    #[test]
    fn test_non_presenter_changes_no_pixels() {
        let mut board = board(false);
        let before = board.surface().data().unwrap().to_vec();
        for tool in ToolKind::ALL {
            let config = ToolConfig::default().with_tool(tool).with_stroke_width(10);
            drag(&mut board, &config, &[(10.0, 10.0), (100.0, 60.0), (150.0, 100.0)]);
        }
        let bounds = BoundingBox::at_origin(200.0, 120.0);
        board.handle_event(
            &TouchEvent::Start { touches: vec![Point::new(5.0, 5.0)] }.into(),
            &bounds,
            &ToolConfig::default(),
        );
        board.handle_event(
            &TouchEvent::Move { touches: vec![Point::new(60.0, 60.0)] }.into(),
            &bounds,
            &ToolConfig::default(),
        );
        board.clear();
        assert_eq!(board.surface().data().unwrap(), before.as_slice());
    }

    #[test]
    fn test_rect_region_independent_of_drag_direction() {
        let config = ToolConfig::default().with_tool(ToolKind::Rect);
        for points in [[(10.0, 10.0), (50.0, 30.0)], [(50.0, 30.0), (10.0, 10.0)]] {
            let mut board = board(true);
            drag(&mut board, &config, &points);
            let surface = board.surface();
            for (x, y) in [(30, 10), (30, 30), (10, 20), (50, 20)] {
                assert!(!is_white(surface, x, y), "edge pixel ({x}, {y}) not painted");
            }
            for (x, y) in [(30, 20), (5, 5), (60, 40), (30, 35)] {
                assert!(is_white(surface, x, y), "pixel ({x}, {y}) painted");
            }
        }
    }

    #[test]
    fn test_circle_tap_paints_nothing() {
        let mut board = board(true);
        let config = ToolConfig::default()
            .with_tool(ToolKind::Circle)
            .with_stroke_width(20);
        drag(&mut board, &config, &[(60.0, 60.0)]);
        assert_eq!(board.surface().data(), base(Background::Blank, SIZE).data());
        assert_eq!(board.drain_commits().len(), 1);
    }

    #[test]
    fn test_resize_mid_stroke_leaves_only_background() {
        let mut board = board(true);
        board.apply_config(&ToolConfig::default().with_background(Background::Grid));
        board.pointer_down(Point::new(10.0, 10.0), &ToolConfig::default());
        board.pointer_move(Point::new(100.0, 100.0));

        let bigger = SurfaceSize::new(240, 160);
        board.on_resize(bigger);
        board.pointer_move(Point::new(150.0, 20.0));
        board.pointer_move(Point::new(10.0, 150.0));
        board.pointer_up();

        assert_eq!(board.surface().data(), base(Background::Grid, bigger).data());
    }

    #[test]
    fn test_clear_matches_fresh_mount() {
        let dots = ToolConfig::default().with_background(Background::Dots);
        let mut drawn = board(true);
        drawn.apply_config(&dots);
        drag(&mut drawn, &dots, &[(0.0, 0.0), (80.0, 80.0), (190.0, 10.0)]);
        let circle = dots.clone().with_tool(ToolKind::Circle);
        drag(&mut drawn, &circle, &[(100.0, 60.0), (130.0, 60.0)]);
        drawn.clear();

        let mut fresh =
            Whiteboard::new(PixmapSurface::new(), true).with_background(Background::Dots);
        fresh.mount(SIZE);
        assert_eq!(drawn.surface().data(), fresh.surface().data());
    }

    #[test]
    fn test_shape_preview_keeps_committed_strokes() {
        let mut board = board(true);
        let pencil = ToolConfig::default().with_stroke_width(4);
        drag(&mut board, &pencil, &[(0.0, 100.0), (199.0, 100.0)]);
        assert_eq!(board.surface().pixel(50, 100), Some(Rgba8::BLACK));

        let rect = ToolConfig::default().with_tool(ToolKind::Rect).with_stroke_width(2);
        drag(&mut board, &rect, &[(20.0, 20.0), (150.0, 80.0), (60.0, 50.0)]);

        let surface = board.surface();
        assert_eq!(surface.pixel(50, 100), Some(Rgba8::BLACK));
        // the intermediate preview edge at x = 150 is gone
        assert!(is_white(surface, 150, 40));
        // the committed rectangle edge at x = 60
        assert!(!is_white(surface, 60, 35));
    }

    #[test]
    fn test_eraser_paints_base_white() {
        let mut board = board(true);
        let red = ToolConfig::default()
            .with_color(Rgba8::rgb(0xEF, 0x44, 0x44))
            .with_stroke_width(4);
        drag(&mut board, &red, &[(20.0, 60.0), (180.0, 60.0)]);
        assert_eq!(board.surface().pixel(100, 60), Some(Rgba8::rgb(0xEF, 0x44, 0x44)));

        let eraser = ToolConfig::default()
            .with_tool(ToolKind::Eraser)
            .with_stroke_width(12);
        drag(&mut board, &eraser, &[(60.0, 60.0), (140.0, 60.0)]);
        assert!(is_white(board.surface(), 100, 60));
        assert!(!is_white(board.surface(), 30, 60));
    }

    #[test]
    fn test_mouse_leave_ends_stroke() {
        let mut board = board(true);
        let bounds = BoundingBox::new(10.0, 10.0, 200.0, 120.0);
        let config = ToolConfig::default().with_stroke_width(6);
        let down = PointerEvent::Down {
            position: Point::new(20.0, 20.0),
        };
        let across = PointerEvent::Move {
            position: Point::new(60.0, 20.0),
        };
        board.handle_event(&down.into(), &bounds, &config);
        board.handle_event(&across.into(), &bounds, &config);
        board.handle_event(&PointerEvent::Leave.into(), &bounds, &config);
        let after_leave = board.surface().data().unwrap().to_vec();

        let after = PointerEvent::Move {
            position: Point::new(60.0, 100.0),
        };
        board.handle_event(&after.into(), &bounds, &config);
        assert_eq!(board.surface().data().unwrap(), after_leave.as_slice());
        assert_eq!(board.surface().pixel(30, 10), Some(Rgba8::BLACK));
    }

    #[test]
    fn test_checkpoint_rollback() {
        let mut surface = base(Background::Blank, SIZE);
        let before = surface.data().unwrap().to_vec();
        surface.checkpoint();
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((100.0, 100.0));
        surface.stroke_path(&path, &Pen::new(Rgba8::BLACK, 5.0));
        assert_ne!(surface.data().unwrap(), before.as_slice());
        surface.rollback();
        assert_eq!(surface.data().unwrap(), before.as_slice());
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let mut surface = PixmapSurface::new();
        assert_eq!(
            surface.resize(SurfaceSize::new(0, 0)),
            Err(SurfaceError::InvalidSize { width: 0, height: 0 })
        );
        assert!(surface.data().is_none());
        surface.fill(Rgba8::BLACK);
        assert!(surface.pixel(0, 0).is_none());
    }

    #[test]
    fn test_encode_png() {
        let png = base(Background::Grid, SIZE).encode_png().unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        assert!(matches!(PixmapSurface::new().encode_png(), Err(RenderError::Uninitialized)));
    }
}
