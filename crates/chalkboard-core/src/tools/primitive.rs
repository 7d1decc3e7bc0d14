//! Committed drawing primitives and shape geometry.

use crate::color::Rgba8;
use crate::config::{ConfigError, ShapeKind};
use crate::surface::{Pen, Surface};
use kurbo::{BezPath, Circle, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flattening tolerance for curved outlines, in pixels.
const PATH_TOLERANCE: f64 = 0.05;

/// Unique identifier for committed primitives.
pub type PrimitiveId = Uuid;

impl ShapeKind {
    /// Outline from the gesture's start point to `end`.
    ///
    /// Rectangles are traced from `start` without normalizing, so a drag up
    /// and to the left yields negative extents.
    pub fn path(self, start: Point, end: Point) -> BezPath {
        let mut path = BezPath::new();
        match self {
            ShapeKind::Line => {
                path.move_to(start);
                path.line_to(end);
            }
            ShapeKind::Rect => {
                path.move_to(start);
                path.line_to(Point::new(end.x, start.y));
                path.line_to(end);
                path.line_to(Point::new(start.x, end.y));
                path.close_path();
            }
            ShapeKind::Circle => {
                path = Circle::new(start, start.distance(end)).to_path(PATH_TOLERANCE);
            }
        }
        path
    }

    /// Region covered by the shape's geometry (ignoring stroke width).
    pub fn bounds(self, start: Point, end: Point) -> Rect {
        match self {
            ShapeKind::Line | ShapeKind::Rect => Rect::from_points(start, end),
            ShapeKind::Circle => Circle::new(start, start.distance(end)).bounding_box(),
        }
    }

    /// Whether the shape has zero extent and therefore paints nothing.
    pub fn is_degenerate(self, start: Point, end: Point) -> bool {
        start == end
    }
}

/// A finished piece of drawing, as handed to the commit hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    /// Freehand pencil or eraser stroke.
    Stroke {
        id: PrimitiveId,
        erase: bool,
        color: Rgba8,
        width: u32,
        points: Vec<Point>,
    },
    /// Line, rectangle or circle.
    Shape {
        id: PrimitiveId,
        kind: ShapeKind,
        color: Rgba8,
        width: u32,
        start: Point,
        end: Point,
    },
}

impl Primitive {
    pub fn id(&self) -> PrimitiveId {
        match self {
            Primitive::Stroke { id, .. } | Primitive::Shape { id, .. } => *id,
        }
    }

    pub fn pen(&self) -> Pen {
        match self {
            Primitive::Stroke { color, width, .. } | Primitive::Shape { color, width, .. } => {
                Pen::new(*color, f64::from(*width))
            }
        }
    }

    /// Geometric extent, or `None` for a stroke with no points.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Primitive::Stroke { points, .. } => {
                let (first, rest) = points.split_first()?;
                Some(
                    rest.iter()
                        .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p)),
                )
            }
            Primitive::Shape {
                kind, start, end, ..
            } => Some(kind.bounds(*start, *end)),
        }
    }

    /// A stroke that never moved, or a zero-extent shape.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Primitive::Stroke { points, .. } => points.len() < 2,
            Primitive::Shape {
                kind, start, end, ..
            } => kind.is_degenerate(*start, *end),
        }
    }

    /// Paint onto `surface` exactly as the live gesture did.
    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S) {
        let pen = self.pen();
        match self {
            Primitive::Stroke { points, .. } => {
                for segment in points.windows(2) {
                    surface.stroke_path(&segment_path(segment[0], segment[1]), &pen);
                }
            }
            Primitive::Shape {
                kind, start, end, ..
            } => {
                if !kind.is_degenerate(*start, *end) {
                    surface.stroke_path(&kind.path(*start, *end), &pen);
                }
            }
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Straight path between two consecutive stroke points.
pub(crate) fn segment_path(from: Point, to: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(from);
    path.line_to(to);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceSize};
    use kurbo::PathEl;

    fn shape(kind: ShapeKind, start: Point, end: Point) -> Primitive {
        Primitive::Shape {
            id: Uuid::new_v4(),
            kind,
            color: Rgba8::BLACK,
            width: 2,
            start,
            end,
        }
    }

    #[test]
    fn test_rect_path_keeps_negative_extent() {
        let path = ShapeKind::Rect.path(Point::new(50.0, 30.0), Point::new(10.0, 10.0));
        let elements: Vec<PathEl> = path.elements().to_vec();
        assert_eq!(
            elements,
            vec![
                PathEl::MoveTo(Point::new(50.0, 30.0)),
                PathEl::LineTo(Point::new(10.0, 30.0)),
                PathEl::LineTo(Point::new(10.0, 10.0)),
                PathEl::LineTo(Point::new(50.0, 10.0)),
                PathEl::ClosePath,
            ]
        );
    }

    #[test]
    fn test_rect_region_is_direction_independent() {
        let a = ShapeKind::Rect.bounds(Point::new(10.0, 10.0), Point::new(50.0, 30.0));
        let b = ShapeKind::Rect.bounds(Point::new(50.0, 30.0), Point::new(10.0, 10.0));
        assert_eq!(a, b);
        assert_eq!(a, Rect::new(10.0, 10.0, 50.0, 30.0));
    }

    #[test]
    fn test_circle_radius_is_distance() {
        let bounds = ShapeKind::Circle.bounds(Point::new(100.0, 100.0), Point::new(103.0, 104.0));
        assert!((bounds.width() - 10.0).abs() < 1e-9);
        assert!((bounds.center().x - 100.0).abs() < 1e-9);
        assert!((bounds.center().y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_line_path() {
        let path = ShapeKind::Line.path(Point::new(1.0, 2.0), Point::new(3.0, 4.0));
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(1.0, 2.0)),
                PathEl::LineTo(Point::new(3.0, 4.0))
            ]
        );
    }

    #[test]
    fn test_degenerate_shapes_paint_nothing() {
        let mut surface = RecordingSurface::new();
        surface.resize(SurfaceSize::new(50, 50)).unwrap();
        let p = Point::new(20.0, 20.0);
        for kind in [ShapeKind::Line, ShapeKind::Rect, ShapeKind::Circle] {
            let primitive = shape(kind, p, p);
            assert!(primitive.is_degenerate());
            primitive.paint(&mut surface);
        }
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_stroke_paints_one_segment_per_move() {
        let mut surface = RecordingSurface::new();
        surface.resize(SurfaceSize::new(50, 50)).unwrap();
        let stroke = Primitive::Stroke {
            id: Uuid::new_v4(),
            erase: false,
            color: Rgba8::BLACK,
            width: 4,
            points: vec![
                Point::new(1.0, 1.0),
                Point::new(5.0, 5.0),
                Point::new(9.0, 1.0),
            ],
        };
        stroke.paint(&mut surface);
        assert_eq!(surface.strokes().count(), 2);
        assert_eq!(stroke.bounds(), Some(Rect::new(1.0, 1.0, 9.0, 5.0)));
    }

    #[test]
    fn test_json_carries_tool_points_color_and_width() {
        let primitive = shape(ShapeKind::Circle, Point::new(1.0, 2.0), Point::new(4.0, 6.0));
        let json = primitive.to_json().unwrap();
        assert!(json.contains("\"type\":\"shape\""));
        assert!(json.contains("\"kind\":\"circle\""));
        assert!(json.contains("\"color\":\"#000000\""));
        assert_eq!(Primitive::from_json(&json).unwrap(), primitive);
    }
}
