//! Drawing engine: the tool state machine.

mod primitive;

pub use primitive::{Primitive, PrimitiveId};

use crate::color::Rgba8;
use crate::config::{ShapeKind, ToolConfig, ToolKind};
use crate::surface::{Pen, Surface};
use kurbo::Point;
use primitive::segment_path;
use uuid::Uuid;

/// Freehand tool variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeMode {
    Pencil,
    /// Paints with the surface's base white.
    Eraser,
}

/// State of the current gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DrawState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pencil or eraser held down.
    Stroking {
        mode: StrokeMode,
        pen: Pen,
        last_point: Point,
        /// Every point of the stroke so far, for the commit hook.
        points: Vec<Point>,
    },
    /// Shape tool pressed, pointer not yet moved.
    ShapePending {
        kind: ShapeKind,
        pen: Pen,
        start: Point,
    },
    /// Shape tool dragged at least once; a preview is on the surface.
    ShapePreviewing {
        kind: ShapeKind,
        pen: Pen,
        start: Point,
        current: Point,
    },
}

impl DrawState {
    pub fn name(&self) -> &'static str {
        match self {
            DrawState::Idle => "Idle",
            DrawState::Stroking { .. } => "Stroking",
            DrawState::ShapePending { .. } => "ShapePending",
            DrawState::ShapePreviewing { .. } => "ShapePreviewing",
        }
    }
}

/// Turns gestures into raster mutations.
///
/// Pen color and width are snapshotted when a gesture begins and held until
/// it ends, for every tool.
#[derive(Debug, Clone, Default)]
pub struct DrawingEngine {
    state: DrawState,
    /// Primitives committed since the last drain.
    outgoing: Vec<Primitive>,
}

impl DrawingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Check if a gesture is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, DrawState::Idle)
    }

    /// Begin a gesture at `point` with the given configuration.
    ///
    /// Returns false when a gesture is already active; re-entrant starts are
    /// ignored until the current gesture ends.
    pub fn begin(&mut self, point: Point, config: &ToolConfig) -> bool {
        if self.is_active() {
            log::debug!("Ignoring gesture start while {}", self.state.name());
            return false;
        }

        let width = f64::from(config.stroke_width);
        self.state = match config.tool.shape_kind() {
            Some(kind) => DrawState::ShapePending {
                kind,
                pen: Pen::new(config.color, width),
                start: point,
            },
            None => {
                let (mode, color) = if config.tool == ToolKind::Eraser {
                    (StrokeMode::Eraser, Rgba8::WHITE)
                } else {
                    (StrokeMode::Pencil, config.color)
                };
                DrawState::Stroking {
                    mode,
                    pen: Pen::new(color, width),
                    last_point: point,
                    points: vec![point],
                }
            }
        };
        log::debug!(
            "{} gesture started at ({:.1}, {:.1})",
            config.tool.name(),
            point.x,
            point.y
        );
        true
    }

    /// Advance the active gesture to `point`.
    pub fn update<S: Surface + ?Sized>(&mut self, surface: &mut S, point: Point) {
        match &mut self.state {
            DrawState::Idle => {}
            DrawState::Stroking {
                pen,
                last_point,
                points,
                ..
            } => {
                surface.stroke_path(&segment_path(*last_point, point), pen);
                *last_point = point;
                points.push(point);
            }
            DrawState::ShapePending { kind, pen, start } => {
                let (kind, pen, start) = (*kind, *pen, *start);
                surface.checkpoint();
                Self::paint_preview(surface, kind, &pen, start, point);
                self.state = DrawState::ShapePreviewing {
                    kind,
                    pen,
                    start,
                    current: point,
                };
            }
            DrawState::ShapePreviewing {
                kind,
                pen,
                start,
                current,
            } => {
                *current = point;
                Self::paint_preview(surface, *kind, pen, *start, point);
            }
        }
    }

    fn paint_preview<S: Surface + ?Sized>(
        surface: &mut S,
        kind: ShapeKind,
        pen: &Pen,
        start: Point,
        end: Point,
    ) {
        surface.rollback();
        if !kind.is_degenerate(start, end) {
            surface.stroke_path(&kind.path(start, end), pen);
        }
    }

    /// End the active gesture, committing what it drew.
    ///
    /// The last preview stays on the surface as the committed shape.
    pub fn end<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Option<Primitive> {
        let primitive = match std::mem::take(&mut self.state) {
            DrawState::Idle => return None,
            DrawState::Stroking {
                mode, pen, points, ..
            } => Primitive::Stroke {
                id: Uuid::new_v4(),
                erase: mode == StrokeMode::Eraser,
                color: pen.color,
                width: pen_width(&pen),
                points,
            },
            DrawState::ShapePending { kind, pen, start } => Primitive::Shape {
                id: Uuid::new_v4(),
                kind,
                color: pen.color,
                width: pen_width(&pen),
                start,
                end: start,
            },
            DrawState::ShapePreviewing {
                kind,
                pen,
                start,
                current,
            } => {
                surface.release_checkpoint();
                Primitive::Shape {
                    id: Uuid::new_v4(),
                    kind,
                    color: pen.color,
                    width: pen_width(&pen),
                    start,
                    end: current,
                }
            }
        };

        log::debug!("Committed {} ({})", describe(&primitive), primitive.id());
        self.outgoing.push(primitive.clone());
        Some(primitive)
    }

    /// Abandon the active gesture without committing.
    ///
    /// An in-progress shape preview is removed; freehand segments already
    /// painted stay.
    pub fn cancel<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let previous = std::mem::take(&mut self.state);
        if let DrawState::ShapePreviewing { .. } = previous {
            surface.rollback();
            surface.release_checkpoint();
        }
        if !matches!(previous, DrawState::Idle) {
            log::debug!("Cancelled {} gesture", previous.name());
        }
    }

    /// Primitives committed since the last drain.
    pub fn pending_commits(&self) -> &[Primitive] {
        &self.outgoing
    }

    /// Take the committed primitives, e.g. to hand to a transport layer.
    pub fn drain_commits(&mut self) -> Vec<Primitive> {
        std::mem::take(&mut self.outgoing)
    }
}

fn pen_width(pen: &Pen) -> u32 {
    pen.width.round() as u32
}

fn describe(primitive: &Primitive) -> String {
    match primitive {
        Primitive::Stroke { erase, points, .. } => format!(
            "{} stroke with {} points",
            if *erase { "eraser" } else { "pencil" },
            points.len()
        ),
        Primitive::Shape { kind, .. } => format!("{kind:?} shape"),
    }
}
