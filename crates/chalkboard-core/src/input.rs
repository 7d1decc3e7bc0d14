//! Raw pointer/touch events and their mapping to surface-local coordinates.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Client-space rectangle occupied by the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A box anchored at the client origin, i.e. client == local coordinates.
    pub fn at_origin(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }
}

/// Mouse/pen event, positions in client coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    /// Pointer left the surface.
    Leave,
}

/// Touch event carrying the active touch points in client coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TouchEvent {
    Start {
        #[serde(default)]
        touches: Vec<Point>,
    },
    Move {
        #[serde(default)]
        touches: Vec<Point>,
    },
    End {
        #[serde(default)]
        touches: Vec<Point>,
    },
    Cancel,
}

/// Either pointer family, as delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    Pointer(PointerEvent),
    Touch(TouchEvent),
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        InputEvent::Pointer(event)
    }
}

impl From<TouchEvent> for InputEvent {
    fn from(event: TouchEvent) -> Self {
        InputEvent::Touch(event)
    }
}

/// Device-agnostic gesture step in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Start(Point),
    Move(Point),
    End,
}

/// Translate a client position into surface-local coordinates.
pub fn to_local(client: Point, bounds: &BoundingBox) -> Point {
    Point::new(client.x - bounds.left, client.y - bounds.top)
}

/// Maps raw input events onto gestures.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateMapper;

impl CoordinateMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map an event to a gesture step.
    ///
    /// Touch start/move use the first active touch; with no touches the event
    /// is malformed and yields `None`. Ending never needs a position.
    pub fn map(&self, event: &InputEvent, bounds: &BoundingBox) -> Option<Gesture> {
        match event {
            InputEvent::Pointer(pointer) => Some(match pointer {
                PointerEvent::Down { position } => Gesture::Start(to_local(*position, bounds)),
                PointerEvent::Move { position } => Gesture::Move(to_local(*position, bounds)),
                PointerEvent::Up { .. } | PointerEvent::Leave => Gesture::End,
            }),
            InputEvent::Touch(touch) => match touch {
                TouchEvent::Start { touches } => touches
                    .first()
                    .map(|p| Gesture::Start(to_local(*p, bounds))),
                TouchEvent::Move { touches } => touches
                    .first()
                    .map(|p| Gesture::Move(to_local(*p, bounds))),
                TouchEvent::End { .. } | TouchEvent::Cancel => Some(Gesture::End),
            },
        }
    }
}
