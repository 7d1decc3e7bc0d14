//! Chalkboard Core Library
//!
//! Platform-agnostic drawing surface for the classroom whiteboard: tool
//! configuration, input mapping, background guides, the drawing state machine
//! and the surface lifecycle.

pub mod background;
pub mod color;
pub mod config;
pub mod input;
pub mod surface;
pub mod toolbar;
pub mod tools;
pub mod whiteboard;

pub use background::{GRID_SIZE, apply_background, guide_layers};
pub use color::Rgba8;
pub use config::{Background, ConfigError, ShapeKind, ToolConfig, ToolKind};
pub use input::{BoundingBox, CoordinateMapper, Gesture, InputEvent, PointerEvent, TouchEvent};
pub use surface::{Pen, RecordingSurface, Surface, SurfaceError, SurfaceResult, SurfaceSize};
pub use toolbar::{PALETTE, Toolbar};
pub use tools::{DrawState, DrawingEngine, Primitive};
pub use whiteboard::Whiteboard;
