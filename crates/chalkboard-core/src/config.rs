//! Tool configuration supplied by the toolbar.

use crate::color::Rgba8;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Thinnest stroke the toolbar offers.
pub const MIN_STROKE_WIDTH: u32 = 1;
/// Thickest stroke the toolbar offers.
pub const MAX_STROKE_WIDTH: u32 = 20;
/// Stroke width applied before any user selection.
pub const DEFAULT_STROKE_WIDTH: u32 = 2;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),
    #[error("Invalid tool configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pencil,
    Eraser,
    Line,
    Rect,
    Circle,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Pencil,
        ToolKind::Eraser,
        ToolKind::Line,
        ToolKind::Rect,
        ToolKind::Circle,
    ];

    /// The shape this tool previews and commits, if it is a shape tool.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Rect => Some(ShapeKind::Rect),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Pencil | ToolKind::Eraser => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pencil => "Pencil",
            ToolKind::Eraser => "Eraser",
            ToolKind::Line => "Line",
            ToolKind::Rect => "Rectangle",
            ToolKind::Circle => "Circle",
        }
    }
}

/// Shapes drawn with a preview between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    Rect,
    Circle,
}

/// Guide pattern painted beneath the drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    #[default]
    Blank,
    Grid,
    Lines,
    Dots,
    Graph,
}

impl Background {
    pub const ALL: [Background; 5] = [
        Background::Blank,
        Background::Grid,
        Background::Lines,
        Background::Dots,
        Background::Graph,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Background::Blank => "Blank",
            Background::Grid => "Grid",
            Background::Lines => "Lines",
            Background::Dots => "Dots",
            Background::Graph => "Graph",
        }
    }
}

/// Snapshot of the user's toolbar selection.
///
/// The drawing engine only ever reads a copy of this; the toolbar owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub tool: ToolKind,
    pub color: Rgba8,
    #[serde(deserialize_with = "deserialize_stroke_width")]
    pub stroke_width: u32,
    pub background: Background,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            tool: ToolKind::default(),
            color: Rgba8::BLACK,
            stroke_width: DEFAULT_STROKE_WIDTH,
            background: Background::default(),
        }
    }
}

impl ToolConfig {
    /// Load toolbar preferences from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_tool(mut self, tool: ToolKind) -> Self {
        self.tool = tool;
        self
    }

    pub fn with_color(mut self, color: Rgba8) -> Self {
        self.color = color;
        self
    }

    pub fn with_stroke_width(mut self, width: u32) -> Self {
        self.stroke_width = clamp_stroke_width(width);
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }
}

/// Clamp a requested width into the range the toolbar slider offers.
pub fn clamp_stroke_width(width: u32) -> u32 {
    width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
}

fn deserialize_stroke_width<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(clamp_stroke_width(u32::deserialize(deserializer)?))
}
