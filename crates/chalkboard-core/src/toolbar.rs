//! Toolbar controller: owns the user's tool selection.

use crate::color::Rgba8;
use crate::config::{Background, ConfigError, ToolConfig, ToolKind, clamp_stroke_width};

/// Preset swatches offered by the color picker.
pub const PALETTE: [Rgba8; 7] = [
    Rgba8::rgb(0x00, 0x00, 0x00),
    Rgba8::rgb(0xF9, 0x73, 0x16),
    Rgba8::rgb(0x9B, 0x87, 0xF5),
    Rgba8::rgb(0x4F, 0x77, 0x2D),
    Rgba8::rgb(0xEF, 0x44, 0x44),
    Rgba8::rgb(0x3B, 0x82, 0xF6),
    Rgba8::rgb(0xF5, 0x9E, 0x0B),
];

/// Holds the current selection and a pending clear command.
#[derive(Debug, Clone, Default)]
pub struct Toolbar {
    config: ToolConfig,
    clear_requested: bool,
}

impl Toolbar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from saved preferences.
    pub fn with_config(config: ToolConfig) -> Self {
        let width = config.stroke_width;
        Self {
            config: config.with_stroke_width(width),
            clear_requested: false,
        }
    }

    /// Snapshot handed to the whiteboard.
    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Select a tool. Returns true if the selection changed.
    pub fn select_tool(&mut self, tool: ToolKind) -> bool {
        replace(&mut self.config.tool, tool)
    }

    pub fn select_color(&mut self, color: Rgba8) -> bool {
        replace(&mut self.config.color, color)
    }

    /// Select a color from a hex string such as `#3B82F6`.
    pub fn select_color_hex(&mut self, hex: &str) -> Result<bool, ConfigError> {
        let color = Rgba8::from_hex(hex)?;
        Ok(self.select_color(color))
    }

    /// Set the stroke width, clamped into the slider's range.
    pub fn set_stroke_width(&mut self, width: u32) -> bool {
        replace(&mut self.config.stroke_width, clamp_stroke_width(width))
    }

    pub fn select_background(&mut self, background: Background) -> bool {
        replace(&mut self.config.background, background)
    }

    /// Ask the whiteboard to wipe the surface on the next sync.
    pub fn request_clear(&mut self) {
        self.clear_requested = true;
    }

    /// Consume the pending clear request.
    pub fn take_clear_request(&mut self) -> bool {
        std::mem::take(&mut self.clear_requested)
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
