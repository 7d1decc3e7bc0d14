//! Gesture scripts: a recorded host session replayed against a raster surface.

use anyhow::Context;
use chalkboard_core::{
    BoundingBox, InputEvent, PointerEvent, Primitive, SurfaceSize, ToolConfig, Toolbar,
    TouchEvent, Whiteboard,
};
use chalkboard_render::PixmapSurface;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One host-side action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Toolbar state changed.
    Config(ToolConfig),
    Pointer(PointerEvent),
    Touch(TouchEvent),
    /// Container was resized.
    Resize(SurfaceSize),
    /// Clear button pressed.
    Clear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_presenter")]
    pub presenter: bool,
    /// Surface position in client coordinates. Defaults to the origin.
    #[serde(default)]
    pub bounds: Option<BoundingBox>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_presenter() -> bool {
    true
}

/// Result of a replay.
#[derive(Debug)]
pub struct Replay {
    pub surface: PixmapSurface,
    pub commits: Vec<Primitive>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replay every step through a fresh whiteboard.
    pub fn run(&self) -> Replay {
        let size = SurfaceSize::new(self.width, self.height);
        let mut board = Whiteboard::new(PixmapSurface::new(), self.presenter);
        let mut toolbar = Toolbar::new();
        let mut bounds = self.bounds.unwrap_or_else(|| {
            BoundingBox::at_origin(f64::from(size.width), f64::from(size.height))
        });

        board.mount(size);

        for step in &self.steps {
            match step {
                Step::Config(config) => {
                    toolbar.select_tool(config.tool);
                    toolbar.select_color(config.color);
                    toolbar.set_stroke_width(config.stroke_width);
                    toolbar.select_background(config.background);
                    board.sync_toolbar(&mut toolbar);
                }
                Step::Pointer(event) => {
                    let event = InputEvent::from(event.clone());
                    board.handle_event(&event, &bounds, toolbar.config());
                }
                Step::Touch(event) => {
                    let event = InputEvent::from(event.clone());
                    board.handle_event(&event, &bounds, toolbar.config());
                }
                Step::Resize(size) => {
                    bounds.width = f64::from(size.width);
                    bounds.height = f64::from(size.height);
                    board.on_resize(*size);
                }
                Step::Clear => {
                    toolbar.request_clear();
                    board.sync_toolbar(&mut toolbar);
                }
            }
        }

        Replay {
            commits: board.drain_commits(),
            surface: board.into_surface(),
        }
    }
}

impl Replay {
    pub fn write_png(&self, path: &Path) -> anyhow::Result<()> {
        let png = self
            .surface
            .encode_png()
            .context("Failed to encode whiteboard")?;
        fs::write(path, png)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
