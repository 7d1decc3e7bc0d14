//! Surface lifecycle: sizing, background repaint, clear, and input gating.

use crate::background::apply_background;
use crate::config::{Background, ToolConfig};
use crate::input::{BoundingBox, CoordinateMapper, Gesture, InputEvent};
use crate::surface::{Surface, SurfaceSize};
use crate::toolbar::Toolbar;
use crate::tools::{DrawState, DrawingEngine, Primitive};
use kurbo::Point;

/// A drawing surface bound to its container.
///
/// The whiteboard owns the surface exclusively. Only the presenter's input
/// mutates it; for everyone else every drawing call is a silent no-op.
#[derive(Debug)]
pub struct Whiteboard<S: Surface> {
    surface: S,
    engine: DrawingEngine,
    mapper: CoordinateMapper,
    presenter: bool,
    /// Last container size observed while mounted.
    container: Option<SurfaceSize>,
    background: Background,
    /// Background changed mid-gesture; repaint once the gesture ends.
    background_stale: bool,
}

impl<S: Surface> Whiteboard<S> {
    /// Create an unmounted whiteboard.
    pub fn new(surface: S, presenter: bool) -> Self {
        Self {
            surface,
            engine: DrawingEngine::new(),
            mapper: CoordinateMapper::new(),
            presenter,
            container: None,
            background: Background::default(),
            background_stale: false,
        }
    }

    /// Use `background` from the first paint on.
    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    /// Bind to a container of `size` and paint the base background.
    pub fn mount(&mut self, size: SurfaceSize) {
        log::debug!("Mounting whiteboard at {}x{}", size.width, size.height);
        self.container = Some(size);
        self.rebuild(size);
    }

    /// Stop observing the container and drop the pixel buffer.
    pub fn unmount(&mut self) {
        if self.container.take().is_none() {
            return;
        }
        self.engine.cancel(&mut self.surface);
        self.surface.release();
        self.background_stale = false;
        log::debug!("Whiteboard unmounted");
    }

    /// The container's measured size changed.
    ///
    /// Resizing wipes all drawn content and terminates any active gesture.
    pub fn on_resize(&mut self, size: SurfaceSize) {
        match self.container {
            None => log::trace!("Ignoring resize on unmounted whiteboard"),
            Some(current) if current == size => {}
            Some(_) => {
                log::debug!("Container resized to {}x{}", size.width, size.height);
                self.container = Some(size);
                self.rebuild(size);
            }
        }
    }

    fn rebuild(&mut self, size: SurfaceSize) {
        self.engine.cancel(&mut self.surface);
        self.background_stale = false;
        match self.surface.resize(size) {
            Ok(()) => apply_background(&mut self.surface, self.background),
            Err(err) => log::warn!("Surface left uninitialized: {err}"),
        }
    }

    fn repaint(&mut self) {
        self.background_stale = false;
        apply_background(&mut self.surface, self.background);
    }

    /// Whether drawing calls have any effect right now.
    pub fn can_draw(&self) -> bool {
        self.presenter && self.container.is_some() && self.surface.is_initialized()
    }

    /// Wipe all drawing and reapply the background. Presenter only.
    pub fn clear(&mut self) {
        if !self.can_draw() {
            log::trace!("Ignoring clear: whiteboard is read-only");
            return;
        }
        self.engine.cancel(&mut self.surface);
        self.repaint();
        log::debug!("Whiteboard cleared");
    }

    /// Grant or revoke drawing.
    ///
    /// Revoking mid-gesture commits a freehand stroke as far as it got, drops
    /// a shape preview, and paints any background change the gesture deferred.
    pub fn set_presenter(&mut self, presenter: bool) {
        if !presenter && self.engine.is_active() {
            if matches!(self.engine.state(), DrawState::Stroking { .. }) {
                self.engine.end(&mut self.surface);
            } else {
                self.engine.cancel(&mut self.surface);
            }
            if self.background_stale {
                self.repaint();
            }
        }
        self.presenter = presenter;
    }

    /// Take the toolbar's latest configuration.
    ///
    /// A background change repaints the whole surface immediately when idle,
    /// or when the current gesture ends.
    pub fn apply_config(&mut self, config: &ToolConfig) {
        if !self.presenter || config.background == self.background {
            return;
        }
        log::debug!("Background changed to {}", config.background.name());
        self.background = config.background;
        if self.engine.is_active() {
            self.background_stale = true;
        } else {
            self.repaint();
        }
    }

    /// Apply the toolbar's configuration and run its pending clear, if any.
    pub fn sync_toolbar(&mut self, toolbar: &mut Toolbar) {
        self.apply_config(toolbar.config());
        if toolbar.take_clear_request() {
            self.clear();
        }
    }

    /// Pointer went down at a surface-local `point`.
    pub fn pointer_down(&mut self, point: Point, config: &ToolConfig) {
        if self.can_draw() {
            self.engine.begin(point, config);
        }
    }

    /// Pointer moved to a surface-local `point`.
    pub fn pointer_move(&mut self, point: Point) {
        if self.can_draw() {
            self.engine.update(&mut self.surface, point);
        }
    }

    /// Pointer lifted or left the surface.
    pub fn pointer_up(&mut self) -> Option<Primitive> {
        if !self.can_draw() {
            return None;
        }
        let committed = self.engine.end(&mut self.surface);
        if self.background_stale {
            self.repaint();
        }
        committed
    }

    /// Route a raw input event through the coordinate mapper.
    pub fn handle_event(&mut self, event: &InputEvent, bounds: &BoundingBox, config: &ToolConfig) {
        match self.mapper.map(event, bounds) {
            Some(Gesture::Start(point)) => self.pointer_down(point, config),
            Some(Gesture::Move(point)) => self.pointer_move(point),
            Some(Gesture::End) => {
                self.pointer_up();
            }
            None => log::trace!("Dropping malformed input event {event:?}"),
        }
    }

    /// Primitives committed since the last drain, for a transport layer.
    pub fn drain_commits(&mut self) -> Vec<Primitive> {
        self.engine.drain_commits()
    }

    pub fn state(&self) -> &DrawState {
        self.engine.state()
    }

    pub fn background(&self) -> Background {
        self.background
    }

    pub fn is_mounted(&self) -> bool {
        self.container.is_some()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}
