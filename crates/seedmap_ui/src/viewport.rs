//! # Viewport Controller
//!
//! Pan, zoom and structure picking for the map canvas.
//!
//! ## State Machine
//!
//! ```text
//!          pointer_down
//!   Idle ────────────────▶ Dragging { last }
//!    ▲                          │  pointer_move: offset += delta
//!    └──────────────────────────┘
//!       pointer_up / pointer_leave
//! ```
//!
//! Zoom is orthogonal to dragging. Wheel events step it and clamp it to
//! `[min_zoom, max_zoom]` in either state.

use std::collections::BTreeSet;
use std::fmt;

use seedmap_procedural::{Structure, StructureType};

use crate::config::ViewportConfig;
use crate::error::ViewportResult;
use crate::input::ViewportEvent;
use crate::projection::{
    CanvasSize, Projection, ScreenPoint, SearchCircle, ViewBounds, WorldPoint,
};

/// Called with the new selection after every click.
pub type SelectionCallback = Box<dyn FnMut(Option<&Structure>)>;

/// Drag state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    /// No button held.
    #[default]
    Idle,
    /// Left button held.
    Dragging {
        /// Pointer position at the previous drag event.
        last: ScreenPoint,
    },
}

/// Snapshot of everything a renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    /// Pan offset in pixels.
    pub offset: ScreenPoint,
    /// Zoom factor.
    pub zoom: f64,
    /// Drag state.
    pub drag: DragState,
    /// Selected structure.
    pub selection: Option<Structure>,
}

/// Interaction state machine for the map canvas.
pub struct ViewportController {
    config: ViewportConfig,
    canvas: CanvasSize,
    offset: ScreenPoint,
    zoom: f64,
    drag: DragState,
    selection: Option<Structure>,
    structures: Vec<Structure>,
    filters: BTreeSet<StructureType>,
    on_select: Option<SelectionCallback>,
}

impl fmt::Debug for ViewportController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportController")
            .field("canvas", &self.canvas)
            .field("offset", &self.offset)
            .field("zoom", &self.zoom)
            .field("drag", &self.drag)
            .field("selection", &self.selection)
            .field("structures", &self.structures.len())
            .field("filters", &self.filters)
            .field("on_select", &self.on_select.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::with_valid_config(ViewportConfig::default())
    }
}

impl ViewportController {
    /// Creates a controller at the origin with `initial_zoom`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the config fails validation.
    pub fn new(config: ViewportConfig) -> ViewportResult<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: ViewportConfig) -> Self {
        Self {
            zoom: config.initial_zoom,
            config,
            canvas: CanvasSize::default(),
            offset: ScreenPoint::ZERO,
            drag: DragState::Idle,
            selection: None,
            structures: Vec::new(),
            filters: BTreeSet::new(),
            on_select: None,
        }
    }

    /// Installs the selection callback.
    pub fn on_structure_selected(&mut self, callback: impl FnMut(Option<&Structure>) + 'static) {
        self.on_select = Some(Box::new(callback));
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current pan offset.
    #[must_use]
    pub fn offset(&self) -> ScreenPoint {
        self.offset
    }

    /// Current drag state.
    #[must_use]
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Returns true while the left button is held.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Selected structure.
    #[must_use]
    pub fn selection(&self) -> Option<&Structure> {
        self.selection.as_ref()
    }

    /// Canvas dimensions.
    #[must_use]
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Resizes the canvas. The world point under the centre stays put.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas = CanvasSize::new(width, height);
    }

    /// Snapshot for renderers.
    #[must_use]
    pub fn state(&self) -> ViewportState {
        ViewportState {
            offset: self.offset,
            zoom: self.zoom,
            drag: self.drag,
            selection: self.selection.clone(),
        }
    }

    /// Current projection.
    #[must_use]
    pub fn projection(&self) -> Projection {
        Projection::new(self.canvas, self.offset, self.zoom)
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Dispatches one event.
    pub fn handle(&mut self, event: ViewportEvent) {
        match event {
            ViewportEvent::PointerDown { x, y } => self.pointer_down(x, y),
            ViewportEvent::PointerMove { x, y } => {
                self.pointer_move(x, y);
            }
            ViewportEvent::PointerUp { .. } => self.pointer_up(),
            ViewportEvent::PointerLeave => self.pointer_leave(),
            ViewportEvent::Wheel { delta_y } => self.wheel(delta_y),
            ViewportEvent::Click { x, y } => {
                self.click(x, y);
            }
        }
    }

    /// Starts a drag anchored at `(x, y)`.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.drag = DragState::Dragging {
            last: ScreenPoint::new(x, y),
        };
    }

    /// Pans by the distance moved since the last drag event.
    ///
    /// Returns true if the offset changed.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        let DragState::Dragging { last } = self.drag else {
            return false;
        };
        self.offset.x += x - last.x;
        self.offset.y += y - last.y;
        self.drag = DragState::Dragging {
            last: ScreenPoint::new(x, y),
        };
        x != last.x || y != last.y
    }

    /// Ends a drag.
    pub fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Ends a drag when the pointer leaves the canvas.
    pub fn pointer_leave(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Steps the zoom: in for negative `delta_y`, out for positive.
    pub fn wheel(&mut self, delta_y: f64) {
        if delta_y < 0.0 {
            self.zoom_in();
        } else if delta_y > 0.0 {
            self.zoom_out();
        }
    }

    /// Zooms in by one step.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + self.config.zoom_step);
    }

    /// Zooms out by one step.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - self.config.zoom_step);
    }

    /// Sets the zoom, clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: f64) {
        let clamped = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        if clamped.is_finite() {
            self.zoom = clamped;
        }
    }

    /// Centres the origin and restores the initial zoom.
    pub fn reset_view(&mut self) {
        self.offset = ScreenPoint::ZERO;
        self.zoom = self.config.initial_zoom;
        self.drag = DragState::Idle;
    }

    /// Selects the structure under `(x, y)` and notifies the callback.
    ///
    /// Among structures within the detection radius, the nearest one passing
    /// the type filter wins. If none passes, the nearest one wins. If none is
    /// in range the selection is cleared.
    pub fn click(&mut self, x: f64, y: f64) -> Option<&Structure> {
        let world = self.screen_to_world(x, y);
        let hit = self.hit_test(world).cloned();

        if hit != self.selection {
            match &hit {
                Some(s) => tracing::info!(
                    structure_type = %s.structure_type,
                    x = s.x,
                    z = s.z,
                    "Structure selected"
                ),
                None => tracing::debug!(x = world.x, z = world.z, "Selection cleared"),
            }
        }
        self.selection = hit;

        if let Some(callback) = self.on_select.as_mut() {
            callback(self.selection.as_ref());
        }
        self.selection.as_ref()
    }

    fn hit_test(&self, world: WorldPoint) -> Option<&Structure> {
        let radius = self.projection().pixels_to_blocks(self.config.detection_radius_px);
        let limit = radius * radius;

        let mut nearest: Option<(f64, &Structure)> = None;
        let mut nearest_passing: Option<(f64, &Structure)> = None;

        for structure in &self.structures {
            let d2 = structure.distance_squared_to(world.x, world.z);
            if d2 > limit {
                continue;
            }
            if nearest.map_or(true, |(best, _)| d2 < best) {
                nearest = Some((d2, structure));
            }
            if self.passes_filter(&structure.structure_type)
                && nearest_passing.map_or(true, |(best, _)| d2 < best)
            {
                nearest_passing = Some((d2, structure));
            }
        }

        nearest_passing.or(nearest).map(|(_, s)| s)
    }

    // =========================================================================
    // PROJECTION
    // =========================================================================

    /// Maps a screen point to world blocks.
    #[must_use]
    pub fn screen_to_world(&self, x: f64, y: f64) -> WorldPoint {
        self.projection().screen_to_world(ScreenPoint::new(x, y))
    }

    /// Maps a screen point to the block under it.
    #[must_use]
    pub fn screen_to_block(&self, x: f64, y: f64) -> (i32, i32) {
        self.screen_to_world(x, y).to_block()
    }

    /// Maps a block position to the screen.
    #[must_use]
    pub fn world_to_screen(&self, x: f64, z: f64) -> ScreenPoint {
        self.projection().world_to_screen(WorldPoint::new(x, z))
    }

    /// World area on screen.
    #[must_use]
    pub fn view_bounds(&self) -> ViewBounds {
        self.projection().view_bounds()
    }

    /// Structure search covering the whole visible area.
    ///
    /// Feed it to `MapSession::find_structures` to load what is on screen.
    #[must_use]
    pub fn search_circle(&self) -> SearchCircle {
        self.view_bounds().covering_circle()
    }

    // =========================================================================
    // STRUCTURES AND FILTERS
    // =========================================================================

    /// Replaces the structures available for picking.
    ///
    /// A selection that is not in the new list is cleared.
    pub fn set_structures(&mut self, structures: Vec<Structure>) {
        self.structures = structures;
        let stale = self
            .selection
            .as_ref()
            .is_some_and(|selected| !self.structures.contains(selected));
        if stale {
            self.selection = None;
            if let Some(callback) = self.on_select.as_mut() {
                callback(None);
            }
        }
    }

    /// Structures available for picking.
    #[must_use]
    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    /// Structures on screen that pass the type filter.
    #[must_use]
    pub fn visible_structures(&self) -> Vec<&Structure> {
        let bounds = self.view_bounds();
        self.structures
            .iter()
            .filter(|s| bounds.contains(s.x, s.z) && self.passes_filter(&s.structure_type))
            .collect()
    }

    /// Flips a type in the active filter set. Returns true if now active.
    pub fn toggle_filter(&mut self, structure_type: impl Into<StructureType>) -> bool {
        let structure_type = structure_type.into();
        if self.filters.remove(&structure_type) {
            false
        } else {
            self.filters.insert(structure_type);
            true
        }
    }

    /// Empties the filter set so every type passes.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Active filter set. Empty means every type passes.
    #[must_use]
    pub fn filters(&self) -> &BTreeSet<StructureType> {
        &self.filters
    }

    fn passes_filter(&self, structure_type: &StructureType) -> bool {
        self.filters.is_empty() || self.filters.contains(structure_type)
    }
}
