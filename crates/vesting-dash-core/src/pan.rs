//! Drag-to-pan state machine for a surface wider than its viewport.
//!
//! Mouse and touch input both arrive as [`PointerEvent`]s. A drag only moves
//! the surface once the gesture is clearly horizontal, so vertical page
//! scrolling on touch screens keeps working over the table.

/// A move must be this many times more horizontal than vertical to pan.
pub const SENSITIVITY_THRESHOLD: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub phase: PointerPhase,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32, phase: PointerPhase) -> Self {
        Self { x, y, phase }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanState {
    pub is_dragging: bool,
    pub start_x: f32,
    pub start_y: f32,
    pub translate_x: f32,
    pub viewport_width: f32,
    pub content_width: f32,
}

impl Default for PanState {
    fn default() -> Self {
        Self {
            is_dragging: false,
            start_x: 0.0,
            start_y: 0.0,
            translate_x: 0.0,
            viewport_width: 0.0,
            content_width: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanOutcome {
    /// Drag armed; nothing moved yet.
    Started,
    /// Horizontal gesture committed. The host should swallow its default
    /// scroll handling for this event.
    Panned { translate_x: f32 },
    Ignored,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Grab,
    Grabbing,
}

#[derive(Debug, Clone)]
pub struct PanController {
    state: PanState,
    sensitivity: f32,
}

impl Default for PanController {
    fn default() -> Self {
        Self::new()
    }
}

impl PanController {
    pub fn new() -> Self {
        Self::with_sensitivity(SENSITIVITY_THRESHOLD)
    }

    pub fn with_sensitivity(sensitivity: f32) -> Self {
        Self {
            state: PanState::default(),
            sensitivity,
        }
    }

    pub fn state(&self) -> &PanState {
        &self.state
    }

    pub fn translate_x(&self) -> f32 {
        self.state.translate_x
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging
    }

    pub fn is_draggable(&self) -> bool {
        self.state.content_width > self.state.viewport_width
    }

    /// Lower bound of `translate_x`; the upper bound is always 0.
    pub fn min_translate(&self) -> f32 {
        (self.state.viewport_width - self.state.content_width).min(0.0)
    }

    /// Records new measurements and pulls the offset back into range.
    pub fn set_geometry(&mut self, viewport_width: f32, content_width: f32) {
        if !viewport_width.is_finite() || !content_width.is_finite() {
            return;
        }
        self.state.viewport_width = viewport_width.max(0.0);
        self.state.content_width = content_width.max(0.0);
        self.state.translate_x = self.clamp(self.state.translate_x);
        if self.state.is_dragging && !self.is_draggable() {
            self.state.is_dragging = false;
        }
    }

    pub fn handle(&mut self, event: PointerEvent) -> PanOutcome {
        if !event.x.is_finite() || !event.y.is_finite() {
            return PanOutcome::Ignored;
        }
        match event.phase {
            PointerPhase::Down => self.pointer_down(event.x, event.y),
            PointerPhase::Move => self.pointer_move(event.x, event.y),
            PointerPhase::Up | PointerPhase::Leave => self.release(),
        }
    }

    pub fn cursor(&self) -> CursorHint {
        if self.state.is_dragging {
            CursorHint::Grabbing
        } else if self.is_draggable() {
            CursorHint::Grab
        } else {
            CursorHint::Default
        }
    }

    fn pointer_down(&mut self, x: f32, y: f32) -> PanOutcome {
        if !self.is_draggable() {
            return PanOutcome::Ignored;
        }
        self.state.is_dragging = true;
        self.state.start_x = x - self.state.translate_x;
        self.state.start_y = y;
        PanOutcome::Started
    }

    fn pointer_move(&mut self, x: f32, y: f32) -> PanOutcome {
        if !self.state.is_dragging {
            return PanOutcome::Ignored;
        }
        let delta_x = x - self.state.start_x;
        let delta_y = y - self.state.start_y;
        if delta_x.abs() <= self.sensitivity * delta_y.abs() {
            return PanOutcome::Ignored;
        }
        let translate_x = self.clamp(delta_x);
        self.state.translate_x = translate_x;
        PanOutcome::Panned { translate_x }
    }

    fn release(&mut self) -> PanOutcome {
        if !self.state.is_dragging {
            return PanOutcome::Ignored;
        }
        self.state.is_dragging = false;
        PanOutcome::Released
    }

    fn clamp(&self, translate_x: f32) -> f32 {
        translate_x.clamp(self.min_translate(), 0.0)
    }
}
