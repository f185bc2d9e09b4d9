//! Immediate-mode UI layer
//!
//! No retained widget tree: the host redeclares every widget every
//! frame, and the only state that survives a frame is the handle-keyed
//! tables inside the [`Ui`] context (button press progress, input-field
//! text, scroll offsets, picker values). The context is owned by the
//! host and passed to every call together with the frame's
//! [`DrawContext`] and [`InputFrame`] — there are no process-wide
//! statics, and `reset_all`/`remove` give the host explicit control
//! over state lifetime.
//!
//! Coordinates are in UI space: the canvas is always [`UI_WIDTH`]
//! units wide, y-up, with (0, 0) at the bottom-left. A canvas scope
//! opens a screen-space draw layer carrying the UI-to-pixel transform;
//! fixed-aspect canvases centre themselves and can letterbox the
//! remainder.

pub mod handle;
pub mod layout;
pub mod state;
pub mod theme;
mod widgets;

pub use handle::UiHandle;
pub use layout::{line_break_by_char_count, size_to_fit, GrowDirection};
pub use state::{ButtonResult, ColourPickerState, InputFieldState, ScrollbarState};
pub use theme::{ConfigError, UiTheme};
pub use widgets::InputFieldResult;

use std::collections::HashMap;

use crate::draw::{DrawContext, FrameToken};
use crate::foundation::math::{Bounds2, Vec2};
use crate::foundation::{Color, ScopeStack};
use crate::input::InputFrame;
use crate::Anchor;

use layout::{BoundsScope, CanvasScope, LayoutScope};
use state::{ButtonState, SliderState};

/// Width of the UI canvas in UI units; height follows the aspect ratio
pub const UI_WIDTH: f32 = 100.0;

/// Immediate-mode UI context
pub struct Ui {
    theme: UiTheme,
    buttons: HashMap<UiHandle, ButtonState>,
    input_fields: HashMap<UiHandle, InputFieldState>,
    scrollbars: HashMap<UiHandle, ScrollbarState>,
    colour_pickers: HashMap<UiHandle, ColourPickerState>,
    sliders: HashMap<UiHandle, SliderState>,
    layout_scopes: ScopeStack<LayoutScope>,
    bounds_scopes: ScopeStack<BoundsScope>,
    canvas_scopes: ScopeStack<CanvasScope>,
    suppressed_draws: u32,
    prev_bounds: Bounds2,
}

impl Ui {
    /// Create a context with the given theme
    pub fn new(theme: UiTheme) -> Self {
        Self {
            theme,
            buttons: HashMap::new(),
            input_fields: HashMap::new(),
            scrollbars: HashMap::new(),
            colour_pickers: HashMap::new(),
            sliders: HashMap::new(),
            layout_scopes: ScopeStack::new(),
            bounds_scopes: ScopeStack::new(),
            canvas_scopes: ScopeStack::new(),
            suppressed_draws: 0,
            prev_bounds: Bounds2::empty(),
        }
    }

    /// The active theme
    pub fn theme(&self) -> &UiTheme {
        &self.theme
    }

    /// Mutable access to the theme
    pub fn theme_mut(&mut self) -> &mut UiTheme {
        &mut self.theme
    }

    /// Drop every widget's persistent state
    pub fn reset_all(&mut self) {
        self.buttons.clear();
        self.input_fields.clear();
        self.scrollbars.clear();
        self.colour_pickers.clear();
        self.sliders.clear();
        log::debug!("ui state reset");
    }

    /// Drop the persistent state for one handle, whichever widget kind
    /// owns it
    pub fn remove(&mut self, handle: &UiHandle) {
        self.buttons.remove(handle);
        self.input_fields.remove(handle);
        self.scrollbars.remove(handle);
        self.colour_pickers.remove(handle);
        self.sliders.remove(handle);
    }

    /// Bounds of the most recently drawn element
    pub fn prev_bounds(&self) -> Bounds2 {
        self.prev_bounds
    }

    //  --------------------------- Canvas ---------------------------

    /// Open a canvas filling the whole screen. UI space is
    /// [`UI_WIDTH`] units wide; height follows the screen aspect.
    pub fn begin_canvas(&mut self, draw: &mut DrawContext, frame: FrameToken, screen_size: Vec2) {
        let scale = screen_size.x / UI_WIDTH;
        let scope = self.canvas_scopes.enter();
        *scope = CanvasScope {
            screen_offset: Vec2::zeros(),
            size: Vec2::new(UI_WIDTH, screen_size.y / scale),
            screen_size,
            scale,
            letterbox: false,
            frame,
        };
        draw.start_layer(frame, Vec2::zeros(), scale, true);
    }

    /// Open a canvas with a fixed aspect ratio, centred on screen at
    /// the largest scale that fits. With `letterbox` set, the screen
    /// area outside the canvas is covered with dark bars on close.
    pub fn begin_fixed_aspect_canvas(
        &mut self,
        draw: &mut DrawContext,
        frame: FrameToken,
        screen_size: Vec2,
        aspect_w: f32,
        aspect_h: f32,
        letterbox: bool,
    ) {
        let size = Vec2::new(UI_WIDTH, UI_WIDTH * aspect_h / aspect_w);
        let scale = (screen_size.x / size.x).min(screen_size.y / size.y);
        let screen_offset = (screen_size - size * scale) * 0.5;
        let scope = self.canvas_scopes.enter();
        *scope = CanvasScope {
            screen_offset,
            size,
            screen_size,
            scale,
            letterbox,
            frame,
        };
        draw.start_layer(frame, screen_offset, scale, true);
    }

    /// Close the innermost canvas, drawing letterbox bars if requested
    pub fn end_canvas(&mut self, draw: &mut DrawContext) {
        let Some(canvas) = self.canvas_scopes.current().copied() else {
            debug_assert!(false, "canvas exit without matching enter");
            return;
        };
        self.canvas_scopes.exit();

        if canvas.letterbox {
            // Bars go in their own screen-space layer so they cover
            // any canvas content that spilled past the edges.
            draw.start_layer(canvas.frame, Vec2::zeros(), 1.0, true);
            let bar = Color::BLACK;
            let screen = canvas.screen_size;
            let x_bar = canvas.screen_offset.x;
            let y_bar = canvas.screen_offset.y;
            if x_bar > 0.0 {
                draw.quad(Vec2::new(x_bar * 0.5, screen.y * 0.5), Vec2::new(x_bar, screen.y), bar);
                draw.quad(
                    Vec2::new(screen.x - x_bar * 0.5, screen.y * 0.5),
                    Vec2::new(x_bar, screen.y),
                    bar,
                );
            }
            if y_bar > 0.0 {
                draw.quad(Vec2::new(screen.x * 0.5, y_bar * 0.5), Vec2::new(screen.x, y_bar), bar);
                draw.quad(
                    Vec2::new(screen.x * 0.5, screen.y - y_bar * 0.5),
                    Vec2::new(screen.x, y_bar),
                    bar,
                );
            }
        }
    }

    /// The innermost canvas, if one is open
    pub fn canvas(&self) -> Option<&CanvasScope> {
        self.canvas_scopes.current()
    }

    /// Rectangle of the open canvas in UI space (empty when none)
    pub fn canvas_region(&self) -> Bounds2 {
        self.canvas_scopes
            .current()
            .map_or_else(Bounds2::empty, |canvas| Bounds2::new(Vec2::zeros(), canvas.size))
    }

    /// Pointer position converted into UI space (screen space when no
    /// canvas is open)
    pub fn pointer_ui(&self, input: &InputFrame) -> Vec2 {
        match self.canvas_scopes.current() {
            Some(canvas) => canvas.screen_to_ui(input.pointer),
            None => input.pointer,
        }
    }

    //  --------------------------- Scopes ---------------------------

    /// Open a flow-layout scope: elements drawn until the matching
    /// [`Ui::end_layout`] ignore their caller position and stack from
    /// `pos` along `direction` with `spacing` between them.
    pub fn begin_layout(&mut self, pos: Vec2, direction: GrowDirection, spacing: f32) {
        let scope = self.layout_scopes.enter();
        *scope = LayoutScope {
            cursor: pos,
            direction,
            spacing,
            ..LayoutScope::default()
        };
    }

    /// Close the innermost layout scope. Its accumulated bounds fold
    /// into the parent layout as a single element, so nested layouts
    /// compose additively. Returns the accumulated bounds.
    pub fn end_layout(&mut self) -> Bounds2 {
        let Some(scope) = self.layout_scopes.current().copied() else {
            debug_assert!(false, "layout exit without matching enter");
            return Bounds2::empty();
        };
        self.layout_scopes.exit();
        if scope.element_added {
            if let Some(parent) = self.layout_scopes.current_mut() {
                parent.add_element(scope.bounds);
            }
        }
        scope.bounds
    }

    /// Open a bounds-accumulation scope. With `draw` false this is a
    /// measure-only pass: widgets still advance state and accumulate
    /// bounds but emit nothing.
    pub fn begin_bounds(&mut self, draw: bool) {
        let scope = self.bounds_scopes.enter();
        *scope = BoundsScope {
            bounds: Bounds2::empty(),
            draw,
        };
        if !draw {
            self.suppressed_draws += 1;
        }
    }

    /// Close the innermost bounds scope, folding its result into the
    /// parent bounds scope. Returns the accumulated bounds.
    pub fn end_bounds(&mut self) -> Bounds2 {
        let Some(scope) = self.bounds_scopes.current().copied() else {
            debug_assert!(false, "bounds exit without matching enter");
            return Bounds2::empty();
        };
        self.bounds_scopes.exit();
        if !scope.draw {
            self.suppressed_draws -= 1;
        }
        if let Some(parent) = self.bounds_scopes.current_mut() {
            parent.bounds.grow(scope.bounds.min, scope.bounds.max);
        }
        scope.bounds
    }

    //  --------------------------- Internals ---------------------------

    /// Whether widgets should emit draw primitives (false inside a
    /// measure-only bounds scope)
    pub(crate) fn drawing(&self) -> bool {
        self.suppressed_draws == 0
    }

    /// Resolve a widget rectangle: the layout cursor overrides the
    /// caller's position and anchor when a layout scope is active.
    pub(crate) fn resolve_rect(&self, pos: Vec2, size: Vec2, anchor: Anchor) -> Bounds2 {
        let centre = match self.layout_scopes.current() {
            Some(layout) => layout.direction.element_anchor().rect_centre(layout.cursor, size),
            None => anchor.rect_centre(pos, size),
        };
        Bounds2::from_centre_size(centre, size)
    }

    /// Fold a finished element's rectangle into the active bounds and
    /// layout scopes, exactly once per element.
    pub(crate) fn on_finished_element(&mut self, rect: Bounds2) {
        self.prev_bounds = rect;
        if let Some(bounds) = self.bounds_scopes.current_mut() {
            bounds.bounds.grow(rect.min, rect.max);
        }
        if let Some(layout) = self.layout_scopes.current_mut() {
            layout.add_element(rect);
        }
    }

    pub(crate) fn button_state(&mut self, handle: &UiHandle) -> &mut ButtonState {
        self.buttons.entry(handle.clone()).or_default()
    }

    pub(crate) fn take_input_field_state(&mut self, handle: &UiHandle) -> InputFieldState {
        self.input_fields.remove(handle).unwrap_or_default()
    }

    pub(crate) fn store_input_field_state(&mut self, handle: &UiHandle, state: InputFieldState) {
        self.input_fields.insert(handle.clone(), state);
    }

    pub(crate) fn scrollbar_state(&mut self, handle: &UiHandle) -> &mut ScrollbarState {
        self.scrollbars.entry(handle.clone()).or_default()
    }

    pub(crate) fn colour_picker_state(&mut self, handle: &UiHandle) -> &mut ColourPickerState {
        self.colour_pickers.entry(handle.clone()).or_default()
    }

    pub(crate) fn slider_state(&mut self, handle: &UiHandle) -> &mut SliderState {
        self.sliders.entry(handle.clone()).or_default()
    }

    /// Read an input field's current text, if the handle has state
    pub fn input_field_text(&self, handle: &UiHandle) -> Option<&str> {
        self.input_fields.get(handle).map(|state| state.text.as_str())
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new(UiTheme::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::CommandList;

    #[test]
    fn layout_overrides_caller_position() {
        let mut ui = Ui::default();
        ui.begin_layout(Vec2::new(10.0, 90.0), GrowDirection::Down, 1.0);
        let rect = ui.resolve_rect(Vec2::new(55.0, 55.0), Vec2::new(20.0, 6.0), Anchor::Centre);
        // Placed at the cursor with a top-left anchor, not at (55, 55)
        assert_eq!(rect.min, Vec2::new(10.0, 84.0));
        assert_eq!(rect.max, Vec2::new(30.0, 90.0));
        ui.end_layout();
    }

    #[test]
    fn nested_layouts_fold_once_into_parent() {
        let mut ui = Ui::default();
        ui.begin_layout(Vec2::new(0.0, 100.0), GrowDirection::Down, 2.0);
        ui.on_finished_element(Bounds2::new(Vec2::new(0.0, 90.0), Vec2::new(10.0, 100.0)));

        ui.begin_layout(ui.layout_scopes.current().map(|l| l.cursor).unwrap(), GrowDirection::Right, 1.0);
        ui.on_finished_element(Bounds2::new(Vec2::new(0.0, 84.0), Vec2::new(4.0, 88.0)));
        ui.on_finished_element(Bounds2::new(Vec2::new(5.0, 84.0), Vec2::new(9.0, 88.0)));
        let row = ui.end_layout();
        assert_eq!(row.min, Vec2::new(0.0, 84.0));
        assert_eq!(row.max, Vec2::new(9.0, 88.0));

        // Parent cursor advanced by the first element (10 + 2) and the
        // whole row (4 + 2), not by each row element separately
        let cursor = ui.layout_scopes.current().map(|l| l.cursor);
        assert_eq!(cursor, Some(Vec2::new(0.0, 82.0)));
        ui.end_layout();
    }

    #[test]
    fn bounds_scopes_nest_and_fold() {
        let mut ui = Ui::default();
        ui.begin_bounds(true);
        ui.on_finished_element(Bounds2::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)));
        ui.begin_bounds(false);
        assert!(!ui.drawing());
        ui.on_finished_element(Bounds2::new(Vec2::new(5.0, 5.0), Vec2::new(6.0, 6.0)));
        let inner = ui.end_bounds();
        assert!(ui.drawing());
        assert_eq!(inner.min, Vec2::new(5.0, 5.0));

        let outer = ui.end_bounds();
        assert_eq!(outer.min, Vec2::new(0.0, 0.0));
        assert_eq!(outer.max, Vec2::new(6.0, 6.0));
    }

    #[test]
    fn fixed_aspect_canvas_centres_and_letterboxes() {
        let mut ui = Ui::default();
        let mut draw = DrawContext::new();
        let frame = FrameToken(1);
        // 16:9 canvas on a wider screen: vertical bars left and right
        let screen = Vec2::new(2000.0, 900.0);
        ui.begin_fixed_aspect_canvas(&mut draw, frame, screen, 16.0, 9.0, true);
        {
            let canvas = ui.canvas().expect("canvas open");
            assert_eq!(canvas.size, Vec2::new(100.0, 56.25));
            assert_eq!(canvas.scale, 16.0);
            assert_eq!(canvas.screen_offset, Vec2::new(200.0, 0.0));
        }
        ui.end_canvas(&mut draw);
        assert!(ui.canvas().is_none());

        let mut commands = CommandList::new();
        draw.flush(&mut commands);
        // Two letterbox bars staged in the extra screen-space layer
        assert_eq!(commands.shape_staging.len(), 2);
        assert_eq!(commands.shape_staging[0].centre, [100.0, 450.0]);
        assert_eq!(commands.shape_staging[1].centre, [1900.0, 450.0]);
    }

    #[test]
    fn pointer_converts_through_canvas() {
        let mut ui = Ui::default();
        let mut draw = DrawContext::new();
        ui.begin_canvas(&mut draw, FrameToken(1), Vec2::new(1000.0, 500.0));
        let mut input = InputFrame::new(FrameToken(1), 0.0);
        input.pointer = Vec2::new(500.0, 250.0);
        assert_eq!(ui.pointer_ui(&input), Vec2::new(50.0, 25.0));
        ui.end_canvas(&mut draw);
    }

    #[test]
    fn remove_and_reset_drop_state() {
        let mut ui = Ui::default();
        let handle = UiHandle::from("field");
        let mut state = InputFieldState::default();
        state.text = "kept".into();
        ui.store_input_field_state(&handle, state);
        assert_eq!(ui.input_field_text(&handle), Some("kept"));

        ui.remove(&handle);
        assert_eq!(ui.input_field_text(&handle), None);

        ui.store_input_field_state(&handle, InputFieldState::default());
        ui.reset_all();
        assert_eq!(ui.input_field_text(&handle), None);
    }
}
