//! Widget draw calls
//!
//! Every widget follows the same frame shape: resolve its rectangle
//! (the layout cursor overrides the caller's position when a layout
//! scope is active), test the pointer against the rectangle and the
//! active clip mask, advance its persistent state machine, emit draw
//! primitives unless a measure-only pass is active, then fold the
//! rectangle into the bounds and layout scopes exactly once.

use crate::draw::DrawContext;
use crate::foundation::math::{lerp, remap01, Bounds2, Vec2};
use crate::foundation::Color;
use crate::input::{InputFrame, Key, PointerButton};
use crate::text::font::FontId;
use crate::Anchor;

use super::state::ButtonResult;
use super::{Ui, UiHandle};

/// What an input field reported for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFieldResult {
    /// The text content changed this frame
    pub changed: bool,
    /// Enter was pressed while focused
    pub confirmed: bool,
    /// The field has keyboard focus
    pub focused: bool,
}

impl Ui {
    /// Solid fill panel
    pub fn panel(&mut self, draw: &mut DrawContext, pos: Vec2, size: Vec2, anchor: Anchor, color: Color) {
        let rect = self.resolve_rect(pos, size, anchor);
        if self.drawing() {
            draw.quad(rect.centre(), rect.size(), color);
        }
        self.on_finished_element(rect);
    }

    /// Panel covering the whole canvas. No-op without an open canvas.
    pub fn fullscreen_panel(&mut self, draw: &mut DrawContext, color: Color) {
        let Some(size) = self.canvas().map(|canvas| canvas.size) else {
            log::warn!("fullscreen_panel called with no open canvas");
            return;
        };
        self.panel(draw, Vec2::zeros(), size, Anchor::BottomLeft, color);
    }

    /// Text element. Returns the rectangle it occupied.
    pub fn text(
        &mut self,
        draw: &mut DrawContext,
        font: FontId,
        text: &str,
        font_size: f32,
        pos: Vec2,
        anchor: Anchor,
        color: Color,
    ) -> Bounds2 {
        let rect = if self.layout_scopes.is_active() {
            let size = draw.measure_text(font, text, font_size);
            let rect = self.resolve_rect(pos, size, anchor);
            if self.drawing() {
                draw.text(font, text, font_size, rect.centre(), Anchor::TextCentre, color);
            }
            rect
        } else {
            if self.drawing() {
                draw.text(font, text, font_size, pos, anchor, color);
            }
            draw.text_bounds(font, text, font_size, pos, anchor)
        };
        self.on_finished_element(rect);
        rect
    }

    /// Push button. Fires [`ButtonResult::released`] exactly once per
    /// completed press-and-release over the button; a press that ends
    /// elsewhere reports [`ButtonResult::cancelled`] instead.
    pub fn button(
        &mut self,
        draw: &mut DrawContext,
        input: &InputFrame,
        handle: &UiHandle,
        label: &str,
        font: FontId,
        pos: Vec2,
        size: Vec2,
        anchor: Anchor,
        enabled: bool,
    ) -> ButtonResult {
        let rect = self.resolve_rect(pos, size, anchor);
        let pointer = self.pointer_ui(input);
        let hovered = rect.contains(pointer) && draw.point_inside_mask(pointer);

        let mut result = ButtonResult {
            hovered,
            ..ButtonResult::default()
        };
        {
            let state = self.button_state(handle);
            if enabled {
                if input.is_pressed(PointerButton::Left) {
                    if hovered && !state.is_down {
                        state.is_down = true;
                        result.pressed = true;
                    } else if state.is_down && !hovered {
                        state.is_down = false;
                        result.cancelled = true;
                    }
                }
                if state.is_down && input.is_released(PointerButton::Left) {
                    state.is_down = false;
                    if hovered {
                        result.released = true;
                    } else {
                        result.cancelled = true;
                    }
                }
            } else if state.is_down {
                state.is_down = false;
                result.cancelled = true;
            }
            result.held = state.is_down;
        }

        if self.drawing() {
            let theme = &self.theme.button;
            let background = theme.background.get(hovered, result.held, enabled);
            let foreground = theme.text.get(hovered, result.held, enabled);
            let font_size = theme.font_size;
            draw.quad(rect.centre(), rect.size(), background);
            if !label.is_empty() {
                draw.text(font, label, font_size, rect.centre(), Anchor::TextCentre, foreground);
            }
        }
        self.on_finished_element(rect);
        result
    }

    /// Button sized from its label plus the theme's padding scale
    pub fn button_fit_to_text(
        &mut self,
        draw: &mut DrawContext,
        input: &InputFrame,
        handle: &UiHandle,
        label: &str,
        font: FontId,
        pos: Vec2,
        anchor: Anchor,
        enabled: bool,
    ) -> ButtonResult {
        let label_size = draw.measure_text(font, label, self.theme.button.font_size);
        let pad = self.theme.button.padding_scale;
        let size = Vec2::new(label_size.x * pad[0], label_size.y * pad[1]);
        self.button(draw, input, handle, label, font, pos, size, anchor, enabled)
    }

    /// Single-line text input field.
    ///
    /// Focus is gained by a press inside the rectangle and lost by a
    /// press outside or Escape — except never on the same frame focus
    /// was gained. While focused, typed characters are inserted at the
    /// caret, each candidate edit first checked against `validate`
    /// (a rejected edit leaves the text unchanged). Backspace, delete
    /// and the arrow keys fire once on key-down, then auto-repeat.
    pub fn input_field(
        &mut self,
        draw: &mut DrawContext,
        input: &InputFrame,
        handle: &UiHandle,
        font: FontId,
        pos: Vec2,
        size: Vec2,
        anchor: Anchor,
        hint: &str,
        validate: Option<&dyn Fn(&str) -> bool>,
    ) -> InputFieldResult {
        let rect = self.resolve_rect(pos, size, anchor);
        let pointer = self.pointer_ui(input);
        let hovered = rect.contains(pointer) && draw.point_inside_mask(pointer);

        let mut state = self.take_input_field_state(handle);
        let mut result = InputFieldResult::default();
        let time = input.time;

        if input.is_pressed(PointerButton::Left) {
            if hovered {
                if !state.focused {
                    state.focused = true;
                    state.focus_gained_frame = Some(input.frame);
                    state.last_input_time = time;
                }
            } else if state.focused && state.focus_gained_frame != Some(input.frame) {
                state.focused = false;
            }
        }
        if state.focused && input.is_key_pressed(Key::Escape) {
            state.focused = false;
        }

        if state.focused {
            for c in input.typed.chars() {
                if c.is_control() {
                    continue;
                }
                let candidate = state.with_char_inserted(c);
                if validate.map_or(true, |accept| accept(&candidate)) {
                    state.insert_char(c);
                    state.last_input_time = time;
                    result.changed = true;
                }
            }

            if state.backspace_trigger.should_trigger(
                input.is_key_pressed(Key::Backspace),
                input.is_key_held(Key::Backspace),
                time,
            ) && state.caret > 0
            {
                state.delete_back();
                state.last_input_time = time;
                result.changed = true;
            }
            if state.delete_trigger.should_trigger(
                input.is_key_pressed(Key::Delete),
                input.is_key_held(Key::Delete),
                time,
            ) && state.caret < state.text.chars().count()
            {
                state.delete_forward();
                state.last_input_time = time;
                result.changed = true;
            }
            if state.left_trigger.should_trigger(
                input.is_key_pressed(Key::LeftArrow),
                input.is_key_held(Key::LeftArrow),
                time,
            ) {
                state.move_left();
                state.last_input_time = time;
            }
            if state.right_trigger.should_trigger(
                input.is_key_pressed(Key::RightArrow),
                input.is_key_held(Key::RightArrow),
                time,
            ) {
                state.move_right();
                state.last_input_time = time;
            }
            if input.is_key_pressed(Key::Home) {
                state.caret = 0;
            }
            if input.is_key_pressed(Key::End) {
                state.caret = state.text.chars().count();
            }
            if input.is_key_pressed(Key::Enter) {
                result.confirmed = true;
            }
        }
        result.focused = state.focused;

        if self.drawing() {
            let theme = self.theme.input_field;
            let background = if state.focused {
                theme.focused_background
            } else {
                theme.background
            };
            draw.quad(rect.centre(), rect.size(), background);

            let text_pos = Vec2::new(rect.min.x + theme.padding, rect.centre().y);
            if state.text.is_empty() && !state.focused && !hint.is_empty() {
                draw.text(font, hint, theme.font_size, text_pos, Anchor::TextCentreLeft, theme.hint_color);
            } else if !state.text.is_empty() {
                draw.text(
                    font,
                    &state.text,
                    theme.font_size,
                    text_pos,
                    Anchor::TextCentreLeft,
                    theme.text_color,
                );
            }
            if state.focused && state.caret_visible(time) {
                let caret_x = text_pos.x + draw.measure_text(font, state.text_before_caret(), theme.font_size).x;
                draw.quad(
                    Vec2::new(caret_x, rect.centre().y),
                    Vec2::new(theme.font_size * 0.08, theme.font_size),
                    theme.caret_color,
                );
            }
        }

        self.store_input_field_state(handle, state);
        self.on_finished_element(rect);
        result
    }

    /// Vertical scrollbar. Returns the scroll offset in `[0, 1]`
    /// (0 = top). Only the thumb is draggable; the thumb's length is
    /// the track length scaled by viewport/content, and when the
    /// content fits the thumb fills the track and the offset pins to 0.
    pub fn scrollbar(
        &mut self,
        draw: &mut DrawContext,
        input: &InputFrame,
        handle: &UiHandle,
        pos: Vec2,
        size: Vec2,
        anchor: Anchor,
        viewport_len: f32,
        content_len: f32,
    ) -> f32 {
        let rect = self.resolve_rect(pos, size, anchor);
        let pointer = self.pointer_ui(input);
        let track_len = rect.height();
        let overflowing = content_len > viewport_len && content_len > 0.0;
        let thumb_len = if overflowing {
            track_len * viewport_len / content_len
        } else {
            track_len
        };
        let travel = track_len - thumb_len;

        let (scroll_t, dragging) = {
            let state = self.scrollbar_state(handle);
            if !overflowing {
                state.scroll_t = 0.0;
                state.is_dragging = false;
            } else {
                let thumb_centre_y = rect.max.y - thumb_len * 0.5 - state.scroll_t * travel;
                let thumb = Bounds2::from_centre_size(
                    Vec2::new(rect.centre().x, thumb_centre_y),
                    Vec2::new(rect.width(), thumb_len),
                );
                if input.is_pressed(PointerButton::Left) && thumb.contains(pointer) {
                    state.is_dragging = true;
                    state.drag_pointer_start = pointer.y;
                    state.drag_scroll_start = state.scroll_t;
                }
                if state.is_dragging {
                    if input.is_held(PointerButton::Left) {
                        if travel > 0.0 {
                            let delta = state.drag_pointer_start - pointer.y;
                            state.scroll_t = (state.drag_scroll_start + delta / travel).clamp(0.0, 1.0);
                        }
                    } else {
                        state.is_dragging = false;
                    }
                }
            }
            (state.scroll_t, state.is_dragging)
        };

        if self.drawing() {
            let theme = self.theme.accent;
            draw.quad(rect.centre(), rect.size(), theme.track);
            let thumb_centre_y = rect.max.y - thumb_len * 0.5 - scroll_t * travel;
            let thumb_hovered = pointer.x >= rect.min.x
                && pointer.x <= rect.max.x
                && (pointer.y - thumb_centre_y).abs() <= thumb_len * 0.5;
            draw.quad(
                Vec2::new(rect.centre().x, thumb_centre_y),
                Vec2::new(rect.width(), thumb_len),
                theme.handle.get(thumb_hovered, dragging, true),
            );
        }
        self.on_finished_element(rect);
        scroll_t
    }

    /// HSV colour picker: a saturation/value square with a hue strip
    /// on its right. Each handle maps the pointer linearly (clamped)
    /// to its value while dragged. Returns the picked color.
    pub fn colour_picker(
        &mut self,
        draw: &mut DrawContext,
        input: &InputFrame,
        handle: &UiHandle,
        pos: Vec2,
        size: Vec2,
        anchor: Anchor,
    ) -> Color {
        let rect = self.resolve_rect(pos, size, anchor);
        let pointer = self.pointer_ui(input);
        let strip_w = rect.width() * 0.15;
        let gap = rect.width() * 0.05;
        let square = Bounds2::new(rect.min, Vec2::new(rect.max.x - strip_w - gap, rect.max.y));
        let strip = Bounds2::new(Vec2::new(rect.max.x - strip_w, rect.min.y), rect.max);
        let masked = draw.point_inside_mask(pointer);

        let picked = {
            let state = self.colour_picker_state(handle);
            if input.is_pressed(PointerButton::Left) && masked {
                if square.contains(pointer) {
                    state.sat_val_selected = true;
                } else if strip.contains(pointer) {
                    state.hue_selected = true;
                }
            }
            if input.is_held(PointerButton::Left) {
                if state.sat_val_selected {
                    state.sat = remap01(square.min.x, square.max.x, pointer.x);
                    state.val = remap01(square.min.y, square.max.y, pointer.y);
                }
                if state.hue_selected {
                    state.hue = remap01(strip.min.y, strip.max.y, pointer.y);
                }
            } else {
                state.sat_val_selected = false;
                state.hue_selected = false;
            }
            *state
        };

        if self.drawing() {
            draw.sat_val_quad(square.centre(), square.size(), picked.hue);
            draw.hue_quad(strip.centre(), strip.size());

            let marker_r = rect.width() * 0.02;
            let sat_val_pos = Vec2::new(
                lerp(square.min.x, square.max.x, picked.sat),
                lerp(square.min.y, square.max.y, picked.val),
            );
            draw.point(sat_val_pos, marker_r, Color::WHITE);
            draw.point(sat_val_pos, marker_r * 0.7, picked.rgb());
            let hue_y = lerp(strip.min.y, strip.max.y, picked.hue);
            draw.quad(
                Vec2::new(strip.centre().x, hue_y),
                Vec2::new(strip.width(), marker_r),
                Color::WHITE,
            );
        }
        self.on_finished_element(rect);
        picked.rgb()
    }

    /// Horizontal slider over `[0, 1]` with a draggable handle.
    /// `value` is the caller-owned current value; the updated value is
    /// returned.
    pub fn slider(
        &mut self,
        draw: &mut DrawContext,
        input: &InputFrame,
        handle: &UiHandle,
        pos: Vec2,
        size: Vec2,
        anchor: Anchor,
        value: f32,
    ) -> f32 {
        let rect = self.resolve_rect(pos, size, anchor);
        let pointer = self.pointer_ui(input);
        let handle_r = rect.height() * 0.5;
        let handle_x = lerp(rect.min.x, rect.max.x, value.clamp(0.0, 1.0));
        let handle_pos = Vec2::new(handle_x, rect.centre().y);
        let over_handle =
            (pointer - handle_pos).norm() <= handle_r && draw.point_inside_mask(pointer);

        let (value, dragging) = {
            let state = self.slider_state(handle);
            if input.is_pressed(PointerButton::Left) && over_handle {
                state.is_dragging = true;
            }
            if state.is_dragging && !input.is_held(PointerButton::Left) {
                state.is_dragging = false;
            }
            let value = if state.is_dragging {
                remap01(rect.min.x, rect.max.x, pointer.x)
            } else {
                value.clamp(0.0, 1.0)
            };
            (value, state.is_dragging)
        };

        if self.drawing() {
            let theme = self.theme.accent;
            draw.quad(
                rect.centre(),
                Vec2::new(rect.width(), rect.height() * 0.25),
                theme.track,
            );
            let handle_pos = Vec2::new(lerp(rect.min.x, rect.max.x, value), rect.centre().y);
            draw.point(handle_pos, handle_r, theme.handle.get(over_handle, dragging, true));
        }
        self.on_finished_element(rect);
        value
    }
}
