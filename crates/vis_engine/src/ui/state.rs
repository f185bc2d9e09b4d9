//! Persistent widget state
//!
//! State records live in the [`Ui`](super::Ui) context's handle-keyed
//! tables, created lazily on a widget's first draw and mutated only by
//! that widget's own draw call. Everything here is plain data; the
//! state machines advancing it live with the widgets.

use crate::foundation::Color;

/// Delay before a held key starts auto-repeating, seconds
pub const KEY_REPEAT_DELAY: f32 = 0.5;
/// Interval between auto-repeated triggers, seconds
pub const KEY_REPEAT_INTERVAL: f32 = 0.04;
/// Caret blink half-period, seconds (visible, then hidden, this long)
pub const CARET_BLINK_INTERVAL: f32 = 0.5;

/// Button press tracking
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonState {
    /// Whether the pointer went down on this button and has not yet
    /// been released or cancelled
    pub is_down: bool,
}

/// What a button widget reported for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonResult {
    /// Pointer went down over the button this frame
    pub pressed: bool,
    /// Pointer was released over the button this frame (the "fire")
    pub released: bool,
    /// An in-progress press ended away from the button
    pub cancelled: bool,
    /// Pointer is over the button
    pub hovered: bool,
    /// A press started on the button is still in progress
    pub held: bool,
}

/// Debounce/auto-repeat timer for one held key.
///
/// A fresh press triggers immediately; holding triggers again after
/// [`KEY_REPEAT_DELAY`], then every [`KEY_REPEAT_INTERVAL`].
#[derive(Debug, Clone, Copy)]
pub struct TriggerState {
    last_manual_time: f32,
    last_auto_time: f32,
}

impl Default for TriggerState {
    fn default() -> Self {
        Self {
            last_manual_time: f32::NEG_INFINITY,
            last_auto_time: f32::NEG_INFINITY,
        }
    }
}

impl TriggerState {
    /// Advance the timer; returns whether the action fires this frame
    pub fn should_trigger(&mut self, pressed: bool, held: bool, time: f32) -> bool {
        if pressed {
            self.last_manual_time = time;
            self.last_auto_time = time;
            return true;
        }
        if held
            && time - self.last_manual_time > KEY_REPEAT_DELAY
            && time - self.last_auto_time > KEY_REPEAT_INTERVAL
        {
            self.last_auto_time = time;
            return true;
        }
        false
    }
}

/// Input-field text, caret and focus state
#[derive(Debug, Clone, Default)]
pub struct InputFieldState {
    /// Current text content
    pub text: String,
    /// Caret position as a character index in `[0, char count]`
    pub caret: usize,
    /// Whether the field currently has keyboard focus
    pub focused: bool,
    /// Frame on which focus was last gained; a press outside on this
    /// same frame must not steal focus back
    pub focus_gained_frame: Option<crate::draw::FrameToken>,
    /// Time of the last edit or caret move, drives caret blink phase
    pub last_input_time: f32,
    /// Repeat timer for backspace
    pub backspace_trigger: TriggerState,
    /// Repeat timer for delete
    pub delete_trigger: TriggerState,
    /// Repeat timer for the left arrow
    pub left_trigger: TriggerState,
    /// Repeat timer for the right arrow
    pub right_trigger: TriggerState,
}

impl InputFieldState {
    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(byte, _)| byte)
    }

    /// The text as it would read after inserting `c` at the caret
    pub fn with_char_inserted(&self, c: char) -> String {
        let mut candidate = self.text.clone();
        candidate.insert(self.byte_index(self.caret), c);
        candidate
    }

    /// Insert a character at the caret and advance it
    pub fn insert_char(&mut self, c: char) {
        let byte = self.byte_index(self.caret);
        self.text.insert(byte, c);
        self.caret += 1;
    }

    /// Delete the character before the caret, if any
    pub fn delete_back(&mut self) {
        if self.caret > 0 {
            self.caret -= 1;
            let byte = self.byte_index(self.caret);
            self.text.remove(byte);
        }
    }

    /// Delete the character after the caret, if any
    pub fn delete_forward(&mut self) {
        if self.caret < self.char_count() {
            let byte = self.byte_index(self.caret);
            self.text.remove(byte);
        }
    }

    /// Move the caret one character left, clamped to 0
    pub fn move_left(&mut self) {
        self.caret = self.caret.saturating_sub(1);
    }

    /// Move the caret one character right, clamped to the text length
    pub fn move_right(&mut self) {
        self.caret = (self.caret + 1).min(self.char_count());
    }

    /// Text before the caret, used to place the caret quad
    pub fn text_before_caret(&self) -> &str {
        &self.text[..self.byte_index(self.caret)]
    }

    /// Whether the caret is in the visible half of its blink cycle
    pub fn caret_visible(&self, time: f32) -> bool {
        ((time - self.last_input_time) / CARET_BLINK_INTERVAL) as i32 % 2 == 0
    }
}

/// Scrollbar drag state and normalized scroll offset
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollbarState {
    /// Whether the thumb is currently being dragged
    pub is_dragging: bool,
    /// Pointer position along the track axis when the drag started
    pub drag_pointer_start: f32,
    /// Scroll offset when the drag started
    pub drag_scroll_start: f32,
    /// Normalized scroll offset in `[0, 1]`
    pub scroll_t: f32,
}

impl ScrollbarState {
    /// Wheel-scroll by `amount` (positive scrolls down) given the
    /// viewport and content lengths. No effect when the content fits.
    pub fn scroll(&mut self, amount: f32, viewport_len: f32, content_len: f32) {
        let overflow = content_len - viewport_len;
        if overflow > 0.0 {
            self.scroll_t = (self.scroll_t + amount / overflow).clamp(0.0, 1.0);
        }
    }
}

/// Colour-picker drag handles and HSV value
#[derive(Debug, Clone, Copy)]
pub struct ColourPickerState {
    /// Hue in `[0, 1]`
    pub hue: f32,
    /// Saturation in `[0, 1]`
    pub sat: f32,
    /// Value in `[0, 1]`
    pub val: f32,
    /// Whether the hue-strip handle is being dragged
    pub hue_selected: bool,
    /// Whether the saturation/value handle is being dragged
    pub sat_val_selected: bool,
}

impl Default for ColourPickerState {
    fn default() -> Self {
        Self {
            hue: 0.0,
            sat: 1.0,
            val: 1.0,
            hue_selected: false,
            sat_val_selected: false,
        }
    }
}

impl ColourPickerState {
    /// The picked color as RGB
    pub fn rgb(&self) -> Color {
        Color::from_hsv(self.hue, self.sat, self.val)
    }
}

/// Slider drag state
#[derive(Debug, Clone, Copy, Default)]
pub struct SliderState {
    /// Whether the handle is currently being dragged
    pub is_dragging: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_fires_on_press_then_repeats_after_delay() {
        let mut trigger = TriggerState::default();
        assert!(trigger.should_trigger(true, true, 0.0));
        // Held inside the initial delay: silent
        assert!(!trigger.should_trigger(false, true, 0.3));
        assert!(!trigger.should_trigger(false, true, 0.49));
        // Past the delay: fires, then honours the repeat interval
        assert!(trigger.should_trigger(false, true, 0.55));
        assert!(!trigger.should_trigger(false, true, 0.57));
        assert!(trigger.should_trigger(false, true, 0.60));
    }

    #[test]
    fn trigger_never_fires_unheld() {
        let mut trigger = TriggerState::default();
        assert!(!trigger.should_trigger(false, false, 10.0));
    }

    #[test]
    fn caret_edits_stay_on_char_boundaries() {
        let mut state = InputFieldState::default();
        for c in "héllo".chars() {
            state.insert_char(c);
        }
        assert_eq!(state.text, "héllo");
        assert_eq!(state.caret, 5);

        state.move_left();
        state.move_left();
        state.delete_back();
        assert_eq!(state.text, "hélo");
        assert_eq!(state.caret, 2);

        state.delete_forward();
        assert_eq!(state.text, "héo");
    }

    #[test]
    fn caret_clamps_to_text_range() {
        let mut state = InputFieldState::default();
        state.move_left();
        assert_eq!(state.caret, 0);
        state.insert_char('a');
        state.move_right();
        state.move_right();
        assert_eq!(state.caret, 1);
    }

    #[test]
    fn wheel_scroll_is_inert_when_content_fits() {
        let mut state = ScrollbarState::default();
        state.scroll(5.0, 100.0, 80.0);
        assert_eq!(state.scroll_t, 0.0);

        state.scroll(10.0, 100.0, 140.0);
        assert_eq!(state.scroll_t, 0.25);
        state.scroll(100.0, 100.0, 140.0);
        assert_eq!(state.scroll_t, 1.0);
    }
}
