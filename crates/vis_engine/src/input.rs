//! Per-frame input snapshot
//!
//! The host samples its windowing backend once per frame and hands the
//! result to the UI as an immutable [`InputFrame`]. Widgets never talk
//! to the platform directly; everything they need (pointer, buttons,
//! keys, typed text, time) travels through this snapshot.

use std::collections::HashSet;

use crate::draw::FrameToken;
use crate::foundation::math::Vec2;

/// Pointer buttons tracked by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary button
    Left,
    /// Secondary button
    Right,
    /// Middle button / wheel click
    Middle,
}

/// Keys the widgets react to. Printable characters arrive through
/// [`InputFrame::typed`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Delete the character before the caret
    Backspace,
    /// Delete the character after the caret
    Delete,
    /// Move the caret left
    LeftArrow,
    /// Move the caret right
    RightArrow,
    /// Jump the caret to the start of the text
    Home,
    /// Jump the caret to the end of the text
    End,
    /// Drop focus / cancel
    Escape,
    /// Confirm
    Enter,
    /// Focus traversal
    Tab,
}

/// Edge and level state for one pointer button
#[derive(Debug, Clone, Copy, Default)]
struct ButtonState {
    pressed: bool,
    released: bool,
    held: bool,
}

/// One frame's complete input state
#[derive(Debug, Clone)]
pub struct InputFrame {
    /// Host frame token, shared with the draw context
    pub frame: FrameToken,
    /// Seconds since the host started, used for blink and auto-repeat
    pub time: f32,
    /// Pointer position in screen space (pixels, y-up)
    pub pointer: Vec2,
    /// Vertical scroll delta this frame
    pub scroll_delta: f32,
    /// Characters typed this frame, in order
    pub typed: String,
    left: ButtonState,
    right: ButtonState,
    middle: ButtonState,
    keys_pressed: HashSet<Key>,
    keys_held: HashSet<Key>,
}

impl InputFrame {
    /// Create an empty snapshot for the given frame
    pub fn new(frame: FrameToken, time: f32) -> Self {
        Self {
            frame,
            time,
            pointer: Vec2::zeros(),
            scroll_delta: 0.0,
            typed: String::new(),
            left: ButtonState::default(),
            right: ButtonState::default(),
            middle: ButtonState::default(),
            keys_pressed: HashSet::new(),
            keys_held: HashSet::new(),
        }
    }

    fn button(&self, button: PointerButton) -> &ButtonState {
        match button {
            PointerButton::Left => &self.left,
            PointerButton::Right => &self.right,
            PointerButton::Middle => &self.middle,
        }
    }

    fn button_mut(&mut self, button: PointerButton) -> &mut ButtonState {
        match button {
            PointerButton::Left => &mut self.left,
            PointerButton::Right => &mut self.right,
            PointerButton::Middle => &mut self.middle,
        }
    }

    /// Record a press edge for this frame (sets held as well)
    pub fn press(&mut self, button: PointerButton) {
        let state = self.button_mut(button);
        state.pressed = true;
        state.held = true;
    }

    /// Record a release edge for this frame
    pub fn release(&mut self, button: PointerButton) {
        let state = self.button_mut(button);
        state.released = true;
        state.held = false;
    }

    /// Mark a button as held without a fresh press edge
    pub fn hold(&mut self, button: PointerButton) {
        self.button_mut(button).held = true;
    }

    /// Whether the button went down this frame
    pub fn is_pressed(&self, button: PointerButton) -> bool {
        self.button(button).pressed
    }

    /// Whether the button went up this frame
    pub fn is_released(&self, button: PointerButton) -> bool {
        self.button(button).released
    }

    /// Whether the button is currently down
    pub fn is_held(&self, button: PointerButton) -> bool {
        self.button(button).held
    }

    /// Record a key press edge (sets held as well)
    pub fn press_key(&mut self, key: Key) {
        self.keys_pressed.insert(key);
        self.keys_held.insert(key);
    }

    /// Mark a key as held without a fresh press edge
    pub fn hold_key(&mut self, key: Key) {
        self.keys_held.insert(key);
    }

    /// Whether the key went down this frame
    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Whether the key is currently down
    pub fn is_key_held(&self, key: Key) -> bool {
        self.keys_held.contains(&key)
    }

    /// Append a typed character
    pub fn type_char(&mut self, c: char) {
        self.typed.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_sets_edge_and_level() {
        let mut input = InputFrame::new(FrameToken(1), 0.0);
        input.press(PointerButton::Left);
        assert!(input.is_pressed(PointerButton::Left));
        assert!(input.is_held(PointerButton::Left));
        assert!(!input.is_released(PointerButton::Left));
        assert!(!input.is_pressed(PointerButton::Right));
    }

    #[test]
    fn hold_without_press_has_no_edge() {
        let mut input = InputFrame::new(FrameToken(1), 0.0);
        input.hold(PointerButton::Left);
        assert!(!input.is_pressed(PointerButton::Left));
        assert!(input.is_held(PointerButton::Left));
    }

    #[test]
    fn key_edges_are_distinct_from_level() {
        let mut input = InputFrame::new(FrameToken(1), 0.0);
        input.hold_key(Key::Backspace);
        assert!(!input.is_key_pressed(Key::Backspace));
        assert!(input.is_key_held(Key::Backspace));

        input.press_key(Key::LeftArrow);
        assert!(input.is_key_pressed(Key::LeftArrow));
        assert!(input.is_key_held(Key::LeftArrow));
    }

    #[test]
    fn typed_characters_accumulate_in_order() {
        let mut input = InputFrame::new(FrameToken(1), 0.0);
        input.type_char('h');
        input.type_char('i');
        assert_eq!(input.typed, "hi");
    }
}
