//! Auto-layout, bounds and canvas scopes
//!
//! Scope state lives in pooled [`ScopeStack`](crate::foundation::ScopeStack)s
//! owned by the [`Ui`](super::Ui) context; this module holds the plain
//! data each scope kind carries plus a couple of sizing helpers.

use crate::draw::FrameToken;
use crate::foundation::math::{Bounds2, Vec2};

/// Axis a layout scope grows along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrowDirection {
    /// Cursor advances +x; elements anchor at their top-left
    Right,
    /// Cursor advances -x; elements anchor at their top-right
    Left,
    /// Cursor advances +y; elements anchor at their bottom-left
    Up,
    /// Cursor advances -y; elements anchor at their top-left
    #[default]
    Down,
}

impl GrowDirection {
    /// Unit step along the growth axis (y-up)
    pub fn step(self) -> Vec2 {
        match self {
            Self::Right => Vec2::new(1.0, 0.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Up => Vec2::new(0.0, 1.0),
            Self::Down => Vec2::new(0.0, -1.0),
        }
    }

    /// The extent of an element along this axis
    pub fn extent(self, size: Vec2) -> f32 {
        match self {
            Self::Right | Self::Left => size.x,
            Self::Up | Self::Down => size.y,
        }
    }

    /// Anchor elements take when placed at the cursor
    pub fn element_anchor(self) -> crate::Anchor {
        match self {
            Self::Right | Self::Down => crate::Anchor::TopLeft,
            Self::Left => crate::Anchor::TopRight,
            Self::Up => crate::Anchor::BottomLeft,
        }
    }
}

/// Flow-layout cursor state
#[derive(Debug, Clone, Copy)]
pub struct LayoutScope {
    /// Where the next element is placed
    pub cursor: Vec2,
    /// Growth axis
    pub direction: GrowDirection,
    /// Gap inserted after each element
    pub spacing: f32,
    /// Everything placed while this scope was active
    pub bounds: Bounds2,
    /// Whether any element was placed (an empty scope folds nothing
    /// into its parent)
    pub element_added: bool,
}

impl Default for LayoutScope {
    fn default() -> Self {
        Self {
            cursor: Vec2::zeros(),
            direction: GrowDirection::Down,
            spacing: 0.0,
            bounds: Bounds2::empty(),
            element_added: false,
        }
    }
}

impl LayoutScope {
    /// Fold one element's rectangle in: grow the bounds and advance
    /// the cursor past it.
    pub fn add_element(&mut self, rect: Bounds2) {
        self.bounds.grow(rect.min, rect.max);
        self.cursor += self.direction.step() * (self.direction.extent(rect.size()) + self.spacing);
        self.element_added = true;
    }
}

/// Bounds-accumulation scope
#[derive(Debug, Clone, Copy)]
pub struct BoundsScope {
    /// Accumulated element bounds
    pub bounds: Bounds2,
    /// When false this is a measure-only pass: widgets accumulate
    /// bounds and advance state but emit nothing.
    pub draw: bool,
}

impl Default for BoundsScope {
    fn default() -> Self {
        Self {
            bounds: Bounds2::empty(),
            draw: true,
        }
    }
}

/// Canvas scope mapping UI space onto the screen
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasScope {
    /// Screen-space position of the canvas bottom-left corner, pixels
    pub screen_offset: Vec2,
    /// Canvas size in UI units
    pub size: Vec2,
    /// Host screen size, pixels
    pub screen_size: Vec2,
    /// Pixels per UI unit
    pub scale: f32,
    /// Draw dark bars over the screen area outside the canvas
    pub letterbox: bool,
    /// Frame the canvas was opened in
    pub frame: FrameToken,
}

impl CanvasScope {
    /// UI-space point to screen-space pixels
    pub fn ui_to_screen(&self, p: Vec2) -> Vec2 {
        p * self.scale + self.screen_offset
    }

    /// Screen-space pixels to UI-space point
    pub fn screen_to_ui(&self, p: Vec2) -> Vec2 {
        (p - self.screen_offset) / self.scale
    }
}

/// Per-element length that makes `count` elements plus the gaps
/// between them exactly fill `total`.
pub fn size_to_fit(total: f32, spacing: f32, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    (total - spacing * (count - 1) as f32) / count as f32
}

/// Naive word wrap: break lines so no line exceeds `max_chars`
/// characters, splitting on spaces where possible.
pub fn line_break_by_char_count(text: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut line_len = 0;
    for (i, word) in text.split(' ').enumerate() {
        let word_len = word.chars().count();
        if i > 0 {
            if line_len + 1 + word_len > max_chars && line_len > 0 {
                out.push('\n');
                line_len = 0;
            } else {
                out.push(' ');
                line_len += 1;
            }
        }
        out.push_str(word);
        line_len += word_len;
    }
    out
}
