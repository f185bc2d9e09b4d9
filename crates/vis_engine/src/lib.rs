//! # Vis Engine
//!
//! A per-frame batching renderer with an immediate-mode UI layer. The
//! host describes shapes, text and widgets every frame; the engine
//! accumulates everything into layered batches and converts them into
//! a replayable GPU command list exactly once per frame.
//!
//! ## Features
//!
//! - **Layered batching**: unbounded layers per frame, one instance
//!   upload per frame, one indirect draw per non-empty layer
//! - **Text layout**: em-unit glyph model with inline
//!   `<color=#RRGGBB>` rich-text directives
//! - **Immediate-mode UI**: buttons, input fields, scrollbars, colour
//!   pickers and sliders with no retained widget tree
//! - **Auto-layout**: flow-layout, bounds and clip-mask scopes that
//!   nest and compose
//! - **Backend-agnostic**: draw output is a command list the host
//!   replays against its own GPU API
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vis_engine::prelude::*;
//!
//! # fn load_font() -> vis_engine::text::FontData { unimplemented!() }
//! let mut draw = DrawContext::new();
//! let font = draw.register_font(load_font());
//! let mut ui = Ui::default();
//! let mut commands = CommandList::new();
//!
//! // Per frame:
//! let input = InputFrame::new(FrameToken(1), 0.0);
//! ui.begin_canvas(&mut draw, input.frame, Vec2::new(1920.0, 1080.0));
//! if ui
//!     .button_fit_to_text(
//!         &mut draw,
//!         &input,
//!         &UiHandle::from("play"),
//!         "Play",
//!         font,
//!         Vec2::new(50.0, 30.0),
//!         Anchor::Centre,
//!         true,
//!     )
//!     .released
//! {
//!     // start the game
//! }
//! ui.end_canvas(&mut draw);
//! draw.flush(&mut commands);
//! // replay `commands` against the GPU
//! ```

pub mod anchor;
pub mod draw;
pub mod foundation;
pub mod input;
pub mod text;
pub mod ui;

pub use anchor::Anchor;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        draw::{CommandList, DrawCommand, DrawContext, FrameToken},
        foundation::{math::Bounds2, Color, Vec2},
        input::{InputFrame, Key, PointerButton},
        text::{FontData, FontId, LayoutSettings, RawGlyph},
        ui::{GrowDirection, Ui, UiHandle, UiTheme},
        Anchor,
    };
}
