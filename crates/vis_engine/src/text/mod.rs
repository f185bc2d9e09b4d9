//! Text: font data model, layout engine, and the text batch manager

pub mod batch;
pub mod font;
pub mod layout;

pub use batch::{TextBatch, TextRun};
pub use font::{FontData, FontError, FontId, Glyph, RawGlyph};
pub use layout::LayoutSettings;
