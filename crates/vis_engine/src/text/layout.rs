//! Text layout engine
//!
//! Walks a string one chunk at a time: rich-text directives,
//! whitespace, control characters, printable glyphs. The chunk
//! classifier ([`next_chunk`]) is the single source of truth shared by
//! the measurement pass and the glyph-emission pass, so measured size
//! always matches rendered output.
//!
//! Pen coordinates are in em units with y up; the pen starts at the
//! first line's baseline and newlines move it down. Font size is
//! applied only when positions leave the engine.

use crate::foundation::math::{Bounds2, Vec2};
use crate::foundation::Color;
use crate::Anchor;

use super::font::{FontData, Glyph};

/// Advance of a space for proportional fonts, in em
pub const SPACE_SIZE_EM: f32 = 0.333;
/// Line height, in em
pub const LINE_HEIGHT_EM: f32 = 1.3;
/// Nominal cap ascent above the baseline, in em. The outline parser
/// supplies no vertical metrics, so anchoring uses this fixed value to
/// stay deterministic.
pub const ASCENT_EM: f32 = 0.75;

const COLOR_OPEN: &str = "<color=#";
const COLOR_CLOSE: &str = "</color>";

/// Caller-tunable layout parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    /// Font size: scale from em units to output units
    pub font_size: f32,
    /// Line spacing multiplier (1 = normal)
    pub line_spacing: f32,
    /// Letter spacing multiplier applied to glyph advances
    pub letter_spacing: f32,
    /// Word spacing multiplier applied to space/tab advances
    pub word_spacing: f32,
}

impl LayoutSettings {
    /// Settings with all spacing multipliers at 1
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            line_spacing: 1.0,
            letter_spacing: 1.0,
            word_spacing: 1.0,
        }
    }

    /// Copy with a different line spacing
    pub fn with_line_spacing(self, line_spacing: f32) -> Self {
        Self { line_spacing, ..self }
    }
}

/// What one chunk of text turned out to be
#[derive(Debug)]
pub enum ChunkKind<'f> {
    /// No visual effect (control characters, whitespace)
    Empty,
    /// A printable glyph to emit at the pen position before advancing
    Glyph(&'f Glyph),
    /// `<color=#..>` directive: push a color override
    ColorPush(Color),
    /// `</color>` directive: pop the innermost color override
    ColorPop,
}

/// Result of classifying one chunk
#[derive(Debug)]
pub struct ChunkInfo<'f> {
    /// Chunk classification
    pub kind: ChunkKind<'f>,
    /// Pen position (em units) after the chunk
    pub advance: Vec2,
    /// Bytes of input consumed by the chunk (always at least 1)
    pub consumed: usize,
}

fn space_size(font: &FontData) -> f32 {
    if font.is_monospaced() {
        font.monospace_advance()
    } else {
        SPACE_SIZE_EM
    }
}

/// Classify the chunk starting at byte `index` and compute the pen
/// position after it.
///
/// Directive-looking text that matches neither color pattern falls
/// through to ordinary glyph handling — malformed markup renders as
/// literal text, never as an error.
pub fn next_chunk<'f>(
    text: &str,
    index: usize,
    font: &'f FontData,
    settings: &LayoutSettings,
    pen: Vec2,
) -> ChunkInfo<'f> {
    let rest = &text[index..];
    let c = rest.chars().next().expect("chunk index within text");

    if c == '<' {
        if rest.starts_with(COLOR_OPEN) {
            if let Some(close) = rest.find('>') {
                let hex = &rest[COLOR_OPEN.len()..close];
                if let Some(color) = Color::try_parse_hex(hex) {
                    return ChunkInfo {
                        kind: ChunkKind::ColorPush(color),
                        advance: pen,
                        consumed: close + 1,
                    };
                }
            }
        }
        if rest.starts_with(COLOR_CLOSE) {
            return ChunkInfo {
                kind: ChunkKind::ColorPop,
                advance: pen,
                consumed: COLOR_CLOSE.len(),
            };
        }
    }

    let consumed = c.len_utf8();
    match c {
        ' ' => ChunkInfo {
            kind: ChunkKind::Empty,
            advance: Vec2::new(pen.x + space_size(font) * settings.word_spacing, pen.y),
            consumed,
        },
        '\t' => ChunkInfo {
            kind: ChunkKind::Empty,
            advance: Vec2::new(pen.x + space_size(font) * 4.0 * settings.word_spacing, pen.y),
            consumed,
        },
        '\n' => ChunkInfo {
            kind: ChunkKind::Empty,
            advance: Vec2::new(0.0, pen.y - LINE_HEIGHT_EM * settings.line_spacing),
            consumed,
        },
        c if c.is_control() => ChunkInfo {
            kind: ChunkKind::Empty,
            advance: pen,
            consumed,
        },
        c => {
            let (glyph, _) = font.glyph(c);
            ChunkInfo {
                kind: ChunkKind::Glyph(glyph),
                advance: Vec2::new(pen.x + glyph.advance_width * settings.letter_spacing, pen.y),
                consumed,
            }
        }
    }
}

/// Measure the size of laid-out text in output units: width is the
/// longest line's advance, height is line count times line height.
pub fn measure(text: &str, font: &FontData, settings: &LayoutSettings) -> Vec2 {
    let mut pen = Vec2::zeros();
    let mut max_x: f32 = 0.0;
    let mut lines = 1u32;
    let mut index = 0;
    while index < text.len() {
        let info = next_chunk(text, index, font, settings, pen);
        if info.advance.y < pen.y {
            lines += 1;
        }
        pen = info.advance;
        max_x = max_x.max(pen.x);
        index += info.consumed;
    }
    Vec2::new(
        max_x * settings.font_size,
        lines as f32 * LINE_HEIGHT_EM * settings.line_spacing * settings.font_size,
    )
}

/// First-line baseline origin (output units) for text of `size`
/// anchored at `pos`.
pub fn block_origin(anchor: Anchor, pos: Vec2, size: Vec2, settings: &LayoutSettings) -> Vec2 {
    let ascent = ASCENT_EM * settings.font_size;
    let x = match anchor {
        Anchor::CentreLeft | Anchor::TopLeft | Anchor::BottomLeft | Anchor::TextCentreLeft => pos.x,
        Anchor::CentreRight | Anchor::TopRight | Anchor::BottomRight => pos.x - size.x,
        _ => pos.x - size.x * 0.5,
    };
    let y = match anchor {
        Anchor::TopLeft | Anchor::TopRight | Anchor::CentreTop => pos.y - ascent,
        Anchor::Centre | Anchor::CentreLeft | Anchor::CentreRight => pos.y + size.y * 0.5 - ascent,
        Anchor::BottomLeft | Anchor::BottomRight | Anchor::CentreBottom => pos.y + size.y - ascent,
        // First-line em-box centring: independent of the text content
        Anchor::TextCentreLeft | Anchor::TextFirstLineCentre | Anchor::TextCentre => pos.y - ascent * 0.5,
    };
    Vec2::new(x, y)
}

/// Bounding box of text anchored at `pos`
pub fn bounds(text: &str, font: &FontData, settings: &LayoutSettings, pos: Vec2, anchor: Anchor) -> Bounds2 {
    let size = measure(text, font, settings);
    let origin = block_origin(anchor, pos, size, settings);
    let top = origin.y + ASCENT_EM * settings.font_size;
    Bounds2::new(Vec2::new(origin.x, top - size.y), Vec2::new(origin.x + size.x, top))
}

/// Walk the text and emit one positioned glyph per printable chunk.
///
/// `emit` receives the glyph, its quad centre in output units relative
/// to the block origin passed in, and the effective color after
/// rich-text overrides. Visits chunks in exactly the order
/// [`measure`] does.
pub fn layout_glyphs<F>(
    text: &str,
    font: &FontData,
    settings: &LayoutSettings,
    origin: Vec2,
    default_color: Color,
    mut emit: F,
) where
    F: FnMut(&Glyph, Vec2, Color),
{
    let mut pen = Vec2::zeros();
    let mut color_stack: Vec<Color> = Vec::new();
    let mut index = 0;
    while index < text.len() {
        let info = next_chunk(text, index, font, settings, pen);
        match info.kind {
            ChunkKind::Glyph(glyph) => {
                let centre = origin + (pen + glyph.centre()) * settings.font_size;
                let color = color_stack.last().copied().unwrap_or(default_color);
                emit(glyph, centre, color);
            }
            ChunkKind::ColorPush(color) => color_stack.push(color),
            ChunkKind::ColorPop => {
                color_stack.pop();
            }
            ChunkKind::Empty => {}
        }
        pen = info.advance;
        index += info.consumed;
    }
}
