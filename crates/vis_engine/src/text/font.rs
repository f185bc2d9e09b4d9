//! Font data model
//!
//! Consumes the output of an outline-font parser (an external
//! collaborator) and rescales every coordinate into font-size
//! independent em units. A font always resolves any code point to a
//! glyph: unknown code points fall back to the designated missing
//! glyph (glyph index 0), whose presence is a hard construction
//! precondition.

use std::collections::HashMap;

use thiserror::Error;

use crate::foundation::math::{Bounds2, Vec2};

/// Handle to a font registered with the draw context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(
    /// Registry index
    pub usize,
);

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors raised while building font data
#[derive(Debug, Error)]
pub enum FontError {
    /// The parsed glyph set has no glyph with glyph index 0, so there
    /// is nothing to fall back to for unknown code points.
    #[error("font provides no missing-glyph (glyph index 0) fallback")]
    NoMissingGlyph,
    /// The parsed glyph set is empty
    #[error("font contains no glyphs")]
    Empty,
}

/// Raw per-glyph record as produced by the outline-font parser,
/// in the font's own design units.
#[derive(Debug, Clone)]
pub struct RawGlyph {
    /// Unicode code point this glyph renders
    pub unicode: u32,
    /// Glyph index within the font (0 = missing glyph)
    pub glyph_index: u32,
    /// Bounding box min corner in design units
    pub min: (i32, i32),
    /// Bounding box max corner in design units
    pub max: (i32, i32),
    /// Horizontal advance in design units
    pub advance_width: i32,
    /// Left-side bearing in design units
    pub left_side_bearing: i32,
    /// Closed contour point loops in design units
    pub contours: Vec<Vec<(f32, f32)>>,
}

/// Processed glyph with everything in em units
#[derive(Debug, Clone)]
pub struct Glyph {
    /// Unicode code point
    pub unicode: u32,
    /// Glyph index within the font
    pub glyph_index: u32,
    /// Bounding box, em units
    pub bounds: Bounds2,
    /// Horizontal advance, em units
    pub advance_width: f32,
    /// Left-side bearing, em units
    pub left_side_bearing: f32,
    /// Contour point loops, em units
    pub contours: Vec<Vec<Vec2>>,
}

impl Glyph {
    /// Centre of the glyph bounds
    pub fn centre(&self) -> Vec2 {
        self.bounds.centre()
    }

    /// Size of the glyph bounds
    pub fn size(&self) -> Vec2 {
        self.bounds.size()
    }

    fn from_raw(raw: &RawGlyph, em_scale: f32) -> Self {
        Self {
            unicode: raw.unicode,
            glyph_index: raw.glyph_index,
            bounds: Bounds2::new(
                Vec2::new(raw.min.0 as f32, raw.min.1 as f32) * em_scale,
                Vec2::new(raw.max.0 as f32, raw.max.1 as f32) * em_scale,
            ),
            advance_width: raw.advance_width as f32 * em_scale,
            left_side_bearing: raw.left_side_bearing as f32 * em_scale,
            contours: raw
                .contours
                .iter()
                .map(|loop_points| {
                    loop_points
                        .iter()
                        .map(|&(x, y)| Vec2::new(x, y) * em_scale)
                        .collect()
                })
                .collect(),
        }
    }
}

/// Glyph store for one font, built once at load time
#[derive(Debug)]
pub struct FontData {
    glyphs: Vec<Glyph>,
    lookup: HashMap<u32, usize>,
    missing_glyph: usize,
    monospaced: bool,
}

impl FontData {
    /// Build font data from parsed raw glyphs.
    ///
    /// `units_per_em` is the font's design-unit scale; every
    /// coordinate and advance is multiplied by its reciprocal so the
    /// stored values are independent of font size.
    ///
    /// # Errors
    /// [`FontError::Empty`] for an empty glyph set, and
    /// [`FontError::NoMissingGlyph`] when no glyph has glyph index 0 —
    /// lookup could then fail outright, which the data model forbids.
    pub fn new(raw_glyphs: &[RawGlyph], units_per_em: u32, monospaced: bool) -> FontResult<Self> {
        if raw_glyphs.is_empty() {
            return Err(FontError::Empty);
        }
        let em_scale = 1.0 / units_per_em as f32;

        let glyphs: Vec<Glyph> = raw_glyphs.iter().map(|raw| Glyph::from_raw(raw, em_scale)).collect();

        let mut lookup = HashMap::with_capacity(glyphs.len());
        let mut missing_glyph = None;
        for (index, glyph) in glyphs.iter().enumerate() {
            lookup.insert(glyph.unicode, index);
            if glyph.glyph_index == 0 {
                missing_glyph = Some(index);
            }
        }
        let missing_glyph = missing_glyph.ok_or(FontError::NoMissingGlyph)?;

        log::debug!(
            "font loaded: {} glyphs, monospaced = {}, units per em = {}",
            glyphs.len(),
            monospaced,
            units_per_em
        );

        Ok(Self {
            glyphs,
            lookup,
            missing_glyph,
            monospaced,
        })
    }

    /// Look up the glyph for a code point. Never fails: a miss returns
    /// the missing glyph together with `false`.
    pub fn glyph(&self, codepoint: char) -> (&Glyph, bool) {
        match self.lookup.get(&(codepoint as u32)) {
            Some(&index) => (&self.glyphs[index], true),
            None => (&self.glyphs[self.missing_glyph], false),
        }
    }

    /// The designated missing glyph (glyph index 0)
    pub fn missing_glyph(&self) -> &Glyph {
        &self.glyphs[self.missing_glyph]
    }

    /// Whether every glyph shares one advance width
    pub fn is_monospaced(&self) -> bool {
        self.monospaced
    }

    /// The advance width used for every character of a monospaced
    /// font. Taken from the first glyph, matching construction order.
    pub fn monospace_advance(&self) -> f32 {
        self.glyphs[0].advance_width
    }

    /// All glyphs in construction order
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }
}

#[cfg(test)]
pub(crate) mod test_fonts {
    use super::*;

    /// Font where every printable ASCII glyph has a 1.0 em advance and
    /// a 0.5 x 0.7 em box. Glyph index 0 maps to U+FFFD.
    pub fn unit_font() -> FontData {
        let mut raw = vec![RawGlyph {
            unicode: 0xFFFD,
            glyph_index: 0,
            min: (0, 0),
            max: (500, 700),
            advance_width: 1000,
            left_side_bearing: 0,
            contours: Vec::new(),
        }];
        for (i, c) in (b'!'..=b'~').enumerate() {
            raw.push(RawGlyph {
                unicode: c as u32,
                glyph_index: (i + 1) as u32,
                min: (0, 0),
                max: (500, 700),
                advance_width: 1000,
                left_side_bearing: 0,
                contours: Vec::new(),
            });
        }
        FontData::new(&raw, 1000, false).expect("test font is well formed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn coordinates_are_rescaled_to_em_units() {
        let font = test_fonts::unit_font();
        let (glyph, found) = font.glyph('A');
        assert!(found);
        assert_relative_eq!(glyph.advance_width, 1.0);
        assert_relative_eq!(glyph.bounds.width(), 0.5);
        assert_relative_eq!(glyph.bounds.height(), 0.7);
    }

    #[test]
    fn lookup_miss_falls_back_to_missing_glyph() {
        let font = test_fonts::unit_font();
        let (glyph, found) = font.glyph('\u{4E00}');
        assert!(!found);
        assert_eq!(glyph.glyph_index, 0);
        assert_eq!(glyph.unicode, font.missing_glyph().unicode);
    }

    #[test]
    fn lookup_hit_returns_that_glyph() {
        let font = test_fonts::unit_font();
        let (glyph, found) = font.glyph('!');
        assert!(found);
        assert_eq!(glyph.unicode, '!' as u32);
    }

    #[test]
    fn construction_without_missing_glyph_fails() {
        let raw = [RawGlyph {
            unicode: 'A' as u32,
            glyph_index: 5,
            min: (0, 0),
            max: (10, 10),
            advance_width: 10,
            left_side_bearing: 0,
            contours: Vec::new(),
        }];
        assert!(matches!(
            FontData::new(&raw, 1000, false),
            Err(FontError::NoMissingGlyph)
        ));
    }

    #[test]
    fn construction_of_empty_font_fails() {
        assert!(matches!(FontData::new(&[], 1000, false), Err(FontError::Empty)));
    }
}
