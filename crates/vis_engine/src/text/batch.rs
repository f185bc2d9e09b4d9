//! Text batch manager
//!
//! Text differs from the fixed-size shape records: one submitted run
//! expands to a data-dependent number of glyphs, and only at flush
//! time. Runs accumulate in a [`DrawBatch`] like any other record;
//! expansion goes through pooled [`TextComposer`] scratch buffers, one
//! checked out per opened layer in open order, whose glyph storage is
//! cleared but never deallocated between frames.

use std::collections::VecDeque;

use crate::foundation::math::{Bounds2, Vec2};
use crate::foundation::{Color, Pool, PoolId};
use crate::Anchor;

use super::font::{FontData, FontId};
use super::layout::{self, LayoutSettings};

use crate::draw::batch::DrawBatch;
use crate::draw::commands::{BatchKind, CommandList, DrawCommand, MaterialId, MaterialParams};
use crate::draw::records::GlyphInstance;
use crate::draw::{FrameToken, LayerInfo};

/// One submitted text run
#[derive(Debug, Clone)]
pub struct TextRun {
    /// Text, possibly containing rich-text color directives
    pub text: String,
    /// Font to lay the text out with
    pub font: FontId,
    /// Font size in the layer's space
    pub font_size: f32,
    /// Line spacing multiplier
    pub line_spacing: f32,
    /// Anchor position
    pub pos: Vec2,
    /// Which point of the text block `pos` refers to
    pub anchor: Anchor,
    /// Default color (rich text overrides per glyph)
    pub color: Color,
    /// Clip rectangle captured from the active mask at submission
    pub clip: Bounds2,
}

/// Reusable glyph-expansion scratch buffer
#[derive(Debug, Default)]
pub struct TextComposer {
    glyphs: Vec<GlyphInstance>,
}

/// Batcher for text runs
pub struct TextBatch {
    batch: DrawBatch<TextRun>,
    composers: Pool<TextComposer>,
    layer_composers: VecDeque<PoolId>,
    materials: Pool<MaterialParams>,
    released: bool,
}

impl TextBatch {
    /// Create an empty text batcher
    pub fn new() -> Self {
        Self {
            batch: DrawBatch::new(),
            composers: Pool::with_factory(TextComposer::default),
            layer_composers: VecDeque::new(),
            materials: Pool::with_factory(|| MaterialParams {
                offset: [0.0; 2],
                scale: 1.0,
                screen_space: false,
            }),
            released: false,
        }
    }

    /// Open a new layer slot and check a composer out for it
    pub fn start_layer(&mut self, frame: FrameToken, info: LayerInfo) {
        if self.batch.start_layer(frame, info) {
            self.composers.release_all();
            self.layer_composers.clear();
            self.materials.release_all();
        }
        self.layer_composers.push_back(self.composers.acquire_or_create());
    }

    /// Submit a run to the current layer
    pub fn push(&mut self, run: TextRun) {
        self.batch.push(run);
    }

    /// Expand and flush the next pending layer's runs
    pub fn flush_next_layer(&mut self, commands: &mut CommandList, fonts: &[FontData]) {
        if self.released {
            return;
        }
        let Some(slice) = self.batch.next_layer() else {
            return;
        };
        let Some(composer_id) = self.layer_composers.pop_front() else {
            return;
        };

        if slice.count > 0 {
            let info = slice.info;
            // Expand runs in submission order through the shared layout
            // walk, so emission matches what measurement reported.
            let mut scratch = std::mem::take(
                &mut self
                    .composers
                    .get_mut(composer_id)
                    .expect("layer composer is live")
                    .glyphs,
            );
            for run in &self.batch.records()[slice.start..slice.start + slice.count] {
                if run.text.is_empty() {
                    continue;
                }
                let font = &fonts[run.font.0];
                let settings = LayoutSettings::new(run.font_size * info.scale)
                    .with_line_spacing(run.line_spacing);
                // Glyphs are expanded to final layer-transformed
                // coordinates here, so the material stays identity.
                let pos = run.pos * info.scale + info.offset;
                let clip_min = run.clip.min * info.scale + info.offset;
                let clip_max = run.clip.max * info.scale + info.offset;
                let size = layout::measure(&run.text, font, &settings);
                let origin = layout::block_origin(run.anchor, pos, size, &settings);
                layout::layout_glyphs(&run.text, font, &settings, origin, run.color, |glyph, centre, color| {
                    let glyph_size = glyph.size() * settings.font_size;
                    scratch.push(GlyphInstance {
                        centre: [centre.x, centre.y],
                        size: [glyph_size.x, glyph_size.y],
                        clip_min: [clip_min.x, clip_min.y],
                        clip_max: [clip_max.x, clip_max.y],
                        color: color.to_array(),
                        glyph_index: glyph.glyph_index,
                        _pad: [0; 3],
                    });
                });
            }

            if !scratch.is_empty() {
                let first = commands.glyph_staging.len() as u32;
                let count = scratch.len() as u32;
                commands.glyph_staging.extend_from_slice(&scratch);
                commands.push(DrawCommand::UploadGlyphInstances { first, count });

                let params = MaterialParams {
                    offset: [0.0; 2],
                    scale: 1.0,
                    screen_space: info.screen_space,
                };
                let material_slot = self.materials.acquire_or_create();
                if let Some(pooled) = self.materials.get_mut(material_slot) {
                    *pooled = params;
                }
                let material = MaterialId {
                    batch: BatchKind::Text,
                    slot: material_slot.index() as u32,
                };
                commands.push(DrawCommand::SetMaterial {
                    material,
                    params,
                    first_instance: first,
                });
                commands.push(DrawCommand::DrawGlyphs { material, first, count });
            }

            // Hand the (cleared) scratch buffer back for next frame
            scratch.clear();
            if let Some(composer) = self.composers.get_mut(composer_id) {
                composer.glyphs = scratch;
            }
        }

        self.composers.release(composer_id);
    }

    /// Tear down GPU-side glyph buffers and pooled state
    pub fn release(&mut self, commands: &mut CommandList) {
        self.released = true;
        commands.push(DrawCommand::ReleaseBuffers { batch: BatchKind::Text });
        self.composers.release_all();
        while self.composers.purge_next_available().is_some() {}
        self.materials.release_all();
        while self.materials.purge_next_available().is_some() {}
        log::debug!("text batch released");
    }

    /// Total runs accumulated this frame
    pub fn total_runs(&self) -> usize {
        self.batch.total_records()
    }

    /// Per-layer run counts
    pub fn layer_counts(&self) -> &[u32] {
        self.batch.layer_counts()
    }
}

impl Default for TextBatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::font::test_fonts::unit_font;

    fn layer(offset_x: f32) -> LayerInfo {
        LayerInfo::new(Vec2::new(offset_x, 0.0), 1.0, true)
    }

    fn run(text: &str) -> TextRun {
        TextRun {
            text: text.to_string(),
            font: FontId(0),
            font_size: 10.0,
            line_spacing: 1.0,
            pos: Vec2::zeros(),
            anchor: Anchor::BottomLeft,
            color: Color::WHITE,
            clip: Bounds2::infinite(),
        }
    }

    #[test]
    fn runs_expand_to_glyph_instances_at_flush() {
        let fonts = vec![unit_font()];
        let mut batch = TextBatch::new();
        let frame = FrameToken(1);
        batch.start_layer(frame, layer(0.0));
        batch.push(run("Hi"));
        batch.push(run("A B"));

        let mut commands = CommandList::new();
        batch.flush_next_layer(&mut commands, &fonts);

        // "Hi" = 2 glyphs, "A B" = 2 glyphs (space emits none)
        assert_eq!(commands.glyph_staging.len(), 4);
        assert!(matches!(
            commands.commands()[0],
            DrawCommand::UploadGlyphInstances { first: 0, count: 4 }
        ));
        assert!(matches!(
            commands.commands().last(),
            Some(DrawCommand::DrawGlyphs { count: 4, .. })
        ));
    }

    #[test]
    fn directive_text_emits_no_glyphs() {
        let fonts = vec![unit_font()];
        let mut batch = TextBatch::new();
        batch.start_layer(FrameToken(1), layer(0.0));
        batch.push(run("<color=#FF0000>A</color>B"));

        let mut commands = CommandList::new();
        batch.flush_next_layer(&mut commands, &fonts);
        assert_eq!(commands.glyph_staging.len(), 2);
        assert_eq!(commands.glyph_staging[0].color, Color::RED.to_array());
        assert_eq!(commands.glyph_staging[1].color, Color::WHITE.to_array());
    }

    #[test]
    fn layer_offset_shifts_glyphs_and_clip() {
        let fonts = vec![unit_font()];
        let mut batch = TextBatch::new();
        batch.start_layer(FrameToken(1), layer(100.0));
        let mut r = run("A");
        r.clip = Bounds2::new(Vec2::new(0.0, 0.0), Vec2::new(50.0, 50.0));
        batch.push(r);

        let mut commands = CommandList::new();
        batch.flush_next_layer(&mut commands, &fonts);
        let glyph = &commands.glyph_staging[0];
        assert!(glyph.centre[0] >= 100.0);
        assert_eq!(glyph.clip_min, [100.0, 0.0]);
        assert_eq!(glyph.clip_max, [150.0, 50.0]);
    }

    #[test]
    fn composers_are_recycled_across_frames() {
        let fonts = vec![unit_font()];
        let mut batch = TextBatch::new();
        let mut commands = CommandList::new();

        for frame_index in 1..=4 {
            let frame = FrameToken(frame_index);
            batch.start_layer(frame, layer(0.0));
            batch.push(run("text"));
            batch.start_layer(frame, layer(0.0));
            batch.push(run("more"));
            commands.clear();
            batch.flush_next_layer(&mut commands, &fonts);
            batch.flush_next_layer(&mut commands, &fonts);
        }
        // Two composers serve two layers per frame indefinitely
        assert_eq!(batch.composers.total_count(), 2);
    }

    #[test]
    fn empty_layer_flushes_nothing() {
        let fonts = vec![unit_font()];
        let mut batch = TextBatch::new();
        batch.start_layer(FrameToken(1), layer(0.0));
        let mut commands = CommandList::new();
        batch.flush_next_layer(&mut commands, &fonts);
        assert!(commands.is_empty());
    }
}
