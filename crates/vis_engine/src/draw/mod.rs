//! Layer and draw dispatcher
//!
//! [`DrawContext`] owns the per-frame layer list, the concrete
//! batchers, the clip-mask scope stack and the font registry. The host
//! opens layers and submits shapes/text during its update pass, then
//! calls [`DrawContext::flush`] exactly once from its "about to
//! render" hook; a duplicate flush in the same frame is a no-op.
//!
//! Ordering guarantee: layers flush in open order, and within a layer
//! every sphere record is drawn before every shape record, and every
//! shape record before every text record. Compositing shapes over text
//! requires opening a new layer.

pub mod batch;
pub mod commands;
pub mod instanced;
pub mod records;

pub use commands::{BatchKind, CommandList, DrawCommand, IndirectArgs, MaterialId, MaterialParams};
pub use records::{GlyphInstance, ShapeData, ShapeKind, SphereData};

use crate::foundation::math::{Bounds2, Vec2, Vec3};
use crate::foundation::{Color, ScopeStack};
use crate::text::batch::{TextBatch, TextRun};
use crate::text::font::{FontData, FontId};
use crate::text::layout::{self, LayoutSettings};
use crate::Anchor;

use instanced::InstancedBatch;

/// Opaque per-frame counter supplied by the host. A change of token is
/// what resets all per-frame batch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FrameToken(
    /// Raw counter value
    pub u64,
);

/// Transform info for one layer, immutable once the layer is opened
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerInfo {
    /// Translation applied to everything in the layer
    pub offset: Vec2,
    /// Uniform scale applied to everything in the layer
    pub scale: f32,
    /// Draw in screen space (pixels) instead of world space
    pub screen_space: bool,
}

impl LayerInfo {
    /// Build layer info
    pub fn new(offset: Vec2, scale: f32, screen_space: bool) -> Self {
        Self {
            offset,
            scale,
            screen_space,
        }
    }
}

/// Handle to a reserved quad slot, valid for the frame it was reserved in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawId(usize);

/// One entry of the clip-mask stack
#[derive(Debug, Default)]
struct MaskScope {
    min: Vec2,
    max: Vec2,
}

/// Frame lifecycle orchestrator and submission API
pub struct DrawContext {
    shapes: InstancedBatch<ShapeData>,
    spheres: InstancedBatch<SphereData>,
    text: TextBatch,
    fonts: Vec<FontData>,
    mask_scopes: ScopeStack<MaskScope>,
    active_mask: Bounds2,
    current_frame: Option<FrameToken>,
    layer_count: usize,
    last_flush_frame: Option<FrameToken>,
    released: bool,
}

impl DrawContext {
    /// Create a draw context with no fonts registered
    pub fn new() -> Self {
        Self {
            shapes: InstancedBatch::new(),
            spheres: InstancedBatch::new(),
            text: TextBatch::new(),
            fonts: Vec::new(),
            mask_scopes: ScopeStack::new(),
            active_mask: Bounds2::infinite(),
            current_frame: None,
            layer_count: 0,
            last_flush_frame: None,
            released: false,
        }
    }

    /// Register font data built from a parsed font file. Fonts live
    /// for the whole session.
    pub fn register_font(&mut self, font: FontData) -> FontId {
        self.fonts.push(font);
        FontId(self.fonts.len() - 1)
    }

    /// Borrow a registered font
    pub fn font(&self, id: FontId) -> &FontData {
        &self.fonts[id.0]
    }

    /// Open a new layer. The first call carrying a new frame token
    /// resets all batch state; all subsequent submissions attach to
    /// the most recently opened layer.
    pub fn start_layer(&mut self, frame: FrameToken, offset: Vec2, scale: f32, screen_space: bool) {
        if self.current_frame != Some(frame) {
            self.current_frame = Some(frame);
            self.layer_count = 0;
            log::trace!("frame {frame:?}: batch state reset");
        }
        self.layer_count += 1;
        let info = LayerInfo::new(offset, scale, screen_space);
        self.shapes.start_layer(frame, info);
        self.spheres.start_layer(frame, info);
        self.text.start_layer(frame, info);
    }

    /// Number of layers opened this frame
    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    //  --------------------------- Submission ---------------------------

    /// Solid quad
    pub fn quad(&mut self, centre: Vec2, size: Vec2, color: Color) {
        self.shapes.push(ShapeData::quad(centre, size, color, self.active_mask));
    }

    /// Quad outline with the given stroke thickness
    pub fn quad_outline(&mut self, centre: Vec2, size: Vec2, thickness: f32, color: Color) {
        self.shapes
            .push(ShapeData::quad_outline(centre, size, thickness, color, self.active_mask));
    }

    /// Circular point
    pub fn point(&mut self, centre: Vec2, radius: f32, color: Color) {
        self.shapes.push(ShapeData::point(centre, radius, color, self.active_mask));
    }

    /// Saturation/value gradient quad for the colour picker
    pub fn sat_val_quad(&mut self, centre: Vec2, size: Vec2, hue: f32) {
        self.shapes.push(ShapeData::sat_val_quad(centre, size, hue, self.active_mask));
    }

    /// Hue gradient quad for the colour picker
    pub fn hue_quad(&mut self, centre: Vec2, size: Vec2) {
        self.shapes.push(ShapeData::hue_quad(centre, size, self.active_mask));
    }

    /// Sphere marker in world space
    pub fn sphere(&mut self, centre: Vec3, radius: f32, color: Color) {
        self.spheres
            .push(SphereData::new([centre.x, centre.y, centre.z], radius, color));
    }

    /// Text run. The active clip mask is captured with the run.
    pub fn text(&mut self, font: FontId, text: &str, font_size: f32, pos: Vec2, anchor: Anchor, color: Color) {
        self.text.push(TextRun {
            text: text.to_string(),
            font,
            font_size,
            line_spacing: 1.0,
            pos,
            anchor,
            color,
            clip: self.active_mask,
        });
    }

    /// Reserve a quad slot in the current layer's draw order, to be
    /// filled in later this frame with [`DrawContext::modify_quad`].
    pub fn reserve_quad(&mut self) -> DrawId {
        DrawId(self.shapes.push(ShapeData::quad(
            Vec2::zeros(),
            Vec2::zeros(),
            Color::CLEAR,
            self.active_mask,
        )))
    }

    /// Fill in a previously reserved quad slot
    pub fn modify_quad(&mut self, id: DrawId, centre: Vec2, size: Vec2, color: Color) {
        let clip = self.active_mask;
        if let Some(record) = self.shapes.record_mut(id.0) {
            *record = ShapeData::quad(centre, size, color, clip);
        }
    }

    //  --------------------------- Masks ---------------------------

    /// Push a clip-mask rectangle; submissions are clipped to it until
    /// the matching [`DrawContext::pop_mask`].
    pub fn push_mask(&mut self, min: Vec2, max: Vec2) {
        let scope = self.mask_scopes.enter();
        scope.min = min;
        scope.max = max;
        self.active_mask = Bounds2::new(min, max);
    }

    /// Pop the innermost mask, restoring the parent's clip rectangle
    /// (or the infinite mask when none remains).
    pub fn pop_mask(&mut self) {
        self.mask_scopes.exit();
        self.active_mask = match self.mask_scopes.current() {
            Some(scope) => Bounds2::new(scope.min, scope.max),
            None => Bounds2::infinite(),
        };
    }

    /// Whether a point lies inside the active mask (widgets use this
    /// to suppress pointer hits on clipped-out content)
    pub fn point_inside_mask(&self, point: Vec2) -> bool {
        self.active_mask.contains(point)
    }

    //  --------------------------- Measurement ---------------------------

    /// Size of laid-out text at the given font size
    pub fn measure_text(&self, font: FontId, text: &str, font_size: f32) -> Vec2 {
        layout::measure(text, &self.fonts[font.0], &LayoutSettings::new(font_size))
    }

    /// Bounding box of text anchored at `pos`
    pub fn text_bounds(&self, font: FontId, text: &str, font_size: f32, pos: Vec2, anchor: Anchor) -> Bounds2 {
        layout::bounds(text, &self.fonts[font.0], &LayoutSettings::new(font_size), pos, anchor)
    }

    //  --------------------------- Flush ---------------------------

    /// Convert every accumulated batch into GPU commands, exactly once
    /// per frame. Call from the host's "about to render" hook; calling
    /// again in the same frame is a no-op.
    pub fn flush(&mut self, commands: &mut CommandList) {
        let Some(frame) = self.current_frame else {
            return;
        };
        if self.last_flush_frame == Some(frame) {
            log::trace!("duplicate flush for frame {frame:?} ignored");
            return;
        }
        self.last_flush_frame = Some(frame);

        commands.clear();
        for _ in 0..self.layer_count {
            self.spheres.flush_next_layer(commands);
            self.shapes.flush_next_layer(commands);
            self.text.flush_next_layer(commands, &self.fonts);
        }
        log::trace!(
            "flushed frame {frame:?}: {} layers, {} commands",
            self.layer_count,
            commands.len()
        );
    }

    /// Tear down every batch's GPU-side resources
    pub fn release(&mut self, commands: &mut CommandList) {
        self.spheres.release(commands);
        self.shapes.release(commands);
        self.text.release(commands);
        self.released = true;
    }

    /// Whether [`DrawContext::release`] has been called
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Default for DrawContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::font::test_fonts::unit_font;

    fn context_with_font() -> (DrawContext, FontId) {
        let mut ctx = DrawContext::new();
        let font = ctx.register_font(unit_font());
        (ctx, font)
    }

    /// Partition a command trace into per-layer groups of (shape draw
    /// count, text draw position) for ordering checks.
    fn shape_before_text(commands: &CommandList) -> bool {
        // Within each layer the trace must never show a shape draw
        // after a glyph draw. Layers are delimited by DrawGlyphs or by
        // the next layer's shape commands; a global scan is enough
        // here because each test uses distinguishable layers.
        let mut ok = true;
        let mut saw_text_in_layer = false;
        for command in commands.commands() {
            match command {
                DrawCommand::DrawGlyphs { .. } => saw_text_in_layer = true,
                DrawCommand::DrawIndirect { batch: BatchKind::Shapes, .. } => {
                    if saw_text_in_layer {
                        ok = false;
                    }
                }
                DrawCommand::UploadGlyphInstances { .. } => {
                    // Glyph upload marks the start of a text section;
                    // the next shape draw belongs to the next layer.
                    saw_text_in_layer = true;
                }
                _ => {}
            }
            if matches!(command, DrawCommand::DrawGlyphs { .. }) {
                // End of a layer's text section
                saw_text_in_layer = false;
            }
        }
        ok
    }

    #[test]
    fn shapes_flush_before_text_within_each_layer() {
        let (mut ctx, font) = context_with_font();
        let frame = FrameToken(1);

        ctx.start_layer(frame, Vec2::zeros(), 1.0, true);
        ctx.text(font, "under", 10.0, Vec2::zeros(), Anchor::Centre, Color::WHITE);
        ctx.quad(Vec2::zeros(), Vec2::new(5.0, 5.0), Color::RED);

        ctx.start_layer(frame, Vec2::zeros(), 1.0, true);
        ctx.quad(Vec2::zeros(), Vec2::new(2.0, 2.0), Color::BLUE);
        ctx.text(font, "over", 10.0, Vec2::zeros(), Anchor::Centre, Color::WHITE);

        let mut commands = CommandList::new();
        ctx.flush(&mut commands);

        assert!(shape_before_text(&commands));
        // Both layers produced one shape draw and one glyph draw
        let shape_draws = commands
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawIndirect { batch: BatchKind::Shapes, .. }))
            .count();
        let glyph_draws = commands
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawGlyphs { .. }))
            .count();
        assert_eq!(shape_draws, 2);
        assert_eq!(glyph_draws, 2);
    }

    #[test]
    fn duplicate_flush_is_noop() {
        let (mut ctx, _) = context_with_font();
        let frame = FrameToken(5);
        ctx.start_layer(frame, Vec2::zeros(), 1.0, true);
        ctx.quad(Vec2::zeros(), Vec2::new(1.0, 1.0), Color::WHITE);

        let mut commands = CommandList::new();
        ctx.flush(&mut commands);
        let first_len = commands.len();
        assert!(first_len > 0);

        ctx.flush(&mut commands);
        assert_eq!(commands.len(), first_len);
    }

    #[test]
    fn new_frame_token_reenables_flush() {
        let (mut ctx, _) = context_with_font();
        let mut commands = CommandList::new();

        ctx.start_layer(FrameToken(1), Vec2::zeros(), 1.0, true);
        ctx.quad(Vec2::zeros(), Vec2::new(1.0, 1.0), Color::WHITE);
        ctx.flush(&mut commands);
        assert!(!commands.is_empty());

        ctx.start_layer(FrameToken(2), Vec2::zeros(), 1.0, true);
        ctx.quad(Vec2::zeros(), Vec2::new(1.0, 1.0), Color::WHITE);
        ctx.flush(&mut commands);
        assert!(!commands.is_empty());
    }

    #[test]
    fn mask_stack_restores_parent_on_pop() {
        let (mut ctx, _) = context_with_font();
        assert!(ctx.point_inside_mask(Vec2::new(1e6, 1e6)));

        ctx.push_mask(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        ctx.push_mask(Vec2::new(2.0, 2.0), Vec2::new(4.0, 4.0));
        assert!(!ctx.point_inside_mask(Vec2::new(8.0, 8.0)));

        ctx.pop_mask();
        assert!(ctx.point_inside_mask(Vec2::new(8.0, 8.0)));
        assert!(!ctx.point_inside_mask(Vec2::new(11.0, 8.0)));

        ctx.pop_mask();
        assert!(ctx.point_inside_mask(Vec2::new(1e6, 1e6)));
    }

    #[test]
    fn submissions_capture_active_mask() {
        let (mut ctx, _) = context_with_font();
        ctx.start_layer(FrameToken(1), Vec2::zeros(), 1.0, true);
        ctx.push_mask(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
        ctx.quad(Vec2::zeros(), Vec2::new(1.0, 1.0), Color::WHITE);
        ctx.pop_mask();
        ctx.quad(Vec2::zeros(), Vec2::new(1.0, 1.0), Color::WHITE);

        let mut commands = CommandList::new();
        ctx.flush(&mut commands);
        assert_eq!(commands.shape_staging[0].clip_min, [1.0, 2.0]);
        assert_eq!(commands.shape_staging[0].clip_max, [3.0, 4.0]);
        assert!(commands.shape_staging[1].clip_max[0] > 1e30);
    }

    #[test]
    fn reserve_then_modify_keeps_draw_order_slot() {
        let (mut ctx, _) = context_with_font();
        ctx.start_layer(FrameToken(1), Vec2::zeros(), 1.0, true);
        let id = ctx.reserve_quad();
        ctx.quad(Vec2::new(9.0, 9.0), Vec2::new(1.0, 1.0), Color::RED);
        ctx.modify_quad(id, Vec2::new(5.0, 5.0), Vec2::new(2.0, 2.0), Color::BLUE);

        let mut commands = CommandList::new();
        ctx.flush(&mut commands);
        // Reserved slot drew first despite being filled last
        assert_eq!(commands.shape_staging[0].centre, [5.0, 5.0]);
        assert_eq!(commands.shape_staging[1].centre, [9.0, 9.0]);
    }

    #[test]
    #[should_panic(expected = "no open layer")]
    fn submission_without_layer_is_fatal() {
        let (mut ctx, _) = context_with_font();
        ctx.quad(Vec2::zeros(), Vec2::new(1.0, 1.0), Color::WHITE);
    }

    #[test]
    fn release_emits_teardown_for_every_batch() {
        let (mut ctx, _) = context_with_font();
        let mut commands = CommandList::new();
        ctx.release(&mut commands);
        let kinds: Vec<_> = commands
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::ReleaseBuffers { batch } => Some(*batch),
                _ => None,
            })
            .collect();
        assert!(kinds.contains(&BatchKind::Shapes));
        assert!(kinds.contains(&BatchKind::Spheres));
        assert!(kinds.contains(&BatchKind::Text));
        assert!(ctx.is_released());
    }
}
