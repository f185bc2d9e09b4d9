//! Fixed-layout instance records
//!
//! The closed set of draw record types: shapes (quad, outline, point,
//! and the colour-picker gradient quads), spheres, and expanded text
//! glyphs. Each is `#[repr(C)]` + `Pod` so a frame's whole record
//! array can be memcpy'd into a GPU buffer in one upload.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{Bounds2, Vec2};
use crate::foundation::Color;

use super::commands::{BatchKind, CommandList, DrawCommand};

/// Shape variant selector stored in [`ShapeData::kind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ShapeKind {
    /// Solid quad
    Quad = 0,
    /// Quad outline; stroke thickness in [`ShapeData::param`]
    QuadOutline = 1,
    /// Circular point; radius in half of `size`
    Point = 2,
    /// Saturation/value gradient quad; hue in [`ShapeData::param`]
    SatValQuad = 3,
    /// Vertical hue gradient quad
    HueQuad = 4,
}

/// Per-instance shape record
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShapeData {
    /// Centre position
    pub centre: [f32; 2],
    /// Full width/height
    pub size: [f32; 2],
    /// Clip rectangle min corner (active mask at submission time)
    pub clip_min: [f32; 2],
    /// Clip rectangle max corner
    pub clip_max: [f32; 2],
    /// RGBA color
    pub color: [f32; 4],
    /// [`ShapeKind`] as u32
    pub kind: u32,
    /// Variant parameter: outline thickness or hue
    pub param: f32,
    /// Struct padding to a 16-byte multiple
    pub _pad: [f32; 2],
}

impl ShapeData {
    fn base(kind: ShapeKind, centre: Vec2, size: Vec2, color: Color, clip: Bounds2, param: f32) -> Self {
        Self {
            centre: [centre.x, centre.y],
            size: [size.x, size.y],
            clip_min: [clip.min.x, clip.min.y],
            clip_max: [clip.max.x, clip.max.y],
            color: color.to_array(),
            kind: kind as u32,
            param,
            _pad: [0.0; 2],
        }
    }

    /// Solid quad record
    pub fn quad(centre: Vec2, size: Vec2, color: Color, clip: Bounds2) -> Self {
        Self::base(ShapeKind::Quad, centre, size, color, clip, 0.0)
    }

    /// Quad outline record
    pub fn quad_outline(centre: Vec2, size: Vec2, thickness: f32, color: Color, clip: Bounds2) -> Self {
        Self::base(ShapeKind::QuadOutline, centre, size, color, clip, thickness)
    }

    /// Circular point record
    pub fn point(centre: Vec2, radius: f32, color: Color, clip: Bounds2) -> Self {
        Self::base(
            ShapeKind::Point,
            centre,
            Vec2::new(radius * 2.0, radius * 2.0),
            color,
            clip,
            0.0,
        )
    }

    /// Saturation/value gradient quad for the given hue
    pub fn sat_val_quad(centre: Vec2, size: Vec2, hue: f32, clip: Bounds2) -> Self {
        Self::base(ShapeKind::SatValQuad, centre, size, Color::WHITE, clip, hue)
    }

    /// Hue gradient quad
    pub fn hue_quad(centre: Vec2, size: Vec2, clip: Bounds2) -> Self {
        Self::base(ShapeKind::HueQuad, centre, size, Color::WHITE, clip, 0.0)
    }
}

/// Per-instance sphere record (3D overlay markers)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SphereData {
    /// Sphere centre in world space
    pub centre: [f32; 3],
    /// Sphere radius
    pub radius: f32,
    /// RGBA color
    pub color: [f32; 4],
}

impl SphereData {
    /// Build a sphere record
    pub fn new(centre: [f32; 3], radius: f32, color: Color) -> Self {
        Self {
            centre,
            radius,
            color: color.to_array(),
        }
    }
}

/// Per-instance glyph record produced by text expansion at flush time
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GlyphInstance {
    /// Glyph quad centre
    pub centre: [f32; 2],
    /// Glyph quad full size
    pub size: [f32; 2],
    /// Clip rectangle min corner
    pub clip_min: [f32; 2],
    /// Clip rectangle max corner
    pub clip_max: [f32; 2],
    /// RGBA color (rich-text override already applied)
    pub color: [f32; 4],
    /// Glyph index into the font's outline data on the GPU
    pub glyph_index: u32,
    /// Struct padding to a 16-byte multiple
    pub _pad: [u32; 3],
}

/// A record type that can be staged into the shared [`CommandList`]
/// and drawn through an instanced batch. Implemented only by the
/// closed set of shape-like records.
pub trait InstanceRecord: Pod {
    /// Which batch this record belongs to
    const KIND: BatchKind;

    /// The command list's staging buffer for this record type
    fn staging(commands: &mut CommandList) -> &mut Vec<Self>;

    /// The upload command announcing this frame's instance data
    fn upload_command(count: u32) -> DrawCommand;
}

impl InstanceRecord for ShapeData {
    const KIND: BatchKind = BatchKind::Shapes;

    fn staging(commands: &mut CommandList) -> &mut Vec<Self> {
        &mut commands.shape_staging
    }

    fn upload_command(count: u32) -> DrawCommand {
        DrawCommand::UploadShapeInstances { count }
    }
}

impl InstanceRecord for SphereData {
    const KIND: BatchKind = BatchKind::Spheres;

    fn staging(commands: &mut CommandList) -> &mut Vec<Self> {
        &mut commands.sphere_staging
    }

    fn upload_command(count: u32) -> DrawCommand {
        DrawCommand::UploadSphereInstances { count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_record_is_pod_sized() {
        // Fixed layout: 16 floats, uploadable as-is
        assert_eq!(std::mem::size_of::<ShapeData>(), 64);
        assert_eq!(std::mem::size_of::<SphereData>(), 32);
        assert_eq!(std::mem::size_of::<GlyphInstance>(), 64);
    }

    #[test]
    fn point_stores_diameter() {
        let p = ShapeData::point(Vec2::new(1.0, 2.0), 3.0, Color::RED, Bounds2::infinite());
        assert_eq!(p.size, [6.0, 6.0]);
        assert_eq!(p.kind, ShapeKind::Point as u32);
    }
}
