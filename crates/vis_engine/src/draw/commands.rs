//! GPU command sink
//!
//! The dispatcher does not talk to a GPU API directly. Each frame's
//! flush appends a closed set of commands to a [`CommandList`], which
//! the host replays against its own graphics backend (and which tests
//! inspect as a draw trace). Instance data travels in staging buffers
//! owned by the list; upload commands reference ranges of them.
//!
//! The staging buffers are cleared (capacity retained) at the start of
//! every flush, so a host can keep one `CommandList` alive for the
//! whole session without per-frame allocation churn.

use bytemuck::{Pod, Zeroable};

use super::records::{GlyphInstance, ShapeData, SphereData};

/// Which batch a command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    /// Quad/outline/point instanced shapes
    Shapes,
    /// Sphere overlay markers
    Spheres,
    /// Expanded text glyphs
    Text,
}

/// Identifies one pooled per-layer material (uniform block) of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId {
    /// Owning batch
    pub batch: BatchKind,
    /// Pool slot; stable across frames so hosts can cache GPU-side
    /// descriptor state per slot
    pub slot: u32,
}

/// Per-layer uniform overrides written into a pooled material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    /// Layer translation
    pub offset: [f32; 2],
    /// Layer uniform scale
    pub scale: f32,
    /// Whether the layer is drawn in screen space (pixels) rather than
    /// through the camera projection
    pub screen_space: bool,
}

/// One indirect-draw descriptor, laid out like
/// `VkDrawIndexedIndirectCommand`.
///
/// `index_count`, `first_index` and `base_vertex` are zero here; the
/// host patches them from whichever mesh it binds for the batch kind.
/// `first_instance` is also kept at zero because indirect instance
/// offsets are unreliable across platforms; the real offset travels in
/// [`DrawCommand::SetMaterial`] instead.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct IndirectArgs {
    /// Index count of the bound mesh (host-patched)
    pub index_count: u32,
    /// Number of instances in this layer's contiguous slice
    pub instance_count: u32,
    /// First index of the bound mesh (host-patched)
    pub first_index: u32,
    /// Base vertex of the bound mesh (host-patched)
    pub base_vertex: u32,
    /// Always zero; see type docs
    pub first_instance: u32,
}

impl IndirectArgs {
    /// Args entry for a layer slice of `instance_count` instances
    pub fn for_instances(instance_count: u32) -> Self {
        Self {
            index_count: 0,
            instance_count,
            first_index: 0,
            base_vertex: 0,
            first_instance: 0,
        }
    }
}

/// One replayable GPU operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Copy `count` records from [`CommandList::shape_staging`] into
    /// the shape instance buffer. Emitted at most once per frame.
    UploadShapeInstances {
        /// Record count
        count: u32,
    },
    /// Copy `count` records from [`CommandList::sphere_staging`] into
    /// the sphere instance buffer. Emitted at most once per frame.
    UploadSphereInstances {
        /// Record count
        count: u32,
    },
    /// Copy `[first, first+count)` of [`CommandList::glyph_staging`]
    /// into the glyph instance buffer. Emitted once per text layer.
    UploadGlyphInstances {
        /// First staged glyph
        first: u32,
        /// Glyph count
        count: u32,
    },
    /// Copy `[first, first+count)` of [`CommandList::indirect_args`]
    /// into the batch's indirect argument buffer.
    UploadIndirectArgs {
        /// Target batch
        batch: BatchKind,
        /// First args entry
        first: u32,
        /// Args entry count
        count: u32,
    },
    /// Write layer uniforms into a pooled material before drawing
    SetMaterial {
        /// Target material
        material: MaterialId,
        /// Uniform values
        params: MaterialParams,
        /// Offset of the layer's first instance in the uploaded buffer
        first_instance: u32,
    },
    /// Indirect instanced draw of one layer's shape slice
    DrawIndirect {
        /// Target batch
        batch: BatchKind,
        /// Material carrying the layer uniforms
        material: MaterialId,
        /// Index into the batch's uploaded indirect args
        args_index: u32,
    },
    /// Direct draw of one layer's glyph range
    DrawGlyphs {
        /// Material carrying the layer uniforms
        material: MaterialId,
        /// First glyph instance
        first: u32,
        /// Glyph instance count
        count: u32,
    },
    /// Tear down the batch's GPU buffers
    ReleaseBuffers {
        /// Target batch
        batch: BatchKind,
    },
}

/// Ordered command trace plus staging buffers for one frame
#[derive(Debug, Default)]
pub struct CommandList {
    commands: Vec<DrawCommand>,
    /// Shape records staged for upload this frame
    pub shape_staging: Vec<ShapeData>,
    /// Sphere records staged for upload this frame
    pub sphere_staging: Vec<SphereData>,
    /// Glyph records staged for upload this frame
    pub glyph_staging: Vec<GlyphInstance>,
    /// Indirect draw descriptors staged this frame
    pub indirect_args: Vec<IndirectArgs>,
}

impl CommandList {
    /// Create an empty command list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Commands in submission order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop all commands and staged data, retaining capacity
    pub fn clear(&mut self) {
        self.commands.clear();
        self.shape_staging.clear();
        self.sphere_staging.clear();
        self.glyph_staging.clear();
        self.indirect_args.clear();
    }

    /// Whether no commands were recorded
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of recorded commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }
}
