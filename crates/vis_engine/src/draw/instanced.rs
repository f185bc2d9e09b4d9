//! Instanced shape batcher
//!
//! Concrete batcher for the fixed-size instance records. The complete
//! per-frame record array is staged for upload exactly once, at the
//! first layer flush of the frame; after that each non-empty layer
//! costs one material write plus one indirect draw. Empty layers are
//! skipped entirely and consume no indirect-args entry.
//!
//! Per-layer uniform overrides (offset/scale/screen-space) go through
//! a pool of material states so that layers drawn in the same frame
//! never share, and never leak, uniform values.

use crate::foundation::Pool;

use super::batch::DrawBatch;
use super::commands::{CommandList, DrawCommand, IndirectArgs, MaterialId, MaterialParams};
use super::records::InstanceRecord;
use super::{FrameToken, LayerInfo};

/// Batcher for one instance-record type
pub struct InstancedBatch<T: InstanceRecord> {
    batch: DrawBatch<T>,
    materials: Pool<MaterialParams>,
    uploaded_this_frame: bool,
    args_first: u32,
    group_index: u32,
    released: bool,
}

impl<T: InstanceRecord> InstancedBatch<T> {
    /// Create an empty batcher
    pub fn new() -> Self {
        Self {
            batch: DrawBatch::new(),
            materials: Pool::with_factory(|| MaterialParams {
                offset: [0.0; 2],
                scale: 1.0,
                screen_space: false,
            }),
            uploaded_this_frame: false,
            args_first: 0,
            group_index: 0,
            released: false,
        }
    }

    /// Open a new layer slot, resetting per-frame state on a new token
    pub fn start_layer(&mut self, frame: FrameToken, info: LayerInfo) {
        if self.batch.start_layer(frame, info) {
            self.materials.release_all();
            self.uploaded_this_frame = false;
            self.group_index = 0;
        }
    }

    /// Append a record to the current layer; returns its index for
    /// reserve-then-modify flows.
    pub fn push(&mut self, record: T) -> usize {
        self.batch.push(record)
    }

    /// Mutably borrow a previously pushed record
    pub fn record_mut(&mut self, index: usize) -> Option<&mut T> {
        self.batch.record_mut(index)
    }

    /// Flush the next pending layer into the command list
    pub fn flush_next_layer(&mut self, commands: &mut CommandList) {
        if self.released {
            return;
        }
        let Some(slice) = self.batch.next_layer() else {
            return;
        };

        if !self.uploaded_this_frame {
            self.stage_frame_data(commands);
            self.uploaded_this_frame = true;
        }

        if slice.count == 0 {
            return;
        }

        let params = MaterialParams {
            offset: [slice.info.offset.x, slice.info.offset.y],
            scale: slice.info.scale,
            screen_space: slice.info.screen_space,
        };
        let material_slot = self.materials.acquire_or_create();
        if let Some(pooled) = self.materials.get_mut(material_slot) {
            *pooled = params;
        }
        let material = MaterialId {
            batch: T::KIND,
            slot: material_slot.index() as u32,
        };

        commands.push(DrawCommand::SetMaterial {
            material,
            params,
            first_instance: slice.start as u32,
        });
        commands.push(DrawCommand::DrawIndirect {
            batch: T::KIND,
            material,
            args_index: self.args_first + self.group_index,
        });
        self.group_index += 1;
    }

    /// Upload the whole frame's records and one indirect-args entry
    /// per non-empty layer.
    fn stage_frame_data(&mut self, commands: &mut CommandList) {
        let records = self.batch.records();
        let total = records.len() as u32;
        T::staging(commands).extend_from_slice(records);
        commands.push(T::upload_command(total));

        self.args_first = commands.indirect_args.len() as u32;
        let mut args_count = 0;
        for &count in self.batch.layer_counts() {
            if count == 0 {
                continue;
            }
            commands.indirect_args.push(IndirectArgs::for_instances(count));
            args_count += 1;
        }
        commands.push(DrawCommand::UploadIndirectArgs {
            batch: T::KIND,
            first: self.args_first,
            count: args_count,
        });
    }

    /// Tear down GPU-side buffers and destroy pooled material state
    pub fn release(&mut self, commands: &mut CommandList) {
        self.released = true;
        commands.push(DrawCommand::ReleaseBuffers { batch: T::KIND });
        self.materials.release_all();
        while self.materials.purge_next_available().is_some() {}
        log::debug!("{:?} batch released", T::KIND);
    }

    /// Total records accumulated this frame
    pub fn total_records(&self) -> usize {
        self.batch.total_records()
    }

    /// Per-layer record counts
    pub fn layer_counts(&self) -> &[u32] {
        self.batch.layer_counts()
    }
}

impl<T: InstanceRecord> Default for InstancedBatch<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::commands::BatchKind;
    use crate::draw::records::ShapeData;
    use crate::foundation::math::{Bounds2, Vec2};
    use crate::foundation::Color;

    fn quad() -> ShapeData {
        ShapeData::quad(Vec2::zeros(), Vec2::new(1.0, 1.0), Color::WHITE, Bounds2::infinite())
    }

    fn layer(offset_x: f32) -> LayerInfo {
        LayerInfo::new(Vec2::new(offset_x, 0.0), 1.0, true)
    }

    #[test]
    fn uploads_once_per_frame() {
        let mut batcher: InstancedBatch<ShapeData> = InstancedBatch::new();
        let frame = FrameToken(1);
        batcher.start_layer(frame, layer(0.0));
        batcher.push(quad());
        batcher.start_layer(frame, layer(5.0));
        batcher.push(quad());

        let mut commands = CommandList::new();
        batcher.flush_next_layer(&mut commands);
        batcher.flush_next_layer(&mut commands);

        let uploads = commands
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::UploadShapeInstances { .. }))
            .count();
        assert_eq!(uploads, 1);
        assert_eq!(commands.shape_staging.len(), 2);
    }

    #[test]
    fn empty_layers_consume_no_args_entry() {
        let mut batcher: InstancedBatch<ShapeData> = InstancedBatch::new();
        let frame = FrameToken(3);
        batcher.start_layer(frame, layer(0.0));
        batcher.push(quad());
        batcher.start_layer(frame, layer(1.0)); // left empty
        batcher.start_layer(frame, layer(2.0));
        batcher.push(quad());
        batcher.push(quad());

        let mut commands = CommandList::new();
        for _ in 0..3 {
            batcher.flush_next_layer(&mut commands);
        }

        assert_eq!(commands.indirect_args.len(), 2);
        assert_eq!(commands.indirect_args[0].instance_count, 1);
        assert_eq!(commands.indirect_args[1].instance_count, 2);

        let draws: Vec<_> = commands
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawIndirect { .. }))
            .collect();
        assert_eq!(draws.len(), 2);
    }

    #[test]
    fn layer_uniforms_do_not_leak_between_layers() {
        let mut batcher: InstancedBatch<ShapeData> = InstancedBatch::new();
        let frame = FrameToken(7);
        batcher.start_layer(frame, layer(10.0));
        batcher.push(quad());
        batcher.start_layer(frame, layer(20.0));
        batcher.push(quad());

        let mut commands = CommandList::new();
        batcher.flush_next_layer(&mut commands);
        batcher.flush_next_layer(&mut commands);

        let materials: Vec<_> = commands
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::SetMaterial { material, params, .. } => Some((*material, *params)),
                _ => None,
            })
            .collect();
        assert_eq!(materials.len(), 2);
        // Distinct pooled materials, each with its own layer offset
        assert_ne!(materials[0].0.slot, materials[1].0.slot);
        assert_eq!(materials[0].1.offset, [10.0, 0.0]);
        assert_eq!(materials[1].1.offset, [20.0, 0.0]);
    }

    #[test]
    fn material_pool_is_reused_across_frames() {
        let mut batcher: InstancedBatch<ShapeData> = InstancedBatch::new();
        let mut commands = CommandList::new();

        for frame_index in 1..=3 {
            let frame = FrameToken(frame_index);
            batcher.start_layer(frame, layer(0.0));
            batcher.push(quad());
            commands.clear();
            batcher.flush_next_layer(&mut commands);
        }
        // One material slot serves every frame's single layer
        assert_eq!(batcher.materials.total_count(), 1);
    }

    #[test]
    fn release_emits_teardown_and_stops_drawing() {
        let mut batcher: InstancedBatch<ShapeData> = InstancedBatch::new();
        let mut commands = CommandList::new();
        batcher.start_layer(FrameToken(1), layer(0.0));
        batcher.push(quad());
        batcher.release(&mut commands);
        assert!(matches!(
            commands.commands().last(),
            Some(DrawCommand::ReleaseBuffers { batch: BatchKind::Shapes })
        ));

        commands.clear();
        batcher.flush_next_layer(&mut commands);
        assert!(commands.is_empty());
    }
}
