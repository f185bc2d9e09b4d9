//! Generic per-frame record batch
//!
//! Accumulates draw records in one flat list plus a parallel list of
//! per-layer counts. Records for layer *i* occupy a contiguous slice,
//! so flushing a layer is a range lookup and the whole frame costs
//! O(total records) regardless of layer count.
//!
//! Frame lifetime: the first `start_layer` carrying a new
//! [`FrameToken`] resets all accumulated state. Pushing a record while
//! no layer is open is a fatal caller error.

use super::{FrameToken, LayerInfo};

/// Contiguous slice of one layer's records, handed out at flush time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSlice {
    /// Index of the first record
    pub start: usize,
    /// Record count (may be zero for an empty layer)
    pub count: usize,
    /// Layer transform info captured at `start_layer`
    pub info: LayerInfo,
}

/// Flat record list + per-layer counts + flush cursor
#[derive(Debug)]
pub struct DrawBatch<T> {
    records: Vec<T>,
    layers: Vec<LayerInfo>,
    layer_counts: Vec<u32>,
    draw_layer_index: usize,
    start_index: usize,
    last_frame: Option<FrameToken>,
}

impl<T> DrawBatch<T> {
    /// Create an empty batch
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            layers: Vec::new(),
            layer_counts: Vec::new(),
            draw_layer_index: 0,
            start_index: 0,
            last_frame: None,
        }
    }

    fn reset(&mut self) {
        self.records.clear();
        self.layers.clear();
        self.layer_counts.clear();
        self.draw_layer_index = 0;
        self.start_index = 0;
    }

    /// Open a new layer slot. Returns `true` when this was the first
    /// layer of a new frame (callers hook their own per-frame init on
    /// that signal).
    pub fn start_layer(&mut self, frame: FrameToken, info: LayerInfo) -> bool {
        let first_of_frame = self.last_frame != Some(frame);
        if first_of_frame {
            self.reset();
            self.last_frame = Some(frame);
        }
        self.layers.push(info);
        self.layer_counts.push(0);
        first_of_frame
    }

    /// Append a record to the most recently opened layer.
    ///
    /// # Panics
    /// Panics if no layer has been started this frame; submissions
    /// without an open layer are a fatal caller error.
    pub fn push(&mut self, record: T) -> usize {
        let count = self
            .layer_counts
            .last_mut()
            .expect("record submitted with no open layer");
        *count += 1;
        self.records.push(record);
        self.records.len() - 1
    }

    /// Index of the most recently pushed record
    pub fn last_record_index(&self) -> Option<usize> {
        self.records.len().checked_sub(1)
    }

    /// Mutably borrow a record by index (reserve-then-modify flows)
    pub fn record_mut(&mut self, index: usize) -> Option<&mut T> {
        self.records.get_mut(index)
    }

    /// Pop the next pending layer's slice and advance the cursor.
    /// Returns `None` once every layer of the frame has been drawn.
    pub fn next_layer(&mut self) -> Option<LayerSlice> {
        if self.draw_layer_index >= self.layer_counts.len() {
            return None;
        }
        let count = self.layer_counts[self.draw_layer_index] as usize;
        let slice = LayerSlice {
            start: self.start_index,
            count,
            info: self.layers[self.draw_layer_index],
        };
        self.draw_layer_index += 1;
        self.start_index += count;
        Some(slice)
    }

    /// All records accumulated this frame, in submission order
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Per-layer record counts
    pub fn layer_counts(&self) -> &[u32] {
        &self.layer_counts
    }

    /// Number of layers opened this frame
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Total records accumulated this frame
    pub fn total_records(&self) -> usize {
        self.records.len()
    }
}

impl<T> Default for DrawBatch<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;

    fn layer() -> LayerInfo {
        LayerInfo::new(Vec2::zeros(), 1.0, true)
    }

    fn frame(n: u64) -> FrameToken {
        FrameToken(n)
    }

    #[test]
    fn per_layer_counts_sum_to_total() {
        let mut batch: DrawBatch<u32> = DrawBatch::new();
        batch.start_layer(frame(1), layer());
        batch.push(10);
        batch.push(11);
        batch.start_layer(frame(1), layer());
        batch.start_layer(frame(1), layer());
        batch.push(30);

        let total: u32 = batch.layer_counts().iter().sum();
        assert_eq!(total as usize, batch.total_records());
        assert_eq!(batch.layer_counts(), &[2, 0, 1]);
    }

    #[test]
    fn layer_slices_are_contiguous_and_ordered() {
        let mut batch: DrawBatch<u32> = DrawBatch::new();
        batch.start_layer(frame(1), layer());
        batch.push(1);
        batch.push(2);
        batch.start_layer(frame(1), layer());
        batch.push(3);

        let a = batch.next_layer().unwrap();
        assert_eq!((a.start, a.count), (0, 2));
        assert_eq!(&batch.records()[a.start..a.start + a.count], &[1, 2]);

        let b = batch.next_layer().unwrap();
        assert_eq!((b.start, b.count), (2, 1));
        assert_eq!(&batch.records()[b.start..b.start + b.count], &[3]);

        assert!(batch.next_layer().is_none());
    }

    #[test]
    fn new_frame_token_resets_state() {
        let mut batch: DrawBatch<u32> = DrawBatch::new();
        assert!(batch.start_layer(frame(1), layer()));
        batch.push(1);
        assert!(!batch.start_layer(frame(1), layer()));

        // New frame: everything accumulated so far is discarded
        assert!(batch.start_layer(frame(2), layer()));
        assert_eq!(batch.total_records(), 0);
        assert_eq!(batch.layer_count(), 1);
    }

    #[test]
    #[should_panic(expected = "no open layer")]
    fn push_without_layer_is_fatal() {
        let mut batch: DrawBatch<u32> = DrawBatch::new();
        batch.push(1);
    }

    #[test]
    fn record_mut_supports_reserve_then_modify() {
        let mut batch: DrawBatch<u32> = DrawBatch::new();
        batch.start_layer(frame(1), layer());
        let id = batch.push(0);
        batch.push(5);
        *batch.record_mut(id).unwrap() = 42;
        assert_eq!(batch.records(), &[42, 5]);
    }
}
