// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Ordered mini-batch iteration over a window grid.
//!
//! The loader walks patch indices `0..num_patches` in order, stacks each
//! group of patch tensors along a new leading batch axis, and reports the
//! patch indices that produced every batch row so callers can recover each
//! row's source selector. Iteration is restartable: every call to
//! [`PatchLoader::batches`] starts a fresh pass.

use ndarray::{Axis, ArrayD};

use crate::array::LabeledArray;
use crate::error::{WindowError, WindowResult};
use crate::grid::WindowGrid;

/// One mini-batch of patch tensors.
#[derive(Clone, Debug)]
pub struct PatchBatch {
    /// Patch indices, one per batch row, in row order.
    pub indices: Vec<usize>,
    /// Stacked patch tensors with a leading batch axis.
    pub inputs: ArrayD<f32>,
}

/// Pull-based batching over a source array and its window grid.
#[derive(Clone, Debug)]
pub struct PatchLoader<'a> {
    source: &'a LabeledArray,
    grid: &'a WindowGrid,
}

impl<'a> PatchLoader<'a> {
    /// Creates a loader over `source` using the given grid.
    pub fn new(source: &'a LabeledArray, grid: &'a WindowGrid) -> Self {
        Self { source, grid }
    }

    /// Number of patches one full pass will visit.
    pub fn len(&self) -> usize {
        self.grid.num_patches()
    }

    /// True when the grid holds no patches.
    pub fn is_empty(&self) -> bool {
        self.grid.num_patches() == 0
    }

    /// Starts a fresh pass yielding batches of up to `batch_size` patches.
    ///
    /// The final batch may be short; batch sizes of zero are clamped to one.
    pub fn batches(&self, batch_size: usize) -> PatchBatches<'a> {
        PatchBatches {
            source: self.source,
            grid: self.grid,
            batch_size: batch_size.max(1),
            position: 0,
        }
    }
}

/// Iterator over the mini-batches of one pass.
pub struct PatchBatches<'a> {
    source: &'a LabeledArray,
    grid: &'a WindowGrid,
    batch_size: usize,
    position: usize,
}

impl PatchBatches<'_> {
    fn stack(&self, indices: &[usize]) -> WindowResult<ArrayD<f32>> {
        let patches = indices
            .iter()
            .map(|&idx| self.grid.extract(self.source, idx))
            .collect::<WindowResult<Vec<_>>>()?;
        let views: Vec<_> = patches.iter().map(ArrayD::view).collect();
        ndarray::stack(Axis(0), &views).map_err(|_| WindowError::RaggedBatch)
    }
}

impl Iterator for PatchBatches<'_> {
    type Item = WindowResult<PatchBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.grid.num_patches();
        if self.position >= total {
            return None;
        }
        let start = self.position;
        let end = (start + self.batch_size).min(total);
        self.position = end;
        let indices: Vec<usize> = (start..end).collect();
        Some(self.stack(&indices).map(|inputs| PatchBatch { indices, inputs }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, IxDyn};

    fn fixture() -> (LabeledArray, WindowGrid) {
        let data = Array::from_shape_vec(
            IxDyn(&[20, 10]),
            (0..200).map(|v| v as f32).collect(),
        )
        .unwrap();
        let source = LabeledArray::new(data, vec!["x", "y"]).unwrap();
        let grid =
            WindowGrid::build(&source, &[("x", 10), ("y", 5)], &[("x", 2), ("y", 2)]).unwrap();
        (source, grid)
    }

    #[test]
    fn batches_cover_all_patches_in_order() {
        let (source, grid) = fixture();
        let loader = PatchLoader::new(&source, &grid);
        let mut seen = Vec::new();
        for batch in loader.batches(3) {
            let batch = batch.unwrap();
            assert_eq!(batch.inputs.shape()[0], batch.indices.len());
            assert_eq!(&batch.inputs.shape()[1..], &[10, 5]);
            seen.extend(batch.indices);
        }
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn short_final_batch_kept() {
        let (source, grid) = fixture();
        let loader = PatchLoader::new(&source, &grid);
        let sizes: Vec<usize> = loader
            .batches(3)
            .map(|batch| batch.unwrap().indices.len())
            .collect();
        assert_eq!(sizes, vec![3, 1]);
    }

    #[test]
    fn passes_are_restartable_and_identical() {
        let (source, grid) = fixture();
        let loader = PatchLoader::new(&source, &grid);
        let first: Vec<Vec<usize>> = loader.batches(2).map(|b| b.unwrap().indices).collect();
        let second: Vec<Vec<usize>> = loader.batches(2).map(|b| b.unwrap().indices).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn rows_match_their_selectors() {
        let (source, grid) = fixture();
        let loader = PatchLoader::new(&source, &grid);
        for batch in loader.batches(2) {
            let batch = batch.unwrap();
            for (row, &idx) in batch.indices.iter().enumerate() {
                let direct = grid.extract(&source, idx).unwrap();
                let from_batch = batch.inputs.index_axis(Axis(0), row).to_owned();
                assert_eq!(direct, from_batch);
            }
        }
    }
}
