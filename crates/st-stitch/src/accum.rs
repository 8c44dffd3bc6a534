// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Numerically stable averaging of overlapping patch contributions.
//!
//! The accumulator keeps two same-shaped arrays over the output grid: a
//! running sum and a per-cell overlap count. [`Accumulator::accumulate`] is
//! the only mutation path and is commutative, so patches may arrive in any
//! order. [`Accumulator::finalize`] consumes the accumulator and divides sum
//! by count; consuming `self` makes "accumulate after finalize" a compile
//! error rather than a runtime guard. Cells no patch ever touched finalize
//! to NaN, the expected terminal state for partially covered grids.

use ndarray::{ArrayD, ArrayViewD, IxDyn, SliceInfoElem, Zip};

use crate::error::{StitchError, StitchResult};
use crate::grid::OutputShape;
use crate::mapper::OutputRegion;

/// Paired sum/count arrays over the output grid.
#[derive(Clone, Debug)]
pub struct Accumulator {
    names: Vec<String>,
    sum: ArrayD<f32>,
    count: ArrayD<f32>,
}

impl Accumulator {
    /// Creates a zeroed accumulator over the given output shape.
    pub fn new(shape: &OutputShape) -> Self {
        let dim = IxDyn(&shape.lens());
        Self {
            names: shape.names().iter().map(|s| s.to_string()).collect(),
            sum: ArrayD::zeros(dim.clone()),
            count: ArrayD::zeros(dim),
        }
    }

    fn region_info(&self, region: &OutputRegion) -> StitchResult<Vec<SliceInfoElem>> {
        let full = SliceInfoElem::Slice {
            start: 0,
            end: None,
            step: 1,
        };
        let mut info = vec![full; self.names.len()];
        for (axis, range) in region.iter() {
            let pos = self
                .names
                .iter()
                .position(|name| name == axis)
                .ok_or_else(|| StitchError::UnknownRegionAxis { axis: axis.into() })?;
            info[pos] = SliceInfoElem::Slice {
                start: range.start as isize,
                end: Some(range.end as isize),
                step: 1,
            };
        }
        Ok(info)
    }

    /// Adds one patch's output into the region and bumps the overlap count.
    ///
    /// `values` must match the region's shape exactly: sliced extents along
    /// resample axes, full extents along core and new axes.
    pub fn accumulate(
        &mut self,
        region: &OutputRegion,
        values: ArrayViewD<'_, f32>,
    ) -> StitchResult<()> {
        let info = self.region_info(region)?;
        let mut sum_slice = self.sum.slice_mut(info.as_slice());
        if sum_slice.shape() != values.shape() {
            return Err(StitchError::PatchShapeMismatch {
                expected: sum_slice.shape().to_vec(),
                got: values.shape().to_vec(),
            });
        }
        Zip::from(&mut sum_slice)
            .and(&values)
            .for_each(|acc, &v| *acc += v);
        self.count
            .slice_mut(info.as_slice())
            .mapv_inplace(|c| c + 1.0);
        Ok(())
    }

    /// Merges another shard into this one by elementwise sum.
    ///
    /// Supports the parallel pattern of accumulating disjoint patch subsets
    /// into per-worker shards and combining at the end, instead of locking
    /// one shared accumulator.
    pub fn merge(&mut self, other: Accumulator) -> StitchResult<()> {
        if self.sum.shape() != other.sum.shape() || self.names != other.names {
            return Err(StitchError::ShardMismatch {
                left: self.sum.shape().to_vec(),
                right: other.sum.shape().to_vec(),
            });
        }
        self.sum += &other.sum;
        self.count += &other.count;
        Ok(())
    }

    /// Per-cell overlap counts accumulated so far.
    pub fn counts(&self) -> &ArrayD<f32> {
        &self.count
    }

    /// Divides sum by count, yielding the mean contribution per cell.
    ///
    /// Cells with a zero count become NaN.
    pub fn finalize(self) -> ArrayD<f32> {
        let mut mean = self.sum;
        Zip::from(&mut mean).and(&self.count).for_each(|s, &c| {
            *s = if c > 0.0 { *s / c } else { f32::NAN };
        });
        mean
    }
}
