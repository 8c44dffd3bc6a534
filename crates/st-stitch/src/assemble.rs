// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! The reassembly pipeline: classify, size, accumulate, finalize, label.
//!
//! Phases run strictly forward. Classification and sizing happen before the
//! model is invoked or the loader consumed, so a misconfigured request never
//! produces partial output. Accumulation is commutative per patch; the batch
//! loop simply follows the loader's index order. Coordinate assignment is
//! metadata only and cannot change the numeric result.

use ndarray::Axis;
use serde::{Deserialize, Serialize};
use tracing::debug;

use st_window::{LabeledArray, PatchLoader, PatchModel, WindowGrid};

use crate::accum::Accumulator;
use crate::axes::{classify_axes, AxisRole};
use crate::coords::{resample_coordinate, CoordMode};
use crate::error::{StitchError, StitchResult};
use crate::grid::size_output_grid;
use crate::mapper::map_selector;

/// Configuration of one reassembly run.
///
/// Built up fluently and serializable, so run configurations can be stored
/// alongside results:
///
/// ```ignore
/// let spec = ReassemblySpec::new()
///     .output_dim("channel", 3)
///     .output_dim("x", 5)
///     .new_axis("channel")
///     .resample_axis("x")
///     .coord_mode(CoordMode::Centers)
///     .batch_size(8);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReassemblySpec {
    output_dims: Vec<(String, usize)>,
    new_axes: Vec<String>,
    core_axes: Vec<String>,
    resample_axes: Vec<String>,
    coord_mode: CoordMode,
    batch_size: usize,
}

impl Default for ReassemblySpec {
    fn default() -> Self {
        Self::new()
    }
}

impl ReassemblySpec {
    /// Empty spec with edges-mode coordinates and a batch size of 16.
    pub fn new() -> Self {
        Self {
            output_dims: Vec::new(),
            new_axes: Vec::new(),
            core_axes: Vec::new(),
            resample_axes: Vec::new(),
            coord_mode: CoordMode::Edges,
            batch_size: 16,
        }
    }

    /// Declares the next output-tensor axis and its per-patch length.
    /// Declaration order fixes the output array's axis order.
    pub fn output_dim(mut self, axis: impl Into<String>, len: usize) -> Self {
        self.output_dims.push((axis.into(), len));
        self
    }

    /// Marks an axis as newly introduced by the model.
    pub fn new_axis(mut self, axis: impl Into<String>) -> Self {
        self.new_axes.push(axis.into());
        self
    }

    /// Marks an axis as carried through from the source unchanged.
    pub fn core_axis(mut self, axis: impl Into<String>) -> Self {
        self.core_axes.push(axis.into());
        self
    }

    /// Marks an axis as resampled by an integer factor.
    pub fn resample_axis(mut self, axis: impl Into<String>) -> Self {
        self.resample_axes.push(axis.into());
        self
    }

    /// Chooses the coordinate convention for resampled axes.
    pub fn coord_mode(mut self, mode: CoordMode) -> Self {
        self.coord_mode = mode;
        self
    }

    /// Number of patches per model invocation.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

/// Runs the model over every patch of `source` and stitches the outputs
/// into one labeled array.
///
/// Fails fast: axis classification and output sizing run before the first
/// batch is pulled, so configuration errors never reach the model. Returns
/// the finished array with coordinates attached per the spec's mode; cells
/// no patch covered hold NaN.
pub fn reassemble<M: PatchModel>(
    source: &LabeledArray,
    grid: &WindowGrid,
    model: &M,
    spec: &ReassemblySpec,
) -> StitchResult<LabeledArray> {
    let plan = classify_axes(
        &spec.output_dims,
        &spec.new_axes,
        &spec.core_axes,
        &spec.resample_axes,
        grid,
    )?;
    let shape = size_output_grid(&plan, source)?;
    debug!(
        patches = grid.num_patches(),
        output_shape = ?shape.lens(),
        "output grid sized"
    );

    let mut accumulator = Accumulator::new(&shape);
    let loader = PatchLoader::new(source, grid);
    for batch in loader.batches(spec.batch_size) {
        let batch = batch?;
        let output = model.forward(batch.inputs.view())?;

        let mut expected = Vec::with_capacity(plan.len() + 1);
        expected.push(batch.indices.len());
        expected.extend(plan.declared_lens());
        if output.shape() != expected.as_slice() {
            return Err(StitchError::PatchShapeMismatch {
                expected,
                got: output.shape().to_vec(),
            });
        }

        for (row, &index) in batch.indices.iter().enumerate() {
            let selector = grid.selector(index)?;
            let region = map_selector(selector, &plan);
            accumulator.accumulate(&region, output.index_axis(Axis(0), row))?;
        }
    }

    let mean = accumulator.finalize();
    debug!("accumulation finalized");

    let mut result = LabeledArray::new(mean, shape.names())?;
    for binding in plan.iter() {
        match binding.role {
            AxisRole::Core => {
                if let Some(coord) = source.coord(&binding.name) {
                    result = result.with_coord(&binding.name, coord.clone())?;
                }
            }
            AxisRole::Resample => {
                if let Some(coord) = source.coord(&binding.name) {
                    // classify_axes guarantees the factor exists for this role
                    let factor = binding.factor.unwrap_or(1.0);
                    let resampled = resample_coordinate(coord, factor, spec.coord_mode)?;
                    result = result.with_coord(&binding.name, resampled)?;
                }
            }
            AxisRole::New => {}
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, ArrayViewD, IxDyn};
    use st_window::WindowResult;

    fn identity(batch: ArrayViewD<'_, f32>) -> WindowResult<ndarray::ArrayD<f32>> {
        Ok(batch.to_owned())
    }

    #[test]
    fn misconfigured_spec_fails_before_the_model_runs() {
        let data = Array::from_shape_vec(IxDyn(&[8]), vec![0.0; 8]).unwrap();
        let source = LabeledArray::new(data, vec!["x"]).unwrap();
        let grid = WindowGrid::build(&source, &[("x", 4)], &[]).unwrap();

        fn exploding(_: ArrayViewD<'_, f32>) -> WindowResult<ndarray::ArrayD<f32>> {
            panic!("model must not run for a misconfigured request")
        }
        let spec = ReassemblySpec::new().output_dim("x", 4);
        let err = reassemble(&source, &grid, &exploding, &spec).unwrap_err();
        assert_eq!(err, StitchError::UnpartitionedAxis { axis: "x".into() });
    }

    #[test]
    fn identity_round_trip_on_exact_tiling() {
        let data = Array::from_shape_vec(
            IxDyn(&[4, 4]),
            (0..16).map(|v| v as f32).collect(),
        )
        .unwrap();
        let source = LabeledArray::new(data, vec!["x", "y"]).unwrap();
        let grid = WindowGrid::build(&source, &[("x", 2), ("y", 2)], &[]).unwrap();
        let spec = ReassemblySpec::new()
            .output_dim("x", 2)
            .output_dim("y", 2)
            .resample_axis("x")
            .resample_axis("y")
            .batch_size(3);
        let result = reassemble(&source, &grid, &identity, &spec).unwrap();
        assert_eq!(result.data(), source.data());
    }

    #[test]
    fn wrong_model_shape_reported() {
        let data = Array::from_shape_vec(IxDyn(&[8]), vec![0.0; 8]).unwrap();
        let source = LabeledArray::new(data, vec!["x"]).unwrap();
        let grid = WindowGrid::build(&source, &[("x", 4)], &[]).unwrap();
        fn wrong(batch: ArrayViewD<'_, f32>) -> WindowResult<ndarray::ArrayD<f32>> {
            let rows = batch.shape()[0];
            Ok(ndarray::ArrayD::zeros(IxDyn(&[rows, 3])))
        }
        let spec = ReassemblySpec::new().output_dim("x", 4).resample_axis("x");
        let err = reassemble(&source, &grid, &wrong, &spec).unwrap_err();
        assert!(matches!(err, StitchError::PatchShapeMismatch { .. }));
    }
}
