// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use ndarray::{ArrayD, ArrayViewD};

use crate::error::WindowResult;

/// Boundary trait for the inference function applied to each mini-batch.
///
/// A model maps one batch of patch tensors to one batch of output tensors.
/// The only contract is that the leading batch axis is preserved and that
/// the trailing shape is deterministic for a given input shape; everything
/// behind the call is opaque to the windowing and stitching machinery.
pub trait PatchModel {
    /// Runs the model on a stacked batch with a leading batch axis.
    fn forward(&self, batch: ArrayViewD<'_, f32>) -> WindowResult<ArrayD<f32>>;
}

/// Closures double as models, which keeps toy pipelines and tests free of
/// ceremony: `|batch| Ok(batch.to_owned())` is the identity model.
impl<F> PatchModel for F
where
    F: Fn(ArrayViewD<'_, f32>) -> WindowResult<ArrayD<f32>>,
{
    fn forward(&self, batch: ArrayViewD<'_, f32>) -> WindowResult<ArrayD<f32>> {
        self(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, IxDyn};

    #[test]
    fn function_is_a_model() {
        fn identity(batch: ArrayViewD<'_, f32>) -> WindowResult<ArrayD<f32>> {
            Ok(batch.to_owned())
        }
        let input = Array::from_shape_vec(IxDyn(&[2, 3]), vec![1.0; 6]).unwrap();
        let output = identity.forward(input.view()).unwrap();
        assert_eq!(output, input);
    }
}
