// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Output-grid sizing from the classified axis plan.

use st_window::LabeledArray;

use crate::axes::{AxisPlan, AxisRole};
use crate::error::{StitchError, StitchResult};

/// Absolute tolerance for `source_len * factor` landing on an integer.
const SIZE_TOLERANCE: f64 = 1e-6;

/// Shape of the reassembled output array, one `(axis, length)` entry per
/// output axis in declaration order. Computed once before inference begins
/// and never revised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputShape {
    dims: Vec<(String, usize)>,
}

impl OutputShape {
    /// `(axis, length)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.dims.iter().map(|(name, len)| (name.as_str(), *len))
    }

    /// Axis names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.dims.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Lengths in declaration order.
    pub fn lens(&self) -> Vec<usize> {
        self.dims.iter().map(|(_, len)| *len).collect()
    }

    /// Length along one named axis.
    pub fn len_of(&self, axis: &str) -> Option<usize> {
        self.dims
            .iter()
            .find(|(name, _)| name == axis)
            .map(|(_, len)| *len)
    }

    /// Position of one named axis.
    pub fn index_of(&self, axis: &str) -> Option<usize> {
        self.dims.iter().position(|(name, _)| name == axis)
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }
}

/// Derives the full output shape from the axis plan and the source array.
///
/// New axes take their declared tensor length. Core axes take the source
/// length, cross-checked against the declaration. Resample axes take
/// `round(source_len * factor)`, which must be integral within tolerance.
pub fn size_output_grid(plan: &AxisPlan, source: &LabeledArray) -> StitchResult<OutputShape> {
    let mut dims = Vec::with_capacity(plan.len());
    for binding in plan.iter() {
        let len = match binding.role {
            AxisRole::New => binding.declared_len,
            AxisRole::Core => {
                let actual = source.len_of(&binding.name).ok_or_else(|| {
                    StitchError::MissingSourceAxis {
                        axis: binding.name.clone(),
                    }
                })?;
                if actual != binding.declared_len {
                    return Err(StitchError::CoreAxisMismatch {
                        axis: binding.name.clone(),
                        declared: binding.declared_len,
                        actual,
                    });
                }
                actual
            }
            AxisRole::Resample => {
                let source_len = source.len_of(&binding.name).ok_or_else(|| {
                    StitchError::MissingSourceAxis {
                        axis: binding.name.clone(),
                    }
                })?;
                // classify_axes guarantees the factor exists for this role
                let factor = binding.factor.unwrap_or(1.0);
                let computed = source_len as f64 * factor;
                if (computed - computed.round()).abs() > SIZE_TOLERANCE {
                    return Err(StitchError::NonIntegralOutputSize {
                        axis: binding.name.clone(),
                        computed,
                    });
                }
                computed.round() as usize
            }
        };
        dims.push((binding.name.clone(), len));
    }
    Ok(OutputShape { dims })
}
