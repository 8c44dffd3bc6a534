// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Axis classification: the role algebra behind reassembly.
//!
//! Every axis of the model's output tensor is either newly introduced by the
//! model, carried through from the source unchanged, or resampled by an
//! integer factor. The roles form a closed tagged union computed once into a
//! lookup table; any axis not covered by exactly one role is rejected up
//! front rather than silently defaulted.

use serde::{Deserialize, Serialize};
use tracing::debug;

use st_window::WindowGrid;

use crate::error::{StitchError, StitchResult};

/// Relative tolerance for deciding that a ratio is a whole number.
const RATIO_TOLERANCE: f64 = 1e-9;

/// Role of one output axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisRole {
    /// Introduced by the model; no counterpart on the source array.
    New,
    /// Present on the source at identical length and never windowed.
    Core,
    /// Source axis rescaled by an integer factor or its reciprocal.
    Resample,
}

/// One classified output axis.
#[derive(Clone, Debug)]
pub struct AxisBinding {
    /// Axis name as declared on the output tensor.
    pub name: String,
    /// Declared per-patch tensor length along this axis.
    pub declared_len: usize,
    /// Assigned role.
    pub role: AxisRole,
    /// Resample factor (target length / window length); resample axes only.
    pub factor: Option<f64>,
}

/// Role and factor lookup table over the declared output axes, in
/// declaration order.
#[derive(Clone, Debug)]
pub struct AxisPlan {
    entries: Vec<AxisBinding>,
}

impl AxisPlan {
    /// Iterates over the classified axes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &AxisBinding> {
        self.entries.iter()
    }

    /// Number of output axes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no axes were declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Role of a named axis.
    pub fn role_of(&self, axis: &str) -> Option<AxisRole> {
        self.entries
            .iter()
            .find(|e| e.name == axis)
            .map(|e| e.role)
    }

    /// Resample factor of a named axis, when it has one.
    pub fn factor_of(&self, axis: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.name == axis)
            .and_then(|e| e.factor)
    }

    /// Declared per-patch tensor lengths, in declaration order.
    pub fn declared_lens(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.declared_len).collect()
    }
}

fn near_integer(value: f64) -> bool {
    (value - value.round()).abs() <= RATIO_TOLERANCE * value.abs().max(1.0)
}

/// Validates the role partition and computes per-axis resample factors.
///
/// The three role lists must be pairwise disjoint and their union must equal
/// the set of declared output axis names. For every resample axis the factor
/// `declared_len / window_len` must be an integer or the reciprocal of one.
/// Pure function of its inputs; the returned [`AxisPlan`] is the single
/// source of truth for role lookups downstream.
pub fn classify_axes(
    output_dims: &[(String, usize)],
    new_axes: &[String],
    core_axes: &[String],
    resample_axes: &[String],
    grid: &WindowGrid,
) -> StitchResult<AxisPlan> {
    let declared = |axis: &String| output_dims.iter().any(|(name, _)| name == axis);
    for axis in new_axes.iter().chain(core_axes).chain(resample_axes) {
        if !declared(axis) {
            return Err(StitchError::UnknownRoleAxis { axis: axis.clone() });
        }
    }

    let mut entries = Vec::with_capacity(output_dims.len());
    for (name, declared_len) in output_dims {
        let mut roles = Vec::with_capacity(1);
        if new_axes.contains(name) {
            roles.push(AxisRole::New);
        }
        if core_axes.contains(name) {
            roles.push(AxisRole::Core);
        }
        if resample_axes.contains(name) {
            roles.push(AxisRole::Resample);
        }
        let role = match roles.as_slice() {
            [role] => *role,
            [] => return Err(StitchError::UnpartitionedAxis { axis: name.clone() }),
            _ => return Err(StitchError::DuplicateAxisRole { axis: name.clone() }),
        };

        let factor = match role {
            AxisRole::Resample => {
                let window = grid.window_len(name).ok_or_else(|| {
                    StitchError::UnwindowedResampleAxis { axis: name.clone() }
                })?;
                let factor = *declared_len as f64 / window as f64;
                if !near_integer(factor) && !near_integer(1.0 / factor) {
                    return Err(StitchError::InvalidRatio {
                        axis: name.clone(),
                        factor,
                    });
                }
                Some(factor)
            }
            AxisRole::New | AxisRole::Core => None,
        };

        entries.push(AxisBinding {
            name: name.clone(),
            declared_len: *declared_len,
            role,
            factor,
        });
    }

    debug!(
        axes = entries.len(),
        resample = entries
            .iter()
            .filter(|e| e.role == AxisRole::Resample)
            .count(),
        "classified output axes"
    );
    Ok(AxisPlan { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array, IxDyn};
    use st_window::LabeledArray;

    fn grid() -> WindowGrid {
        let data = Array::from_shape_vec(IxDyn(&[100, 10]), vec![0.0; 1000]).unwrap();
        let source = LabeledArray::new(data, vec!["x", "t"]).unwrap();
        WindowGrid::build(&source, &[("x", 10)], &[("x", 5)]).unwrap()
    }

    fn dims(pairs: &[(&str, usize)]) -> Vec<(String, usize)> {
        pairs.iter().map(|&(n, l)| (n.to_string(), l)).collect()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn downsample_factor_computed() {
        let plan = classify_axes(&dims(&[("x", 5)]), &[], &[], &names(&["x"]), &grid()).unwrap();
        assert_eq!(plan.role_of("x"), Some(AxisRole::Resample));
        assert_relative_eq!(plan.factor_of("x").unwrap(), 0.5);
    }

    #[test]
    fn upsample_factor_computed() {
        let plan = classify_axes(&dims(&[("x", 20)]), &[], &[], &names(&["x"]), &grid()).unwrap();
        assert_relative_eq!(plan.factor_of("x").unwrap(), 2.0);
    }

    #[test]
    fn fractional_ratio_rejected() {
        // Window 10, declared 15: factor 1.5, reciprocal 0.667.
        let err =
            classify_axes(&dims(&[("x", 15)]), &[], &[], &names(&["x"]), &grid()).unwrap_err();
        assert!(matches!(err, StitchError::InvalidRatio { .. }));
    }

    #[test]
    fn missing_axis_rejected() {
        let err = classify_axes(
            &dims(&[("x", 10), ("channel", 3)]),
            &[],
            &[],
            &names(&["x"]),
            &grid(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            StitchError::UnpartitionedAxis {
                axis: "channel".into()
            }
        );
    }

    #[test]
    fn doubly_assigned_axis_rejected() {
        let err = classify_axes(
            &dims(&[("x", 10)]),
            &names(&["x"]),
            &[],
            &names(&["x"]),
            &grid(),
        )
        .unwrap_err();
        assert_eq!(err, StitchError::DuplicateAxisRole { axis: "x".into() });
    }

    #[test]
    fn role_listed_axis_must_be_declared() {
        let err = classify_axes(
            &dims(&[("x", 10)]),
            &names(&["ghost"]),
            &[],
            &names(&["x"]),
            &grid(),
        )
        .unwrap_err();
        assert_eq!(err, StitchError::UnknownRoleAxis { axis: "ghost".into() });
    }

    #[test]
    fn resample_axis_needs_a_window() {
        let err = classify_axes(
            &dims(&[("t", 10)]),
            &[],
            &[],
            &names(&["t"]),
            &grid(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            StitchError::UnwindowedResampleAxis { axis: "t".into() }
        );
    }

    #[test]
    fn classification_is_idempotent() {
        let run = || {
            classify_axes(
                &dims(&[("channel", 3), ("x", 20)]),
                &names(&["channel"]),
                &[],
                &names(&["x"]),
                &grid(),
            )
            .unwrap()
        };
        let first = run();
        let second = run();
        assert_eq!(first.declared_lens(), second.declared_lens());
        assert_eq!(first.factor_of("x"), second.factor_of("x"));
        assert_eq!(first.role_of("channel"), second.role_of("channel"));
    }
}
