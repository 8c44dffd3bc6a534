// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use thiserror::Error;

use st_window::WindowError;

/// Result alias used throughout the stitch crate.
pub type StitchResult<T> = Result<T, StitchError>;

/// Errors raised while classifying axes, sizing the output grid, or
/// accumulating patch contributions.
///
/// All configuration errors surface during the pre-flight classify/size
/// phase, before the model is ever invoked; the remaining variants flag
/// collaborator misbehaviour discovered while iterating patches.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum StitchError {
    /// An output axis appears in none of the new/core/resample lists.
    #[error("axis `{axis}` is missing from the new/core/resample partition")]
    UnpartitionedAxis { axis: String },
    /// An output axis was claimed by more than one role list.
    #[error("axis `{axis}` is assigned to more than one of new/core/resample")]
    DuplicateAxisRole { axis: String },
    /// A role list names an axis the output tensor does not carry.
    #[error("axis `{axis}` is listed in a role but absent from the output dims")]
    UnknownRoleAxis { axis: String },
    /// A resample factor that is neither an integer nor the reciprocal of one.
    #[error("resample factor {factor} for axis `{axis}` is neither an integer nor a reciprocal of one")]
    InvalidRatio { axis: String, factor: f64 },
    /// Declared core-axis length disagrees with the source array.
    #[error("core axis `{axis}` declared with length {declared} but the source has length {actual}")]
    CoreAxisMismatch {
        axis: String,
        declared: usize,
        actual: usize,
    },
    /// A resample axis whose scaled output length is not an integer.
    #[error("axis `{axis}` resamples to non-integral output length {computed}")]
    NonIntegralOutputSize { axis: String, computed: f64 },
    /// A core or resample axis the source array does not carry.
    #[error("axis `{axis}` is not present on the source array")]
    MissingSourceAxis { axis: String },
    /// A resample axis the window generator never windowed.
    #[error("resample axis `{axis}` has no window length on the generator")]
    UnwindowedResampleAxis { axis: String },
    /// Model output does not fit the declared dims or its mapped region.
    #[error("patch output shape {got:?} does not match the expected {expected:?}")]
    PatchShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    /// An accumulation region referenced an axis the output grid lacks.
    #[error("region references axis `{axis}` which the output grid does not carry")]
    UnknownRegionAxis { axis: String },
    /// Two accumulators with different grids cannot be merged.
    #[error("cannot merge accumulators over shapes {left:?} and {right:?}")]
    ShardMismatch {
        left: Vec<usize>,
        right: Vec<usize>,
    },
    /// Coordinate resampling needs at least two samples to observe a step.
    #[error("coordinate axis with {len} values is too short to resample")]
    CoordinateTooShort { len: usize },
    /// Coordinate values must be uniformly spaced.
    #[error("coordinate spacing at position {position} is {got}, expected {expected}")]
    NonUniformSpacing {
        position: usize,
        expected: f64,
        got: f64,
    },
    /// Propagated failure from the window generator, loader, or model.
    #[error(transparent)]
    Window(#[from] WindowError),
}
