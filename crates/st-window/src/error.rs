// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use thiserror::Error;

/// Result alias used throughout the window crate.
pub type WindowResult<T> = Result<T, WindowError>;

/// Errors emitted while building labeled arrays, window grids, or batches.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum WindowError {
    /// The number of axis names does not match the array rank.
    #[error("expected {expected} axis names for a rank-{expected} array, got {got}")]
    DimCountMismatch { expected: usize, got: usize },
    /// The same axis name was declared twice on one array.
    #[error("axis `{axis}` declared more than once")]
    DuplicateAxis { axis: String },
    /// An operation referenced an axis the array does not carry.
    #[error("axis `{axis}` not present on the array")]
    UnknownAxis { axis: String },
    /// A coordinate array does not match the length of its axis.
    #[error("coordinate for axis `{axis}` has {got} values but the axis has length {expected}")]
    CoordinateLengthMismatch {
        axis: String,
        expected: usize,
        got: usize,
    },
    /// A window length of zero never yields a patch.
    #[error("window along axis `{axis}` must be non-zero")]
    ZeroWindow { axis: String },
    /// The window is longer than the axis it slides over.
    #[error("window {window} along axis `{axis}` exceeds the axis length {len}")]
    WindowTooLarge {
        axis: String,
        window: usize,
        len: usize,
    },
    /// Overlap must leave a positive stride.
    #[error("overlap {overlap} along axis `{axis}` must be smaller than the window {window}")]
    OverlapTooLarge {
        axis: String,
        overlap: usize,
        window: usize,
    },
    /// A patch index past the end of the grid was requested.
    #[error("patch index {index} out of range for a grid of {count} patches")]
    PatchOutOfRange { index: usize, count: usize },
    /// Mini-batch stacking received patches of unequal shape.
    #[error("cannot stack patches of differing shapes into one batch")]
    RaggedBatch,
    /// The model returned a batch the loader cannot account for.
    #[error("model error: {message}")]
    Model { message: String },
}
