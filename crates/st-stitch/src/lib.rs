// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Reassembly of per-patch model outputs into one coherent labeled array.
//!
//! An inference model run over overlapping windows of a source array may
//! introduce new axes, carry source axes through unchanged, or resample
//! axes by an integer factor (or the reciprocal of one). This crate owns
//! the axis algebra and numerics needed to stitch those per-patch outputs
//! back together:
//!
//! * [`classify_axes`] partitions the output axis names into the closed
//!   role set {new, core, resample} and derives per-axis resample factors.
//! * [`size_output_grid`] computes the full output shape before any patch
//!   is processed, failing fast on inconsistent declarations.
//! * [`map_selector`] rescales each patch's source-grid slice into the
//!   output grid.
//! * [`Accumulator`] averages overlapping contributions via paired
//!   sum/count arrays; cells no patch touched finalize to NaN.
//! * [`resample_coordinate`] coarsens or densifies 1-D coordinate arrays
//!   under an edges-or-centers convention.
//! * [`reassemble`] drives the whole pipeline against a model and a window
//!   grid from `st-window`.

pub mod accum;
pub mod assemble;
pub mod axes;
pub mod coords;
pub mod error;
pub mod grid;
pub mod mapper;
pub mod telemetry;

pub use accum::Accumulator;
pub use assemble::{reassemble, ReassemblySpec};
pub use axes::{classify_axes, AxisPlan, AxisRole};
pub use coords::{resample_coordinate, CoordMode};
pub use error::{StitchError, StitchResult};
pub use grid::{size_output_grid, OutputShape};
pub use mapper::{map_selector, OutputRegion};
