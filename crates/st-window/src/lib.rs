// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Overlapping-window generation and patch batching over labeled N-D arrays.
//!
//! This crate owns the collaborator side of patch-based inference: a
//! [`LabeledArray`] container that pairs an [`ndarray::ArrayD`] with named
//! axes and optional coordinate arrays, a [`WindowGrid`] that partitions a
//! source array into overlapping windows and answers `selector(index)`
//! queries, a [`PatchLoader`] that groups patches into ordered mini-batches,
//! and the [`PatchModel`] boundary trait for the inference function itself.

pub mod array;
pub mod error;
pub mod grid;
pub mod loader;
pub mod model;

pub use array::LabeledArray;
pub use error::{WindowError, WindowResult};
pub use grid::{PatchSelector, WindowGrid};
pub use loader::{PatchBatch, PatchBatches, PatchLoader};
pub use model::PatchModel;
