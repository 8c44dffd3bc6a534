// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Overlapping-window plans over labeled arrays.
//!
//! A [`WindowGrid`] slides fixed-length windows along a chosen subset of
//! source axes with stride `window - overlap`, dropping ragged tail windows
//! that would run past the axis. Axes without a window travel whole into
//! every patch. Every patch index maps to a [`PatchSelector`], the exact
//! source-grid slice the patch was drawn from; the selector table is built
//! eagerly so `selector(index)` is a cheap first-class query rather than a
//! reach into iterator internals.

use std::ops::Range;

use ndarray::{ArrayD, SliceInfoElem};

use crate::array::LabeledArray;
use crate::error::{WindowError, WindowResult};

/// Source-grid slice identifying where one patch was drawn from.
///
/// Holds a half-open `start..stop` range per *windowed* axis, in window
/// declaration order. Consumers treat this as read-only provenance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchSelector {
    slices: Vec<(String, Range<usize>)>,
}

impl PatchSelector {
    /// Iterates over `(axis, range)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Range<usize>)> {
        self.slices.iter().map(|(axis, range)| (axis.as_str(), range))
    }

    /// Range along one axis, if that axis is windowed.
    pub fn get(&self, axis: &str) -> Option<&Range<usize>> {
        self.slices
            .iter()
            .find(|(name, _)| name == axis)
            .map(|(_, range)| range)
    }
}

#[derive(Clone, Debug)]
struct WindowAxis {
    name: String,
    window: usize,
    stride: usize,
    count: usize,
}

/// Partition of a source array into overlapping windows.
#[derive(Clone, Debug)]
pub struct WindowGrid {
    source_dims: Vec<String>,
    axes: Vec<WindowAxis>,
    selectors: Vec<PatchSelector>,
}

impl WindowGrid {
    /// Builds a window grid over `source`.
    ///
    /// * `windows` – `(axis, window length)` pairs for the axes to slide over.
    /// * `overlap` – `(axis, overlap)` pairs; axes not listed default to 0.
    ///   Overlap must be smaller than the window so the stride stays positive.
    pub fn build(
        source: &LabeledArray,
        windows: &[(&str, usize)],
        overlap: &[(&str, usize)],
    ) -> WindowResult<Self> {
        for (axis, _) in overlap {
            if !windows.iter().any(|(name, _)| name == axis) {
                return Err(WindowError::UnknownAxis {
                    axis: (*axis).into(),
                });
            }
        }

        let mut axes = Vec::with_capacity(windows.len());
        for &(axis, window) in windows {
            let len = source
                .len_of(axis)
                .ok_or_else(|| WindowError::UnknownAxis { axis: axis.into() })?;
            if window == 0 {
                return Err(WindowError::ZeroWindow { axis: axis.into() });
            }
            if window > len {
                return Err(WindowError::WindowTooLarge {
                    axis: axis.into(),
                    window,
                    len,
                });
            }
            let lap = overlap
                .iter()
                .find(|(name, _)| *name == axis)
                .map_or(0, |&(_, lap)| lap);
            if lap >= window {
                return Err(WindowError::OverlapTooLarge {
                    axis: axis.into(),
                    overlap: lap,
                    window,
                });
            }
            let stride = window - lap;
            // Ragged tail windows are dropped, matching the generator
            // convention the selectors were designed around.
            let count = (len - window) / stride + 1;
            axes.push(WindowAxis {
                name: axis.into(),
                window,
                stride,
                count,
            });
        }

        let selectors = enumerate_selectors(&axes);
        Ok(Self {
            source_dims: source.dims().to_vec(),
            axes,
            selectors,
        })
    }

    /// Total number of patches in the grid.
    pub fn num_patches(&self) -> usize {
        self.selectors.len()
    }

    /// Window length along a windowed axis.
    pub fn window_len(&self, axis: &str) -> Option<usize> {
        self.axes
            .iter()
            .find(|a| a.name == axis)
            .map(|a| a.window)
    }

    /// True when the given axis is slid over by this grid.
    pub fn is_windowed(&self, axis: &str) -> bool {
        self.axes.iter().any(|a| a.name == axis)
    }

    /// Source-grid slice for one patch index.
    pub fn selector(&self, index: usize) -> WindowResult<&PatchSelector> {
        self.selectors.get(index).ok_or(WindowError::PatchOutOfRange {
            index,
            count: self.selectors.len(),
        })
    }

    /// Extracts the patch tensor for one patch index.
    ///
    /// The result keeps the source dimension order; non-windowed axes are
    /// included at full extent.
    pub fn extract(&self, source: &LabeledArray, index: usize) -> WindowResult<ArrayD<f32>> {
        let selector = self.selector(index)?;
        let full = SliceInfoElem::Slice {
            start: 0,
            end: None,
            step: 1,
        };
        let mut info: Vec<SliceInfoElem> = vec![full; source.dims().len()];
        for (axis, range) in selector.iter() {
            let pos = source
                .index_of(axis)
                .ok_or_else(|| WindowError::UnknownAxis { axis: axis.into() })?;
            info[pos] = SliceInfoElem::Slice {
                start: range.start as isize,
                end: Some(range.end as isize),
                step: 1,
            };
        }
        Ok(source.view().slice(info.as_slice()).to_owned())
    }

    /// Dimension order of the source array the grid was built over.
    pub fn source_dims(&self) -> &[String] {
        &self.source_dims
    }
}

/// Enumerates selectors in C order over the windowed axes: the last declared
/// axis advances fastest, mirroring row-major patch iteration.
fn enumerate_selectors(axes: &[WindowAxis]) -> Vec<PatchSelector> {
    let total: usize = axes.iter().map(|a| a.count).product();
    let mut selectors = Vec::with_capacity(total);
    for index in 0..total {
        let mut remainder = index;
        let mut positions = vec![0usize; axes.len()];
        for (i, axis) in axes.iter().enumerate().rev() {
            positions[i] = remainder % axis.count;
            remainder /= axis.count;
        }
        let slices = axes
            .iter()
            .zip(&positions)
            .map(|(axis, &pos)| {
                let start = pos * axis.stride;
                (axis.name.clone(), start..start + axis.window)
            })
            .collect();
        selectors.push(PatchSelector { slices });
    }
    selectors
}
