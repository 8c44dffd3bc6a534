// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Mapping of source-grid patch selectors into the resampled output grid.

use std::ops::Range;

use st_window::PatchSelector;

use crate::axes::AxisPlan;

/// Output-grid slice receiving one patch's contribution.
///
/// Carries ranges for resample axes only: core and new axes receive the
/// patch's contribution across their whole extent, so they are omitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRegion {
    slices: Vec<(String, Range<usize>)>,
}

impl OutputRegion {
    /// Iterates over `(axis, range)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Range<usize>)> {
        self.slices.iter().map(|(axis, range)| (axis.as_str(), range))
    }

    /// Range along one axis, if that axis is sliced per patch.
    pub fn get(&self, axis: &str) -> Option<&Range<usize>> {
        self.slices
            .iter()
            .find(|(name, _)| name == axis)
            .map(|(_, range)| range)
    }
}

/// Rescales one patch's source-grid slice into the output grid.
///
/// Bounds map through `floor(bound * factor)`: truncation guarantees that
/// when source patches tile exactly, the rescaled slices tile exactly too,
/// never overlapping by a fractional cell. Stateless and reproducible from
/// the selector and plan alone.
pub fn map_selector(selector: &PatchSelector, plan: &AxisPlan) -> OutputRegion {
    let mut slices = Vec::new();
    for (axis, range) in selector.iter() {
        if let Some(factor) = plan.factor_of(axis) {
            let start = (range.start as f64 * factor).floor() as usize;
            let stop = (range.end as f64 * factor).floor() as usize;
            slices.push((axis.to_string(), start..stop));
        }
    }
    OutputRegion { slices }
}
