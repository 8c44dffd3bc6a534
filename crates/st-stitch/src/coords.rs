// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! 1-D coordinate resampling under an edges-or-centers convention.
//!
//! This is the one genuinely float-sensitive corner of the stitch pipeline:
//! the output span is derived from the observed first sample and step, never
//! from a declared domain size. Input spacing must be uniform; rather than
//! silently producing a wrong span, non-uniform input is rejected.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{StitchError, StitchResult};

/// Relative tolerance for the uniform-spacing check.
const SPACING_TOLERANCE: f64 = 1e-6;

/// Whether coordinate values mark cell boundaries or cell midpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordMode {
    /// Values mark cell edges: the output runs from the first value in
    /// steps of `old_step / factor`.
    Edges,
    /// Values mark cell midpoints: the output is shifted by half a step on
    /// both sides so each new value stays centred in its covering cell.
    Centers,
}

/// Resamples a uniform-step coordinate array by `factor`.
///
/// The result has `round(len * factor)` values spaced `old_step / factor`
/// apart. Deterministic: depends only on the input values, factor, and mode.
pub fn resample_coordinate(
    coord: &Array1<f64>,
    factor: f64,
    mode: CoordMode,
) -> StitchResult<Array1<f64>> {
    if coord.len() < 2 {
        return Err(StitchError::CoordinateTooShort { len: coord.len() });
    }
    let step = coord[1] - coord[0];
    for i in 1..coord.len() {
        let got = coord[i] - coord[i - 1];
        if (got - step).abs() > SPACING_TOLERANCE * step.abs().max(1.0) {
            return Err(StitchError::NonUniformSpacing {
                position: i,
                expected: step,
                got,
            });
        }
    }

    let new_len = (coord.len() as f64 * factor).round() as usize;
    let new_step = step / factor;
    let start = match mode {
        CoordMode::Edges => coord[0],
        CoordMode::Centers => coord[0] + (new_step - step) / 2.0,
    };
    Ok(Array1::from_iter(
        (0..new_len).map(|i| start + i as f64 * new_step),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(len: usize) -> Array1<f64> {
        Array1::from_iter((0..len).map(|v| v as f64))
    }

    fn assert_values(result: &Array1<f64>, expected: &[f64]) {
        assert_eq!(result.len(), expected.len());
        for (got, want) in result.iter().zip(expected) {
            assert_relative_eq!(got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn edges_densify() {
        let result = resample_coordinate(&ramp(10), 2.0, CoordMode::Edges).unwrap();
        let expected: Vec<f64> = (0..20).map(|i| i as f64 * 0.5).collect();
        assert_values(&result, &expected);
    }

    #[test]
    fn edges_coarsen() {
        let result = resample_coordinate(&ramp(10), 0.5, CoordMode::Edges).unwrap();
        assert_values(&result, &[0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn centers_densify_stay_centred() {
        // Cell [-0.5, 0.5) splits into halves centred at -0.25 and 0.25.
        let result = resample_coordinate(&ramp(10), 2.0, CoordMode::Centers).unwrap();
        assert_relative_eq!(result[0], -0.25);
        assert_relative_eq!(result[1], 0.25);
        assert_relative_eq!(result[19], 9.25);
    }

    #[test]
    fn centers_coarsen_stay_centred() {
        // Cells {0,1} merge into one cell centred at 0.5.
        let result = resample_coordinate(&ramp(10), 0.5, CoordMode::Centers).unwrap();
        assert_values(&result, &[0.5, 2.5, 4.5, 6.5, 8.5]);
    }

    #[test]
    fn descending_coordinates_keep_direction() {
        let coord = Array1::from_iter((0..4).map(|v| 6.0 - 2.0 * v as f64));
        let result = resample_coordinate(&coord, 2.0, CoordMode::Edges).unwrap();
        assert_values(&result, &[6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 0.0, -1.0]);
    }

    #[test]
    fn too_short_rejected() {
        let err = resample_coordinate(&ramp(1), 2.0, CoordMode::Edges).unwrap_err();
        assert_eq!(err, StitchError::CoordinateTooShort { len: 1 });
    }

    #[test]
    fn non_uniform_rejected() {
        let coord = Array1::from(vec![0.0, 1.0, 2.5, 3.5]);
        let err = resample_coordinate(&coord, 2.0, CoordMode::Edges).unwrap_err();
        assert!(matches!(
            err,
            StitchError::NonUniformSpacing { position: 2, .. }
        ));
    }
}
