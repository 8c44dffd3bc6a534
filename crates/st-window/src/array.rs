// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::collections::HashMap;

use ndarray::{Array1, ArrayD, ArrayViewD};

use crate::error::{WindowError, WindowResult};

/// Dense N-D array with named axes and optional per-axis coordinate arrays.
///
/// Axis names are ordered and unique; coordinates are 1-D `f64` arrays whose
/// length matches the axis they describe. Coordinates are metadata only: no
/// numeric operation in this crate reads them.
#[derive(Clone, Debug)]
pub struct LabeledArray {
    data: ArrayD<f32>,
    dims: Vec<String>,
    coords: HashMap<String, Array1<f64>>,
}

impl LabeledArray {
    /// Validates and constructs a labeled array from data and axis names.
    pub fn new<S: Into<String>>(data: ArrayD<f32>, dims: Vec<S>) -> WindowResult<Self> {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != data.ndim() {
            return Err(WindowError::DimCountMismatch {
                expected: data.ndim(),
                got: dims.len(),
            });
        }
        for (i, name) in dims.iter().enumerate() {
            if dims[..i].contains(name) {
                return Err(WindowError::DuplicateAxis { axis: name.clone() });
            }
        }
        Ok(Self {
            data,
            dims,
            coords: HashMap::new(),
        })
    }

    /// Attaches a coordinate array to one axis, replacing any previous one.
    pub fn with_coord(mut self, axis: &str, values: Array1<f64>) -> WindowResult<Self> {
        let len = self
            .len_of(axis)
            .ok_or_else(|| WindowError::UnknownAxis { axis: axis.into() })?;
        if values.len() != len {
            return Err(WindowError::CoordinateLengthMismatch {
                axis: axis.into(),
                expected: len,
                got: values.len(),
            });
        }
        self.coords.insert(axis.into(), values);
        Ok(self)
    }

    /// Underlying data view.
    pub fn view(&self) -> ArrayViewD<'_, f32> {
        self.data.view()
    }

    /// Underlying data array.
    pub fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    /// Ordered axis names.
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Position of an axis in the dimension order.
    pub fn index_of(&self, axis: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == axis)
    }

    /// Length along a named axis.
    pub fn len_of(&self, axis: &str) -> Option<usize> {
        self.index_of(axis).map(|i| self.data.shape()[i])
    }

    /// Coordinate array attached to a named axis, if any.
    pub fn coord(&self, axis: &str) -> Option<&Array1<f64>> {
        self.coords.get(axis)
    }

    /// Shape in dimension order.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }
}
