//! Arrays with named dimensions and coordinate values
//!
//! `LabeledArray` is the minimal amount of labelling the vertical routines
//! need: a name per axis and optional 1-D coordinate values along an axis.
//! Arithmetic happens on the underlying `ndarray` data; the labels decide
//! which axis a routine works on and how two arrays line up.

use crate::errors::{AtmosVertError, Result};
use ndarray::{Array1, ArrayD, Axis, IxDyn};
use std::collections::BTreeMap;

/// N-dimensional `f64` array with one name per axis
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledArray {
    data: ArrayD<f64>,
    dims: Vec<String>,
    coords: BTreeMap<String, Array1<f64>>,
}

impl LabeledArray {
    /// Wrap `data`, naming its axes in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of names differs from the array's
    /// dimensionality or a name is repeated.
    pub fn new<I, S>(data: ArrayD<f64>, dims: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != data.ndim() {
            return Err(AtmosVertError::DimensionMismatch {
                expected: format!("{} (one per dimension name)", dims.len()),
                found: data.ndim(),
            });
        }
        for (i, dim) in dims.iter().enumerate() {
            if dims[..i].contains(dim) {
                return Err(AtmosVertError::ShapeMismatch {
                    message: format!("dimension name '{dim}' used more than once"),
                });
            }
        }

        Ok(Self {
            data,
            dims,
            coords: BTreeMap::new(),
        })
    }

    /// One-dimensional array along `dim`, with `values` also used as its coordinate.
    #[must_use]
    pub fn coordinate(dim: &str, values: Array1<f64>) -> Self {
        let mut coords = BTreeMap::new();
        coords.insert(dim.to_string(), values.clone());
        Self {
            data: values.into_dyn(),
            dims: vec![dim.to_string()],
            coords,
        }
    }

    /// Attach coordinate values along an existing dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if `dim` is not a dimension of the array or the
    /// coordinate length differs from the dimension length.
    pub fn with_coord(mut self, dim: &str, values: Array1<f64>) -> Result<Self> {
        let len = self.len_of_dim(dim)?;
        if values.len() != len {
            return Err(AtmosVertError::ShapeMismatch {
                message: format!(
                    "coordinate '{dim}' has {} values but the dimension has length {len}",
                    values.len()
                ),
            });
        }
        self.coords.insert(dim.to_string(), values);
        Ok(self)
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ArrayD<f64> {
        &mut self.data
    }

    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn has_dim(&self, dim: &str) -> bool {
        self.dims.iter().any(|d| d == dim)
    }

    pub fn has_coord(&self, dim: &str) -> bool {
        self.coords.contains_key(dim)
    }

    pub fn coord(&self, dim: &str) -> Option<&Array1<f64>> {
        self.coords.get(dim)
    }

    pub fn coords(&self) -> &BTreeMap<String, Array1<f64>> {
        &self.coords
    }

    /// Positional axis of a named dimension.
    ///
    /// # Errors
    ///
    /// Returns [`AtmosVertError::DimensionNotFound`] for an unknown name.
    pub fn axis_of(&self, dim: &str) -> Result<Axis> {
        self.dims
            .iter()
            .position(|d| d == dim)
            .map(Axis)
            .ok_or_else(|| AtmosVertError::DimensionNotFound {
                dim: dim.to_string(),
            })
    }

    /// Length of a named dimension.
    ///
    /// # Errors
    ///
    /// Returns [`AtmosVertError::DimensionNotFound`] for an unknown name.
    pub fn len_of_dim(&self, dim: &str) -> Result<usize> {
        let axis = self.axis_of(dim)?;
        Ok(self.data.len_of(axis))
    }

    /// Rename a dimension, carrying its coordinate along.
    ///
    /// # Errors
    ///
    /// Returns an error if `old` is missing or `new` is already taken.
    pub fn rename_dim(mut self, old: &str, new: &str) -> Result<Self> {
        let axis = self.axis_of(old)?;
        if old != new && self.has_dim(new) {
            return Err(AtmosVertError::ShapeMismatch {
                message: format!("cannot rename '{old}' to existing dimension '{new}'"),
            });
        }
        self.dims[axis.index()] = new.to_string();
        if let Some(values) = self.coords.remove(old) {
            self.coords.insert(new.to_string(), values);
        }
        Ok(self)
    }

    /// Build a sibling array with the same labels except along `dim`, which
    /// is replaced by `new_dim` (same axis position) carrying `coord`.
    ///
    /// Coordinates of the untouched dimensions are kept as long as the new
    /// data still agrees with them in length.
    ///
    /// # Errors
    ///
    /// Returns an error if `dim` is missing, `data` has a different
    /// dimensionality, or `coord` does not match the new axis length.
    pub fn with_vertical(
        &self,
        dim: &str,
        data: ArrayD<f64>,
        new_dim: &str,
        coord: Option<Array1<f64>>,
    ) -> Result<Self> {
        let axis = self.axis_of(dim)?;
        if data.ndim() != self.ndim() {
            return Err(AtmosVertError::DimensionMismatch {
                expected: self.ndim().to_string(),
                found: data.ndim(),
            });
        }

        let mut dims = self.dims.clone();
        dims[axis.index()] = new_dim.to_string();
        let mut out = Self::new(data, dims)?;
        for (name, values) in &self.coords {
            if name != dim && out.len_of_dim(name).ok() == Some(values.len()) {
                out.coords.insert(name.clone(), values.clone());
            }
        }
        match coord {
            Some(values) => out.with_coord(new_dim, values),
            None => Ok(out),
        }
    }

    /// Wrap the result of reducing `self` over `dim`, dropping that dimension
    /// and its coordinate.
    ///
    /// # Errors
    ///
    /// Returns an error if `dim` is missing or `data` does not have one
    /// dimension fewer than `self`.
    pub fn reduced(&self, dim: &str, data: ArrayD<f64>) -> Result<Self> {
        self.axis_of(dim)?;
        let dims: Vec<String> = self.dims.iter().filter(|d| *d != dim).cloned().collect();
        let mut out = Self::new(data, dims)?;
        for (name, values) in &self.coords {
            if name != dim && out.len_of_dim(name).ok() == Some(values.len()) {
                out.coords.insert(name.clone(), values.clone());
            }
        }
        Ok(out)
    }

    /// Broadcast this array against a target layout, matching axes by name.
    ///
    /// Every dimension of `self` must appear in `target_dims`; target
    /// dimensions missing from `self` are broadcast.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension of `self` is absent from the target
    /// or a shared dimension differs in length.
    pub fn broadcast_to(&self, target_dims: &[String], target_shape: &[usize]) -> Result<ArrayD<f64>> {
        if let Some(missing) = self.dims.iter().find(|d| !target_dims.contains(d)) {
            return Err(AtmosVertError::DimensionNotFound {
                dim: missing.clone(),
            });
        }

        let mut order = Vec::with_capacity(self.dims.len());
        let mut shape = Vec::with_capacity(target_dims.len());
        for dim in target_dims {
            match self.dims.iter().position(|d| d == dim) {
                Some(i) => {
                    order.push(i);
                    shape.push(self.data.len_of(Axis(i)));
                }
                None => shape.push(1),
            }
        }

        let aligned = self
            .data
            .view()
            .permuted_axes(IxDyn(&order[..]))
            .as_standard_layout()
            .into_owned()
            .into_shape(IxDyn(&shape[..]))?;

        let view = aligned
            .broadcast(IxDyn(target_shape))
            .ok_or_else(|| AtmosVertError::ShapeMismatch {
                message: format!(
                    "cannot broadcast {:?} {:?} to {:?} {:?}",
                    self.dims,
                    self.shape(),
                    target_dims,
                    target_shape
                ),
            })?;
        Ok(view.to_owned())
    }
}
