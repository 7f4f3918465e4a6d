//! Observed data and its metadata.
//!
//! The fitting core needs very little from data: a cheap copy, a way to
//! overlay metadata, and the samples as an array. [`Data`] captures that
//! contract; [`Hologram`] is the in-memory image type used throughout the
//! crate.

use std::sync::Arc;

use ndarray::{Array2, ArrayViewD};
use serde::{Deserialize, Serialize};

/// What a model needs from the data it fits
pub trait Data: Clone {
    /// Metadata that can be merged onto a copy of the data
    type Overlay;

    /// The observed samples
    fn signal(&self) -> ArrayViewD<'_, f64>;

    /// Merge `overlay` into this object's metadata
    fn set_metadata(&mut self, overlay: &Self::Overlay);
}

/// Optical and sampling metadata attached to a hologram
///
/// Every field is optional; as an overlay only the fields that are set
/// override the data's own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Illumination wavelength in vacuum
    pub wavelen: Option<f64>,
    /// Refractive index of the medium
    pub medium_index: Option<f64>,
    /// Polarization of the illumination `(x, y)`
    pub polarization: Option<[f64; 2]>,
    /// Pixel spacing `(row, column)`
    pub spacing: Option<[f64; 2]>,
    /// Fraction of pixels a theory may sample instead of computing every one
    pub use_random_fraction: Option<f64>,
}

impl Metadata {
    /// Override every field that `overlay` sets
    pub fn merge(&mut self, overlay: &Metadata) {
        fn take<T: Copy>(field: &mut Option<T>, overlay: Option<T>) {
            if overlay.is_some() {
                *field = overlay;
            }
        }

        take(&mut self.wavelen, overlay.wavelen);
        take(&mut self.medium_index, overlay.medium_index);
        take(&mut self.polarization, overlay.polarization);
        take(&mut self.spacing, overlay.spacing);
        take(&mut self.use_random_fraction, overlay.use_random_fraction);
    }
}

/// A recorded hologram
///
/// Samples are shared: cloning copies the metadata and a handle to the
/// same array.
#[derive(Debug, Clone, PartialEq)]
pub struct Hologram {
    values: Arc<Array2<f64>>,
    metadata: Metadata,
}

impl Hologram {
    pub fn new(values: Array2<f64>) -> Self {
        Self {
            values: Arc::new(values),
            metadata: Metadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }
}

impl Data for Hologram {
    type Overlay = Metadata;

    fn signal(&self) -> ArrayViewD<'_, f64> {
        self.values.view().into_dyn()
    }

    fn set_metadata(&mut self, overlay: &Metadata) {
        self.metadata.merge(overlay);
    }
}
