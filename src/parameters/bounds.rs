//! Parameter limits
//!
//! A free parameter may be restricted to a `(low, high)` interval. Minimizers
//! that only understand unconstrained vectors see the parameter through a
//! Minuit-style transform: the internal value ranges over the whole real line
//! and always maps onto an external value inside the interval.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when working with parameter limits
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    #[error("Invalid bounds: low ({low}) must not exceed high ({high})")]
    InvalidBounds { low: f64, high: f64 },

    #[error("Value {value} is outside bounds: [{low}, {high}]")]
    ValueOutsideBounds { value: f64, low: f64, high: f64 },

    #[error("Non-finite parameter value {0} is not allowed")]
    NonFiniteValue(f64),
}

/// A closed interval `[low, high]`; either end may be infinite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "BoundsRepr", into = "BoundsRepr")]
pub struct Bounds {
    pub low: f64,
    pub high: f64,
}

/// Serialized form: infinite ends become `null` so the JSON stays valid.
#[derive(Serialize, Deserialize)]
struct BoundsRepr {
    #[serde(default)]
    low: Option<f64>,
    #[serde(default)]
    high: Option<f64>,
}

impl From<BoundsRepr> for Bounds {
    fn from(repr: BoundsRepr) -> Self {
        Self {
            low: repr.low.unwrap_or(f64::NEG_INFINITY),
            high: repr.high.unwrap_or(f64::INFINITY),
        }
    }
}

impl From<Bounds> for BoundsRepr {
    fn from(bounds: Bounds) -> Self {
        Self {
            low: bounds.low.is_finite().then_some(bounds.low),
            high: bounds.high.is_finite().then_some(bounds.high),
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Bounds {
    /// Create a `[low, high]` interval
    ///
    /// # Examples
    ///
    /// ```
    /// use holofit::parameters::Bounds;
    ///
    /// let bounds = Bounds::new(0.5, 2.0).unwrap();
    /// assert!(bounds.contains(1.0));
    /// assert!(Bounds::new(2.0, 0.5).is_err());
    /// ```
    pub fn new(low: f64, high: f64) -> Result<Self, BoundsError> {
        if low.is_nan() || high.is_nan() || low > high {
            return Err(BoundsError::InvalidBounds { low, high });
        }

        Ok(Self { low, high })
    }

    /// The whole real line
    pub fn unbounded() -> Self {
        Self {
            low: f64::NEG_INFINITY,
            high: f64::INFINITY,
        }
    }

    /// `[low, +inf)`
    pub fn at_least(low: f64) -> Self {
        Self {
            low,
            high: f64::INFINITY,
        }
    }

    /// `(-inf, high]`
    pub fn at_most(high: f64) -> Self {
        Self {
            low: f64::NEG_INFINITY,
            high,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    pub fn has_low(&self) -> bool {
        self.low.is_finite()
    }

    pub fn has_high(&self) -> bool {
        self.high.is_finite()
    }

    pub fn is_unbounded(&self) -> bool {
        !self.has_low() && !self.has_high()
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.low, self.high)
    }

    /// Check that `value` is finite and inside the interval
    pub fn check(&self, value: f64) -> Result<(), BoundsError> {
        if !value.is_finite() {
            return Err(BoundsError::NonFiniteValue(value));
        }
        if !self.contains(value) {
            return Err(BoundsError::ValueOutsideBounds {
                value,
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }
}

/// Minuit-style mapping between an unconstrained internal value and a
/// bounded external value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsTransform {
    bounds: Bounds,
}

impl BoundsTransform {
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Map an internal (optimizer) value onto the bounded interval
    pub fn to_external(&self, internal: f64) -> f64 {
        let Bounds { low, high } = self.bounds;
        match (self.bounds.has_low(), self.bounds.has_high()) {
            (false, false) => internal,
            (true, false) => low - 1.0 + (internal * internal + 1.0).sqrt(),
            (false, true) => high + 1.0 - (internal * internal + 1.0).sqrt(),
            (true, true) => low + (internal.sin() + 1.0) * (high - low) / 2.0,
        }
    }

    /// Map a bounded external value onto the internal line
    ///
    /// Fails if the value is not finite or lies outside the interval.
    pub fn to_internal(&self, external: f64) -> Result<f64, BoundsError> {
        self.bounds.check(external)?;

        let Bounds { low, high } = self.bounds;
        let internal = match (self.bounds.has_low(), self.bounds.has_high()) {
            (false, false) => external,
            (true, false) => ((external - low + 1.0).powi(2) - 1.0).sqrt(),
            (false, true) => ((high - external + 1.0).powi(2) - 1.0).sqrt(),
            (true, true) => {
                if high == low {
                    0.0
                } else {
                    (2.0 * (external - low) / (high - low) - 1.0)
                        .clamp(-1.0, 1.0)
                        .asin()
                }
            }
        };
        Ok(internal)
    }
}
