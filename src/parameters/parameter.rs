//! Parameter definition and implementation
//!
//! A [`Parameter`] is one scalar quantity a fit may vary. Every parameter
//! carries an identity token ([`ParamId`]) issued when it is created; clones
//! keep the token. Two slots of a scatterer holding clones of the same
//! parameter are tied, two parameters built separately never are, whatever
//! their fields say.

use std::sync::atomic::{AtomicU64, Ordering};

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parameters::bounds::{Bounds, BoundsError};
use crate::parameters::values::Value;

/// Errors that can occur when registering parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Bounds error: {0}")]
    BoundsError(#[from] BoundsError),

    #[error("Parameter has no name and none can be derived")]
    MissingName,

    #[error("Parameter name '{name}' is registered twice")]
    DuplicateName { name: String },

    #[error(
        "Cannot label the tie between '{first}' and '{second}': \
         name the shared parameter explicitly"
    )]
    AmbiguousTie { first: String, second: String },
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity token of a [`Parameter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(u64);

impl ParamId {
    fn fresh() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl Default for ParamId {
    fn default() -> Self {
        Self::fresh()
    }
}

/// Limit attached to a parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Limit {
    /// Free over the whole real line
    Unbounded,
    /// Pinned to a single value
    Fixed(f64),
    /// Free within `[low, high]`
    Range(Bounds),
}

/// How a parameter participates in a fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterKind {
    /// Supplied by the minimizer
    Free,
    /// Constant, with its value
    Fixed(f64),
}

/// A named scalar quantity with a guess and an optional limit
///
/// The name is optional: a [`Parametrization`](crate::parametrization::Parametrization)
/// or [`ParameterizedObject`](crate::parametrization::ParameterizedObject)
/// decides the name it is registered under and never writes back into the
/// parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Identity is a runtime relationship; deserialized parameters get a fresh token.
    #[serde(skip)]
    id: ParamId,
    name: Option<String>,
    guess: f64,
    limit: Limit,
    fixed: bool,
}

impl Parameter {
    /// Create a free, unbounded parameter
    ///
    /// # Examples
    ///
    /// ```
    /// use holofit::parameters::Parameter;
    ///
    /// let r = Parameter::new(0.5e-6);
    /// assert_eq!(r.guess(), 0.5e-6);
    /// assert!(!r.is_fixed());
    /// assert!(r.name().is_none());
    /// ```
    pub fn new(guess: f64) -> Self {
        Self {
            id: ParamId::fresh(),
            name: None,
            guess,
            limit: Limit::Unbounded,
            fixed: false,
        }
    }

    /// Create a free, unbounded parameter with a name
    pub fn named(name: &str, guess: f64) -> Self {
        Self::new(guess).with_name(name)
    }

    /// Create a free parameter restricted to `[low, high]`
    ///
    /// The guess is clamped into the interval.
    pub fn bounded(guess: f64, low: f64, high: f64) -> Result<Self, ParameterError> {
        let bounds = Bounds::new(low, high)?;
        Ok(Self {
            guess: bounds.clamp(guess),
            limit: Limit::Range(bounds),
            ..Self::new(guess)
        })
    }

    /// Create a parameter pinned to `value`
    ///
    /// # Examples
    ///
    /// ```
    /// use holofit::parameters::{Parameter, ParameterKind};
    ///
    /// let n = Parameter::fixed(1.33);
    /// assert!(n.is_fixed());
    /// assert_eq!(n.kind(), ParameterKind::Fixed(1.33));
    /// ```
    pub fn fixed(value: f64) -> Self {
        Self {
            guess: value,
            limit: Limit::Fixed(value),
            fixed: true,
            ..Self::new(value)
        }
    }

    /// Attach a name; the identity token is kept
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn id(&self) -> ParamId {
        self.id
    }

    /// Whether `other` is this very parameter (same identity token)
    pub fn same_as(&self, other: &Parameter) -> bool {
        self.id == other.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn guess(&self) -> f64 {
        self.guess
    }

    pub fn limit(&self) -> Limit {
        self.limit
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// The interval a minimizer may explore
    pub fn bounds(&self) -> Bounds {
        match self.limit {
            Limit::Unbounded => Bounds::unbounded(),
            Limit::Fixed(value) => Bounds {
                low: value,
                high: value,
            },
            Limit::Range(bounds) => bounds,
        }
    }

    /// The constant used in place of an optimizer input
    ///
    /// A `Fixed` limit wins over the guess.
    pub fn fixed_value(&self) -> f64 {
        match self.limit {
            Limit::Fixed(value) => value,
            _ => self.guess,
        }
    }

    pub fn kind(&self) -> ParameterKind {
        if self.fixed {
            ParameterKind::Fixed(self.fixed_value())
        } else {
            ParameterKind::Free
        }
    }
}

/// A complex quantity described by two real parameters
///
/// Wherever it is registered it expands to `<name>.real` and `<name>.imag`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexParameter {
    name: Option<String>,
    pub real: Parameter,
    pub imag: Parameter,
}

impl ComplexParameter {
    pub fn new(real: Parameter, imag: Parameter) -> Self {
        Self {
            name: None,
            real,
            imag,
        }
    }

    pub fn named(name: &str, real: Parameter, imag: Parameter) -> Self {
        Self::new(real, imag).with_name(name)
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn guess(&self) -> Complex64 {
        Complex64::new(self.real.guess(), self.imag.guess())
    }

    /// The two registered entries for this quantity under `name`
    ///
    /// # Examples
    ///
    /// ```
    /// use holofit::parameters::{ComplexParameter, Parameter};
    ///
    /// let n = ComplexParameter::new(Parameter::new(1.59), Parameter::fixed(1e-4));
    /// let names: Vec<String> = n.components("n").into_iter().map(|(name, _)| name).collect();
    /// assert_eq!(names, ["n.real", "n.imag"]);
    /// ```
    pub fn components(&self, name: &str) -> [(String, &Parameter); 2] {
        [
            (format!("{}.real", name), &self.real),
            (format!("{}.imag", name), &self.imag),
        ]
    }
}

/// One named slot of a scatterer description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ParameterEntry {
    Scalar(Parameter),
    Complex(ComplexParameter),
    /// A value owned by the target that never takes part in a fit
    Constant(Value),
}

impl From<Parameter> for ParameterEntry {
    fn from(parameter: Parameter) -> Self {
        ParameterEntry::Scalar(parameter)
    }
}

impl From<ComplexParameter> for ParameterEntry {
    fn from(parameter: ComplexParameter) -> Self {
        ParameterEntry::Complex(parameter)
    }
}

impl From<f64> for ParameterEntry {
    fn from(value: f64) -> Self {
        ParameterEntry::Constant(Value::Real(value))
    }
}

impl From<Complex64> for ParameterEntry {
    fn from(value: Complex64) -> Self {
        ParameterEntry::Constant(Value::Complex(value))
    }
}

impl ParameterEntry {
    /// The value this entry takes when every parameter sits at its guess
    pub fn guess_value(&self) -> Value {
        match self {
            ParameterEntry::Scalar(p) => Value::Real(p.guess()),
            ParameterEntry::Complex(c) => Value::Complex(c.guess()),
            ParameterEntry::Constant(v) => *v,
        }
    }
}
