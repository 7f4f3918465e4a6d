//! Values flowing between a minimizer and a scatterer factory

use std::collections::HashMap;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{HoloFitError, Result};

/// Minimizer-side values: one real number per free parameter name
pub type NamedValues = HashMap<String, f64>;

/// A physical value handed to a scatterer factory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Real(f64),
    Complex(Complex64),
}

impl Value {
    /// The value as a complex number; reals get a zero imaginary part
    pub fn to_complex(self) -> Complex64 {
        match self {
            Value::Real(re) => Complex64::new(re, 0.0),
            Value::Complex(c) => c,
        }
    }

    pub fn as_real(self) -> Option<f64> {
        match self {
            Value::Real(re) => Some(re),
            Value::Complex(_) => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<Complex64> for Value {
    fn from(value: Complex64) -> Self {
        Value::Complex(value)
    }
}

/// Keyword arguments for a scatterer factory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: HashMap<String, Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Look up an argument, failing with the missing name
    pub fn get(&self, name: &str) -> Result<Value> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| HoloFitError::ParameterNotFound(name.to_string()))
    }

    /// Look up a real argument
    ///
    /// # Examples
    ///
    /// ```
    /// use holofit::parameters::Arguments;
    /// use num_complex::Complex64;
    ///
    /// let mut args = Arguments::new();
    /// args.insert("r", 0.5);
    /// args.insert("n", Complex64::new(1.59, 1e-4));
    ///
    /// assert_eq!(args.real("r").unwrap(), 0.5);
    /// assert!(args.real("n").is_err());
    /// assert_eq!(args.complex("r").unwrap(), Complex64::new(0.5, 0.0));
    /// ```
    pub fn real(&self, name: &str) -> Result<f64> {
        self.get(name)?
            .as_real()
            .ok_or_else(|| HoloFitError::InvalidArgument {
                name: name.to_string(),
                message: "expected a real value, got a complex one".to_string(),
            })
    }

    /// Look up an argument as a complex number
    pub fn complex(&self, name: &str) -> Result<Complex64> {
        Ok(self.get(name)?.to_complex())
    }
}

impl FromIterator<(String, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
