//! Configuration options for fitting.
//!
//! A [`FitConfig`] controls how the minimizer-facing problem is built: how
//! derivatives are approximated and whether parameter limits are enforced
//! through the bounds transform.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Finite-difference scheme for the Jacobian
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffMethod {
    /// One extra evaluation per parameter
    #[default]
    Forward,

    /// Two extra evaluations per parameter, second-order accurate
    Central,
}

/// Configuration options for [`fit`](crate::minimizer::fit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Scheme used to approximate the Jacobian. Default: Forward
    pub diff_method: DiffMethod,

    /// Relative step size for finite differences. Default: 1e-8
    pub epsilon: f64,

    /// Whether Jacobian columns are evaluated on the rayon pool. Default: true
    pub parallel_jacobian: bool,

    /// Whether parameter limits are enforced through the bounds transform. Default: true
    pub use_bounds: bool,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            diff_method: DiffMethod::default(),
            epsilon: 1e-8,
            parallel_jacobian: true,
            use_bounds: true,
        }
    }
}

impl FitConfig {
    /// Parse a configuration; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration from a JSON file
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}
