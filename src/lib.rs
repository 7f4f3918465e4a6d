//! # holofit
//!
//! `holofit` binds free parameters to scatterer descriptions and turns a
//! scattering model plus observed data into a residual function that any
//! least-squares minimizer can drive.
//!
//! The library provides:
//! - Scalar and complex parameters with guesses, limits and fixed values
//! - Parametrizations that rebuild scatterers from flat named values, with
//!   automatic tie groups for parameters shared between slots
//! - Spheres, sphere clusters and templates for them
//! - Models that combine a scattering theory, a metadata overlay and an
//!   optional scaling factor, and produce pure cost functions
//! - A minimizer seam with finite-difference Jacobians (optionally parallel)
//!
//! ## Basic Usage
//!
//! ```
//! use holofit::prelude::*;
//! use ndarray::{array, ArrayD};
//!
//! // One shared radius for both spheres of a dimer
//! let r = Parameter::new(0.5);
//! let sphere = |z: f64| {
//!     SphereTemplate::new(
//!         ComplexParameter::new(Parameter::new(1.59), Parameter::fixed(1e-4)),
//!         r.clone(),
//!         [0.0.into(), 0.0.into(), Parameter::new(z).into()],
//!     )
//! };
//! let dimer = ClusterTemplate::new(vec![sphere(10.0), sphere(11.0)]);
//!
//! let theory = |cluster: &SphereCluster, target: &Hologram, scaling: f64| -> holofit::Result<ArrayD<f64>> {
//!     let total: f64 = cluster.spheres.iter().map(|s| s.r).sum();
//!     Ok(target.signal().map(|_| total * scaling))
//! };
//! let model = Model::from_object(dimer, theory)
//!     .unwrap()
//!     .with_alpha(Parameter::new(1.0))
//!     .unwrap();
//! assert!(model.parameter_names().contains(&"Sphere.r".to_string()));
//!
//! let data = Hologram::new(array![[1.0, 1.0], [1.0, 1.0]]);
//! let residuals = model.cost_func(&data).eval(&model.guess_values()).unwrap();
//! assert_eq!(residuals.len(), 4);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod minimizer;
pub mod model;
pub mod parameters;
pub mod parametrization;
pub mod problem;
pub mod scatterer;
pub mod utils;

// Re-exports for convenience
pub use config::{DiffMethod, FitConfig};
pub use error::{HoloFitError, Result};
pub use minimizer::{fit, FitResult, Minimizer, MinimizerResult};
pub use model::{Alpha, CostFunction, Model, Theory};
pub use problem::{ModelProblem, Problem};

/// Commonly used types
pub mod prelude {
    pub use crate::config::{DiffMethod, FitConfig};
    pub use crate::data::{Data, Hologram, Metadata};
    pub use crate::error::{HoloFitError, Result};
    pub use crate::minimizer::{fit, FitResult, Minimizer, MinimizerResult};
    pub use crate::model::{Alpha, CostFunction, Model, Theory};
    pub use crate::parameters::{
        Arguments, Bounds, ComplexParameter, NamedValues, Parameter, ParameterEntry, Value,
    };
    pub use crate::parametrization::{
        Parameterized, ParameterizedObject, Parametrization, Parametrize, ScattererFactory,
    };
    pub use crate::problem::{ModelProblem, Problem};
    pub use crate::scatterer::{ClusterTemplate, Scatterer, Sphere, SphereCluster, SphereTemplate};
}

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
