//! # Parameters
//!
//! Building blocks for describing what a fit may vary.
//!
//! - [`Parameter`]: a scalar with a guess, an optional limit and a fixed/free flag,
//!   identified by a token that survives cloning
//! - [`ComplexParameter`]: a real/imaginary pair registered as `<name>.real` and `<name>.imag`
//! - [`ParameterEntry`]: one named slot of a scatterer (scalar, complex or constant)
//! - [`Bounds`] and [`BoundsTransform`]: limits and their unconstrained representation
//! - [`Value`], [`NamedValues`] and [`Arguments`]: values passed between a minimizer
//!   and a scatterer factory
//!
//! ```rust
//! use holofit::parameters::{ComplexParameter, Parameter, ParameterEntry};
//!
//! let radius = Parameter::bounded(0.5e-6, 0.1e-6, 2e-6).unwrap();
//! let index = ComplexParameter::new(Parameter::new(1.59), Parameter::fixed(1e-4));
//!
//! // Reusing the same parameter in two slots ties them
//! let slots: Vec<(String, ParameterEntry)> = vec![
//!     ("0:Sphere.r".into(), radius.clone().into()),
//!     ("1:Sphere.r".into(), radius.into()),
//!     ("0:Sphere.n".into(), index.into()),
//! ];
//! assert_eq!(slots.len(), 3);
//! ```

pub mod bounds;
pub mod parameter;
pub mod values;

pub use bounds::{Bounds, BoundsError, BoundsTransform};
pub use parameter::{
    ComplexParameter, Limit, ParamId, Parameter, ParameterEntry, ParameterError, ParameterKind,
};
pub use values::{Arguments, NamedValues, Value};
