//! Binding free parameters to scatterer construction.
//!
//! A minimizer only sees a flat set of named real numbers. This module turns
//! such a set back into a structured scatterer: [`Parametrization`] does so
//! through an explicit factory with a declared argument list, and
//! [`ParameterizedObject`] does so for a scatterer description whose slots
//! hold parameters, collapsing slots that share one parameter into a tie
//! group.

pub mod object;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{HoloFitError, Result};
use crate::parameters::{Arguments, NamedValues, Parameter, ParameterEntry, ParameterError, Value};

pub use object::{tied_name, Parameterized, ParameterizedObject};

/// A free parameter together with the name it is registered under
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedParameter {
    pub name: String,
    pub parameter: Parameter,
}

/// Anything that can rebuild a scatterer from minimizer values
pub trait Parametrize {
    /// The scatterer type built by this parametrization
    type Output;

    /// The free parameters, in the order a minimizer sees them
    fn parameters(&self) -> &[NamedParameter];

    /// Build a scatterer from values covering every free parameter name
    fn make_from(&self, values: &NamedValues) -> Result<Self::Output>;

    /// Names of the free parameters, in order
    fn parameter_names(&self) -> Vec<String> {
        self.parameters().iter().map(|p| p.name.clone()).collect()
    }

    /// Each free parameter's guess, keyed by its registered name
    fn guess_values(&self) -> NamedValues {
        self.parameters()
            .iter()
            .map(|p| (p.name.clone(), p.parameter.guess()))
            .collect()
    }

    /// The scatterer at the initial guess
    fn guess(&self) -> Result<Self::Output> {
        self.make_from(&self.guess_values())
    }
}

type BuildFn<S> = dyn Fn(&Arguments) -> Result<S> + Send + Sync;

/// A scatterer constructor with a declared list of argument names
///
/// The argument list is the schema [`Parametrization::make_from`] fills in;
/// the closure receives exactly those names.
pub struct ScattererFactory<S> {
    arg_names: Vec<String>,
    build: Arc<BuildFn<S>>,
}

impl<S> ScattererFactory<S> {
    /// # Examples
    ///
    /// ```
    /// use holofit::parametrization::ScattererFactory;
    ///
    /// let factory = ScattererFactory::new(["r", "n"], |args| Ok((args.real("r")?, args.real("n")?)));
    /// assert_eq!(factory.arg_names(), ["r", "n"]);
    /// ```
    pub fn new<I, N, F>(arg_names: I, build: F) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
        F: Fn(&Arguments) -> Result<S> + Send + Sync + 'static,
    {
        Self {
            arg_names: arg_names.into_iter().map(Into::into).collect(),
            build: Arc::new(build),
        }
    }

    pub fn arg_names(&self) -> &[String] {
        &self.arg_names
    }

    pub fn call(&self, args: &Arguments) -> Result<S> {
        (self.build)(args)
    }
}

impl<S> Clone for ScattererFactory<S> {
    fn clone(&self) -> Self {
        Self {
            arg_names: self.arg_names.clone(),
            build: Arc::clone(&self.build),
        }
    }
}

impl<S> fmt::Debug for ScattererFactory<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScattererFactory")
            .field("arg_names", &self.arg_names)
            .finish_non_exhaustive()
    }
}

/// Free parameters bound to a scatterer factory
///
/// Parameters are registered under their own name; a complex parameter
/// registers its components as `<name>.real` and `<name>.imag`. Free
/// parameters keep their input order, fixed ones go to a name → value map.
#[derive(Debug, Clone)]
pub struct Parametrization<S> {
    parameters: Vec<NamedParameter>,
    fixed: HashMap<String, f64>,
    factory: ScattererFactory<S>,
}

impl<S> Parametrization<S> {
    /// Register `entries` against `factory`
    ///
    /// Constant entries carry no parameter and are skipped. Fails if a
    /// parameter has no name or a name is registered twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use holofit::parameters::{NamedValues, Parameter};
    /// use holofit::parametrization::{Parametrization, Parametrize, ScattererFactory};
    ///
    /// let factory = ScattererFactory::new(["r", "n"], |args| Ok((args.real("r")?, args.real("n")?)));
    /// let par = Parametrization::new(
    ///     factory,
    ///     vec![Parameter::named("r", 1.0).into(), Parameter::fixed(1.33).with_name("n").into()],
    /// )
    /// .unwrap();
    ///
    /// let values: NamedValues = [("r".to_string(), 2.0)].into_iter().collect();
    /// assert_eq!(par.make_from(&values).unwrap(), (2.0, 1.33));
    /// ```
    pub fn new(
        factory: ScattererFactory<S>,
        entries: Vec<ParameterEntry>,
    ) -> std::result::Result<Self, ParameterError> {
        let mut parametrization = Self {
            parameters: Vec::new(),
            fixed: HashMap::new(),
            factory,
        };
        let mut seen = HashSet::new();

        for entry in entries {
            match entry {
                ParameterEntry::Scalar(p) => {
                    let name = p.name().ok_or(ParameterError::MissingName)?.to_string();
                    parametrization.register(&mut seen, name, p)?;
                }
                ParameterEntry::Complex(c) => {
                    let base = c.name().ok_or(ParameterError::MissingName)?.to_string();
                    parametrization.register(&mut seen, format!("{}.real", base), c.real)?;
                    parametrization.register(&mut seen, format!("{}.imag", base), c.imag)?;
                }
                ParameterEntry::Constant(_) => {}
            }
        }

        parametrization.warn_unused();
        debug!(
            free = parametrization.parameters.len(),
            fixed = parametrization.fixed.len(),
            "built parametrization"
        );
        Ok(parametrization)
    }

    fn register(
        &mut self,
        seen: &mut HashSet<String>,
        name: String,
        parameter: Parameter,
    ) -> std::result::Result<(), ParameterError> {
        if !seen.insert(name.clone()) {
            return Err(ParameterError::DuplicateName { name });
        }
        if parameter.is_fixed() {
            self.fixed.insert(name, parameter.fixed_value());
        } else {
            self.parameters.push(NamedParameter { name, parameter });
        }
        Ok(())
    }

    fn warn_unused(&self) {
        let args: HashSet<&str> = self.factory.arg_names().iter().map(String::as_str).collect();
        let registered = self
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .chain(self.fixed.keys().map(String::as_str));

        for name in registered {
            let base = name
                .strip_suffix(".real")
                .or_else(|| name.strip_suffix(".imag"))
                .unwrap_or(name);
            if !args.contains(name) && !args.contains(base) {
                warn!(parameter = name, "parameter matches no factory argument");
            }
        }
    }

    /// Values of the fixed parameters, keyed by registered name
    pub fn fixed_values(&self) -> &HashMap<String, f64> {
        &self.fixed
    }

    pub fn factory(&self) -> &ScattererFactory<S> {
        &self.factory
    }

    fn lookup(&self, values: &NamedValues, name: &str) -> Option<f64> {
        values.get(name).or_else(|| self.fixed.get(name)).copied()
    }

    /// Resolve one factory argument from free values and fixed values
    fn resolve_argument(&self, values: &NamedValues, arg: &str) -> Result<Value> {
        let real_name = format!("{}.real", arg);
        let imag_name = format!("{}.imag", arg);

        match (self.lookup(values, &real_name), self.lookup(values, &imag_name)) {
            (Some(re), Some(im)) => Ok(Value::Complex(Complex64::new(re, im))),
            (Some(_), None) => Err(HoloFitError::ParameterNotFound(imag_name)),
            (None, Some(_)) => Err(HoloFitError::ParameterNotFound(real_name)),
            (None, None) => self
                .lookup(values, arg)
                .map(Value::Real)
                .ok_or_else(|| HoloFitError::ParameterNotFound(arg.to_string())),
        }
    }
}

impl<S> Parametrize for Parametrization<S> {
    type Output = S;

    fn parameters(&self) -> &[NamedParameter] {
        &self.parameters
    }

    fn make_from(&self, values: &NamedValues) -> Result<S> {
        let mut args = Arguments::new();
        for arg in self.factory.arg_names() {
            args.insert(arg, self.resolve_argument(values, arg)?);
        }
        self.factory.call(&args)
    }
}
