//! Models of holograms for fitting.
//!
//! A [`Model`] combines a parametrized scatterer, a scattering theory, an
//! optional metadata overlay and an optional scaling factor `alpha`. Its
//! [`cost_func`](Model::cost_func) closes over a dataset and returns a
//! residual function a minimizer can call as often as it likes.

use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, ArrayD};
use tracing::trace;

use crate::data::Data;
use crate::error::{HoloFitError, Result};
use crate::parameters::{NamedValues, Parameter, ParameterError};
use crate::parametrization::{NamedParameter, Parameterized, ParameterizedObject, Parametrize};

/// Name under which alpha is looked up unless its parameter says otherwise
pub const ALPHA: &str = "alpha";

/// A scattering calculation
///
/// Given a scatterer, the target data (for its metadata and shape) and a
/// scaling factor, predict the signal the data should show.
pub trait Theory<S, D>: Send + Sync {
    fn calculate(&self, scatterer: &S, target: &D, scaling: f64) -> Result<ArrayD<f64>>;
}

impl<S, D, F> Theory<S, D> for F
where
    F: Fn(&S, &D, f64) -> Result<ArrayD<f64>> + Send + Sync,
{
    fn calculate(&self, scatterer: &S, target: &D, scaling: f64) -> Result<ArrayD<f64>> {
        self(scatterer, target, scaling)
    }
}

/// Scaling factor applied by the theory
#[derive(Debug, Clone)]
pub enum Alpha {
    Fixed(f64),
    Parameter(Parameter),
}

impl From<f64> for Alpha {
    fn from(value: f64) -> Self {
        Alpha::Fixed(value)
    }
}

impl From<Parameter> for Alpha {
    fn from(parameter: Parameter) -> Self {
        Alpha::Parameter(parameter)
    }
}

/// A model to fit to data
///
/// # Examples
///
/// ```
/// use holofit::data::{Data, Hologram};
/// use holofit::model::Model;
/// use holofit::parameters::{Parameter, NamedValues};
/// use holofit::parametrization::{Parametrization, ScattererFactory};
/// use ndarray::{array, ArrayD};
///
/// let par = Parametrization::new(
///     ScattererFactory::new(["level"], |args| args.real("level")),
///     vec![Parameter::named("level", 1.0).into()],
/// )
/// .unwrap();
/// let flat = |level: &f64, target: &Hologram, scaling: f64| -> holofit::Result<ArrayD<f64>> {
///     Ok(target.signal().map(|_| level * scaling))
/// };
/// let model = Model::new(par, flat).with_alpha(Parameter::new(1.0)).unwrap();
/// assert_eq!(model.parameter_names(), ["level", "alpha"]);
///
/// let data = Hologram::new(array![[2.0, 2.0], [2.0, 2.0]]);
/// let cost = model.cost_func(&data);
/// let values: NamedValues = [("level".to_string(), 1.0), ("alpha".to_string(), 2.0)]
///     .into_iter()
///     .collect();
/// assert!(cost.eval(&values).unwrap().iter().all(|r| *r == 0.0));
/// ```
pub struct Model<P: Parametrize, D: Data> {
    scatterer: P,
    theory: Arc<dyn Theory<P::Output, D>>,
    target_overlay: Option<D::Overlay>,
    alpha: Option<Alpha>,
    parameters: Vec<NamedParameter>,
}

impl<T, D> Model<ParameterizedObject<T>, D>
where
    T: Parameterized,
    D: Data,
{
    /// Model of a scatterer description whose slots hold parameters
    pub fn from_object(
        target: T,
        theory: impl Theory<T::Output, D> + 'static,
    ) -> std::result::Result<Self, ParameterError> {
        Ok(Self::new(ParameterizedObject::new(target)?, theory))
    }
}

impl<P: Parametrize, D: Data> Model<P, D> {
    pub fn new(scatterer: P, theory: impl Theory<P::Output, D> + 'static) -> Self {
        let parameters = scatterer.parameters().to_vec();
        Self {
            scatterer,
            theory: Arc::new(theory),
            target_overlay: None,
            alpha: None,
            parameters,
        }
    }

    /// Metadata merged onto the data before the theory sees it
    pub fn with_overlay(mut self, overlay: D::Overlay) -> Self {
        self.target_overlay = Some(overlay);
        self
    }

    /// Scale the theory by a fixed value or by a parameter
    ///
    /// A free alpha parameter is appended to the parameter list; without a
    /// name it is registered as `"alpha"`. That name must not already belong
    /// to a scatterer parameter.
    pub fn with_alpha(mut self, alpha: impl Into<Alpha>) -> std::result::Result<Self, ParameterError> {
        self.alpha = Some(alpha.into());
        self.parameters = self.scatterer.parameters().to_vec();
        if let Some(Alpha::Parameter(p)) = &self.alpha {
            if !p.is_fixed() {
                let name = self.alpha_name().to_string();
                if self.parameters.iter().any(|existing| existing.name == name) {
                    return Err(ParameterError::DuplicateName { name });
                }
                self.parameters.push(NamedParameter {
                    name,
                    parameter: p.clone(),
                });
            }
        }
        Ok(self)
    }

    pub fn scatterer(&self) -> &P {
        &self.scatterer
    }

    pub fn target_overlay(&self) -> Option<&D::Overlay> {
        self.target_overlay.as_ref()
    }

    pub fn alpha(&self) -> Option<&Alpha> {
        self.alpha.as_ref()
    }

    /// Scatterer parameters followed by a free alpha, in minimizer order
    pub fn parameters(&self) -> &[NamedParameter] {
        &self.parameters
    }

    pub fn parameter_names(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.name.clone()).collect()
    }

    /// Every parameter's guess, keyed by name
    pub fn guess_values(&self) -> NamedValues {
        self.parameters
            .iter()
            .map(|p| (p.name.clone(), p.parameter.guess()))
            .collect()
    }

    /// Key alpha is read from
    pub fn alpha_name(&self) -> &str {
        match &self.alpha {
            Some(Alpha::Parameter(p)) => p.name().unwrap_or(ALPHA),
            _ => ALPHA,
        }
    }

    /// Alpha for one evaluation
    ///
    /// The supplied value wins; otherwise the configured fixed alpha, a free
    /// alpha's guess, or `1.0` without any alpha.
    pub fn get_alpha(&self, values: &NamedValues) -> f64 {
        if let Some(value) = values.get(self.alpha_name()) {
            return *value;
        }
        match &self.alpha {
            None => 1.0,
            Some(Alpha::Fixed(value)) => *value,
            Some(Alpha::Parameter(p)) => p.fixed_value(),
        }
    }

    /// Flattened residual `data - calc`
    pub fn compare(&self, calc: &ArrayD<f64>, data: &D) -> Result<Array1<f64>> {
        let observed = data.signal();
        if observed.shape() != calc.shape() {
            return Err(HoloFitError::DimensionMismatch(format!(
                "Theory returned shape {:?}, data has shape {:?}",
                calc.shape(),
                observed.shape()
            )));
        }

        let residuals = &observed - calc;
        Ok(residuals.iter().copied().collect())
    }

    /// A copy of `data` with the overlay merged in; `data` is untouched
    pub fn get_target(&self, data: &D) -> D {
        let mut target = data.clone();
        if let Some(overlay) = &self.target_overlay {
            target.set_metadata(overlay);
        }
        target
    }

    /// Residual function for `data`
    ///
    /// The target is derived once here; every call of the returned function
    /// depends only on its input values.
    pub fn cost_func(&self, data: &D) -> CostFunction<'_, P, D> {
        CostFunction {
            model: self,
            target: self.get_target(data),
            data: data.clone(),
        }
    }
}

impl<P, D> fmt::Debug for Model<P, D>
where
    P: Parametrize + fmt::Debug,
    D: Data,
    D::Overlay: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("scatterer", &self.scatterer)
            .field("target_overlay", &self.target_overlay)
            .field("alpha", &self.alpha)
            .field("parameters", &self.parameter_names())
            .finish_non_exhaustive()
    }
}

/// Residual function produced by [`Model::cost_func`]
pub struct CostFunction<'m, P: Parametrize, D: Data> {
    model: &'m Model<P, D>,
    target: D,
    data: D,
}

impl<'m, P: Parametrize, D: Data> CostFunction<'m, P, D> {
    /// Residuals for one set of parameter values
    pub fn eval(&self, values: &NamedValues) -> Result<Array1<f64>> {
        let scatterer = self.model.scatterer.make_from(values)?;
        let scaling = self.model.get_alpha(values);
        let calc = self.model.theory.calculate(&scatterer, &self.target, scaling)?;
        let residuals = self.model.compare(&calc, &self.data)?;
        trace!(
            scaling,
            cost = residuals.iter().map(|r| r * r).sum::<f64>(),
            "evaluated residuals"
        );
        Ok(residuals)
    }

    pub fn model(&self) -> &'m Model<P, D> {
        self.model
    }

    /// The data with the overlay applied, as handed to the theory
    pub fn target(&self) -> &D {
        &self.target
    }

    /// Length of every residual vector
    pub fn residual_count(&self) -> usize {
        self.data.signal().len()
    }
}
