//! Problem definition trait and the model adapter.
//!
//! A [`Problem`] is what a minimizer sees: a vector of numbers in, a vector
//! of residuals out. [`ModelProblem`] presents a [`Model`] and its data in
//! that form, ordering the vector like the model's parameter list and
//! optionally mapping it through each parameter's bounds.

use ndarray::{Array1, Array2};

use crate::config::FitConfig;
use crate::data::Data;
use crate::error::{HoloFitError, Result};
use crate::model::{CostFunction, Model};
use crate::parameters::{BoundsTransform, NamedValues};
use crate::parametrization::Parametrize;
use crate::utils::finite_difference;

/// A nonlinear least squares problem.
///
/// Implementations must be pure: `eval` may be called concurrently and in
/// any order.
pub trait Problem: Sync {
    /// Evaluate the residuals at the given parameters.
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>>;

    /// Get the number of parameters in the problem.
    fn parameter_count(&self) -> usize;

    /// Get the number of residuals in the problem.
    fn residual_count(&self) -> usize;

    /// Evaluate the Jacobian matrix at the given parameters.
    ///
    /// Defaults to forward finite differences.
    fn jacobian(&self, params: &Array1<f64>) -> Result<Array2<f64>> {
        finite_difference::jacobian(self, params, None)
    }

    /// Evaluate the sum of squared residuals at the given parameters.
    fn eval_cost(&self, params: &Array1<f64>) -> Result<f64> {
        let residuals = self.eval(params)?;
        Ok(residuals.iter().map(|r| r.powi(2)).sum())
    }
}

/// A model fitted to one dataset, as a [`Problem`]
///
/// Element `i` of the parameter vector is the model's `i`-th free
/// parameter. With `use_bounds` set, the vector lives in the unconstrained
/// internal space and is mapped onto each parameter's limits before the
/// cost function sees it.
pub struct ModelProblem<'m, P: Parametrize, D: Data> {
    cost: CostFunction<'m, P, D>,
    names: Vec<String>,
    guesses: Array1<f64>,
    transforms: Option<Vec<BoundsTransform>>,
    config: FitConfig,
}

impl<'m, P: Parametrize, D: Data> ModelProblem<'m, P, D> {
    pub fn new(model: &'m Model<P, D>, data: &D, config: FitConfig) -> Self {
        let parameters = model.parameters();
        let transforms = config.use_bounds.then(|| {
            parameters
                .iter()
                .map(|p| BoundsTransform::new(p.parameter.bounds()))
                .collect()
        });

        Self {
            cost: model.cost_func(data),
            names: parameters.iter().map(|p| p.name.clone()).collect(),
            guesses: parameters.iter().map(|p| p.parameter.guess()).collect(),
            transforms,
            config,
        }
    }

    /// Parameter names in vector order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    pub fn cost_function(&self) -> &CostFunction<'m, P, D> {
        &self.cost
    }

    /// The guesses as a minimizer's starting vector
    pub fn initial_params(&self) -> Result<Array1<f64>> {
        self.to_internal(&self.guesses)
    }

    /// Map a minimizer vector onto parameter values
    pub fn to_external(&self, params: &Array1<f64>) -> Array1<f64> {
        match &self.transforms {
            Some(transforms) => params
                .iter()
                .zip(transforms)
                .map(|(value, t)| t.to_external(*value))
                .collect(),
            None => params.clone(),
        }
    }

    /// Map parameter values onto a minimizer vector
    pub fn to_internal(&self, values: &Array1<f64>) -> Result<Array1<f64>> {
        match &self.transforms {
            Some(transforms) => values
                .iter()
                .zip(transforms)
                .map(|(value, t)| t.to_internal(*value).map_err(HoloFitError::from))
                .collect(),
            None => Ok(values.clone()),
        }
    }

    /// Name each element of a minimizer vector
    pub fn values(&self, params: &Array1<f64>) -> Result<NamedValues> {
        if params.len() != self.names.len() {
            return Err(HoloFitError::DimensionMismatch(format!(
                "Expected {} parameters, got {}",
                self.names.len(),
                params.len()
            )));
        }
        let external = self.to_external(params);
        Ok(self
            .names
            .iter()
            .cloned()
            .zip(external.iter().copied())
            .collect())
    }
}

impl<'m, P, D> Problem for ModelProblem<'m, P, D>
where
    P: Parametrize + Sync,
    D: Data + Sync,
    D::Overlay: Sync,
{
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        self.cost.eval(&self.values(params)?)
    }

    fn parameter_count(&self) -> usize {
        self.names.len()
    }

    fn residual_count(&self) -> usize {
        self.cost.residual_count()
    }

    fn jacobian(&self, params: &Array1<f64>) -> Result<Array2<f64>> {
        finite_difference::jacobian_with(
            self,
            params,
            self.config.diff_method,
            self.config.epsilon,
            self.config.parallel_jacobian,
        )
    }
}
