//! The seam between models and minimization algorithms.
//!
//! The crate ships no minimizer. Anything implementing [`Minimizer`] can be
//! handed to [`fit`], which builds the [`ModelProblem`], runs the minimizer
//! and maps its best vector back onto named values, a scatterer and alpha.

use ndarray::Array1;
use tracing::{info, warn};

use crate::config::FitConfig;
use crate::data::Data;
use crate::error::{HoloFitError, Result};
use crate::model::Model;
use crate::parameters::NamedValues;
use crate::parametrization::Parametrize;
use crate::problem::{ModelProblem, Problem};

/// Outcome of a minimization, in the minimizer's own coordinates
#[derive(Debug, Clone)]
pub struct MinimizerResult {
    /// Best parameter vector found
    pub params: Array1<f64>,

    /// Residuals at `params`
    pub residuals: Array1<f64>,

    /// Sum of squared residuals at `params`
    pub cost: f64,

    pub iterations: usize,

    /// Whether the minimizer reports convergence
    pub success: bool,

    pub message: String,
}

/// A least-squares minimization algorithm
pub trait Minimizer {
    fn minimize(&self, problem: &dyn Problem, initial: Array1<f64>) -> Result<MinimizerResult>;
}

/// Outcome of [`fit`]
#[derive(Debug, Clone)]
pub struct FitResult<S> {
    /// The scatterer at the best values
    pub scatterer: S,

    /// Best value of every free parameter, keyed by registered name
    pub values: NamedValues,

    /// Alpha at the best values
    pub alpha: f64,

    pub cost: f64,
    pub residuals: Array1<f64>,
    pub iterations: usize,
    pub success: bool,
    pub message: String,
}

/// Fit `model` to `data`
///
/// A model without free parameters is evaluated once at its guess.
pub fn fit<P, D, M>(
    model: &Model<P, D>,
    data: &D,
    minimizer: &M,
    config: &FitConfig,
) -> Result<FitResult<P::Output>>
where
    P: Parametrize + Sync,
    D: Data + Sync,
    D::Overlay: Sync,
    M: Minimizer + ?Sized,
{
    let problem = ModelProblem::new(model, data, config.clone());
    let initial = problem.initial_params()?;

    info!(
        parameters = problem.parameter_count(),
        residuals = problem.residual_count(),
        "starting fit"
    );

    let result = if problem.parameter_count() == 0 {
        warn!("model has no free parameters; evaluating the guess");
        let residuals = problem.eval(&initial)?;
        MinimizerResult {
            cost: residuals.iter().map(|r| r * r).sum(),
            params: initial,
            residuals,
            iterations: 0,
            success: true,
            message: "No free parameters".to_string(),
        }
    } else {
        minimizer.minimize(&problem, initial)?
    };

    if result.params.len() != problem.parameter_count() {
        return Err(HoloFitError::OptimizationFailure(format!(
            "Minimizer returned {} parameters for a problem with {}",
            result.params.len(),
            problem.parameter_count()
        )));
    }

    let values = problem.values(&result.params)?;
    let scatterer = model.scatterer().make_from(&values)?;
    let alpha = model.get_alpha(&values);

    info!(
        cost = result.cost,
        iterations = result.iterations,
        success = result.success,
        "fit finished"
    );

    Ok(FitResult {
        scatterer,
        values,
        alpha,
        cost: result.cost,
        residuals: result.residuals,
        iterations: result.iterations,
        success: result.success,
        message: result.message,
    })
}
