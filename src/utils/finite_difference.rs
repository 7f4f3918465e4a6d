//! Finite difference methods for numerical differentiation.
//!
//! Jacobians of a [`Problem`]'s residuals, by forward or central
//! differences. The parallel variants evaluate columns on the rayon pool,
//! which is sound because a problem's `eval` depends only on its input.

use ndarray::{Array1, Array2};
use rayon::prelude::*;

use crate::config::DiffMethod;
use crate::error::{HoloFitError, Result};
use crate::problem::Problem;

/// Default step size for finite differences.
pub const DEFAULT_EPSILON: f64 = 1e-8;

/// Step for parameter `value`, scaled to its magnitude
fn step(value: f64, eps: f64) -> f64 {
    if value.abs() > eps {
        value.abs() * eps
    } else {
        eps
    }
}

fn checked_eval<P: Problem + ?Sized>(problem: &P, params: &Array1<f64>) -> Result<Array1<f64>> {
    let residuals = problem.eval(params)?;
    if residuals.len() != problem.residual_count() {
        return Err(HoloFitError::DimensionMismatch(format!(
            "Expected {} residuals, got {}",
            problem.residual_count(),
            residuals.len()
        )));
    }
    Ok(residuals)
}

fn forward_column<P: Problem + ?Sized>(
    problem: &P,
    params: &Array1<f64>,
    base: &Array1<f64>,
    j: usize,
    eps: f64,
) -> Result<Array1<f64>> {
    let eps_j = step(params[j], eps);
    let mut perturbed = params.clone();
    perturbed[j] += eps_j;

    let shifted = checked_eval(problem, &perturbed)?;
    Ok((shifted - base) / eps_j)
}

fn central_column<P: Problem + ?Sized>(
    problem: &P,
    params: &Array1<f64>,
    j: usize,
    eps: f64,
) -> Result<Array1<f64>> {
    let eps_j = step(params[j], eps);
    let mut forward = params.clone();
    forward[j] += eps_j;
    let mut backward = params.clone();
    backward[j] -= eps_j;

    let ahead = checked_eval(problem, &forward)?;
    let behind = checked_eval(problem, &backward)?;
    Ok((ahead - behind) / (2.0 * eps_j))
}

fn assemble(n_residuals: usize, columns: Vec<Array1<f64>>) -> Array2<f64> {
    let mut jac = Array2::zeros((n_residuals, columns.len()));
    for (j, column) in columns.into_iter().enumerate() {
        jac.column_mut(j).assign(&column);
    }
    jac
}

/// Compute the Jacobian matrix using forward finite differences.
///
/// `J[i,j] = ∂residual[i]/∂param[j]`, one extra evaluation per parameter.
pub fn jacobian<P: Problem + ?Sized>(
    problem: &P,
    params: &Array1<f64>,
    epsilon: Option<f64>,
) -> Result<Array2<f64>> {
    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
    let base = checked_eval(problem, params)?;

    let columns = (0..params.len())
        .map(|j| forward_column(problem, params, &base, j, eps))
        .collect::<Result<Vec<_>>>()?;
    Ok(assemble(base.len(), columns))
}

/// Compute the Jacobian matrix using central finite differences.
pub fn jacobian_central<P: Problem + ?Sized>(
    problem: &P,
    params: &Array1<f64>,
    epsilon: Option<f64>,
) -> Result<Array2<f64>> {
    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);

    let columns = (0..params.len())
        .map(|j| central_column(problem, params, j, eps))
        .collect::<Result<Vec<_>>>()?;
    Ok(assemble(problem.residual_count(), columns))
}

/// Forward-difference Jacobian with columns computed in parallel.
pub fn jacobian_parallel<P: Problem + ?Sized>(
    problem: &P,
    params: &Array1<f64>,
    epsilon: Option<f64>,
) -> Result<Array2<f64>> {
    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
    let base = checked_eval(problem, params)?;

    let columns = (0..params.len())
        .into_par_iter()
        .map(|j| forward_column(problem, params, &base, j, eps))
        .collect::<Result<Vec<_>>>()?;
    Ok(assemble(base.len(), columns))
}

/// Central-difference Jacobian with columns computed in parallel.
pub fn jacobian_central_parallel<P: Problem + ?Sized>(
    problem: &P,
    params: &Array1<f64>,
    epsilon: Option<f64>,
) -> Result<Array2<f64>> {
    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);

    let columns = (0..params.len())
        .into_par_iter()
        .map(|j| central_column(problem, params, j, eps))
        .collect::<Result<Vec<_>>>()?;
    Ok(assemble(problem.residual_count(), columns))
}

/// Dispatch to one of the four Jacobian routines
pub fn jacobian_with<P: Problem + ?Sized>(
    problem: &P,
    params: &Array1<f64>,
    method: DiffMethod,
    epsilon: f64,
    parallel: bool,
) -> Result<Array2<f64>> {
    match (method, parallel) {
        (DiffMethod::Forward, false) => jacobian(problem, params, Some(epsilon)),
        (DiffMethod::Forward, true) => jacobian_parallel(problem, params, Some(epsilon)),
        (DiffMethod::Central, false) => jacobian_central(problem, params, Some(epsilon)),
        (DiffMethod::Central, true) => jacobian_central_parallel(problem, params, Some(epsilon)),
    }
}
