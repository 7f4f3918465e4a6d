//! Integration tests for Model
//!
//! Parameter ordering with alpha, overlays, and the residual function.

use approx::assert_relative_eq;
use holofit::parameters::ParameterError;
use holofit::prelude::*;
use ndarray::{array, ArrayD};
use num_complex::Complex64;

use crate::test_helpers::{sphere_theory, spot_theory, synthetic};

fn sphere_template(r: Parameter) -> SphereTemplate {
    SphereTemplate::new(
        ComplexParameter::new(Parameter::fixed(1.59), Parameter::fixed(0.0)),
        r,
        [Parameter::new(4.0).into(), Parameter::new(5.0).into(), 2.0.into()],
    )
}

#[test]
fn test_alpha_follows_scatterer_parameters() {
    let model = Model::from_object(sphere_template(Parameter::new(1.0)), sphere_theory)
        .unwrap()
        .with_alpha(Parameter::new(0.8))
        .unwrap();

    assert_eq!(model.parameter_names(), ["r", "center[0]", "center[1]", "alpha"]);
    assert_eq!(model.get_alpha(&model.guess_values()), 0.8);
}

#[test]
fn test_alpha_cannot_shadow_a_scatterer_parameter() {
    let size = Parameter::named("alpha", 1.0);
    let template = SphereTemplate::new(
        Complex64::new(1.59, 0.0),
        size.clone(),
        [4.0.into(), 5.0.into(), size.into()],
    );
    let model = Model::from_object(template, sphere_theory).unwrap();
    assert_eq!(model.parameter_names(), ["alpha"]);

    assert!(matches!(
        model.with_alpha(Parameter::new(0.8)),
        Err(ParameterError::DuplicateName { name }) if name == "alpha"
    ));
}

#[test]
fn test_residuals_vanish_at_truth() {
    let truth = Sphere::new(Complex64::new(1.59, 0.0), 1.0, [4.0, 5.0, 2.0]);
    let data = synthetic(sphere_theory, &truth, (10, 10), 0.9);
    let model = Model::from_object(sphere_template(Parameter::new(1.0)), sphere_theory)
        .unwrap()
        .with_alpha(0.9)
        .unwrap();

    let cost = model.cost_func(&data);
    let residuals = cost.eval(&model.guess_values()).unwrap();
    assert_eq!(residuals.len(), 100);
    assert_eq!(cost.residual_count(), 100);
    assert!(residuals.iter().all(|r| r.abs() < 1e-12));

    let mut off = model.guess_values();
    off.insert("r".to_string(), 1.2);
    let residuals = cost.eval(&off).unwrap();
    assert!(residuals.iter().any(|r| r.abs() > 1e-3));
}

#[test]
fn test_overlay_reaches_theory_but_not_data() {
    // With spacing 0.5 the spot lands on pixel (10, 8) instead of (5, 4)
    let truth = SphereCluster::new(vec![Sphere::new(Complex64::new(1.59, 0.0), 1.0, [4.0, 5.0, 2.0])]);
    let spaced = Hologram::new(ndarray::Array2::zeros((12, 12))).with_metadata(Metadata {
        spacing: Some([0.5, 0.5]),
        ..Metadata::default()
    });
    let expected = spot_theory(&truth, &spaced, 1.0).unwrap();
    let data = Hologram::new(expected.into_dimensionality().unwrap());

    let template = ClusterTemplate::new(vec![sphere_template(Parameter::new(1.0))]);
    let model = Model::from_object(template, spot_theory)
        .unwrap()
        .with_overlay(Metadata {
            spacing: Some([0.5, 0.5]),
            ..Metadata::default()
        });

    let cost = model.cost_func(&data);
    assert_eq!(cost.target().metadata().spacing, Some([0.5, 0.5]));
    assert_eq!(data.metadata().spacing, None);

    let residuals = cost.eval(&model.guess_values()).unwrap();
    assert!(residuals.iter().all(|r| r.abs() < 1e-12));
}

#[test]
fn test_compare_is_data_minus_theory() {
    let model = Model::from_object(sphere_template(Parameter::new(1.0)), sphere_theory).unwrap();
    let data = Hologram::new(array![[1.0, 2.0, 3.0]]);
    let calc: ArrayD<f64> = array![[1.5, 1.5, 1.5]].into_dyn();

    let residuals = model.compare(&calc, &data).unwrap();
    assert_relative_eq!(residuals[0], -0.5);
    assert_relative_eq!(residuals[2], 1.5);
}

#[test]
fn test_theory_errors_propagate() {
    let failing = |_: &Sphere, _: &Hologram, _: f64| -> Result<ArrayD<f64>> {
        Err(HoloFitError::FunctionEvaluation("no convergence in series".to_string()))
    };
    let model = Model::from_object(sphere_template(Parameter::new(1.0)), failing).unwrap();
    let data = Hologram::new(array![[1.0]]);

    assert!(matches!(
        model.cost_func(&data).eval(&model.guess_values()),
        Err(HoloFitError::FunctionEvaluation(_))
    ));
}
