//! Integration tests for fit()

use approx::assert_relative_eq;
use holofit::prelude::*;
use num_complex::Complex64;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::test_helpers::{sphere_theory, spot_theory, synthetic, GaussNewton};

fn index() -> ComplexParameter {
    ComplexParameter::new(Parameter::fixed(1.59), Parameter::fixed(0.0))
}

#[test]
fn test_fit_single_sphere() {
    let truth = Sphere::new(Complex64::new(1.59, 0.0), 1.0, [5.5, 6.2, 2.5]);
    let data = synthetic(sphere_theory, &truth, (14, 14), 1.0);

    let template = SphereTemplate::new(
        index(),
        Parameter::new(0.9),
        [
            Parameter::new(5.3).into(),
            Parameter::new(6.0).into(),
            Parameter::new(2.3).into(),
        ],
    );
    let model = Model::from_object(template, sphere_theory).unwrap();

    let result = fit(&model, &data, &GaussNewton::default(), &FitConfig::default()).unwrap();
    assert!(result.success, "{}", result.message);
    assert_relative_eq!(result.values["r"], 1.0, epsilon = 1e-6);
    assert_relative_eq!(result.values["center[0]"], 5.5, epsilon = 1e-6);
    assert_relative_eq!(result.values["center[1]"], 6.2, epsilon = 1e-6);
    assert_relative_eq!(result.values["center[2]"], 2.5, epsilon = 1e-6);
    assert_relative_eq!(result.scatterer.r, result.values["r"]);
    assert!(result.cost < 1e-12);
    assert_eq!(result.residuals.len(), 14 * 14);
}

#[test]
fn test_fit_respects_bounds() {
    let truth = Sphere::new(Complex64::new(1.59, 0.0), 1.0, [5.5, 6.2, 2.5]);
    let data = synthetic(sphere_theory, &truth, (14, 14), 1.0);

    let template = SphereTemplate::new(
        index(),
        Parameter::bounded(0.9, 0.2, 3.0).unwrap(),
        [
            Parameter::new(5.3).into(),
            Parameter::new(6.0).into(),
            Parameter::bounded(2.3, 1.0, 5.0).unwrap().into(),
        ],
    );
    let model = Model::from_object(template, sphere_theory).unwrap();

    let result = fit(&model, &data, &GaussNewton::default(), &FitConfig::default()).unwrap();
    assert_relative_eq!(result.values["r"], 1.0, epsilon = 1e-6);
    assert_relative_eq!(result.values["center[2]"], 2.5, epsilon = 1e-6);
    assert!((0.2..=3.0).contains(&result.scatterer.r));
}

#[test]
fn test_fit_cluster_with_shared_radius() {
    let truth = SphereCluster::new(vec![
        Sphere::new(Complex64::new(1.59, 0.0), 1.2, [4.0, 6.0, 2.0]),
        Sphere::new(Complex64::new(1.59, 0.0), 1.2, [10.5, 6.0, 2.0]),
    ]);
    let data = synthetic(spot_theory, &truth, (12, 16), 1.0);

    let r = Parameter::new(1.0);
    let member = |x: f64| {
        SphereTemplate::new(
            index(),
            r.clone(),
            [Parameter::new(x).into(), 6.0.into(), 2.0.into()],
        )
    };
    let model = Model::from_object(ClusterTemplate::new(vec![member(4.2), member(10.3)]), spot_theory)
        .unwrap();
    assert_eq!(
        model.parameter_names(),
        ["Sphere.r", "0:Sphere.center[0]", "1:Sphere.center[0]"]
    );

    let result = fit(&model, &data, &GaussNewton::default(), &FitConfig::default()).unwrap();
    assert_relative_eq!(result.values["Sphere.r"], 1.2, epsilon = 1e-6);
    assert_relative_eq!(result.values["0:Sphere.center[0]"], 4.0, epsilon = 1e-6);
    assert_relative_eq!(result.values["1:Sphere.center[0]"], 10.5, epsilon = 1e-6);
    assert_eq!(result.scatterer.spheres[0].r, result.scatterer.spheres[1].r);
}

#[test]
fn test_fit_alpha() {
    let truth = Sphere::new(Complex64::new(1.59, 0.0), 1.0, [5.0, 5.0, 2.0]);
    let data = synthetic(sphere_theory, &truth, (10, 10), 0.85);

    let template = SphereTemplate::new(
        index(),
        Parameter::fixed(1.0),
        [Parameter::new(5.2).into(), 5.0.into(), 2.0.into()],
    );
    let model = Model::from_object(template, sphere_theory)
        .unwrap()
        .with_alpha(Parameter::bounded(0.7, 0.1, 1.0).unwrap())
        .unwrap();
    assert_eq!(model.parameter_names(), ["center[0]", "alpha"]);

    let result = fit(&model, &data, &GaussNewton::default(), &FitConfig::default()).unwrap();
    assert_relative_eq!(result.alpha, 0.85, epsilon = 1e-6);
    assert_relative_eq!(result.values["alpha"], result.alpha);
    assert_relative_eq!(result.scatterer.center[0], 5.0, epsilon = 1e-6);
}

#[test]
fn test_fit_recovers_random_spheres() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let config = FitConfig {
        diff_method: DiffMethod::Central,
        parallel_jacobian: false,
        ..FitConfig::default()
    };

    for _ in 0..5 {
        let r = rng.gen_range(0.8..1.2);
        let x = rng.gen_range(5.0..8.0);
        let y = rng.gen_range(5.0..8.0);
        let z = rng.gen_range(2.0..3.0);
        let truth = Sphere::new(Complex64::new(1.59, 0.0), r, [x, y, z]);
        let data = synthetic(sphere_theory, &truth, (14, 14), 1.0);

        let template = SphereTemplate::new(
            index(),
            Parameter::new(r * rng.gen_range(0.9..1.1)),
            [
                Parameter::new(x + rng.gen_range(-0.3..0.3)).into(),
                Parameter::new(y + rng.gen_range(-0.3..0.3)).into(),
                Parameter::new(z * rng.gen_range(0.9..1.1)).into(),
            ],
        );
        let model = Model::from_object(template, sphere_theory).unwrap();

        let result = fit(&model, &data, &GaussNewton::default(), &config).unwrap();
        let fitted = result.scatterer;
        assert_relative_eq!(fitted.r, r, epsilon = 1e-6);
        assert_relative_eq!(fitted.center[0], x, epsilon = 1e-6);
        assert_relative_eq!(fitted.center[1], y, epsilon = 1e-6);
        assert_relative_eq!(fitted.center[2], z, epsilon = 1e-6);
    }
}
