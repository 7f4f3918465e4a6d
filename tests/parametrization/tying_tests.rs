//! Integration tests for tie groups in scatterer templates

use holofit::parameters::{ComplexParameter, NamedValues, Parameter, ParameterError};
use holofit::parametrization::{ParameterizedObject, Parametrize};
use holofit::scatterer::{ClusterTemplate, SphereTemplate};
use num_complex::Complex64;

fn member(n: &ComplexParameter, r: &Parameter, z: f64) -> SphereTemplate {
    SphereTemplate::new(
        n.clone(),
        r.clone(),
        [0.0.into(), 0.0.into(), Parameter::new(z).into()],
    )
}

fn trimer() -> (ClusterTemplate, Parameter) {
    let n = ComplexParameter::new(Parameter::new(1.59), Parameter::fixed(1e-4));
    let r = Parameter::new(0.5);
    let cluster = ClusterTemplate::new(vec![
        member(&n, &r, 10.0),
        member(&n, &r, 11.0),
        member(&n, &r, 12.0),
    ]);
    (cluster, r)
}

#[test]
fn test_trimer_ties_shared_parameters() {
    let (cluster, _) = trimer();
    let obj = ParameterizedObject::new(cluster).unwrap();

    assert_eq!(
        obj.parameter_names(),
        [
            "Sphere.n.real",
            "Sphere.r",
            "0:Sphere.center[2]",
            "1:Sphere.center[2]",
            "2:Sphere.center[2]",
        ]
    );
    assert_eq!(
        obj.ties()["Sphere.r"],
        ["0:Sphere.r", "1:Sphere.r", "2:Sphere.r"]
    );
    assert_eq!(
        obj.ties()["Sphere.n.real"],
        ["0:Sphere.n.real", "1:Sphere.n.real", "2:Sphere.n.real"]
    );
}

#[test]
fn test_tied_value_reaches_every_member() {
    let (cluster, _) = trimer();
    let obj = ParameterizedObject::new(cluster).unwrap();

    let mut values: NamedValues = obj.guess_values();
    values.insert("Sphere.r".to_string(), 0.7);
    values.insert("Sphere.n.real".to_string(), 1.45);
    values.insert("1:Sphere.center[2]".to_string(), 15.0);

    let fitted = obj.make_from(&values).unwrap();
    assert_eq!(fitted.spheres.len(), 3);
    for sphere in &fitted.spheres {
        assert_eq!(sphere.r, 0.7);
        assert_eq!(sphere.n, Complex64::new(1.45, 1e-4));
    }
    let z: Vec<f64> = fitted.spheres.iter().map(|s| s.center[2]).collect();
    assert_eq!(z, [10.0, 15.0, 12.0]);
}

#[test]
fn test_tying_never_names_callers_parameter() {
    let (cluster, r) = trimer();
    let obj = ParameterizedObject::new(cluster).unwrap();

    assert!(r.name().is_none());
    let registered = obj
        .parameters()
        .iter()
        .find(|p| p.name == "Sphere.r")
        .unwrap();
    assert!(registered.parameter.same_as(&r));
}

#[test]
fn test_equal_but_separate_parameters_stay_independent() {
    let cluster = ClusterTemplate::new(vec![
        SphereTemplate::new(Complex64::new(1.59, 0.0), Parameter::new(0.5), [0.0.into(), 0.0.into(), 10.0.into()]),
        SphereTemplate::new(Complex64::new(1.59, 0.0), Parameter::new(0.5), [0.0.into(), 0.0.into(), 10.0.into()]),
    ]);
    let obj = ParameterizedObject::new(cluster).unwrap();

    assert_eq!(obj.parameter_names(), ["0:Sphere.r", "1:Sphere.r"]);
    assert!(obj.ties().is_empty());
}

#[test]
fn test_cross_field_tie_needs_a_name() {
    let shared = Parameter::new(1.0);
    let template = SphereTemplate::new(
        Complex64::new(1.59, 0.0),
        shared.clone(),
        [0.0.into(), 0.0.into(), shared.clone().into()],
    );
    assert!(matches!(
        ParameterizedObject::new(template),
        Err(ParameterError::AmbiguousTie { .. })
    ));

    let shared = shared.with_name("size");
    let template = SphereTemplate::new(
        Complex64::new(1.59, 0.0),
        shared.clone(),
        [0.0.into(), 0.0.into(), shared.into()],
    );
    let obj = ParameterizedObject::new(template).unwrap();
    assert_eq!(obj.parameter_names(), ["size"]);

    let values: NamedValues = [("size".to_string(), 3.0)].into_iter().collect();
    let sphere = obj.make_from(&values).unwrap();
    assert_eq!(sphere.r, 3.0);
    assert_eq!(sphere.center[2], 3.0);
}
