//! Integration tests for Parametrization
//!
//! Factories with declared argument lists, fixed and free mixing, and
//! parameter serialization.

use holofit::parameters::{ComplexParameter, Limit, NamedValues, Parameter, ParameterEntry};
use holofit::parametrization::{Parametrization, Parametrize};
use holofit::scatterer::{Scatterer, Sphere};
use holofit::HoloFitError;
use num_complex::Complex64;

fn sphere_parametrization() -> Parametrization<Sphere> {
    Parametrization::new(
        Sphere::factory(),
        vec![
            ComplexParameter::named("n", Parameter::new(1.59), Parameter::fixed(1e-4)).into(),
            Parameter::bounded(0.5e-6, 0.1e-6, 2e-6).unwrap().with_name("r").into(),
            Parameter::named("x", 5e-6).into(),
            Parameter::named("y", 5e-6).into(),
            Parameter::fixed(10e-6).with_name("z").into(),
        ],
    )
    .unwrap()
}

fn values(pairs: &[(&str, f64)]) -> NamedValues {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn test_sphere_parametrization_lists_free_parameters() {
    let par = sphere_parametrization();

    assert_eq!(par.parameter_names(), ["n.real", "r", "x", "y"]);
    assert_eq!(par.fixed_values().len(), 2);
    assert_eq!(par.fixed_values()["n.imag"], 1e-4);
    assert_eq!(par.fixed_values()["z"], 10e-6);
}

#[test]
fn test_sphere_from_values() {
    let par = sphere_parametrization();
    let sphere = par
        .make_from(&values(&[
            ("n.real", 1.45),
            ("r", 0.8e-6),
            ("x", 4e-6),
            ("y", 6e-6),
        ]))
        .unwrap();

    assert_eq!(sphere.n, Complex64::new(1.45, 1e-4));
    assert_eq!(sphere.parameter_list(), vec![1.45, 1e-4, 0.8e-6, 4e-6, 6e-6, 10e-6]);
}

#[test]
fn test_guess_is_make_from_of_guesses() {
    let par = sphere_parametrization();
    let guess = par.guess().unwrap();

    assert_eq!(guess, par.make_from(&par.guess_values()).unwrap());
    assert_eq!(guess.r, 0.5e-6);
}

#[test]
fn test_missing_value_names_the_key() {
    let par = sphere_parametrization();

    match par.make_from(&values(&[("n.real", 1.45), ("r", 0.8e-6), ("x", 4e-6)])) {
        Err(HoloFitError::ParameterNotFound(name)) => assert_eq!(name, "y"),
        other => panic!("Expected ParameterNotFound, got {:?}", other),
    }
}

#[test]
fn test_extra_values_are_ignored() {
    let par = sphere_parametrization();
    let mut supplied = par.guess_values();
    supplied.insert("alpha".to_string(), 0.7);

    assert_eq!(par.make_from(&supplied).unwrap(), par.guess().unwrap());
}

#[test]
fn test_fully_fixed_complex_comes_from_fixed_map() {
    let par = Parametrization::new(
        Sphere::factory(),
        vec![
            ComplexParameter::named("n", Parameter::fixed(1.59), Parameter::fixed(0.0)).into(),
            Parameter::named("r", 0.5).into(),
            ParameterEntry::from(Parameter::fixed(0.0).with_name("x")),
            ParameterEntry::from(Parameter::fixed(0.0).with_name("y")),
            ParameterEntry::from(Parameter::fixed(1.0).with_name("z")),
        ],
    )
    .unwrap();

    assert_eq!(par.parameter_names(), ["r"]);
    let sphere = par.make_from(&values(&[("r", 0.6)])).unwrap();
    assert_eq!(sphere, Sphere::new(Complex64::new(1.59, 0.0), 0.6, [0.0, 0.0, 1.0]));
}

#[test]
fn test_parameter_json_round_trip_gets_new_identity() {
    let r = Parameter::bounded(0.5, 0.0, f64::INFINITY).unwrap().with_name("r");
    let json = serde_json::to_string(&r).unwrap();
    assert!(json.contains("null"));

    let restored: Parameter = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.name(), Some("r"));
    assert_eq!(restored.guess(), 0.5);
    assert_eq!(restored.limit(), r.limit());
    assert!(matches!(restored.limit(), Limit::Range(b) if b.high.is_infinite()));
    assert!(!restored.same_as(&r));
}
