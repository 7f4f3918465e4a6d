//! Scatterers: spheres and clusters of spheres.
//!
//! Concrete scatterers ([`Sphere`], [`SphereCluster`]) hold plain values.
//! Their templates ([`SphereTemplate`], [`ClusterTemplate`]) hold a
//! [`ParameterEntry`] per slot and implement [`Parameterized`], so a fit can
//! be set up by writing down the scatterer with parameters in place of
//! numbers.

use num_complex::Complex64;

use crate::error::{HoloFitError, Result};
use crate::parameters::{Arguments, ParameterEntry};
use crate::parametrization::{Parameterized, ScattererFactory};

/// A scatterer with a defined flat layout
pub trait Scatterer: Sized {
    /// The scatterer's values as a 1-D list in a defined order
    fn parameter_list(&self) -> Vec<f64>;

    /// Rebuild a scatterer from a list shaped like [`parameter_list`](Scatterer::parameter_list)
    fn from_parameter_list(values: &[f64]) -> Result<Self>;
}

/// Homogeneous sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Refractive index relative to vacuum
    pub n: Complex64,
    /// Radius
    pub r: f64,
    /// Center position `(x, y, z)`
    pub center: [f64; 3],
}

const SPHERE_LEN: usize = 6;

impl Sphere {
    pub fn new(n: Complex64, r: f64, center: [f64; 3]) -> Self {
        Self { n, r, center }
    }

    /// Factory taking `n`, `r`, `x`, `y`, `z`
    ///
    /// # Examples
    ///
    /// ```
    /// use holofit::parameters::{ComplexParameter, Parameter};
    /// use holofit::parametrization::{Parametrization, Parametrize};
    /// use holofit::scatterer::Sphere;
    ///
    /// let par = Parametrization::new(
    ///     Sphere::factory(),
    ///     vec![
    ///         ComplexParameter::named("n", Parameter::new(1.59), Parameter::fixed(1e-4)).into(),
    ///         Parameter::named("r", 0.5e-6).into(),
    ///         Parameter::fixed(0.0).with_name("x").into(),
    ///         Parameter::fixed(0.0).with_name("y").into(),
    ///         Parameter::named("z", 10e-6).into(),
    ///     ],
    /// )
    /// .unwrap();
    ///
    /// let sphere = par.guess().unwrap();
    /// assert_eq!(sphere.r, 0.5e-6);
    /// assert_eq!(sphere.center, [0.0, 0.0, 10e-6]);
    /// ```
    pub fn factory() -> ScattererFactory<Sphere> {
        ScattererFactory::new(["n", "r", "x", "y", "z"], |args| {
            Ok(Sphere::new(
                args.complex("n")?,
                args.real("r")?,
                [args.real("x")?, args.real("y")?, args.real("z")?],
            ))
        })
    }

    fn from_arguments(args: &Arguments, prefix: &str) -> Result<Self> {
        let key = |field: &str| format!("{}{}", prefix, field);
        Ok(Sphere::new(
            args.complex(&key("n"))?,
            args.real(&key("r"))?,
            [
                args.real(&key("center[0]"))?,
                args.real(&key("center[1]"))?,
                args.real(&key("center[2]"))?,
            ],
        ))
    }
}

impl Scatterer for Sphere {
    /// `[n.re, n.im, r, x, y, z]`
    fn parameter_list(&self) -> Vec<f64> {
        let [x, y, z] = self.center;
        vec![self.n.re, self.n.im, self.r, x, y, z]
    }

    fn from_parameter_list(values: &[f64]) -> Result<Self> {
        match values {
            [n_re, n_im, r, x, y, z] => Ok(Sphere::new(Complex64::new(*n_re, *n_im), *r, [*x, *y, *z])),
            _ => Err(HoloFitError::DimensionMismatch(format!(
                "Expected {} values for a sphere, got {}",
                SPHERE_LEN,
                values.len()
            ))),
        }
    }
}

/// Several spheres scattering together
#[derive(Debug, Clone, PartialEq)]
pub struct SphereCluster {
    pub spheres: Vec<Sphere>,
}

impl SphereCluster {
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Self { spheres }
    }
}

impl Scatterer for SphereCluster {
    /// Member lists concatenated in member order
    fn parameter_list(&self) -> Vec<f64> {
        self.spheres.iter().flat_map(Sphere::parameter_list).collect()
    }

    fn from_parameter_list(values: &[f64]) -> Result<Self> {
        if values.len() % SPHERE_LEN != 0 {
            return Err(HoloFitError::DimensionMismatch(format!(
                "Expected a multiple of {} values for a cluster, got {}",
                SPHERE_LEN,
                values.len()
            )));
        }
        let spheres = values
            .chunks(SPHERE_LEN)
            .map(Sphere::from_parameter_list)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { spheres })
    }
}

/// A sphere whose slots may be parameters
///
/// Slot names: `n`, `r`, `center[0]`, `center[1]`, `center[2]`.
#[derive(Debug, Clone)]
pub struct SphereTemplate {
    pub n: ParameterEntry,
    pub r: ParameterEntry,
    pub center: [ParameterEntry; 3],
}

impl SphereTemplate {
    pub fn new(
        n: impl Into<ParameterEntry>,
        r: impl Into<ParameterEntry>,
        center: [ParameterEntry; 3],
    ) -> Self {
        Self {
            n: n.into(),
            r: r.into(),
            center,
        }
    }

    fn slots(&self, prefix: &str) -> Vec<(String, ParameterEntry)> {
        let [x, y, z] = &self.center;
        vec![
            (format!("{}n", prefix), self.n.clone()),
            (format!("{}r", prefix), self.r.clone()),
            (format!("{}center[0]", prefix), x.clone()),
            (format!("{}center[1]", prefix), y.clone()),
            (format!("{}center[2]", prefix), z.clone()),
        ]
    }
}

impl Parameterized for SphereTemplate {
    type Output = Sphere;

    fn parameters(&self) -> Vec<(String, ParameterEntry)> {
        self.slots("")
    }

    fn from_parameters(&self, values: &Arguments) -> Result<Sphere> {
        Sphere::from_arguments(values, "")
    }
}

/// A cluster whose member slots may be parameters
///
/// Member `i`'s slots are named `<i>:Sphere.<slot>`, so a parameter shared by
/// every member ties into the group `Sphere.<slot>`.
#[derive(Debug, Clone)]
pub struct ClusterTemplate {
    pub spheres: Vec<SphereTemplate>,
}

impl ClusterTemplate {
    pub fn new(spheres: Vec<SphereTemplate>) -> Self {
        Self { spheres }
    }

    fn prefix(index: usize) -> String {
        format!("{}:Sphere.", index)
    }
}

impl Parameterized for ClusterTemplate {
    type Output = SphereCluster;

    fn parameters(&self) -> Vec<(String, ParameterEntry)> {
        self.spheres
            .iter()
            .enumerate()
            .flat_map(|(i, sphere)| sphere.slots(&Self::prefix(i)))
            .collect()
    }

    fn from_parameters(&self, values: &Arguments) -> Result<SphereCluster> {
        let spheres = (0..self.spheres.len())
            .map(|i| Sphere::from_arguments(values, &Self::prefix(i)))
            .collect::<Result<Vec<_>>>()?;
        Ok(SphereCluster::new(spheres))
    }
}
