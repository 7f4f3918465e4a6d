//! Parametrization discovered from a scatterer description
//!
//! A [`Parameterized`] target lists its slots as `name → entry`. Slots that
//! hold the same [`Parameter`] (same identity token) are tied: the minimizer
//! sees one free parameter, registered under a group label derived from the
//! slot names, and every slot of the group receives its value.

use std::collections::{BTreeMap, HashMap};

use num_complex::Complex64;
use tracing::debug;

use crate::error::{HoloFitError, Result};
use crate::parameters::{
    Arguments, NamedValues, ParamId, Parameter, ParameterEntry, ParameterError, ParameterKind,
    Value,
};
use crate::parametrization::{NamedParameter, Parametrize};

/// A scatterer description whose slots may hold parameters
pub trait Parameterized {
    /// What [`from_parameters`](Parameterized::from_parameters) builds
    type Output;

    /// Every named slot, in a stable order
    fn parameters(&self) -> Vec<(String, ParameterEntry)>;

    /// Build an instance from one value per slot name
    fn from_parameters(&self, values: &Arguments) -> Result<Self::Output>;
}

/// Label for a tie group: the longest common suffix of two slot names,
/// trimmed of `:` and `_` separators
///
/// # Examples
///
/// ```
/// use holofit::parametrization::tied_name;
///
/// assert_eq!(tied_name("0:Sphere.r", "1:Sphere.r"), "Sphere.r");
/// assert_eq!(tied_name("n1", "radius"), "");
/// ```
pub fn tied_name(first: &str, second: &str) -> String {
    let suffix: Vec<char> = first
        .chars()
        .rev()
        .zip(second.chars().rev())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a)
        .collect();
    let suffix: String = suffix.into_iter().rev().collect();
    suffix.trim_matches(|c| c == ':' || c == '_').to_string()
}

/// Parametrization built from a [`Parameterized`] target
#[derive(Debug, Clone)]
pub struct ParameterizedObject<T> {
    target: T,
    entries: Vec<(String, ParameterEntry)>,
    parameters: Vec<NamedParameter>,
    ties: BTreeMap<String, Vec<String>>,
    labels: HashMap<String, String>,
}

/// Bookkeeping while walking the target's slots
#[derive(Default)]
struct TieBuilder {
    /// Current registered name of every parameter seen so far
    names: HashMap<ParamId, String>,
    /// Which parameter each registered name belongs to
    owners: HashMap<String, ParamId>,
    /// Explicit names of the parameters seen so far
    explicit: HashMap<ParamId, String>,
    /// Free parameters in first-seen order
    free: Vec<Parameter>,
    ties: BTreeMap<String, Vec<String>>,
}

impl TieBuilder {
    fn visit(&mut self, parameter: &Parameter, name: String) -> std::result::Result<(), ParameterError> {
        let id = parameter.id();
        let Some(previous) = self.names.get(&id).cloned() else {
            return self.register(parameter, name);
        };

        let label = self.label(parameter, &previous, &name)?;
        let mut group = self
            .ties
            .remove(&previous)
            .unwrap_or_else(|| vec![previous.clone()]);
        group.push(name);
        self.owners.remove(&previous);

        debug!(label = %label, members = ?group, "tied parameters");
        self.owners.insert(label.clone(), id);
        self.ties.insert(label.clone(), group);
        self.names.insert(id, label);
        Ok(())
    }

    /// First sighting of a parameter: it is registered under its slot name
    fn register(&mut self, parameter: &Parameter, name: String) -> std::result::Result<(), ParameterError> {
        let id = parameter.id();
        if let Some(holder) = self.owners.get(&name).copied() {
            self.relabel(holder, &name)?;
        }

        if let Some(explicit) = parameter.name() {
            self.explicit.insert(id, explicit.to_string());
        }
        self.owners.insert(name.clone(), id);
        self.names.insert(id, name);
        if !parameter.is_fixed() {
            self.free.push(parameter.clone());
        }
        Ok(())
    }

    /// Move the tie group labelled `label` to its parameter's explicit name
    /// so a slot of the same name can take the label
    fn relabel(&mut self, holder: ParamId, label: &str) -> std::result::Result<(), ParameterError> {
        let duplicate = || ParameterError::DuplicateName {
            name: label.to_string(),
        };
        if !self.ties.contains_key(label) {
            return Err(duplicate());
        }
        let renamed = self
            .explicit
            .get(&holder)
            .filter(|explicit| explicit.as_str() != label && self.usable(explicit, holder))
            .cloned()
            .ok_or_else(duplicate)?;

        let members = self.ties.remove(label).unwrap_or_default();
        debug!(from = %label, to = %renamed, "relabelled tie group");
        self.owners.remove(label);
        self.owners.insert(renamed.clone(), holder);
        self.ties.insert(renamed.clone(), members);
        self.names.insert(holder, renamed);
        Ok(())
    }

    /// A label is usable when no other parameter is registered under it
    fn usable(&self, label: &str, id: ParamId) -> bool {
        !label.is_empty() && self.owners.get(label).map_or(true, |owner| *owner == id)
    }

    /// Pick a label for the group, falling back to the parameter's own name
    /// when the slot names share no usable suffix or the suffix is already
    /// registered for another parameter
    fn label(
        &self,
        parameter: &Parameter,
        previous: &str,
        name: &str,
    ) -> std::result::Result<String, ParameterError> {
        let id = parameter.id();
        let derived = tied_name(previous, name);
        if self.usable(&derived, id) {
            return Ok(derived);
        }
        match parameter.name() {
            Some(explicit) if self.usable(explicit, id) => Ok(explicit.to_string()),
            _ => Err(ParameterError::AmbiguousTie {
                first: previous.to_string(),
                second: name.to_string(),
            }),
        }
    }
}

impl<T: Parameterized> ParameterizedObject<T> {
    /// Walk `target`'s slots, registering free parameters and tie groups
    ///
    /// Fixed parameters never enter the free list, tied or not. Constant
    /// slots belong to the target and are passed through by
    /// [`make_from`](Parametrize::make_from).
    pub fn new(target: T) -> std::result::Result<Self, ParameterError> {
        let entries = target.parameters();
        let mut builder = TieBuilder::default();

        for (name, entry) in &entries {
            match entry {
                ParameterEntry::Scalar(p) => builder.visit(p, name.clone())?,
                ParameterEntry::Complex(c) => {
                    for (component, p) in c.components(name) {
                        builder.visit(p, component)?;
                    }
                }
                ParameterEntry::Constant(_) => {}
            }
        }

        let parameters = builder
            .free
            .into_iter()
            .map(|parameter| NamedParameter {
                name: builder.names[&parameter.id()].clone(),
                parameter,
            })
            .collect();
        let labels = builder
            .ties
            .iter()
            .flat_map(|(label, members)| {
                members.iter().map(move |member| (member.clone(), label.clone()))
            })
            .collect();

        Ok(Self {
            target,
            entries,
            parameters,
            ties: builder.ties,
            labels,
        })
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Tie groups: label → member slot names
    pub fn ties(&self) -> &BTreeMap<String, Vec<String>> {
        &self.ties
    }

    /// The name a minimizer uses for slot (or slot component) `name`
    pub fn resolve_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.labels.get(name).map_or(name, String::as_str)
    }

    fn component(&self, parameter: &Parameter, name: &str, values: &NamedValues) -> Result<f64> {
        match parameter.kind() {
            ParameterKind::Fixed(value) => Ok(value),
            ParameterKind::Free => {
                let key = self.resolve_name(name);
                values
                    .get(key)
                    .copied()
                    .ok_or_else(|| HoloFitError::ParameterNotFound(key.to_string()))
            }
        }
    }
}

impl<T: Parameterized> Parametrize for ParameterizedObject<T> {
    type Output = T::Output;

    fn parameters(&self) -> &[NamedParameter] {
        &self.parameters
    }

    /// Expand minimizer values to one value per slot and rebuild the target
    ///
    /// Tied slots each look up the group label, so every member receives the same value.
    fn make_from(&self, values: &NamedValues) -> Result<T::Output> {
        let mut args = Arguments::new();
        for (name, entry) in &self.entries {
            let value = match entry {
                ParameterEntry::Scalar(p) => Value::Real(self.component(p, name, values)?),
                ParameterEntry::Complex(c) => {
                    let [(real_name, real), (imag_name, imag)] = c.components(name);
                    Value::Complex(Complex64::new(
                        self.component(real, &real_name, values)?,
                        self.component(imag, &imag_name, values)?,
                    ))
                }
                ParameterEntry::Constant(v) => *v,
            };
            args.insert(name, value);
        }
        self.target.from_parameters(&args)
    }
}
