//! Utility functions and helpers for holofit.

pub mod finite_difference;

pub use finite_difference::{
    jacobian, jacobian_central, jacobian_central_parallel, jacobian_parallel, jacobian_with,
};
