//! Integration tests for fitting models through the minimizer seam
//!
//! Data are synthesized from known scatterers and fitted back with a small
//! Gauss-Newton minimizer from the test helpers.

mod fitting_tests;
