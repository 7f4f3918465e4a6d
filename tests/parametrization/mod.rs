//! Integration tests for parameter binding
//!
//! Parametrizations built from factories, and scatterer templates whose
//! shared parameters collapse into tie groups.

// Tests for Parameter serialization and Parametrization
mod parametrization_tests;

// Tests for ParameterizedObject and tie groups
mod tying_tests;
