//! Integration tests for models and their cost functions

mod model_tests;
