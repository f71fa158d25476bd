//! Unit tests for gemsecrets configuration loading.
//!
//! This module contains tests organised into:
//! - [`helpers`] - Shared fixtures and helper functions
//! - [`types_tests`] - `ManifestInputs` and `EffectiveConfig` behaviour
//! - [`layer_precedence_tests`] - `MergeComposer` layer precedence tests
//! - [`load_inputs_tests`] - End-to-end loading from file, environment, and CLI

mod helpers;
