//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `subdrain` application.
//!
//! It centralizes the error taxonomy shared by the harness components and the
//! logging initialization helper.

pub mod error;
pub mod logging;

pub use error::HarnessError;
