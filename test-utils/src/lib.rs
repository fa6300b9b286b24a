//! Shared test utilities for service-kit.
//!
//! This crate provides:
//! - Proptest generators for connection strings and parameter values
//! - Mock cache and health checker implementations
//! - Fixtures with sample configuration values

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
