//! Test helpers module
//!
//! Shared fixtures for the integration tests: catalog data, instrumented
//! loaders and an on-disk catalog directory with matching settings.

#![allow(dead_code)]

pub mod test_context;
pub mod test_data;

pub use test_context::*;
pub use test_data::*;
