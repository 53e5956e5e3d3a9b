//! Pond monitor firmware library.
//!
//! Exposes the pure-logic modules for integration testing and host tooling.
//! All ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod rf_codes;
pub mod scheduler;
pub mod sensors;

pub use error::{Error, Result};
