//! Host-side integration tests for the pond monitor firmware.
//!
//! Every hardware port is replaced by a recording mock driven by a shared
//! virtual clock, so timing-sensitive behaviour (fades, typewriter pacing)
//! is asserted exactly without sleeping.

#![cfg(not(target_os = "espidf"))]

mod app_service_tests;
mod display_tests;
mod mock_hw;
