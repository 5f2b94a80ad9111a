//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! record logic.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`orchestration`] - Polling loop

pub mod bootstrap;
pub mod config;
pub mod orchestration;
