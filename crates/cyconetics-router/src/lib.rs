//! Cyconetics decision router library entry.
//!
//! This crate wires config, policy limits, the template catalog, and the
//! decision router into a shareable `Engine`. It is intended to be consumed
//! by the binary (`main.rs`) and by integration tests.

pub mod config;
pub mod engine;
pub mod policy;
pub mod router;
pub mod templates;
pub mod trace;

pub use engine::Engine;
