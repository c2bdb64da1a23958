//! Cyconetics core: regulated-object and incentive models, K/S/R scoring,
//! override application, and the request/decision wire types.
//!
//! This crate carries no configuration, logging setup, or policy constants.
//! The router crate supplies those and drives the decision flow.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed caller input surfaces as `CyconeticsError` or as a failing
//! `ValidationResult`, never as a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod incentive;
pub mod ksr;
pub mod object;
pub mod overrides;
pub mod protocol;

/// Shared result type.
pub use error::{CyconeticsError, Result};
