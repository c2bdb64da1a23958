//! Request and decision records exchanged at the engine boundary.
//!
//! - `request`: what a caller asks for (kinds, envelope, overrides).
//! - `decision`: what the engine answers, plus the violation taxonomy.
//!
//! Both are plain serde records with camelCase keys.

pub mod decision;
pub mod request;

pub use decision::{Decision, ValidationResult, Violation};
pub use request::{Envelope, Intent, Request, TopicType};
