//! Policy layer (risk ceiling, per-kind invariants, no-exclusion override).
//!
//! `PolicyLimits` is compiled once from config; the validators borrow it and
//! hold no state of their own.

pub mod incentive;
pub mod limits;
pub mod no_exclusion;
pub mod object;

pub use incentive::IncentiveValidator;
pub use limits::{
    PolicyLimits, DECISION_KNOWLEDGE, DECISION_RISK, DECISION_SOCIAL, HEX_STAMP_SPINE, MAX_ROH,
};
pub use no_exclusion::NoExclusionPolicy;
pub use object::ObjectValidator;
