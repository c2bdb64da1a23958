//! Top-level facade crate for Cyconetics.
//!
//! Re-exports the core model types and the router library so users can
//! depend on a single crate.

pub mod core {
    pub use cyconetics_core::*;
}

pub mod router {
    pub use cyconetics_router::*;
}
