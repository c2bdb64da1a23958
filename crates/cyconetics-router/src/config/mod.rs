//! Engine config loader (strict parsing).
//!
//! YAML syntax and unknown keys are `BadRequest`; an unreadable file is
//! `Internal`. A parsed config is validated before it is returned.

pub mod schema;

use std::fs;

use cyconetics_core::error::{CyconeticsError, Result};

pub use schema::{CatalogSection, EngineConfig, OverrideSection, PolicySection};

pub fn load_from_file(path: &str) -> Result<EngineConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| CyconeticsError::Internal(format!("read config {path} failed: {e}")))?;
    tracing::debug!(path, "config file read");
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<EngineConfig> {
    let cfg: EngineConfig = serde_yaml::from_str(s)
        .map_err(|e| CyconeticsError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
