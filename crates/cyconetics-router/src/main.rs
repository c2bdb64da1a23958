//! cyconetics-router
//!
//! Reads one request JSON from stdin, prints the decision JSON on stdout.
//! Usage: `cyconetics-router [CONFIG.yaml]`. Logs go to stderr (`RUST_LOG`).

use std::io::{self, Read};
use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use cyconetics_core::error::{CyconeticsError, Result};
use cyconetics_core::protocol::Request;
use cyconetics_router::config::{self, EngineConfig};
use cyconetics_router::Engine;

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.client_code().as_str(), error = %e, "cyconetics-router failed");
            eprintln!("cyconetics-router: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cfg = match std::env::args().nth(1) {
        Some(path) => config::load_from_file(&path)?,
        None => EngineConfig::default(),
    };
    let engine = Engine::new(cfg)?;

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| CyconeticsError::Internal(format!("read stdin failed: {e}")))?;
    let request: Request = serde_json::from_str(&input)
        .map_err(|e| CyconeticsError::BadRequest(format!("invalid request json: {e}")))?;

    let decision = engine.decide(&request);
    let out = serde_json::to_string_pretty(&decision)
        .map_err(|e| CyconeticsError::Internal(format!("encode decision failed: {e}")))?;
    println!("{out}");
    Ok(())
}
