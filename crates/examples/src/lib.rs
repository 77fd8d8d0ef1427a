//! Shared setup for the Cadence demos.
//!
//! The demos live in `examples/` and are run with, for example:
//!
//! ```sh
//! cargo run -p cadence-examples --example wmr_demo -- --fidelity engine
//! cargo run -p cadence-examples --example player
//! cargo run -p cadence-examples --example evolution --release -- --name run1
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a console subscriber.
///
/// `RUST_LOG` wins over `level` when it is set.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed.
pub fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .context("failed to install the tracing subscriber")
}

/// Reads a TOML config file, or returns the defaults without one.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config<T>(path: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}
