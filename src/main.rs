//! modpack-dl binary entry point
//!
//! Exit codes: 0 on normal completion, including runs with per-item failures
//! and user cancellation; 1 on any fatal error.

use std::process::ExitCode;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use modpack_dl::{names, Config, Manifest, Result, RunReport, Runtime, Theme};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so they never garble the status line; silent unless
    // RUST_LOG is set.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(_report) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<RunReport> {
    let config = Config::default();

    let mut manifest = Manifest::load(&config.download.manifest_path)?;

    // A missing mod list only costs display names.
    match names::load(&config.download.modlist_path) {
        Ok(names) => manifest.attach_names(&names),
        Err(error) => warn!(%error, "could not read mod list"),
    }

    Runtime::new(config, manifest, Theme::default()).run().await
}
