//! # modpack-dl
//!
//! Sequential CurseForge modpack downloader: reads a pack manifest, resolves
//! each addon to a concrete artifact through an un-followed HTTP redirect,
//! streams artifacts to disk one at a time, and drives a one-line terminal
//! progress display.
//!
//! ## Design Philosophy
//!
//! modpack-dl is deliberately:
//! - **Sequential** - one download in flight at a time, in manifest order
//! - **Single-pass** - no retries, no resume, no checksums; a per-item
//!   failure is recorded and the sequence moves on
//! - **Event-driven** - an explicit state machine consumes discrete events
//!   and emits effects; the event loop executes them
//! - **Library-first** - the binary is a thin wrapper over [`Runtime`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use modpack_dl::{Config, Manifest, Runtime, Theme};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let manifest = Manifest::load(&config.download.manifest_path)?;
//!
//!     let report = Runtime::new(config, manifest, Theme::default()).run().await?;
//!     println!("downloaded {} mods", report.successes());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Orchestration state machine
pub mod engine;
/// Error types
pub mod error;
/// Manifest parsing
pub mod manifest;
/// Display-name lookup from the pack mod list
pub mod names;
/// Terminal presentation
pub mod render;
/// Redirect-based artifact resolution
pub mod resolver;
/// Event loop
pub mod runtime;
/// Single-entry download execution
pub mod step;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::{Config, DownloadConfig};
pub use engine::{Effect, Engine, Event, Phase};
pub use error::{Error, Result};
pub use manifest::{Manifest, ManifestEntry};
pub use names::ModNames;
pub use render::{Renderer, Theme};
pub use resolver::RedirectResolver;
pub use runtime::{RunReport, Runtime};
pub use types::Outcome;
