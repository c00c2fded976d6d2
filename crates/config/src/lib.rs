//! Configuration loading and validation.
//!
//! Config file: `porta.toml`, searched in `./` then `~/.config/porta/`.
//! Missing or unreadable files fall back to defaults with a warning; the
//! processor must come up even with no configuration at all.

pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{config_dir, discover_and_load, load_config},
    schema::{PortaConfig, UploadConfig},
    validate::{Diagnostic, Severity, validate},
};
