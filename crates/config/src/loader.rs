use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::schema::PortaConfig;

/// Standard config file name.
const CONFIG_FILENAME: &str = "porta.toml";

/// Load config from the given path.
pub fn load_config(path: &Path) -> anyhow::Result<PortaConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let config = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    Ok(config)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./porta.toml` (project-local)
/// 2. `~/.config/porta/porta.toml` (user-global)
///
/// Returns `PortaConfig::default()` if no config file is found or the file
/// does not parse.
pub fn discover_and_load() -> PortaConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    PortaConfig::default()
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.exists() {
        return Some(local);
    }

    if let Some(dir) = config_dir() {
        let global = dir.join(CONFIG_FILENAME);
        if global.exists() {
            return Some(global);
        }
    }

    None
}

/// Returns the user-global config directory (`~/.config/porta/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "porta").map(|d| d.config_dir().to_path_buf())
}
