//! Config schema types.

use serde::{Deserialize, Serialize};

/// Default upload ceiling: 25 MB.
const DEFAULT_MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortaConfig {
    pub upload: UploadConfig,
}

/// Multipart upload handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Character encoding assumed for multipart text fields when the request
    /// does not declare one. Any label `encoding_rs` understands.
    pub default_encoding: String,
    /// Maximum accepted size of a single uploaded file, in bytes.
    pub max_file_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            default_encoding: "UTF-8".into(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = PortaConfig::default();
        assert_eq!(cfg.upload.default_encoding, "UTF-8");
        assert_eq!(cfg.upload.max_file_size, 25 * 1024 * 1024);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: PortaConfig = toml::from_str("[upload]\nmax_file_size = 1024\n")
            .expect("valid toml");
        assert_eq!(cfg.upload.max_file_size, 1024);
        assert_eq!(cfg.upload.default_encoding, "UTF-8");
    }
}
