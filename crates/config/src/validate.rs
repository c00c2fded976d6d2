//! Configuration sanity checks.
//!
//! These never fail startup; callers surface diagnostics and continue with
//! the values as loaded.

use crate::schema::PortaConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "upload.default_encoding"
    pub path: String,
    pub message: String,
}

/// Check a loaded config for values that will misbehave at request time.
#[must_use]
pub fn validate(config: &PortaConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let label = config.upload.default_encoding.as_str();
    if encoding_rs::Encoding::for_label(label.as_bytes()).is_none() {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            path: "upload.default_encoding".into(),
            message: format!("unknown encoding label `{label}`, UTF-8 will be used"),
        });
    }

    if config.upload.max_file_size == 0 {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            path: "upload.max_file_size".into(),
            message: "max_file_size is 0, every file upload will be rejected".into(),
        });
    }

    diagnostics
}
