//! Parameter bag types shared by the resolver and the collector.
//!
//! A committed parameter bag maps parameter names to arrays of values, where
//! a value is an ordinary string, an uploaded file handle, or the per-request
//! upload status marker.

use std::{collections::HashMap, fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Opaque identifier of a channel (the legacy pluggable content unit).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(String);

impl ChannelId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ChannelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One value in a channel parameter bag.
#[derive(Debug, Clone)]
pub enum ChannelParameterValue {
    /// Ordinary query/form parameter, or a decoded multipart text field.
    Text(String),
    /// A multipart file part with a non-empty original filename.
    File(UploadedFile),
    /// The reserved upload-status marker.
    UploadStatus(UploadStatus),
}

impl ChannelParameterValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            Self::File(file) => Some(file),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_upload_status(&self) -> Option<&UploadStatus> {
        match self {
            Self::UploadStatus(status) => Some(status),
            _ => None,
        }
    }
}

/// The unified parameter bag handed to channel rendering.
pub type ChannelParameters = HashMap<String, Vec<ChannelParameterValue>>;

/// Handle to one uploaded multipart file part, spilled to a temp file.
///
/// The backing file outlives the request; it is reclaimed by the process-wide
/// cleanup registry at shutdown, so downstream consumers may read it at any
/// point in the rendering pipeline.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    field_name: String,
    original_filename: String,
    content_type: Option<String>,
    size: u64,
    path: PathBuf,
}

impl UploadedFile {
    #[must_use]
    pub fn new(
        field_name: impl Into<String>,
        original_filename: impl Into<String>,
        content_type: Option<String>,
        size: u64,
        path: PathBuf,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            original_filename: original_filename.into(),
            content_type,
            size,
            path,
        }
    }

    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Filename as submitted by the client. Never empty.
    #[must_use]
    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Size of the uploaded content in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Open the spilled content for reading.
    pub fn open(&self) -> std::io::Result<std::fs::File> {
        std::fs::File::open(&self.path)
    }
}

/// Whether multipart parsing completed for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadOutcome {
    Success,
    Failure,
}

/// Upload outcome plus the file-size ceiling in force when it was recorded.
///
/// Present in the bag under the reserved upload-status key only when the
/// request body was multipart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadStatus {
    pub outcome: UploadOutcome,
    pub max_file_size: u64,
}

impl UploadStatus {
    #[must_use]
    pub fn success(max_file_size: u64) -> Self {
        Self {
            outcome: UploadOutcome::Success,
            max_file_size,
        }
    }

    #[must_use]
    pub fn failure(max_file_size: u64) -> Self {
        Self {
            outcome: UploadOutcome::Failure,
            max_file_size,
        }
    }
}
