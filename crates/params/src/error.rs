use porta_common::FromMessage;

/// Crate-wide result type for parameter collection.
pub type Result<T> = std::result::Result<T, Error>;

/// Faults raised while absorbing a multipart body. All of them are caught
/// inside the processor and downgraded to an upload-status marker; none
/// escape to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    /// A file part exceeded the configured per-file ceiling.
    #[error("uploaded file `{filename}` is {size} bytes, over the {limit}-byte limit")]
    FileTooLarge {
        filename: String,
        size: u64,
        limit: u64,
    },

    /// The body was not parseable as multipart content.
    #[error("invalid multipart body: {0}")]
    Multipart(#[from] multer::Error),

    /// Spilling an uploaded file to disk failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    #[must_use]
    pub fn file_too_large(filename: impl Into<String>, size: u64, limit: u64) -> Self {
        Self::FileTooLarge {
            filename: filename.into(),
            size,
            limit,
        }
    }
}

impl FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message(message)
    }
}

porta_common::impl_context!();
