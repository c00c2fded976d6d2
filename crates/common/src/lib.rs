//! Shared types and error definitions used across all porta crates.

pub mod error;
pub mod request;
pub mod types;

pub use {
    error::{Error, FromMessage, PortaError, Result},
    request::{PortalRequest, PortalRequestBuilder, RequestId},
    types::{ChannelId, ChannelParameterValue, ChannelParameters, UploadOutcome, UploadStatus, UploadedFile},
};
