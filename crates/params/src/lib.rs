//! Channel parameter collection.
//!
//! Normalizes everything a request carries for its target channel into one
//! parameter bag: ordinary query/form parameters plus, for multipart bodies,
//! decoded text fields and uploaded-file handles with an upload-status
//! marker. The bag is committed through a [`ChannelParameterSink`] keyed by
//! request, and a process-wide registry reclaims upload temp files at
//! shutdown.
//!
//! [`ChannelParameterSink`]: porta_service_traits::ChannelParameterSink

pub mod cleanup;
pub mod error;
pub mod processor;
pub mod store;

mod multipart;

pub use {
    cleanup::{TempFileRegistry, shutdown_cleanup},
    error::{Error, Result},
    processor::{ChannelRequestParameterProcessor, Disposition, UPLOAD_STATUS_PARAM},
    store::{ChannelParameterManager, RequestResolution},
};
