//! Request parameter processing for requests that do not explicitly target
//! a portlet.
//!
//! Pulls out channel parameters and absorbs file uploads so the data can be
//! handed to the targeted channel's rendering as one uniform bag. Runs after
//! the portlet-targeting stage; when that stage has not finished yet the
//! whole pass is deferred and retried, so processing must be idempotent up
//! to the first definitive commit.

use std::sync::Arc;

use tracing::{debug, warn};

use {
    porta_common::{ChannelParameterValue, ChannelParameters, PortalRequest, UploadStatus},
    porta_config::UploadConfig,
    porta_routing::{resolve_target_channel, reserved::is_reserved},
    porta_service_traits::{
        ChannelParameterSink, ErrorReporter, LayoutService, PortletRoute, PortletTargetService,
        Severity,
    },
};

use crate::{
    cleanup::TempFileRegistry,
    multipart::{absorb_multipart, effective_encoding},
};

/// Reserved bag key carrying the [`UploadStatus`] marker. Present only when
/// the request body was multipart.
pub const UPLOAD_STATUS_PARAM: &str = "up_upload_status";

/// Outcome of one processing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Disposition {
    /// The request reached a definitive outcome; the sink holds it.
    Complete,
    /// The portlet gate is not ready; re-invoke on a later pass.
    Deferred,
}

/// Collects the unified channel parameter bag for a request and commits it
/// through the sink.
pub struct ChannelRequestParameterProcessor {
    portlet_targets: Arc<dyn PortletTargetService>,
    layout: Arc<dyn LayoutService>,
    sink: Arc<dyn ChannelParameterSink>,
    reporter: Arc<dyn ErrorReporter>,
    upload: UploadConfig,
}

impl ChannelRequestParameterProcessor {
    #[must_use]
    pub fn new(
        portlet_targets: Arc<dyn PortletTargetService>,
        layout: Arc<dyn LayoutService>,
        sink: Arc<dyn ChannelParameterSink>,
        reporter: Arc<dyn ErrorReporter>,
        upload: UploadConfig,
    ) -> Self {
        Self {
            portlet_targets,
            layout,
            sink,
            reporter,
            upload,
        }
    }

    /// Run one processing pass over the request.
    ///
    /// Never fails: every collaborator fault is caught at its call site and
    /// converted into a logged or recorded outcome. [`Disposition::Deferred`]
    /// is the only non-definitive answer.
    pub async fn process(&self, request: &PortalRequest) -> Disposition {
        // A retried pass after a definitive outcome must not disturb it.
        if self.sink.is_resolved(request.id()) {
            debug!(request = %request.id(), "request already resolved, skipping");
            return Disposition::Complete;
        }

        let is_portlet_request = match self.portlet_targets.targeted_window(request) {
            PortletRoute::Incomplete => {
                debug!(request = %request.id(), "portlet targeting incomplete, deferring");
                return Disposition::Deferred;
            }
            PortletRoute::Targeted(window) => {
                debug!(request = %request.id(), window = %window, "portlet request, channel parameters forced empty");
                true
            }
            PortletRoute::NotTargeted => false,
        };

        let Some(channel) = resolve_target_channel(request, &*self.layout) else {
            self.sink.set_no_channel_parameters(request.id());
            return Disposition::Complete;
        };

        let mut bag = ChannelParameters::new();

        // Portlet-routed requests carry no channel parameters at all.
        if is_portlet_request {
            self.sink.set_channel_parameters(request.id(), channel, bag);
            return Disposition::Complete;
        }

        if request.is_multipart() {
            let encoding = effective_encoding(request, &self.upload.default_encoding);
            let status = match absorb_multipart(
                request,
                encoding,
                self.upload.max_file_size,
                TempFileRegistry::global(),
                &mut bag,
            )
            .await
            {
                Ok(()) => UploadStatus::success(self.upload.max_file_size),
                Err(e) => {
                    warn!(
                        request = %request.id(),
                        error = %e,
                        "failed to parse multipart upload, processing continues but not all parameters may be available"
                    );
                    self.reporter.report(Severity::Bug, &e);
                    UploadStatus::failure(self.upload.max_file_size)
                }
            };
            bag.insert(
                UPLOAD_STATUS_PARAM.to_owned(),
                vec![ChannelParameterValue::UploadStatus(status)],
            );
        }

        // Ordinary request parameters, minus the routing keys. Request
        // parameters overwrite same-named multipart fields.
        for (name, values) in request.parameters() {
            if is_reserved(name) {
                continue;
            }
            bag.insert(
                name.to_owned(),
                values
                    .iter()
                    .map(|v| ChannelParameterValue::Text(v.clone()))
                    .collect(),
            );
        }

        self.sink.set_channel_parameters(request.id(), channel, bag);
        Disposition::Complete
    }
}
