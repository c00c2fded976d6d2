//! In-memory commit target for resolved channel parameters.

use dashmap::DashMap;

use {
    porta_common::{ChannelId, ChannelParameters, RequestId},
    porta_service_traits::ChannelParameterSink,
};

/// Definitive outcome recorded for one request.
#[derive(Debug, Clone)]
pub enum RequestResolution {
    /// The request targets no channel.
    NoChannel,
    /// The request targets `channel` with the committed bag.
    Channel {
        channel: ChannelId,
        parameters: ChannelParameters,
    },
}

/// Request-keyed resolution store shared by the processor and the rendering
/// stage. First commit wins; re-entrant passes cannot overwrite a
/// definitive outcome.
#[derive(Debug, Default)]
pub struct ChannelParameterManager {
    resolutions: DashMap<RequestId, RequestResolution>,
}

impl ChannelParameterManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The outcome recorded for a request, if it reached one.
    #[must_use]
    pub fn resolution(&self, request: RequestId) -> Option<RequestResolution> {
        self.resolutions.get(&request).map(|r| r.value().clone())
    }

    /// The committed bag for `channel`, if the request resolved to it.
    #[must_use]
    pub fn parameters_for(
        &self,
        request: RequestId,
        channel: &ChannelId,
    ) -> Option<ChannelParameters> {
        match self.resolutions.get(&request).map(|r| r.value().clone()) {
            Some(RequestResolution::Channel {
                channel: resolved,
                parameters,
            }) if resolved == *channel => Some(parameters),
            _ => None,
        }
    }

    /// Forget a request's outcome once its lifecycle ends.
    pub fn evict(&self, request: RequestId) {
        self.resolutions.remove(&request);
    }
}

impl ChannelParameterSink for ChannelParameterManager {
    fn set_no_channel_parameters(&self, request: RequestId) {
        self.resolutions
            .entry(request)
            .or_insert(RequestResolution::NoChannel);
    }

    fn set_channel_parameters(
        &self,
        request: RequestId,
        channel: ChannelId,
        parameters: ChannelParameters,
    ) {
        self.resolutions
            .entry(request)
            .or_insert(RequestResolution::Channel {
                channel,
                parameters,
            });
    }

    fn is_resolved(&self, request: RequestId) -> bool {
        self.resolutions.contains_key(&request)
    }
}
