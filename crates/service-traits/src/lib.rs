//! Collaborator interfaces consumed by target resolution and parameter
//! collection.
//!
//! Each trait has a `Noop`/static implementation so the processor can run
//! standalone before the portlet and layout subsystems are wired in. All
//! lookups are in-memory and request-scoped, so the traits are synchronous.

use std::collections::HashMap;

use tracing::{error, info, warn};

use porta_common::{ChannelId, ChannelParameters, PortalRequest, RequestId};

// ── Portlet gate ────────────────────────────────────────────────────────────

/// Answer from the portlet-targeting subsystem for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortletRoute {
    /// The request explicitly targets a portlet window; channel parameters
    /// must be committed empty.
    Targeted(String),
    /// Not a portlet request; channel parameter processing proceeds.
    NotTargeted,
    /// Portlet request processing has not run yet for this request; the
    /// caller must defer and retry the whole pass.
    Incomplete,
}

/// Yes/no/not-ready gate consulted before any channel parameter work.
pub trait PortletTargetService: Send + Sync {
    fn targeted_window(&self, request: &PortalRequest) -> PortletRoute;
}

/// Gate for deployments without a portlet container: nothing is ever a
/// portlet request.
pub struct NoopPortletTargetService;

impl PortletTargetService for NoopPortletTargetService {
    fn targeted_window(&self, _request: &PortalRequest) -> PortletRoute {
        PortletRoute::NotTargeted
    }
}

// ── Layout lookup ───────────────────────────────────────────────────────────

/// Maps a symbolic friendly name to the channel subscription id in the
/// current user layout.
pub trait LayoutService: Send + Sync {
    fn subscribe_id(&self, fname: &str) -> porta_common::Result<ChannelId>;
}

/// Fixed fname → subscription table; the default standalone implementation
/// and the usual test double.
#[derive(Debug, Default)]
pub struct StaticLayoutService {
    subscriptions: HashMap<String, ChannelId>,
}

impl StaticLayoutService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_subscription(mut self, fname: impl Into<String>, id: impl Into<ChannelId>) -> Self {
        self.subscriptions.insert(fname.into(), id.into());
        self
    }
}

impl LayoutService for StaticLayoutService {
    fn subscribe_id(&self, fname: &str) -> porta_common::Result<ChannelId> {
        self.subscriptions
            .get(fname)
            .cloned()
            .ok_or_else(|| porta_common::Error::unknown_fname(fname))
    }
}

// ── Error reporting ─────────────────────────────────────────────────────────

/// Category attached to a reported fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Degraded but handled; the request continues.
    Recoverable,
    /// Unexpected condition worth an operator's attention.
    Bug,
    /// The request cannot be served.
    Fatal,
}

/// Generic sink for faults that were caught and converted into a recorded
/// outcome rather than propagated.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, severity: Severity, error: &(dyn std::error::Error + 'static));
}

/// Reporter that forwards to `tracing` at a severity-appropriate level.
pub struct LoggingErrorReporter;

impl ErrorReporter for LoggingErrorReporter {
    fn report(&self, severity: Severity, error: &(dyn std::error::Error + 'static)) {
        match severity {
            Severity::Recoverable => info!(error = %error, "recoverable fault"),
            Severity::Bug => warn!(error = %error, "unexpected fault"),
            Severity::Fatal => error!(error = %error, "fatal fault"),
        }
    }
}

// ── Parameter commit ────────────────────────────────────────────────────────

/// The sole surface through which resolved channel parameters become visible
/// to the rest of the pipeline.
///
/// First commit wins: once a request has a committed resolution, later calls
/// for the same request must leave it unchanged.
pub trait ChannelParameterSink: Send + Sync {
    /// Mark the request as targeting no channel.
    fn set_no_channel_parameters(&self, request: RequestId);

    /// Commit the finished bag for the targeted channel.
    fn set_channel_parameters(
        &self,
        request: RequestId,
        channel: ChannelId,
        parameters: ChannelParameters,
    );

    /// True once the request has reached a definitive outcome (no-channel or
    /// committed parameters).
    fn is_resolved(&self, request: RequestId) -> bool;
}
