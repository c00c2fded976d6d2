use tracing::{debug, error};

use {
    porta_common::{ChannelId, PortalRequest},
    porta_service_traits::LayoutService,
};

use crate::{
    path::PortalPath,
    reserved::{
        ABOUT_TARGET_PARAM, CHANNEL_TARGET_PARAM, DETACH_TARGET_PARAM, EDIT_TARGET_PARAM,
        FNAME_PARAM, HELP_TARGET_PARAM,
    },
};

/// Determine the channel a request targets, or `None` if it targets no
/// channel.
///
/// Probes run in fixed priority order and the first hit wins. The friendly
/// name is deliberately first so a single base action URL can address a
/// named channel no matter which other routing parameters ride along.
#[must_use]
pub fn resolve_target_channel(
    request: &PortalRequest,
    layout: &dyn LayoutService,
) -> Option<ChannelId> {
    let resolved = resolve_fname(request, layout)
        .or_else(|| param_target(request, CHANNEL_TARGET_PARAM))
        .or_else(|| param_target(request, HELP_TARGET_PARAM))
        .or_else(|| param_target(request, ABOUT_TARGET_PARAM))
        .or_else(|| param_target(request, EDIT_TARGET_PARAM))
        .or_else(|| param_target(request, DETACH_TARGET_PARAM))
        .or_else(|| path_target_node(request))
        .or_else(|| path_method_node(request));

    debug!(channel = ?resolved, "resolved target channel");
    resolved
}

/// Probe 1: friendly name resolved through the user layout. A lookup
/// failure is not fatal; later probes still run.
fn resolve_fname(request: &PortalRequest, layout: &dyn LayoutService) -> Option<ChannelId> {
    let fname = request.parameter(FNAME_PARAM)?;
    match layout.subscribe_id(fname) {
        Ok(id) => Some(id),
        Err(e) => {
            error!(fname, error = %e, "unable to get subscribe id for fname");
            None
        }
    }
}

/// Probes 2-6: a direct routing parameter naming the channel.
fn param_target(request: &PortalRequest, name: &str) -> Option<ChannelId> {
    request.parameter(name).map(ChannelId::from)
}

/// Probe 7: target node embedded in the structured portal path.
fn path_target_node(request: &PortalRequest) -> Option<ChannelId> {
    let path = parsed_path(request)?;
    path.target_node_id().map(ChannelId::from)
}

/// Probe 8: the path's method node, unless it is the layout root. Root
/// requests address the whole layout and must not be read as
/// channel-targeted.
fn path_method_node(request: &PortalRequest) -> Option<ChannelId> {
    let path = parsed_path(request)?;
    if path.is_layout_root() {
        return None;
    }
    Some(ChannelId::from(path.method_node_id()))
}

fn parsed_path(request: &PortalRequest) -> Option<PortalPath> {
    let raw = request.portal_path()?;
    match PortalPath::parse(raw) {
        Ok(path) => Some(path),
        Err(e) => {
            debug!(path = raw, error = %e, "unparseable portal path");
            None
        }
    }
}
