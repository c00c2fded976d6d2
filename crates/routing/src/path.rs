//! Structured portal path ("uP file") parsing.
//!
//! Grammar, dot-delimited with a fixed suffix:
//!
//! ```text
//! [tag.{tagId}.]{method}.{methodNodeId}[.target.{targetNodeId}][.extras].uP
//! ```
//!
//! `method` is `render` or `worker`. The method node id names the layout
//! node the action addresses; the optional target node id names a channel
//! singled out within it. Segments after the target id are worker-specific
//! extras and are ignored here.

use crate::error::{Error, Result};

/// Sentinel method node id meaning "the whole layout" rather than any
/// single channel.
pub const USER_LAYOUT_ROOT_NODE: &str = "userLayoutRootNode";

/// Fixed suffix closing every portal path.
const PORTAL_PATH_SUFFIX: &str = ".uP";

/// Marker segment introducing the optional tag id.
const TAG_MARKER: &str = "tag";

/// Marker segment introducing the optional target node id.
const TARGET_MARKER: &str = "target";

/// Action kind encoded in the portal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMethod {
    Render,
    Worker,
}

/// A parsed portal path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalPath {
    tag_id: Option<String>,
    method: PathMethod,
    method_node_id: String,
    target_node_id: Option<String>,
}

impl PortalPath {
    /// Parse a raw portal-path segment.
    pub fn parse(raw: &str) -> Result<Self> {
        let body = raw
            .strip_suffix(PORTAL_PATH_SUFFIX)
            .ok_or(Error::MissingSuffix)?;
        let mut segments = body.split('.');

        let mut head = segments.next().ok_or(Error::MissingSegment("method"))?;

        let tag_id = if head == TAG_MARKER {
            let id = segments.next().ok_or(Error::MissingSegment("tag id"))?;
            head = segments.next().ok_or(Error::MissingSegment("method"))?;
            Some(id.to_owned())
        } else {
            None
        };

        let method = match head {
            "render" => PathMethod::Render,
            "worker" => PathMethod::Worker,
            other => return Err(Error::UnknownMethod(other.to_owned())),
        };

        let method_node_id = segments
            .next()
            .filter(|id| !id.is_empty())
            .ok_or(Error::MissingSegment("method node id"))?
            .to_owned();

        let target_node_id = match segments.next() {
            Some(TARGET_MARKER) => {
                let id = segments
                    .next()
                    .filter(|id| !id.is_empty())
                    .ok_or(Error::MissingSegment("target node id"))?;
                Some(id.to_owned())
            }
            // Anything else is worker extras; not our concern.
            _ => None,
        };

        Ok(Self {
            tag_id,
            method,
            method_node_id,
            target_node_id,
        })
    }

    #[must_use]
    pub fn tag_id(&self) -> Option<&str> {
        self.tag_id.as_deref()
    }

    #[must_use]
    pub fn method(&self) -> PathMethod {
        self.method
    }

    /// Layout node the action addresses. May be the root sentinel.
    #[must_use]
    pub fn method_node_id(&self) -> &str {
        &self.method_node_id
    }

    /// Channel node singled out by the path, if any.
    #[must_use]
    pub fn target_node_id(&self) -> Option<&str> {
        self.target_node_id.as_deref()
    }

    /// True when the method node is the layout-root sentinel.
    #[must_use]
    pub fn is_layout_root(&self) -> bool {
        self.method_node_id == USER_LAYOUT_ROOT_NODE
    }
}
