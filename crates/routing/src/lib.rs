//! Resolve which channel an inbound request targets.
//!
//! Resolution cascade (precedence):
//! 1. `uP_fname` resolved through the user layout (a lookup failure is
//!    logged and falls through)
//! 2. `uP_channelTarget`
//! 3. `uP_help_target`
//! 4. `uP_about_target`
//! 5. `uP_edit_target`
//! 6. `uP_detach_target`
//! 7. portal-path target node id
//! 8. portal-path method node id, unless it is the layout root

pub mod error;
pub mod path;
pub mod reserved;
pub mod resolve;

pub use {
    error::{Error, Result},
    path::{PathMethod, PortalPath, USER_LAYOUT_ROOT_NODE},
    resolve::resolve_target_channel,
};
