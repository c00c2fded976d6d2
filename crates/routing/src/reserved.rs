//! Reserved routing parameter names.
//!
//! These are consumed as routing signals and never forwarded into a
//! committed parameter bag. Names are part of the portal's URL wire format
//! and must not change.

/// Symbolic friendly-name alias for a channel subscription.
pub const FNAME_PARAM: &str = "uP_fname";

/// Direct channel target.
pub const CHANNEL_TARGET_PARAM: &str = "uP_channelTarget";

/// Channel whose help mode is requested.
pub const HELP_TARGET_PARAM: &str = "uP_help_target";

/// Channel whose about mode is requested.
pub const ABOUT_TARGET_PARAM: &str = "uP_about_target";

/// Channel whose edit mode is requested.
pub const EDIT_TARGET_PARAM: &str = "uP_edit_target";

/// Channel rendered detached from the layout.
pub const DETACH_TARGET_PARAM: &str = "uP_detach_target";

/// Every routing key stripped from the output bag, exact-match on name.
pub const RESERVED_CHANNEL_PARAMS: &[&str] = &[
    CHANNEL_TARGET_PARAM,
    FNAME_PARAM,
    HELP_TARGET_PARAM,
    ABOUT_TARGET_PARAM,
    EDIT_TARGET_PARAM,
    DETACH_TARGET_PARAM,
];

/// True if `name` is one of the reserved routing keys.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_CHANNEL_PARAMS.contains(&name)
}
