//! Privileged-caller signal consumed from the authentication layer.
//!
//! The gateway does not verify credentials itself; the platform's auth layer
//! runs in front of it (trust-boundary pattern) and attaches the principal's
//! authority flags as a request extension. Absence of the extension means an
//! unprivileged caller.

use axum::http::Extensions;

/// Authority flags of the authenticated principal, if any
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorityFlags {
    /// Admin callers bypass rate limiting entirely
    pub admin: bool,
}

/// Whether the request carries a privileged principal
pub fn is_privileged(extensions: &Extensions) -> bool {
    extensions
        .get::<AuthorityFlags>()
        .map(|flags| flags.admin)
        .unwrap_or(false)
}
