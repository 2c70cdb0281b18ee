//! Built-in detection plugins.
//!
//! These checks are deliberately passive: header inspection, banner reading
//! and probes for directory indexes. Nothing here sends attack payloads.

pub mod directory_listing;
pub mod security_headers;
pub mod server_banner;

pub use directory_listing::DirectoryListingPlugin;
pub use security_headers::SecurityHeadersPlugin;
pub use server_banner::ServerBannerPlugin;

use crate::core::Plugin;
use std::sync::Arc;

/// The statically linked plugin set registered on every load.
pub fn builtins() -> Vec<Arc<dyn Plugin>> {
    vec![
        Arc::new(SecurityHeadersPlugin::new()),
        Arc::new(ServerBannerPlugin::new()),
        Arc::new(DirectoryListingPlugin::new()),
    ]
}
