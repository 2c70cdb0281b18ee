use crate::transport::TransportError;
use thiserror::Error;

/// Errors that abort a scan before any plugin work starts. Everything else
/// (plugin failures, discovery failures, exhausted retries) is contained at
/// its originating boundary and surfaced through logs and the progress
/// observer instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid target URL: {0:?}")]
    InvalidTarget(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
