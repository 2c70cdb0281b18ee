use crate::transport::TransportError;
use url::Url;

/// A target is scannable only when both a scheme and an authority are
/// present; bare hostnames and relative paths are rejected.
pub fn is_valid_url(raw: &str) -> bool {
    Url::parse(raw).map(|url| url.has_host()).unwrap_or(false)
}

/// Resolve `path` against `base`, RFC 3986 style.
pub fn join_url(base: &str, path: &str) -> Result<String, TransportError> {
    let parsed = Url::parse(base).map_err(|source| TransportError::InvalidUrl {
        url: base.to_string(),
        source,
    })?;
    let joined = parsed
        .join(path)
        .map_err(|source| TransportError::InvalidUrl {
            url: path.to_string(),
            source,
        })?;
    Ok(joined.into())
}

/// Reduce a URL to scheme plus authority, dropping path, query and fragment.
pub fn base_url(raw: &str) -> Result<String, TransportError> {
    let parsed = Url::parse(raw).map_err(|source| TransportError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    let host = parsed.host_str().ok_or_else(|| TransportError::InvalidUrl {
        url: raw.to_string(),
        source: url::ParseError::EmptyHost,
    })?;
    Ok(match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    })
}
