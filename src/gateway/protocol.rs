//! Open-URL request and response encoding.
//!
//! Callers request `/Temporary_Listen_Addresses/openURL/<url>`, where the
//! slash after `openURL` may be omitted. The response is always plain text:
//!
//! ```text
//! > https://example.com/
//! True
//! ```
//!
//! A policy rejection is still a `200`; only the second line says `False`.
//! Existing callers read the body and never look at the status line.

use thiserror::Error;

/// Marker preceding the target URL in the request path.
pub const MARKER: &str = "openURL";

/// Path prefix the listener answers under.
pub const DEFAULT_PREFIX: &str = "/Temporary_Listen_Addresses/";

/// Why no target URL could be taken from a request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("request path does not contain 'openURL'")]
    MissingMarker,

    #[error("request path is not valid percent-encoded UTF-8")]
    InvalidEncoding,
}

/// Take the target URL out of a request's path and query.
///
/// The path is percent-decoded once; the query string is appended verbatim,
/// since it belongs to the target URL. Everything after the first `openURL`
/// (and one optional `/`) is the target.
pub fn extract_target(path: &str, query: Option<&str>) -> Result<String, ExtractError> {
    let decoded = urlencoding::decode(path).map_err(|_| ExtractError::InvalidEncoding)?;

    let (_, rest) = decoded
        .split_once(MARKER)
        .ok_or(ExtractError::MissingMarker)?;
    let rest = rest.strip_prefix('/').unwrap_or(rest);

    let mut target = rest.to_string();
    if let Some(q) = query {
        target.push('?');
        target.push_str(q);
    }
    Ok(target)
}

/// Response body for a handled request.
pub fn response_body(target: &str, accepted: bool) -> String {
    format!("> {}\n{}", target, if accepted { "True" } else { "False" })
}
