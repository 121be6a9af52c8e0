/// URL inspection for Link Locker: hostnames and excluded pages
use url::Url;

use crate::error::CaptureError;

/// The browser's new-tab page
pub const NEW_TAB_URL: &str = "chrome://newtab/";

/// Scheme prefixes that are never captured: browser UI, extension pages,
/// inline data and about: pages
const EXCLUDED_PREFIXES: &[&str] = &[
    "chrome://",
    "chrome-extension://",
    "chrome-search://",
    "edge://",
    "brave://",
    "data:",
    "about:",
];

/// Extract the hostname from an absolute URL
///
/// Examples:
/// - https://www.google.com/search → www.google.com
/// - http://localhost:3000/app → localhost
/// - file:///home/me/notes.txt → "" (parses, but has no host)
///
/// Relative or otherwise unparseable input is an error.
pub fn extract_hostname(url: &str) -> Result<String, CaptureError> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| CaptureError::InvalidUrl(format!("{}: {}", url, e)))?;

    Ok(parsed.host_str().unwrap_or_default().to_string())
}

/// Whether a URL belongs to a page that should never be captured
pub fn is_excluded_url(url: &str) -> bool {
    url == NEW_TAB_URL || EXCLUDED_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}
