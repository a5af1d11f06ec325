//! Helpers shared by transports.

use crate::error::Result;
use url::Url;

/// Whether `status` means the remote side accepted the request.
#[inline]
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Resolve `path` against a server base URL.
///
/// # Examples
///
/// ```
/// use rig_config_sync::client::resource_url;
///
/// let url = resource_url("http://rig.local:9000", "/api/configuration").unwrap();
/// assert_eq!(url, "http://rig.local:9000/api/configuration");
/// ```
pub fn resource_url(base: &str, path: &str) -> Result<String> {
    Ok(Url::parse(base)?.join(path)?.to_string())
}
