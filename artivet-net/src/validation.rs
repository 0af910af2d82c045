// artivet-net/src/validation.rs
use artivet_common::error::{ArtivetError, Result};
use url::Url;

/// Validates a repository URL, ensuring it uses the HTTPS scheme. Plain
/// HTTP is accepted only when `allow_insecure` is set.
pub fn validate_url(url_str: &str, allow_insecure: bool) -> Result<Url> {
    let url = Url::parse(url_str)
        .map_err(|e| ArtivetError::Validation(format!("Failed to parse URL '{url_str}': {e}")))?;
    match url.scheme() {
        "https" => Ok(url),
        "http" if allow_insecure => {
            tracing::warn!("Using insecure repository URL {}", url_str);
            Ok(url)
        }
        scheme => Err(ArtivetError::Validation(format!(
            "Invalid URL scheme for '{url_str}': Must be https, but got '{scheme}'"
        ))),
    }
}
