use std::path::Path;
use std::time::Duration;

use artivet_common::error::{ArtivetError, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use tracing::{debug, error};

const DOWNLOAD_TIMEOUT_SECS: u64 = 300;
const CONNECT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT_STRING: &str = "artivet dependency validator (Rust; +https://github.com/alexykn/artivet)";

pub fn build_http_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    Client::builder()
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| ArtivetError::HttpError(format!("Failed to build HTTP client: {e}")))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Downloads `url` into `final_path`, writing through a temporary file in
/// the same directory. An empty body is refused and leaves no file behind.
pub fn download_to(client: &Client, url: &str, final_path: &Path) -> Result<u64> {
    debug!("Downloading {} to {}", url, final_path.display());

    let mut response = client.get(url).send().map_err(|e| {
        debug!("HTTP request failed for {url}: {e}");
        ArtivetError::HttpError(format!("HTTP request failed for {url}: {e}"))
    })?;
    let status = response.status();
    debug!("Received HTTP status: {} for {}", status, url);

    if !status.is_success() {
        return match status {
            StatusCode::NOT_FOUND => Err(ArtivetError::Download(
                file_label(final_path),
                url.to_string(),
                "Resource not found (404)".to_string(),
            )),
            StatusCode::FORBIDDEN => Err(ArtivetError::Download(
                file_label(final_path),
                url.to_string(),
                "Access forbidden (403)".to_string(),
            )),
            _ => {
                let body_text = response
                    .text()
                    .unwrap_or_else(|_| "Failed to read response body".to_string());
                error!("HTTP error {} for URL {}: {}", status, url, body_text);
                Err(ArtivetError::HttpError(format!(
                    "HTTP error {status} for URL {url}: {body_text}"
                )))
            }
        };
    }

    let written = artivet_aio::atomic_write_from_reader(final_path, &mut response)?;
    if written == 0 {
        artivet_aio::remove_file(final_path)?;
        return Err(ArtivetError::Download(
            file_label(final_path),
            url.to_string(),
            "Empty response body".to_string(),
        ));
    }
    debug!("Downloaded {} bytes to {}", written, final_path.display());
    Ok(written)
}
