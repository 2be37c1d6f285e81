//! Reading raw content from files and URLs

use crate::error::{DataError, DataResult};
use std::path::Path;
use tracing::debug;
use url::Url;

/// True for `http://` and `https://` locations
pub fn is_url(location: &str) -> bool {
    Url::parse(location)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Read the full content at `location`, fetching URLs over HTTP
pub async fn read_source(location: &str) -> DataResult<String> {
    if is_url(location) {
        fetch_url(location).await
    } else {
        read_file(Path::new(location)).await
    }
}

async fn fetch_url(url: &str) -> DataResult<String> {
    debug!("Fetching data from URL: {}", url);

    let response = reqwest::get(url)
        .await
        .map_err(|e| DataError::load_failed(url, "Request failed", e))?;

    let status = response.status();
    let response = response
        .error_for_status()
        .map_err(|e| DataError::load_failed(url, format!("Server responded with {}", status), e))?;

    response
        .text()
        .await
        .map_err(|e| DataError::load_failed(url, "Failed to read response body", e))
}

async fn read_file(path: &Path) -> DataResult<String> {
    debug!("Reading data from file: {}", path.display());

    tokio::fs::read_to_string(path).await.map_err(|e| {
        DataError::load_failed(path.display().to_string(), "Failed to read file", e)
    })
}
