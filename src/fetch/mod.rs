//! Retrieval of the raw CSV payload from a URL or a local file.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use crate::error::DataUnavailable;
use tracing::debug;

/// GETs `url` and returns the body. Non-2xx responses are errors.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>, DataUnavailable> {
    let parsed = reqwest::Url::parse(url).map_err(|e| DataUnavailable::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client
        .execute(req)
        .await
        .map_err(|source| DataUnavailable::Request {
            url: url.to_string(),
            source,
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(DataUnavailable::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = resp.bytes().await.map_err(|source| DataUnavailable::Request {
        url: url.to_string(),
        source,
    })?;
    debug!(url, bytes = bytes.len(), "Dataset payload received");
    Ok(bytes.to_vec())
}

/// Returns true when `source` should be fetched over HTTP rather than read
/// from disk.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads the payload from a local file path or fetches it over HTTP.
#[tracing::instrument(skip_all, fields(source = %source))]
pub async fn read_source(source: &str) -> Result<Vec<u8>, DataUnavailable> {
    if is_remote(source) {
        let client = BasicClient::new().map_err(|source_err| DataUnavailable::Request {
            url: source.to_string(),
            source: source_err,
        })?;
        fetch_bytes(&client, source).await
    } else {
        tokio::fs::read(source)
            .await
            .map_err(|e| DataUnavailable::Io {
                path: source.to_string(),
                source: e,
            })
    }
}
