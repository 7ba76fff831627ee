mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};

/// Downloads `url` and returns the response body, failing on non-2xx status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse().with_context(|| format!("Invalid source URL `{url}`"))?,
    );

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads the sales CSV from a local path or fetches it over HTTP.
#[tracing::instrument(fields(source = %source))]
pub async fn load_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(source) {
        let client = BasicClient::new();
        fetch_bytes(&client, source)
            .await
            .with_context(|| format!("Failed to fetch `{source}`"))?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("Failed to read `{source}`"))?
    };
    tracing::debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}
