use anyhow::{anyhow, Result};
use futures::StreamExt;
use once_cell::sync::Lazy;
use reqwest::Client;
use tracing::{info, warn};

// Shared HTTP client with a 30s timeout
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("Failed to create HTTP client")
});

/// Downloads a remote file fully into memory, streaming the body.
/// Transport failures and non-success HTTP statuses are both reported as
/// download errors; there is no retry.
///
/// The URL comes straight from the client request and no scheme/host
/// allowlist is applied (see DESIGN.md, security backlog).
pub async fn download(url: &str) -> Result<Vec<u8>> {
    let parsed = url::Url::parse(url).map_err(|e| anyhow!("invalid URL: {}", e))?;

    info!(target: "fetch", url = %parsed, "Starting HTTP download");

    let response = HTTP_CLIENT
        .get(parsed.as_str())
        .send()
        .await
        .map_err(|e| {
            warn!(target: "fetch", url = %parsed, "HTTP transport error: {}", e);
            anyhow!("network error: {}", e)
        })?;

    if !response.status().is_success() {
        let status = response.status();
        warn!(target: "fetch", url = %parsed, status = status.as_u16(), "HTTP non-success status");
        return Err(anyhow!(
            "HTTP error {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error")
        ));
    }

    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            warn!(target: "fetch", url = %parsed, "Body read failed: {}", e);
            anyhow!("failed to read response body: {}", e)
        })?;
        body.extend_from_slice(&chunk);
    }

    info!(target: "fetch", url = %parsed, size = body.len(), "Download completed");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::download;

    #[tokio::test]
    async fn rejects_malformed_url() {
        let err = download("not a url").await.expect_err("error expected");
        assert!(err.to_string().starts_with("invalid URL:"));
    }

    #[tokio::test]
    async fn reports_connection_failure_as_network_error() {
        // Port 1 on loopback is assumed closed; connect is refused immediately.
        let err = download("http://127.0.0.1:1/extrato.pdf")
            .await
            .expect_err("error expected");
        assert!(err.to_string().starts_with("network error:"));
    }
}
