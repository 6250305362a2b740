//! Downloads listing and archive bodies from the GSOD server.

use std::io::Read;

use anyhow::{Context, Error, Result};
use async_trait::async_trait;
use flate2::read::MultiGzDecoder;
use futures::StreamExt;
use tracing::debug;

use crate::error::GsodError;

/// Fetches the body at a URL. Implementations may serve it from a cache.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl<T: Fetch + ?Sized> Fetch for &T {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        (**self).fetch(url).await
    }
}

/// Fetches straight from the network.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        HttpFetcher {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Downloading {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download `{}`", url))?;

        if !response.status().is_success() {
            return Err(GsodError::HttpStatus {
                url: url.to_string(),
                status: response.status(),
            }
            .into());
        }

        let mut body = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| Error::msg(format!("Error reading chunk: {}", e)))?;
            body.extend_from_slice(&chunk);
        }

        debug!("Downloaded {} bytes from {}", body.len(), url);

        Ok(body)
    }
}

/// Decompresses a gzip body fetched from `url`, reading every concatenated member.
pub fn gunzip(url: &str, bytes: &[u8]) -> Result<Vec<u8>, GsodError> {
    let mut decoder = MultiGzDecoder::new(bytes);
    let mut content = Vec::new();

    decoder
        .read_to_end(&mut content)
        .map_err(|source| GsodError::Decompress {
            url: url.to_string(),
            source,
        })?;

    Ok(content)
}


// -- Tests -------------------------------------------------------------------
