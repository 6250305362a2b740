//! Disk-backed response cache keyed by URL.
//!
//! Bodies are stored forever; a URL once downloaded is never requested again
//! while the store exists. Delete the cache directory to force a refresh.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::Keyspace;
use tokio::task;
use tracing::debug;

use crate::{
    constants::{CACHE_DIR_NAME, CACHE_STORE_NAME},
    download::Fetch,
};

/// Wraps another fetcher, consulting the store before it and filling the store after it.
pub struct CachedFetcher<F> {
    inner: F,
    store: Keyspace,
}

impl<F: Fetch> CachedFetcher<F> {
    /// Opens (creating if needed) the store at `path`.
    pub fn open(inner: F, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create cache directory {}", path.display()))?;

        let db = fjall::Database::builder(path)
            .open()
            .with_context(|| format!("Failed to open cache at {}", path.display()))?;
        let store = db.keyspace("responses", fjall::KeyspaceCreateOptions::default)?;

        debug!("Response cache opened at {}", path.display());

        Ok(CachedFetcher { inner, store })
    }

    async fn lookup(&self, url: &str) -> Result<Option<Vec<u8>>> {
        let store = self.store.clone();
        let key = url.as_bytes().to_vec();

        let body = task::spawn_blocking(move || store.get(key)).await??;

        Ok(body.map(|v| v.to_vec()))
    }

    async fn remember(&self, url: &str, body: Vec<u8>) -> Result<()> {
        let store = self.store.clone();
        let key = url.as_bytes().to_vec();

        task::spawn_blocking(move || store.insert(key, body)).await??;

        Ok(())
    }
}

#[async_trait]
impl<F: Fetch> Fetch for CachedFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(body) = self.lookup(url).await? {
            debug!("Cache hit for {}", url);
            return Ok(body);
        }

        debug!("Cache miss for {}", url);
        let body = self.inner.fetch(url).await?;
        self.remember(url, body.clone()).await?;

        Ok(body)
    }
}

/// `~/.wx/cache`
pub fn default_cache_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine the home directory")?;

    Ok(home.join(CACHE_DIR_NAME).join(CACHE_STORE_NAME))
}

// -- Tests -------------------------------------------------------------------
