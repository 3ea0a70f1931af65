//! Content-addressed download cache for article images.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use reqwest::blocking::Client;

use crate::assets::decode::decode_image;
use crate::foundation::digest::sha256_hex;
use crate::foundation::error::{HerodoError, HerodoResult};

/// Images keyed by the SHA-256 of their URL.
///
/// A file already on disk is trusted and returned without touching the network. Fresh downloads
/// are decoded before they are written, so the cache never holds a file the animator can't read.
#[derive(Clone, Debug)]
pub struct ImageCache {
    dir: PathBuf,
    client: Client,
    timeout: Duration,
}

impl ImageCache {
    pub fn new(dir: impl Into<PathBuf>, client: Client, timeout: Duration) -> Self {
        Self {
            dir: dir.into(),
            client,
            timeout,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `url` is (or would be) stored.
    pub fn cache_path(&self, url: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}", sha256_hex(url.as_bytes()), url_extension(url)))
    }

    /// Local path for `url`, downloading it on a cache miss.
    pub fn fetch(&self, url: &str) -> HerodoResult<PathBuf> {
        let path = self.cache_path(url);
        if path.is_file() {
            tracing::debug!(url, path = %path.display(), "image already cached");
            return Ok(path);
        }

        let bytes = self.download(url)?;
        decode_image(&bytes).map_err(|e| {
            HerodoError::research(format!("downloaded file from {url} is not an image: {e}"))
        })?;

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create image cache '{}'", self.dir.display()))?;
        std::fs::write(&path, &bytes)
            .with_context(|| format!("write cached image '{}'", path.display()))?;
        tracing::info!(url, path = %path.display(), "cached image");
        Ok(path)
    }

    /// Fetch every URL in order, logging and skipping the ones that fail.
    pub fn fetch_all(&self, urls: &[String]) -> (Vec<PathBuf>, Vec<(String, HerodoError)>) {
        let mut paths = Vec::with_capacity(urls.len());
        let mut failures = Vec::new();
        for url in urls {
            match self.fetch(url) {
                Ok(p) => paths.push(p),
                Err(e) => {
                    tracing::warn!(url = url.as_str(), error = %e, "failed to download image");
                    failures.push((url.clone(), e));
                }
            }
        }
        (paths, failures)
    }

    fn download(&self, url: &str) -> HerodoResult<Vec<u8>> {
        let res = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .map_err(|e| HerodoError::research(format!("GET {url}: {e}")))?;
        if !res.status().is_success() {
            return Err(HerodoError::research(format!(
                "GET {url}: status {}",
                res.status()
            )));
        }
        let bytes = res
            .bytes()
            .map_err(|e| HerodoError::research(format!("read body of {url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}

/// File extension of the URL path including the dot, `.jpg` when there is none.
pub(crate) fn url_extension(url: &str) -> String {
    let path = reqwest::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.split(['?', '#']).next().unwrap_or(url).to_string());
    match Path::new(&path).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            format!(".{ext}")
        }
        _ => ".jpg".to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/research/cache.rs"]
mod tests;
