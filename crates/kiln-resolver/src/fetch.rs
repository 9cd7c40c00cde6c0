//! Fetch backends for resolved locations

use crate::{ResolveError, ResolveResult};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Copies the artifact behind a resolved address to a local path.
///
/// Implementations must write the destination completely or not at all;
/// the resolver stages into a temp file and renames, so a failed fetch
/// never leaves a partial cache entry.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, address: &str, destination: &Path) -> ResolveResult<()>;
}

/// Blocking HTTP fetcher with a per-attempt timeout.
///
/// Addresses without an `http(s)` scheme are treated as local filesystem
/// paths (an optional `file:` prefix is stripped) and copied directly.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> ResolveResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ResolveError::FetchFailed {
                name: String::new(),
                address: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    fn fetch_http(&self, address: &str, destination: &Path) -> ResolveResult<()> {
        let failed = |reason: String| ResolveError::FetchFailed {
            name: String::new(),
            address: address.to_string(),
            reason,
        };
        let response = self
            .client
            .get(address)
            .send()
            .map_err(|e| failed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(failed(format!("status {}", response.status())));
        }
        let bytes = response.bytes().map_err(|e| failed(e.to_string()))?;
        fs::write(destination, &bytes)?;
        Ok(())
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, address: &str, destination: &Path) -> ResolveResult<()> {
        if address.starts_with("http://") || address.starts_with("https://") {
            return self.fetch_http(address, destination);
        }
        let path = address.strip_prefix("file:").unwrap_or(address);
        fs::copy(path, destination).map_err(|e| ResolveError::FetchFailed {
            name: String::new(),
            address: address.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
