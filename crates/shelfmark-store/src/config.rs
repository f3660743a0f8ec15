use anyhow::{bail, Context};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::remote::RemoteStrategy;
use crate::storage::FileStorage;
use crate::store::LibraryStore;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Backend base URL; `None` runs in local-only mode
    pub api_url: Option<Url>,
    /// Directory holding the local library file
    pub data_dir: PathBuf,
    /// Per-request timeout for backend calls
    pub http_timeout: Duration,
}

impl StoreConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_url = match lookup("SHELFMARK_API_URL") {
            Some(raw) if !raw.trim().is_empty() => {
                let url = Url::parse(raw.trim())
                    .with_context(|| format!("SHELFMARK_API_URL is not a valid URL: {}", raw))?;
                if !matches!(url.scheme(), "http" | "https") {
                    bail!("SHELFMARK_API_URL must use http or https, got {}", url.scheme());
                }
                Some(url)
            }
            _ => None,
        };

        let data_dir = match lookup("SHELFMARK_DATA_DIR") {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => FileStorage::default_location()
                .map(|storage| storage.base().to_path_buf())
                .context("no platform data directory; set SHELFMARK_DATA_DIR")?,
        };

        let http_timeout = lookup("SHELFMARK_HTTP_TIMEOUT_SECS")
            .map(|secs| secs.trim().parse::<u64>())
            .transpose()
            .context("SHELFMARK_HTTP_TIMEOUT_SECS must be a whole number of seconds")?
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Ok(Self {
            api_url,
            data_dir,
            http_timeout: Duration::from_secs(http_timeout),
        })
    }

    /// Build a file-backed store, wired to the backend when one is configured
    pub fn build_store(&self) -> anyhow::Result<LibraryStore<FileStorage>> {
        let storage = FileStorage::new(&self.data_dir);
        let remote = self
            .api_url
            .clone()
            .map(|url| RemoteStrategy::new(url, self.http_timeout))
            .transpose()
            .context("failed to build HTTP client")?;
        Ok(LibraryStore::new(storage, remote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_local_only_when_url_unset() {
        let config = StoreConfig::from_vars(vars(&[("SHELFMARK_DATA_DIR", "/tmp/shelf")])).unwrap();
        assert!(config.api_url.is_none());
        assert_eq!(config.data_dir, PathBuf::from("/tmp/shelf"));
        assert_eq!(config.http_timeout, Duration::from_secs(10));

        let config = StoreConfig::from_vars(vars(&[
            ("SHELFMARK_API_URL", "  "),
            ("SHELFMARK_DATA_DIR", "/tmp/shelf"),
        ]))
        .unwrap();
        assert!(config.api_url.is_none());
        assert!(!config.build_store().unwrap().is_remote());
    }

    #[test]
    fn test_remote_url_and_timeout() {
        let config = StoreConfig::from_vars(vars(&[
            ("SHELFMARK_API_URL", "http://localhost:8000"),
            ("SHELFMARK_DATA_DIR", "/tmp/shelf"),
            ("SHELFMARK_HTTP_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.api_url.as_ref().map(Url::as_str), Some("http://localhost:8000/"));
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert!(config.build_store().unwrap().is_remote());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(StoreConfig::from_vars(vars(&[
            ("SHELFMARK_API_URL", "ftp://example.com"),
            ("SHELFMARK_DATA_DIR", "/tmp/shelf"),
        ]))
        .is_err());
        assert!(StoreConfig::from_vars(vars(&[
            ("SHELFMARK_API_URL", "not a url"),
            ("SHELFMARK_DATA_DIR", "/tmp/shelf"),
        ]))
        .is_err());
        assert!(StoreConfig::from_vars(vars(&[
            ("SHELFMARK_DATA_DIR", "/tmp/shelf"),
            ("SHELFMARK_HTTP_TIMEOUT_SECS", "soon"),
        ]))
        .is_err());
    }
}
