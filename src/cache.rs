//! Named offline cache for the arcade's static assets. `install` stores the
//! fixed asset list; `respond` serves a stored copy or falls back to the
//! network without storing the result.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::CacheConfig;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("no cache directory available on this platform")]
    NoCacheDir,
}

/// Retrieves a resource by request path.
pub trait Fetch {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, CacheError>;
}

pub struct HttpFetcher {
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, CacheError> {
        let url = self.url(path);
        let fail = |reason: String| CacheError::Fetch {
            url: url.clone(),
            reason,
        };
        let response = ureq::get(&url).call().map_err(|e| fail(e.to_string()))?;
        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| fail(e.to_string()))?;
        Ok(body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Network,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub body: Vec<u8>,
    pub source: Source,
}

pub struct OfflineCache<F: Fetch> {
    root: PathBuf,
    assets: Vec<String>,
    fetcher: F,
}

impl<F: Fetch> OfflineCache<F> {
    /// Opens the cache named in `config`, under `config.dir` or the platform
    /// cache directory.
    pub fn open(config: &CacheConfig, fetcher: F) -> Result<Self, CacheError> {
        let base = match &config.dir {
            Some(dir) => dir.clone(),
            None => dirs::cache_dir()
                .ok_or(CacheError::NoCacheDir)?
                .join("retroarcade"),
        };
        Ok(Self::at(base.join(&config.name), config.assets.clone(), fetcher))
    }

    pub fn at(root: PathBuf, assets: Vec<String>, fetcher: F) -> Self {
        Self {
            root,
            assets,
            fetcher,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, path: &str) -> PathBuf {
        self.root.join(urlencoding::encode(path).as_ref())
    }

    /// Fetches every asset, then stores them. Nothing is written unless all
    /// fetches succeed.
    pub fn install(&self) -> Result<usize, CacheError> {
        let mut fetched = Vec::with_capacity(self.assets.len());
        for asset in &self.assets {
            fetched.push((asset, self.fetcher.fetch(asset)?));
        }
        fs::create_dir_all(&self.root).map_err(|source| CacheError::Io {
            path: self.root.clone(),
            source,
        })?;
        for (asset, body) in &fetched {
            let path = self.entry_path(asset);
            fs::write(&path, body).map_err(|source| CacheError::Io { path, source })?;
            log::debug!("cached {} ({} bytes)", asset, body.len());
        }
        log::info!(
            "installed {} assets into {}",
            fetched.len(),
            self.root.display()
        );
        Ok(fetched.len())
    }

    /// Serves `path` from the cache when stored, otherwise fetches it live.
    pub fn respond(&self, path: &str) -> Result<Resource, CacheError> {
        let entry = self.entry_path(path);
        match fs::read(&entry) {
            Ok(body) => Ok(Resource {
                body,
                source: Source::Cache,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("cache miss for {}", path);
                Ok(Resource {
                    body: self.fetcher.fetch(path)?,
                    source: Source::Network,
                })
            }
            Err(source) => Err(CacheError::Io {
                path: entry,
                source,
            }),
        }
    }

    /// Request paths currently stored, sorted.
    pub fn list(&self) -> Result<Vec<String>, CacheError> {
        let dir = match fs::read_dir(&self.root) {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.root.clone(),
                    source,
                })
            }
        };
        let mut paths = Vec::new();
        for entry in dir {
            let entry = entry.map_err(|source| CacheError::Io {
                path: self.root.clone(),
                source,
            })?;
            let name = entry.file_name();
            if let Ok(decoded) = urlencoding::decode(&name.to_string_lossy()) {
                paths.push(decoded.into_owned());
            }
        }
        paths.sort();
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct FakeFetcher {
        pages: HashMap<String, Vec<u8>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
                    .collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Fetch for &FakeFetcher {
        fn fetch(&self, path: &str) -> Result<Vec<u8>, CacheError> {
            self.calls.borrow_mut().push(path.to_string());
            self.pages.get(path).cloned().ok_or_else(|| CacheError::Fetch {
                url: path.to_string(),
                reason: "404".to_string(),
            })
        }
    }

    fn assets() -> Vec<String> {
        vec!["/".to_string(), "/static/style.css".to_string()]
    }

    #[test]
    fn test_install_then_serve_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FakeFetcher::new(&[("/", "<html>"), ("/static/style.css", "body{}")]);
        let cache = OfflineCache::at(dir.path().join("retrogm-cache-v1"), assets(), &fetcher);

        assert_eq!(cache.install().unwrap(), 2);
        assert_eq!(cache.list().unwrap(), vec!["/", "/static/style.css"]);

        fetcher.calls.borrow_mut().clear();
        let res = cache.respond("/static/style.css").unwrap();
        assert_eq!(res.source, Source::Cache);
        assert_eq!(res.body, b"body{}");
        assert!(fetcher.calls.borrow().is_empty());
    }

    #[test]
    fn test_miss_falls_through_without_storing() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FakeFetcher::new(&[("/play/stack", "stack")]);
        let cache = OfflineCache::at(dir.path().to_path_buf(), assets(), &fetcher);

        let res = cache.respond("/play/stack").unwrap();
        assert_eq!(res.source, Source::Network);
        assert_eq!(res.body, b"stack");
        assert!(cache.list().unwrap().is_empty());

        assert!(matches!(
            cache.respond("/missing"),
            Err(CacheError::Fetch { .. })
        ));
    }

    #[test]
    fn test_failed_install_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FakeFetcher::new(&[("/", "<html>")]);
        let cache = OfflineCache::at(dir.path().join("c"), assets(), &fetcher);
        assert!(cache.install().is_err());
        assert!(!cache.root().exists());
        assert!(cache.list().unwrap().is_empty());
    }

    #[test]
    fn test_open_uses_configured_dir_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            dir: Some(dir.path().to_path_buf()),
            ..CacheConfig::default()
        };
        let fetcher = FakeFetcher::new(&[]);
        let cache = OfflineCache::open(&config, &fetcher).unwrap();
        assert_eq!(cache.root(), dir.path().join("retrogm-cache-v1"));
    }

    #[test]
    fn test_http_fetcher_against_loopback() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let handle = std::thread::spawn(move || {
            let request = server.recv().unwrap();
            let path = request.url().to_string();
            request
                .respond(tiny_http::Response::from_string("h1{color:red}"))
                .unwrap();
            path
        });

        let fetcher = HttpFetcher::new(&format!("http://127.0.0.1:{}/", port));
        let body = fetcher.fetch("/static/style.css").unwrap();
        assert_eq!(body, b"h1{color:red}");
        assert_eq!(handle.join().unwrap(), "/static/style.css");
    }
}
