use crate::config::HttpConfig;
use crate::error::{Result, ScrapeError};
use encoding_rs::{Encoding, UTF_8};
use reqwest::blocking::Client;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENCODING: &str = "utf-8";

/// HTTP resource handle for the whole run: one configured client plus an
/// optional persistent response cache. Built once at startup and passed
/// by reference into every fetch.
pub struct Session {
    client: Client,
    cache: Option<ResponseCache>,
}

impl Session {
    pub fn new(config: &HttpConfig, cache_dir: PathBuf) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ScrapeError::Config {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        let cache = config.use_cache.then(|| ResponseCache::new(cache_dir));

        Ok(Self { client, cache })
    }

    /// One GET attempt, no retry. The body is returned raw; `encoding`
    /// becomes the response's declared text encoding regardless of what
    /// the server said.
    pub fn get(&self, url: &str, encoding: &str) -> Result<Response> {
        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(url) {
                return Ok(Response {
                    url: url.to_string(),
                    body,
                    encoding: encoding.to_string(),
                    from_cache: true,
                });
            }
        }

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ScrapeError::ConnectionFailure {
                url: url.to_string(),
                source: e,
            })?;

        let body = response
            .bytes()
            .map_err(|e| ScrapeError::ConnectionFailure {
                url: url.to_string(),
                source: e,
            })?
            .to_vec();

        if let Some(cache) = &self.cache {
            // Best effort; a failed cache write must not fail the fetch.
            cache.put(url, &body).ok();
        }

        Ok(Response {
            url: url.to_string(),
            body,
            encoding: encoding.to_string(),
            from_cache: false,
        })
    }

    pub fn clear_cache(&self) -> Result<()> {
        if let Some(cache) = &self.cache {
            cache.clear()?;
        }
        Ok(())
    }

    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Response {
    url: String,
    body: Vec<u8>,
    encoding: String,
    from_cache: bool,
}

impl Response {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw body, for binary artifacts saved verbatim.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// The encoding the caller requested, which is what `text()` decodes with.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    /// Body decoded with the forced encoding. Unknown labels fall back
    /// to UTF-8; undecodable bytes become replacement characters.
    pub fn text(&self) -> Cow<'_, str> {
        let encoding = Encoding::for_label(self.encoding.as_bytes()).unwrap_or(UTF_8);
        let (text, _, _) = encoding.decode(&self.body);
        text
    }
}

/// Directory of cached response bodies, keyed by a hash of the URL.
/// Survives across runs until cleared.
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn directory(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        let key = blake3::hash(url.as_bytes()).to_hex();
        self.dir.join(format!("{}.body", key))
    }

    pub fn get(&self, url: &str) -> Option<Vec<u8>> {
        fs::read(self.entry_path(url)).ok()
    }

    pub fn put(&self, url: &str, body: &[u8]) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.entry_path(url), body)
    }

    pub fn clear(&self) -> std::io::Result<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }
}
