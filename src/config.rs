use crate::error::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub urls: UrlConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UrlConfig {
    /// Base of the versioned documentation, e.g. `https://docs.python.org/3/`.
    pub docs_base: String,
    /// Base of the PEP index, e.g. `https://peps.python.org/`.
    pub peps_base: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Client-level request timeout in seconds.
    pub timeout: u64,
    pub user_agent: String,
    pub use_cache: bool,
    pub cache_dir: PathBuf,
    pub on_item_error: ItemErrorPolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Results and downloads directories live under this.
    pub base_directory: PathBuf,
    pub results_dir: String,
    pub downloads_dir: String,
}

/// What to do when a single listed item fails while the rest of the run
/// could still proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ItemErrorPolicy {
    /// Log a warning and continue with the next item.
    Skip,
    /// Fail the whole run on the first item error.
    Abort,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            urls: UrlConfig::default(),
            http: HttpConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            docs_base: "https://docs.python.org/3/".to_string(),
            peps_base: "https://peps.python.org/".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: format!("pyscrape/{}", env!("CARGO_PKG_VERSION")),
            use_cache: true,
            cache_dir: PathBuf::from(".pyscrape_cache"),
            on_item_error: ItemErrorPolicy::Skip,
        }
    }
}

impl HttpConfig {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_directory: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            results_dir: "results".to_string(),
            downloads_dir: "downloads".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ScrapeError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ScrapeError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ScrapeError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["pyscrape.toml", "pyscrape.config.toml", ".pyscrape.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref base_directory) = cli_args.base_directory {
            self.output.base_directory = base_directory.clone();
        }

        if let Some(ref results_dir) = cli_args.results_dir {
            self.output.results_dir = results_dir.clone();
        }

        if let Some(timeout) = cli_args.timeout {
            self.http.timeout = timeout;
        }

        if let Some(policy) = cli_args.on_item_error {
            self.http.on_item_error = policy;
        }

        if cli_args.no_cache {
            self.http.use_cache = false;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ScrapeError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ScrapeError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for base in [&self.urls.docs_base, &self.urls.peps_base] {
            let parsed = Url::parse(base).map_err(|_| ScrapeError::InvalidUrl {
                url: base.clone(),
            })?;

            // Relative joins drop the last path segment unless the base
            // ends with a slash.
            if !parsed.path().ends_with('/') {
                return Err(ScrapeError::InvalidUrl { url: base.clone() });
            }
        }

        if self.http.timeout == 0 {
            return Err(ScrapeError::Config {
                message: "HTTP timeout must be greater than 0".to_string(),
            });
        }

        if self.output.results_dir.is_empty() || self.output.downloads_dir.is_empty() {
            return Err(ScrapeError::Config {
                message: "Results and downloads directory names must be non-empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn results_directory(&self) -> PathBuf {
        self.output.base_directory.join(&self.output.results_dir)
    }

    pub fn downloads_directory(&self) -> PathBuf {
        self.output.base_directory.join(&self.output.downloads_dir)
    }

    pub fn cache_directory(&self) -> PathBuf {
        if self.http.cache_dir.is_absolute() {
            self.http.cache_dir.clone()
        } else {
            self.output.base_directory.join(&self.http.cache_dir)
        }
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub base_directory: Option<PathBuf>,
    pub results_dir: Option<String>,
    pub timeout: Option<u64>,
    pub on_item_error: Option<ItemErrorPolicy>,
    pub no_cache: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_directory(mut self, base_directory: Option<PathBuf>) -> Self {
        self.base_directory = base_directory;
        self
    }

    pub fn with_results_dir(mut self, results_dir: Option<String>) -> Self {
        self.results_dir = results_dir;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<u64>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_on_item_error(mut self, policy: Option<ItemErrorPolicy>) -> Self {
        self.on_item_error = policy;
        self
    }

    pub fn with_no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }
}
