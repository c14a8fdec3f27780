pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod locator;
pub mod modes;
pub mod output;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, Mode, OutputArg};
pub use config::{CliOverrides, Config, HttpConfig, ItemErrorPolicy, OutputConfig, UrlConfig};
pub use error::{Result, ScrapeError, UserFriendlyError};

// Core functionality re-exports
pub use fetcher::{Response, ResponseCache, Session};
pub use locator::{find_all_tags, find_tag, TagFilter};
pub use output::{control_output, OutputTarget, ResultSet};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use modes::ModeContext;
use std::path::Path;

/// Main library interface: one instance per invocation, holding the
/// resolved configuration and the console plumbing.
pub struct PyScrape {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl PyScrape {
    /// Create a new instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Create a new instance for testing (no signal handler conflicts)
    #[cfg(test)]
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);
        let shutdown = GracefulShutdown::new_for_test();

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    /// Create an instance from parsed CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = if console::Term::stdout().features().is_attended() {
            OutputMode::Human
        } else {
            OutputMode::Plain
        };

        Self::new(config, output_mode, cli_args.verbosity_level(), cli_args.quiet)
    }

    /// Run one scraping mode and dispatch its results to `target`.
    /// The completion marker is logged whether the run succeeded or not.
    pub fn run(&self, mode: Mode, target: OutputTarget) -> Result<()> {
        let outcome = self.execute(mode, target);
        self.output_formatter.start_operation("Scraper finished");
        outcome
    }

    fn execute(&self, mode: Mode, target: OutputTarget) -> Result<()> {
        self.shutdown.check_shutdown()?;

        self.output_formatter.start_operation("Scraper started");
        self.output_formatter
            .debug(&format!("Command-line mode: {}", mode));

        let session = self.build_session()?;
        let ctx = ModeContext {
            session: &session,
            config: &self.config,
            formatter: &self.output_formatter,
            progress: &self.progress_manager,
            shutdown: &self.shutdown,
        };

        if let Some(results) = modes::run_mode(mode, &ctx)? {
            control_output(
                &results,
                target,
                mode.label(),
                &self.config.results_directory(),
                &self.output_formatter,
            )?;
        }

        Ok(())
    }

    /// Delete every cached response body.
    pub fn clear_cache(&self) -> Result<()> {
        let session = self.build_session()?;
        session.clear_cache()?;
        self.output_formatter.info("Response cache cleared");
        Ok(())
    }

    fn build_session(&self) -> Result<Session> {
        Session::new(&self.config.http, self.config.cache_directory())
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(ScrapeError::Io)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Check if shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Request graceful shutdown
    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &ScrapeError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_instance_creation() {
        let config = Config::default();
        let app = PyScrape::new_for_test(config, OutputMode::Human, 1, false);
        assert!(app.is_running());
        assert_eq!(
            app.config().urls.docs_base,
            "https://docs.python.org/3/"
        );
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        PyScrape::generate_sample_config(&config_path).unwrap();
        assert!(config_path.exists());

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[urls]"));
        assert!(content.contains("[http]"));
        assert!(content.contains("[output]"));
    }

    #[test]
    fn test_shutdown_handling() {
        let config = Config::default();
        let app = PyScrape::new_for_test(config, OutputMode::Human, 0, true);

        assert!(app.is_running());
        app.request_shutdown();
        assert!(!app.is_running());
    }

    #[test]
    fn test_version_info() {
        assert!(!version_info().is_empty());
    }
}
