pub mod download;
pub mod latest_versions;
pub mod pep;
pub mod whats_new;

use crate::cli::Mode;
use crate::config::{Config, ItemErrorPolicy};
use crate::error::{Result, ScrapeError};
use crate::fetcher::Session;
use crate::output::ResultSet;
use crate::ui::{GracefulShutdown, OutputFormatter, ProgressManager};
use url::Url;

/// Everything a mode runner needs, passed by reference; nothing ambient.
pub struct ModeContext<'a> {
    pub session: &'a Session,
    pub config: &'a Config,
    pub formatter: &'a OutputFormatter,
    pub progress: &'a ProgressManager,
    pub shutdown: &'a GracefulShutdown,
}

impl ModeContext<'_> {
    /// Warn without garbling an active progress bar.
    pub fn warn(&self, message: &str) {
        self.progress.suspend(|| self.formatter.warning(message));
    }

    /// Apply the configured per-item policy. Markup and connection
    /// failures on one listed item are skippable; anything else, and
    /// everything under the Abort policy, fails the run.
    pub(crate) fn handle_item_error(&self, error: ScrapeError, item: &str) -> Result<()> {
        match &error {
            ScrapeError::ConnectionFailure { .. }
            | ScrapeError::TagNotFound { .. }
            | ScrapeError::ContentNotFound { .. } => match self.config.http.on_item_error {
                ItemErrorPolicy::Skip => {
                    self.warn(&format!("Skipping {}: {}", item, error));
                    Ok(())
                }
                ItemErrorPolicy::Abort => Err(error),
            },
            _ => Err(error),
        }
    }
}

/// Dispatch table as an exhaustive match over the closed mode set.
pub fn run_mode(mode: Mode, ctx: &ModeContext<'_>) -> Result<Option<ResultSet>> {
    match mode {
        Mode::WhatsNew => whats_new::run(ctx),
        Mode::LatestVersions => latest_versions::run(ctx),
        Mode::Download => download::run(ctx),
        Mode::Pep => pep::run(ctx),
    }
}

/// Resolve `relative` against `base` (absolute hrefs pass through).
pub(crate) fn join_url(base: &str, relative: &str) -> Result<String> {
    let joined = Url::parse(base)
        .and_then(|url| url.join(relative))
        .map_err(|_| ScrapeError::InvalidUrl {
            url: format!("{} joined with {}", base, relative),
        })?;
    Ok(joined.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::DEFAULT_ENCODING;
    use crate::ui::OutputMode;
    use tempfile::TempDir;

    fn context_parts(
        policy: ItemErrorPolicy,
        cache_dir: &std::path::Path,
    ) -> (Session, Config, OutputFormatter, ProgressManager, GracefulShutdown) {
        let mut config = Config::default();
        config.http.timeout = 2;
        config.http.use_cache = false;
        config.http.on_item_error = policy;

        let session = Session::new(&config.http, cache_dir.to_path_buf()).unwrap();
        let formatter = OutputFormatter::new(OutputMode::Plain, 0, true);
        let progress = ProgressManager::new(false);
        let shutdown = GracefulShutdown::new_for_test();
        (session, config, formatter, progress, shutdown)
    }

    fn markup_miss() -> ScrapeError {
        ScrapeError::TagNotFound {
            tag: "h1".to_string(),
            attrs: String::new(),
        }
    }

    #[test]
    fn test_skip_policy_swallows_item_errors() {
        let temp = TempDir::new().unwrap();
        let (session, config, formatter, progress, shutdown) =
            context_parts(ItemErrorPolicy::Skip, temp.path());
        let ctx = ModeContext {
            session: &session,
            config: &config,
            formatter: &formatter,
            progress: &progress,
            shutdown: &shutdown,
        };

        assert!(ctx.handle_item_error(markup_miss(), "page one").is_ok());

        // A real transport failure from the session, not a stand-in.
        let connection = session
            .get("http://127.0.0.1:1/", DEFAULT_ENCODING)
            .unwrap_err();
        assert!(matches!(connection, ScrapeError::ConnectionFailure { .. }));
        assert!(ctx.handle_item_error(connection, "page two").is_ok());

        let missing = ScrapeError::ContentNotFound {
            context: "anchor without href".to_string(),
        };
        assert!(ctx.handle_item_error(missing, "page three").is_ok());
    }

    #[test]
    fn test_abort_policy_propagates_item_errors() {
        let temp = TempDir::new().unwrap();
        let (session, config, formatter, progress, shutdown) =
            context_parts(ItemErrorPolicy::Abort, temp.path());
        let ctx = ModeContext {
            session: &session,
            config: &config,
            formatter: &formatter,
            progress: &progress,
            shutdown: &shutdown,
        };

        assert!(matches!(
            ctx.handle_item_error(markup_miss(), "page one"),
            Err(ScrapeError::TagNotFound { .. })
        ));
    }

    #[test]
    fn test_non_skippable_errors_are_fatal_under_skip() {
        let temp = TempDir::new().unwrap();
        let (session, config, formatter, progress, shutdown) =
            context_parts(ItemErrorPolicy::Skip, temp.path());
        let ctx = ModeContext {
            session: &session,
            config: &config,
            formatter: &formatter,
            progress: &progress,
            shutdown: &shutdown,
        };

        let unknown = ScrapeError::UnknownStatusCode {
            code: "X".to_string(),
        };
        assert!(matches!(
            ctx.handle_item_error(unknown, "index row"),
            Err(ScrapeError::UnknownStatusCode { .. })
        ));
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://docs.python.org/3/", "whatsnew/").unwrap(),
            "https://docs.python.org/3/whatsnew/"
        );
        assert_eq!(
            join_url("https://docs.python.org/3/whatsnew/", "3.12.html").unwrap(),
            "https://docs.python.org/3/whatsnew/3.12.html"
        );
        // Absolute hrefs replace the base entirely.
        assert_eq!(
            join_url("https://docs.python.org/3/", "https://peps.python.org/pep-0008/").unwrap(),
            "https://peps.python.org/pep-0008/"
        );
        assert!(join_url("not a url", "x").is_err());
    }
}
