use crate::config::{CliOverrides, Config, ItemErrorPolicy};
use crate::error::Result;
use crate::output::OutputTarget;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pyscrape")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scrape python.org documentation and the PEP index")]
#[command(
    long_about = "PyScrape fetches pages from python.org and peps.python.org, extracts \
                      tabular data or the documentation archive, and renders results as \
                      console tables or timestamped CSV files."
)]
#[command(after_help = "EXAMPLES:\n  \
    pyscrape whats-new\n  \
    pyscrape latest-versions --output pretty\n  \
    pyscrape pep --output file --results-dir reports\n  \
    pyscrape download --clear-cache -v")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// What to scrape
    #[arg(value_enum)]
    pub mode: Option<Mode>,

    /// Where the result table goes (omit for plain stdout)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Directory that results/ and downloads/ are created under
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Name of the results directory for --output file
    #[arg(long)]
    pub results_dir: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// What to do when one listed item fails
    #[arg(long, value_enum)]
    pub error_policy: Option<ItemErrorPolicy>,

    /// Wipe the response cache before running
    #[arg(long)]
    pub clear_cache: bool,

    /// Disable the response cache for this run
    #[arg(long)]
    pub no_cache: bool,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate a sample configuration file and exit
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// New-feature articles for each Python release
    WhatsNew,
    /// Version and status listing from the docs sidebar
    LatestVersions,
    /// Download the PDF documentation archive
    Download,
    /// PEP status counts from the numerical index
    Pep,
}

impl Mode {
    /// Stable label used in CSV file names and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::WhatsNew => "whats-new",
            Mode::LatestVersions => "latest-versions",
            Mode::Download => "download",
            Mode::Pep => "pep",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// Aligned console table
    Pretty,
    /// Timestamped CSV in the results directory
    File,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_base_directory(self.base_dir.clone())
            .with_results_dir(self.results_dir.clone())
            .with_timeout(self.timeout)
            .with_on_item_error(self.error_policy)
            .with_no_cache(self.no_cache)
    }

    pub fn output_target(&self) -> OutputTarget {
        match self.output {
            None => OutputTarget::Default,
            Some(OutputArg::Pretty) => OutputTarget::Pretty,
            Some(OutputArg::File) => OutputTarget::File,
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_mode_parsing() {
        let cli = parse(&["pyscrape", "whats-new"]);
        assert_eq!(cli.mode, Some(Mode::WhatsNew));

        let cli = parse(&["pyscrape", "pep", "--output", "file"]);
        assert_eq!(cli.mode, Some(Mode::Pep));
        assert_eq!(cli.output_target(), OutputTarget::File);
    }

    #[test]
    fn test_invalid_mode_rejected() {
        assert!(Cli::try_parse_from(["pyscrape", "everything"]).is_err());
    }

    #[test]
    fn test_default_output_target() {
        let cli = parse(&["pyscrape", "latest-versions"]);
        assert_eq!(cli.output_target(), OutputTarget::Default);

        let cli = parse(&["pyscrape", "latest-versions", "-o", "pretty"]);
        assert_eq!(cli.output_target(), OutputTarget::Pretty);
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(Mode::WhatsNew.label(), "whats-new");
        assert_eq!(Mode::LatestVersions.label(), "latest-versions");
        assert_eq!(Mode::Download.label(), "download");
        assert_eq!(Mode::Pep.label(), "pep");
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["pyscrape", "pep", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_overrides_from_flags() {
        let cli = parse(&[
            "pyscrape",
            "pep",
            "--timeout",
            "10",
            "--error-policy",
            "abort",
            "--no-cache",
        ]);
        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.timeout, Some(10));
        assert_eq!(overrides.on_item_error, Some(ItemErrorPolicy::Abort));
        assert!(overrides.no_cache);
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = parse(&["pyscrape", "pep", "-vv"]);
        assert_eq!(cli.verbosity_level(), 2);
        assert!(cli.is_verbose());

        let cli = parse(&["pyscrape", "pep", "--quiet"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(!cli.is_verbose());
    }
}
