use clap::Parser;
use pyscrape::{Cli, OutputFormatter, OutputMode, PyScrape, ScrapeError, UserFriendlyError};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let app = match PyScrape::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return 2;
        }
    };

    if cli.clear_cache {
        if let Err(e) = app.clear_cache() {
            app.handle_error(&e);
            return exit_code_for(&e);
        }
        if cli.mode.is_none() {
            return 0;
        }
    }

    let mode = match cli.mode {
        Some(mode) => mode,
        None => {
            print_startup_error(&ScrapeError::Config {
                message: "no mode given; expected one of whats-new, latest-versions, download, pep"
                    .to_string(),
            });
            return 2;
        }
    };

    match app.run(mode, cli.output_target()) {
        Ok(()) => 0,
        Err(e) => {
            app.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

// Exit codes: 130 interrupted, 2 bad input/config, 5 network,
// 6 expected markup absent, 7 filesystem, 1 anything else.
fn exit_code_for(error: &ScrapeError) -> i32 {
    match error {
        ScrapeError::Cancelled => 130,
        ScrapeError::InvalidUrl { .. } | ScrapeError::Config { .. } => 2,
        ScrapeError::ConnectionFailure { .. } => 5,
        ScrapeError::TagNotFound { .. }
        | ScrapeError::ContentNotFound { .. }
        | ScrapeError::UnknownStatusCode { .. } => 6,
        ScrapeError::Io(_) => 7,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "pyscrape.toml".to_string());

    match PyScrape::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  pyscrape <mode> --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &ScrapeError) {
    // Create a basic formatter for startup errors
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
