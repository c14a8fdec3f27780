use crate::error::{ScrapeError, UserFriendlyError};
use console::{style, Emoji, Term};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");

/// Console log sink: run markers, saved-file notices, per-item skip
/// warnings. Result tables themselves go through the output dispatcher,
/// not here.
pub struct OutputFormatter {
    #[allow(dead_code)]
    term: Term,
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported() && !quiet,
            OutputMode::Plain => false,
        };

        Self {
            term,
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    /// Warnings are shown even at verbosity 0: a skipped item changes
    /// the meaning of the result table.
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Warning, message),
            OutputMode::Plain => println!("WARNING: {}", message),
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}{}", ROCKET, style(operation).bold());
                } else {
                    println!("> {}", operation);
                }
            }
            OutputMode::Plain => println!("STARTING: {}", operation),
        }
    }

    pub fn print_user_friendly_error(&self, error: &ScrapeError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    println!();
                    if self.use_colors {
                        println!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        println!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Plain => {
                    println!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}
