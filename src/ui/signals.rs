use crate::error::{Result, ScrapeError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Ctrl+C handling. An in-flight fetch is never interrupted; mode
/// runners call `check_shutdown` between items, so the run stops at the
/// next item boundary.
pub struct GracefulShutdown {
    running: Arc<AtomicBool>,
    shutdown_message_shown: Arc<AtomicBool>,
}

impl GracefulShutdown {
    pub fn new() -> Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let shutdown_message_shown = Arc::new(AtomicBool::new(false));

        let running_clone = running.clone();
        let message_shown_clone = shutdown_message_shown.clone();

        ctrlc::set_handler(move || {
            running_clone.store(false, Ordering::SeqCst);

            if !message_shown_clone.swap(true, Ordering::SeqCst) {
                eprintln!("\nStopping after the current page... (press Ctrl+C again to force exit)");
            } else {
                eprintln!("\nForce stopping...");
                std::process::exit(1);
            }
        })
        .map_err(|e| ScrapeError::Config {
            message: format!("Failed to set signal handler: {}", e),
        })?;

        Ok(Self {
            running,
            shutdown_message_shown,
        })
    }

    /// For tests: no signal handler registration.
    pub fn new_for_test() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            shutdown_message_shown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn check_shutdown(&self) -> Result<()> {
        if !self.is_running() {
            return Err(ScrapeError::Cancelled);
        }
        Ok(())
    }

    pub fn request_shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.running.store(true, Ordering::SeqCst);
        self.shutdown_message_shown.store(false, Ordering::SeqCst);
    }
}
