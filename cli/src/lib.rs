//! Shared plumbing for the arrkit binaries.

use tracing_subscriber::EnvFilter;

/// Initialize logging for a binary.
///
/// The filter comes from `RUST_LOG`, defaulting to warnings and up.
/// Output goes to stderr: `arrtoken` writes tokens on stdout and log lines
/// must never mix into that.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
