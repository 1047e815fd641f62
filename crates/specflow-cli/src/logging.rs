// Logging and verbosity control

use std::sync::atomic::{AtomicU8, Ordering};

use tracing::Level;

/// Global verbosity level
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Verbosity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    /// Quiet mode - errors only
    Quiet = 0,
    /// Normal mode - standard output
    Normal = 1,
    /// Verbose mode - detailed output
    Verbose = 2,
}

impl VerbosityLevel {
    /// Get the current verbosity level
    pub fn current() -> Self {
        match VERBOSITY.load(Ordering::Relaxed) {
            0 => VerbosityLevel::Quiet,
            1 => VerbosityLevel::Normal,
            _ => VerbosityLevel::Verbose,
        }
    }

    /// Set the verbosity level
    pub fn set(level: Self) {
        VERBOSITY.store(level as u8, Ordering::Relaxed);
    }

    /// Check if we should output at this level
    pub fn should_output(&self) -> bool {
        self <= &Self::current()
    }
}

/// Map a configured level name to a tracing level
pub fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Level the subscriber is installed with for the given flags
pub fn effective_level(verbose: bool, quiet: bool, configured: &str) -> Level {
    if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        // Tracing output is diagnostics; normal runs only surface warnings
        parse_level(configured).min(Level::WARN)
    }
}

/// Initialize verbosity and the tracing subscriber from CLI flags
///
/// Logs go to stderr so command output on stdout stays pipeable.
pub fn init_logging(verbose: bool, quiet: bool, configured: &str) {
    let level = if quiet {
        VerbosityLevel::Quiet
    } else if verbose {
        VerbosityLevel::Verbose
    } else {
        VerbosityLevel::Normal
    };
    VerbosityLevel::set(level);

    // A second init (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_max_level(effective_level(verbose, quiet, configured))
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        VerbosityLevel::set(VerbosityLevel::Normal);
        assert!(VerbosityLevel::Quiet.should_output());
        assert!(VerbosityLevel::Normal.should_output());
        assert!(!VerbosityLevel::Verbose.should_output());
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warning"), Level::WARN);
        assert_eq!(parse_level("nonsense"), Level::INFO);
    }

    #[test]
    fn test_effective_level() {
        assert_eq!(effective_level(false, true, "trace"), Level::ERROR);
        assert_eq!(effective_level(true, false, "error"), Level::DEBUG);
        assert_eq!(effective_level(false, false, "info"), Level::WARN);
        assert_eq!(effective_level(false, false, "error"), Level::ERROR);
    }
}
