//! Tracing bootstrap.
//!
//! Installs a global fmt subscriber exactly once per process. Later calls
//! are no-ops so tests and binaries can both call `init`.

use std::str::FromStr;
use std::sync::OnceLock;
use tracing::Level;

static INITIALIZED: OnceLock<Level> = OnceLock::new();

/// Parse a configured level name (`trace`..`error`)
pub fn parse_level(level: &str) -> Result<Level, String> {
    Level::from_str(level.trim()).map_err(|_| format!("Unsupported log level: {}", level))
}

/// Initialize the global subscriber at `level`.
///
/// Returns the level actually in effect, which is the first one
/// requested if logging was already initialized.
pub fn init(level: &str) -> Result<Level, String> {
    let parsed = parse_level(level)?;
    let active = *INITIALIZED.get_or_init(|| {
        // Another subscriber (e.g. from a test harness) may already be set.
        let _ = tracing_subscriber::fmt()
            .with_max_level(parsed)
            .with_target(false)
            .try_init();
        parsed
    });
    Ok(active)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_level(" WARN ").unwrap(), Level::WARN);
        assert!(parse_level("verbose").is_err());
    }

    #[test]
    fn test_init_is_idempotent() {
        let first = init("info").unwrap();
        let second = init("trace").unwrap();
        assert_eq!(first, second);
    }
}
