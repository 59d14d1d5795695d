//! File logging
//!
//! The terminal belongs to the TUI, so log lines go to `motmele.log` in the
//! data directory. The filter is read from `MOTMELE_LOG` (default `info`).

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "motmele.log";
pub const LOG_ENV: &str = "MOTMELE_LOG";

/// Install the global subscriber. Returns the log file path.
pub fn init(dir: &Path) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (tests); keep the first one
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data");
        let path = init(&nested).unwrap();
        assert_eq!(path, nested.join(LOG_FILE));
        assert!(path.exists());
    }
}
