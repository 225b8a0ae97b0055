//! File logging. The terminal belongs to the TUI, so nothing is ever written
//! to stdout or stderr once it starts.
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config;

pub const LOG_ENV: &str = "STAGECRAFT_LOG";
const LOG_FILE: &str = "stagecraft.log";

/// Filter from `STAGECRAFT_LOG` when set, else the configured level.
/// An unparsable filter falls back to `info`.
fn build_filter(configured: &str) -> EnvFilter {
    let directive = std::env::var(LOG_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| configured.to_string());
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Keep the returned guard alive for the
/// process lifetime; dropping it flushes and stops the writer.
///
/// Failures (unwritable state dir, subscriber already set) leave logging off.
pub fn init(level: &str) -> Option<WorkerGuard> {
    let dir = config::state_dir();
    if std::fs::create_dir_all(&dir).is_err() {
        return None;
    }
    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "stagecraft starting");
    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_directive_falls_back() {
        // Only meaningful when the env override is absent.
        if std::env::var(LOG_ENV).is_ok() {
            return;
        }
        assert_eq!(build_filter("debug").to_string(), "debug");
        assert_eq!(build_filter("stagecraft=bogus").to_string(), "info");
    }
}
