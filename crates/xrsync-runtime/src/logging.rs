//! Logging setup
//!
//! Library code only emits `tracing` events; binaries and test harnesses call
//! [`init_logging`] once to install a subscriber.

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter`. Safe to call more than once.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        init_logging("xrsync=debug");
        init_logging("xrsync=trace");
        tracing::debug!("logging initialised");
    }
}
