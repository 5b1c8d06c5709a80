//! Logging configuration.
//!
//! The debug switch is an explicit value handed to the event at construction
//! and to [`init`]; there is no process-wide toggle.

use tracing_subscriber::EnvFilter;

/// How the event and its subscriber should log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Emit per-entry diagnostics at info level and lower the default filter to debug.
    pub debug: bool,
    /// Format log lines as JSON.
    pub json: bool,
}

impl LoggingConfig {
    pub fn debug() -> Self {
        Self {
            debug: true,
            ..Self::default()
        }
    }

    /// Default filter directive when `RUST_LOG` is not set.
    pub fn default_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

/// Install a global fmt subscriber for binaries.
///
/// `RUST_LOG` takes precedence over the configured default level.
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_target(false)
        .with_writer(std::io::stderr);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(LoggingConfig::default().default_directive(), "info");
        assert_eq!(LoggingConfig::debug().default_directive(), "debug");
    }
}
