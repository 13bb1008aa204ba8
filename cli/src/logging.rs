//! Tracing / logging initialisation.
//!
//! Logs always go to stderr so `--json` output on stdout stays machine-readable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging options taken from the command line.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default filter directive: "trace" | "debug" | "info" | "warn" | "error",
    /// or any `EnvFilter` directive string. `RUST_LOG` takes precedence.
    pub level: String,
    /// Emit JSON structured logs (true) or human-readable text (false).
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

/// Build the filter: `RUST_LOG` if set and valid, else `config.level`, else `info`.
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialise tracing. Call once at startup.
pub fn init_tracing(config: &LogConfig) {
    let filter = env_filter(config);
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init();
    } else {
        tracing_subscriber::registry().with(filter).with(layer).init();
    }
}
