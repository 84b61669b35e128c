use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Logger utility for the application
pub struct Logger;

impl Logger {
    /// Initialize the logger with default configuration
    pub fn init() {
        Self::init_with_level(Level::INFO)
    }

    /// Initialize the logger with specified level
    pub fn init_with_level(level: Level) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", level)));

        fmt().with_env_filter(filter).with_target(false).init();
    }
}
