//! Logger installation.
//!
//! Everything in the crate logs through the `log` facade. This installs the
//! backend: the browser console on WASM, `env_logger` (stderr) natively.

use crate::config::LogLevel;

/// Install the platform logger at `level`.
///
/// Safe to call more than once; later calls only adjust the level.
pub fn init(level: LogLevel) {
    let filter = level.to_level_filter();

    #[cfg(target_arch = "wasm32")]
    {
        let log_level = filter.to_level().unwrap_or(log::Level::Error);
        if console_log::init_with_level(log_level).is_err() {
            log::debug!("Logger already installed");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let result = env_logger::Builder::new()
            .filter_level(filter)
            .parse_default_env()
            .try_init();
        if result.is_err() {
            log::debug!("Logger already installed");
        }
    }

    log::set_max_level(filter);
}
