//! Global logging configuration
use env_logger::Builder;
use log::LevelFilter;
use std::sync::atomic::{AtomicBool, Ordering};

static ENABLE_LOG: AtomicBool = AtomicBool::new(true);

/// Set `log_info!` output enabled
pub fn set_log(enabled: bool) {
  ENABLE_LOG.store(enabled, Ordering::Relaxed);
}

/// Check if `log_info!` output is enabled, default is true
pub fn is_log_enabled() -> bool {
  ENABLE_LOG.load(Ordering::Relaxed)
}

/// Install the env_logger backend. `info` by default, `warn` when quiet,
/// `RUST_LOG` overrides both. Later calls only update the quiet flag.
pub fn init_log(quiet: bool) {
  set_log(!quiet);
  let level = if quiet { LevelFilter::Warn } else { LevelFilter::Info };
  let _ = Builder::new()
    .filter_level(level)
    .parse_default_env()
    .format_timestamp(None)
    .try_init();
}

/// Print a log message with blue [Log] prefix
#[macro_export]
macro_rules! log_info {
  ($($arg:tt)*) => {
    if $crate::simulator::utils::log::is_log_enabled() {
      println!("\x1b[34m[Log]\x1b[0m {}", format!($($arg)*));
    }
  };
}
