//! Logging setup
//!
//! Library code only uses the `log` macros; binaries call [`init`] or
//! [`init_with_default`] once at startup.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging, falling back to `default_filter` when `RUST_LOG` is unset
///
/// Calling this more than once keeps the first logger.
pub fn init_with_default(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}
