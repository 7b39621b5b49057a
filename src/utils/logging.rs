//! Logging setup.

use env_logger::Env;
use std::io::Write;

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "warn";

/// Installs `env_logger` with the `[LEVEL] message` line format.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_from_env() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .try_init();
}
