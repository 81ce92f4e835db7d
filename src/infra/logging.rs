//! # Logging Module / 日志模块
//!
//! Diagnostics are emitted with `tracing` and written to stderr. Progress and
//! the result summary go to stdout separately, so stderr carries only the
//! problems encountered during a run.
//!
//! 诊断信息通过 `tracing` 输出到 stderr；进度和结果摘要单独输出到 stdout。

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "JUNIT_DIFF_LOG";

/// Installs the global subscriber. Calling it twice is harmless.
///
/// The filter is taken from `JUNIT_DIFF_LOG`, then `RUST_LOG`, and otherwise
/// defaults to `warn`, or `debug` when `verbose` is set.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}
