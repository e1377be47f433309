// piiscrub/src/logger.rs
//! Logger setup for the CLI.

use log::LevelFilter;

/// Initializes `env_logger` once.
///
/// `RUST_LOG` is honoured (default `warn`) unless `level` forces a filter.
/// Repeated calls are ignored, which keeps tests that share a process happy.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).try_init().ok();
}
