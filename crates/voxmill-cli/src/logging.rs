//! Logger setup.

/// Default log filter for a `-v` count.
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Initializes `env_logger`. `RUST_LOG` takes precedence over `verbosity`.
pub fn init(verbosity: u8) {
    let env = env_logger::Env::default().default_filter_or(default_filter(verbosity));
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
