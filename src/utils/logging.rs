use crate::config::LoggingConfig;

/// Initialise env_logger once. `RUST_LOG` overrides the configured filter.
/// Repeated calls are ignored.
pub fn init(config: &LoggingConfig) {
    let env = env_logger::Env::default().default_filter_or(config.filter.as_str());
    if env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
        .is_err()
    {
        log::debug!("Logger already initialised");
    }
}
