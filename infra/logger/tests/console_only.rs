use finman_domain::config::LoggingConfig;
use finman_logger::Logger;

#[test]
fn default_config_logs_to_console_only() {
    let logger = Logger::from_config(&LoggingConfig::default()).expect("logger should initialize");

    tracing::info!("console only");
    assert!(logger.guard().is_none(), "console-only logger should not create a file guard");
}
