use log::LevelFilter;
use simple_logger::SimpleLogger;

/// Pick the log level from the global flags; quiet wins over debug
pub fn level_for(debug: bool, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initialize logging with the level chosen by the global flags
pub fn init_logging(debug: bool, quiet: bool) -> LevelFilter {
    let log_level = level_for(debug, quiet);

    // A logger may already be installed when running under a test harness
    let _ = SimpleLogger::new()
        .with_level(log_level)
        .init();

    log_level
}
