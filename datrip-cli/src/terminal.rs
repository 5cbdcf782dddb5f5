use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Initializes terminal logging on stderr. Verbosity maps onto log
/// levels, with per-track summaries visible at the default level;
/// `quiet` drops everything below errors.
pub fn init_logging(verbosity: u8, quiet: bool) {
    let filter = if quiet {
        LevelFilter::Error
    } else {
        match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    let config = ConfigBuilder::new()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Trace)
        .set_time_level(LevelFilter::Off)
        .build();
    TermLogger::init(filter, config, TerminalMode::Stderr, ColorChoice::Auto)
        .expect("failed to set global logger");
}
