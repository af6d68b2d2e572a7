//! Logger initialization for the unload front-end.
//!
//! File output goes to `unload.log` inside the output directory.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use super::config::LogDestination;

pub const LOG_FILE_NAME: &str = "unload.log";

/// Initialize the global logger. Failing to create the log file degrades to
/// whatever other destination was requested.
pub fn initialize(destination: LogDestination, level: LevelFilter, output_dir: &Path) {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File => match create_file_logger(level, config, output_dir) {
            Some(file_logger) => vec![file_logger],
            None => return,
        },
        LogDestination::Terminal => vec![term_logger(level, config)],
        LogDestination::Both => {
            let mut loggers: Vec<Box<dyn SharedLogger>> = vec![term_logger(level, config.clone())];
            if let Some(file_logger) = create_file_logger(level, config, output_dir) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn term_logger(level: LevelFilter, config: Config) -> Box<TermLogger> {
    TermLogger::new(level, config, TerminalMode::Stderr, ColorChoice::Auto)
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    output_dir: &Path,
) -> Option<Box<WriteLogger<File>>> {
    if let Err(err) = unload_io::ensure_output_dir(output_dir) {
        eprintln!("Warning: {err}");
        return None;
    }
    let log_path = output_dir.join(LOG_FILE_NAME);
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}
