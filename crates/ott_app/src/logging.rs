//! Logging initialization for ott_update.
//!
//! Lines go to the terminal and to `logs/update_YYYYMMDD.log`, opened in
//! append mode so reruns on the same day share one file.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use chrono::Local;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use ott_engine::{LOG_PREFIX, LOG_SUFFIX};

/// Install the combined terminal + file logger. A log file that cannot be
/// opened degrades to terminal-only with a warning, never an abort.
pub fn initialize(logs_dir: &Path) {
    let level = LevelFilter::Info;
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(file_logger) = create_file_logger(level, config, logs_dir) {
        loggers.push(file_logger);
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    logs_dir: &Path,
) -> Option<Box<WriteLogger<File>>> {
    if let Err(err) = fs::create_dir_all(logs_dir) {
        eprintln!("Warning: could not create log directory {:?}: {}", logs_dir, err);
        return None;
    }

    let log_path = logs_dir.join(format!(
        "{}{}{}",
        LOG_PREFIX,
        Local::now().format("%Y%m%d"),
        LOG_SUFFIX
    ));
    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: could not open log file {:?}: {}", log_path, err);
            None
        }
    }
}
