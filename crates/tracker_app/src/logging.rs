//! Logger setup for the job tracker shell.
//!
//! The prompt shares the terminal with anything logged there, so the shell
//! logs to `./tracker.log` unless `--log terminal` or `--log both` is given.

use std::fs::File;
use std::path::Path;

use clap::ValueEnum;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./tracker.log";

/// Value of the `--log` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogDestination {
    /// `./tracker.log`, truncated at every start.
    #[default]
    File,
    /// Interleaved with shell output; errors go to stderr.
    Terminal,
    /// Terminal and `./tracker.log`.
    Both,
}

impl LogDestination {
    fn to_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }

    fn to_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }
}

/// Installs the global logger. If the log file cannot be created the shell
/// runs on with whatever destinations remain, possibly none.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if destination.to_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if destination.to_file() {
        if let Some(file_logger) = file_logger(Path::new(LOG_FILE), level, config) {
            loggers.push(file_logger);
        }
    }

    if loggers.is_empty() {
        return;
    }
    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn file_logger(path: &Path, level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: logging disabled, cannot create {}: {}", path.display(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destinations_select_sinks() {
        assert!(LogDestination::File.to_file());
        assert!(!LogDestination::File.to_terminal());
        assert!(LogDestination::Terminal.to_terminal());
        assert!(!LogDestination::Terminal.to_file());
        assert!(LogDestination::Both.to_file() && LogDestination::Both.to_terminal());
    }

    #[test]
    fn unwritable_log_path_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("tracker.log");
        assert!(file_logger(&missing, LevelFilter::Info, build_config()).is_none());
    }
}
