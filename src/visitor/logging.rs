use std::fs::OpenOptions;
use simplelog::{ColorChoice, TermLogger, TerminalMode, WriteLogger};
use crate::visitor::config::Config;
use crate::visitor::error::VisitorLogError;

/// Installs the global logger. Diagnostics go to the configured log file, or
/// to stderr so that stdout only carries the prompt and the result line.
pub fn init(cfg: &Config) -> Result<(), VisitorLogError> {
    let log_config = simplelog::Config::default();

    let res = match &cfg.log_path {
        Some(path) => {
            let file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .map_err(|e| VisitorLogError::io(e, path))?;
            WriteLogger::init(cfg.log_level, log_config, file)
        },
        None => {
            TermLogger::init(cfg.log_level, log_config, TerminalMode::Stderr, ColorChoice::Auto)
        }
    };

    res.map_err(|e| VisitorLogError::Logger { source: e })
}
