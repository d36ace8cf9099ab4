use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use log::LevelFilter;
use crate::visitor::error::VisitorLogError;

pub const STORE_PATH_VAR: &str = "VISITOR_LOG_STORE";
pub const LOG_PATH_VAR: &str = "VISITOR_LOG_LOG_PATH";
pub const LOG_LEVEL_VAR: &str = "VISITOR_LOG_LEVEL";

pub const DEFAULT_STORE_PATH: &str = "visitors.txt";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub store_path: PathBuf,
    pub log_path: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            log_path: None,
            log_level: LevelFilter::Warn,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, VisitorLogError> {
        Self::from_lookup(|k| env::var(k))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, VisitorLogError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let mut config = Config::default();

        if let Some(p) = Self::read_var(&lookup, STORE_PATH_VAR)? {
            config.store_path = PathBuf::from(p);
        }

        config.log_path = Self::read_var(&lookup, LOG_PATH_VAR)?.map(PathBuf::from);

        if let Some(level) = Self::read_var(&lookup, LOG_LEVEL_VAR)? {
            config.log_level = LevelFilter::from_str(&level)
                .map_err(|_| VisitorLogError::LogLevel(level))?;
        }

        Ok(config)
    }

    fn read_var<F>(lookup: &F, var: &str) -> Result<Option<String>, VisitorLogError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        match lookup(var) {
            Ok(v) if v.is_empty() => Ok(None),
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                if let env::VarError::NotUnicode(_) = e {
                    Err(VisitorLogError::Config { source: e, var: String::from(var) })
                } else {
                    Ok(None)
                }
            }
        }
    }
}
