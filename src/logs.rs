use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::SystemTime;

use anyhow::{Context, Result};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::config::{CommonConfig, PathSet};
use crate::dirs;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogsConfig {
    #[serde(default = "LogTarget::default")]
    pub target: LogTarget,

    #[serde(default = "LogLevel::default")]
    pub level: LogLevel,

    #[serde(skip)]
    logs_dir: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
pub enum LogTarget {
    #[serde(rename = "stdout")]
    #[default]
    Stdout,

    #[serde(rename = "stderr")]
    Stderr,

    #[serde(rename = "file")]
    File,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
pub enum LogLevel {
    #[serde(rename = "info")]
    #[default]
    Info,

    #[serde(rename = "error")]
    Error,

    #[serde(rename = "warning")]
    Warning,

    #[serde(rename = "debug")]
    Debug,
}

impl CommonConfig for LogsConfig {
    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        if !matches!(self.target, LogTarget::File) {
            return Ok(());
        }

        self.logs_dir = ps.data_dir.join("logs");
        dirs::ensure_dir_exists(&self.logs_dir).context("ensure logs dir")?;

        Ok(())
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        LogsConfig {
            target: LogTarget::default(),
            level: LogLevel::default(),
            logs_dir: PathBuf::new(),
        }
    }
}

impl LogsConfig {
    pub fn init(&self, name: &str) -> Result<()> {
        let level = match self.level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
        };

        let colored = match self.target {
            LogTarget::Stdout => io::stdout().is_terminal(),
            LogTarget::Stderr => io::stderr().is_terminal(),
            LogTarget::File => false,
        };
        let colors = ColoredLevelConfig::new()
            .info(Color::Green)
            .debug(Color::Magenta);

        // actix logs every worker start at info, keep it quiet unless debugging
        let actix_level = if level >= LevelFilter::Debug {
            level
        } else {
            level.min(LevelFilter::Warn)
        };

        let dispatch = fern::Dispatch::new()
            .format(move |out, message, record| {
                let now = humantime::format_rfc3339_millis(SystemTime::now());
                if colored {
                    out.finish(format_args!(
                        "{} [{}] {}",
                        now,
                        colors.color(record.level()),
                        message
                    ))
                } else {
                    out.finish(format_args!("{} [{}] {}", now, record.level(), message))
                }
            })
            .level(level)
            .level_for("actix_server", actix_level);

        let dispatch = match self.target {
            LogTarget::Stdout => dispatch.chain(io::stdout()),
            LogTarget::Stderr => dispatch.chain(io::stderr()),
            LogTarget::File => {
                let path = self.logs_dir.join(format!("{name}.log"));
                let file = fern::log_file(&path)
                    .with_context(|| format!("open log file: {}", path.display()))?;
                dispatch.chain(file)
            }
        };

        dispatch.apply().context("init logger")?;
        Ok(())
    }
}
