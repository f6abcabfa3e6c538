use std::path::PathBuf;
use std::{env, fs, io};

use anyhow::{Context, Result};
use clap::Args;
use log::warn;
use serde::de::DeserializeOwned;

use crate::dirs;

/// Directories the service reads configuration from and writes data into.
#[derive(Debug, Clone)]
pub struct PathSet {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub pki_dir: PathBuf,
}

impl PathSet {
    pub fn new(config_dir: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<Self> {
        let config_dir = match config_dir {
            Some(dir) => dir,
            None => match env::var_os("TOPICGATE_CONFIG") {
                Some(dir) => PathBuf::from(dir),
                None => dirs::config_dir()?,
            },
        };

        let data_dir = match data_dir {
            Some(dir) => dir,
            None => match env::var_os("TOPICGATE_DATA") {
                Some(dir) => PathBuf::from(dir),
                None => dirs::data_dir()?,
            },
        };

        // PKI files always live under the config directory
        let pki_dir = config_dir.join("pki");

        dirs::ensure_dir_exists(&config_dir)
            .with_context(|| format!("ensure config directory: {}", config_dir.display()))?;
        dirs::ensure_dir_exists(&data_dir)
            .with_context(|| format!("ensure data directory: {}", data_dir.display()))?;

        Ok(Self {
            config_dir,
            data_dir,
            pki_dir,
        })
    }

    pub fn load_config<T>(&self, name: &str) -> Result<T>
    where
        T: CommonConfig + DeserializeOwned + Default,
    {
        let path = self.config_dir.join(format!("{name}.toml"));
        let mut cfg: T = match fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s)
                .with_context(|| format!("parse config file: {}", path.display()))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("Config file for {name} not found, using defaults");
                T::default()
            }
            Err(err) => {
                return Err(err).with_context(|| format!("read config file: {}", path.display()));
            }
        };

        cfg.complete(self).context("validate config")?;
        Ok(cfg)
    }
}

pub trait CommonConfig {
    fn complete(&mut self, ps: &PathSet) -> Result<()>;
}

/// Command line flags shared by commands that load configuration files.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// The config directory, default is `$TOPICGATE_CONFIG`, `/etc/topicgate` for root,
    /// or `~/.config/topicgate`.
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// The data directory, default is `$TOPICGATE_DATA`, `/var/lib/topicgate` for root,
    /// or `~/.local/share/topicgate`.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn build_path_set(&self) -> Result<PathSet> {
        PathSet::new(self.config_dir.clone(), self.data_dir.clone())
    }

    pub fn load<T>(&self, name: &str) -> Result<T>
    where
        T: CommonConfig + DeserializeOwned + Default,
    {
        let ps = self.build_path_set()?;
        ps.load_config(name)
    }
}

/// See: [`shellexpand::full`].
pub fn expandenv(name: &str, s: impl AsRef<str>) -> Result<String> {
    let s =
        shellexpand::full(s.as_ref()).with_context(|| format!("expand env value for '{name}'"))?;
    Ok(s.to_string())
}
