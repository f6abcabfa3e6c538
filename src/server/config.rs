use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};
use crate::logs::LogsConfig;

use super::authn::config::AuthnConfig;
use super::authz::config::AuthzConfig;
use super::db::config::DbConfig;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_bind")]
    pub bind: String,

    #[serde(default = "ServerConfig::default_ssl")]
    pub ssl: bool,

    #[serde(default = "ServerConfig::default_cert_path")]
    pub cert_path: String,

    #[serde(default = "ServerConfig::default_key_path")]
    pub key_path: String,

    #[serde(default = "ServerConfig::default_keep_alive_secs")]
    pub keep_alive_secs: u64,

    #[serde(default = "ServerConfig::default_workers")]
    pub workers: u64,

    #[serde(default = "ServerConfig::default_form_limit_kib")]
    pub form_limit_kib: usize,

    #[serde(default)]
    pub forwarded: ForwardedConfig,

    #[serde(default)]
    pub authn: AuthnConfig,

    #[serde(default)]
    pub authz: AuthzConfig,

    #[serde(default)]
    pub db: DbConfig,

    #[serde(default)]
    pub logs: LogsConfig,
}

/// Headers the proxy uses to describe the original request.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ForwardedConfig {
    /// Candidates for the original path and query, the first present wins.
    #[serde(default = "ForwardedConfig::default_uri_headers")]
    pub uri_headers: Vec<String>,

    /// Original method, `GET` when the header is absent.
    #[serde(default = "ForwardedConfig::default_method_header")]
    pub method_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: Self::default_bind(),
            ssl: Self::default_ssl(),
            cert_path: Self::default_cert_path(),
            key_path: Self::default_key_path(),
            keep_alive_secs: Self::default_keep_alive_secs(),
            workers: Self::default_workers(),
            form_limit_kib: Self::default_form_limit_kib(),
            forwarded: ForwardedConfig::default(),
            authn: AuthnConfig::default(),
            authz: AuthzConfig::default(),
            db: DbConfig::default(),
            logs: LogsConfig::default(),
        }
    }
}

impl CommonConfig for ServerConfig {
    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        self.bind = expandenv("bind", &self.bind)?;
        if self.bind.is_empty() {
            bail!("bind cannot be empty");
        }

        self.cert_path = expandenv("cert_path", &self.cert_path)?;
        if self.cert_path.is_empty() {
            let path = ps.pki_dir.join("cert.pem");
            self.cert_path = format!("{}", path.display());
        }

        self.key_path = expandenv("key_path", &self.key_path)?;
        if self.key_path.is_empty() {
            let path = ps.pki_dir.join("key.pem");
            self.key_path = format!("{}", path.display());
        }

        if self.form_limit_kib < Self::MIN_FORM_LIMIT_KIB {
            bail!(
                "form_limit_kib must be greater than or equal to {}",
                Self::MIN_FORM_LIMIT_KIB
            );
        }
        if self.form_limit_kib > Self::MAX_FORM_LIMIT_KIB {
            bail!(
                "form_limit_kib must be less than or equal to {}",
                Self::MAX_FORM_LIMIT_KIB
            );
        }

        self.forwarded.complete(ps).context("forwarded")?;
        self.authn.complete(ps).context("authn")?;
        self.authz.complete(ps).context("authz")?;
        self.db.complete(ps).context("db")?;
        self.logs.complete(ps).context("logs")?;

        Ok(())
    }
}

impl ServerConfig {
    const MAX_FORM_LIMIT_KIB: usize = 1024;
    const MIN_FORM_LIMIT_KIB: usize = 1;

    pub fn default_bind() -> String {
        String::from("127.0.0.1:5000")
    }

    pub fn default_ssl() -> bool {
        false
    }

    pub fn default_cert_path() -> String {
        String::new()
    }

    pub fn default_key_path() -> String {
        String::new()
    }

    pub fn default_keep_alive_secs() -> u64 {
        0
    }

    pub fn default_workers() -> u64 {
        0
    }

    pub fn default_form_limit_kib() -> usize {
        16
    }

    pub fn form_limit_bytes(&self) -> usize {
        self.form_limit_kib * 1024
    }
}

impl Default for ForwardedConfig {
    fn default() -> Self {
        Self {
            uri_headers: Self::default_uri_headers(),
            method_header: Self::default_method_header(),
        }
    }
}

impl CommonConfig for ForwardedConfig {
    fn complete(&mut self, _ps: &PathSet) -> Result<()> {
        self.uri_headers.retain(|h| !h.trim().is_empty());
        if self.uri_headers.is_empty() {
            bail!("uri_headers cannot be empty");
        }
        if self.method_header.trim().is_empty() {
            bail!("method_header cannot be empty");
        }
        Ok(())
    }
}

impl ForwardedConfig {
    pub fn default_uri_headers() -> Vec<String> {
        vec![
            String::from("X-Forwarded-Uri"),
            String::from("X-Original-URI"),
        ]
    }

    pub fn default_method_header() -> String {
        String::from("X-Forwarded-Method")
    }
}
