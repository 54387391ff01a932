//! Process configuration.
//!
//! Values come from an optional YAML file named by `SPIDEY_CONFIG`, then
//! individual `SPIDEY_*` environment variables override them.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory below which every served resource must resolve
    pub root: PathBuf,
    /// Interface to bind the listening socket to
    pub address: String,
    /// Listening port, also exported to CGI scripts as `SERVER_PORT`
    pub port: u16,
    /// Extension table in `mime.types` format
    pub mime_types_path: PathBuf,
    /// Content type used when no extension matches
    pub default_mime_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("www"),
            address: "0.0.0.0".to_string(),
            port: 9898,
            mime_types_path: PathBuf::from("/etc/mime.types"),
            default_mime_type: "text/plain".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration from the process environment.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration through `lookup` instead of the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup("SPIDEY_CONFIG") {
            Some(file) => Self::from_file(Path::new(&file))?,
            None => Self::default(),
        };

        if let Some(root) = lookup("SPIDEY_ROOT") {
            cfg.root = PathBuf::from(root);
        }
        if let Some(address) = lookup("SPIDEY_ADDRESS") {
            cfg.address = address;
        }
        if let Some(port) = lookup("SPIDEY_PORT") {
            cfg.port = port
                .parse()
                .with_context(|| format!("invalid SPIDEY_PORT: {port:?}"))?;
        }
        if let Some(path) = lookup("SPIDEY_MIME_TYPES") {
            cfg.mime_types_path = PathBuf::from(path);
        }
        if let Some(mime) = lookup("SPIDEY_DEFAULT_MIME_TYPE") {
            cfg.default_mime_type = mime;
        }

        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Socket address the listener binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}
