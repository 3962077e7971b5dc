use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ErrorKind, Result};

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

/// Connection and widget settings, usually read from a YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Everything before the handler name, e.g.
    /// `https://lms.example/courses/<course>/xblock/<usage>/handler`.
    pub handler_base: String,
    #[serde(default)]
    pub csrf_token: Option<String>,
    /// Raw `Cookie` header value of an authenticated session.
    #[serde(default)]
    pub session_cookie: Option<String>,
    /// Show the `free / capacity` counter next to the status.
    #[serde(default = "default_true")]
    pub show_counter: bool,
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub reload_after_save: bool,
}

impl Config {
    pub fn new(handler_base: impl Into<String>) -> Self {
        Self {
            handler_base: handler_base.into(),
            csrf_token: None,
            session_cookie: None,
            show_counter: true,
            accept_invalid_certs: false,
            timeout_secs: default_timeout(),
            reload_after_save: false,
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    fn check(&self) -> Result<()> {
        if !(self.handler_base.starts_with("http://") || self.handler_base.starts_with("https://")) {
            return Err(ErrorKind::ParseError(format!(
                "handler_base must be an http(s) url, got {:?}",
                self.handler_base
            ))
            .into());
        }
        if self.timeout_secs == 0 {
            return Err(ErrorKind::ParseError("timeout_secs must be positive".to_string()).into());
        }
        Ok(())
    }
}
