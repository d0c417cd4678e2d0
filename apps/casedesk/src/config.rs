use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use case_core::ClientConfig;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "casedesk.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub token: Option<String>,
    pub token_header: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000/api".into(),
            token: None,
            token_header: case_core::client::DEFAULT_TOKEN_HEADER.into(),
            request_timeout_secs: case_core::client::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    api_url: Option<String>,
    token: Option<String>,
    token_header: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl Settings {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            token_header: self.token_header.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
            ..ClientConfig::new(self.api_url.clone())
        }
    }

    fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file.api_url {
            self.api_url = v;
        }
        if let Some(v) = file.token {
            self.token = Some(v);
        }
        if let Some(v) = file.token_header {
            self.token_header = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("CASEDESK_API_URL") {
            self.api_url = v;
        }
        if let Some(v) = var("APP__API_URL") {
            self.api_url = v;
        }

        if let Some(v) = var("CASEDESK_TOKEN") {
            self.token = Some(v);
        }

        if let Some(v) = var("APP__TOKEN_HEADER") {
            self.token_header = v;
        }

        if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.request_timeout_secs = parsed;
            }
        }
    }
}

/// Defaults, then the config file if it exists, then the environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        settings
            .apply_file(&raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
    }

    settings.apply_env(|key| std::env::var(key).ok());
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
