use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::gmail::DEFAULT_API_BASE_URL;

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";
pub const DEFAULT_CATEGORY_LABEL: &str = "CATEGORY_PROMOTIONS";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub client_id: String,
    pub redirect_uri: Option<String>,
    /// Gmail label the analysis is restricted to.
    pub category_label: Option<String>,
    pub api_base_url: Option<String>,
}

impl Config {
    pub fn redirect_uri(&self) -> &str {
        self.redirect_uri.as_deref().unwrap_or(DEFAULT_REDIRECT_URI)
    }

    pub fn category_label(&self) -> &str {
        self.category_label
            .as_deref()
            .unwrap_or(DEFAULT_CATEGORY_LABEL)
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    fn template() -> Self {
        Self {
            client_id: "YOUR_CLIENT_ID.apps.googleusercontent.com".to_string(),
            redirect_uri: Some(DEFAULT_REDIRECT_URI.to_string()),
            category_label: Some(DEFAULT_CATEGORY_LABEL.to_string()),
            api_base_url: None,
        }
    }
}

pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| anyhow!("no config dir available"))?
        .join("gmail_analyzer");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_dir()?.join("config.toml"))
}

/// Read `path`, or write a template there and fail so the user can edit it.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        fs::write(path, toml::to_string_pretty(&Config::template())?)?;
        return Err(anyhow!(
            "Created template config at {}; edit it and run again",
            path.display()
        ));
    }
    let s = fs::read_to_string(path)?;
    Ok(toml::from_str(&s)?)
}
