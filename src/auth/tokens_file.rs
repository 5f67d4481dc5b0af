use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::config_dir;

/// Non-secret access token cache stored next to the config file, one file
/// per Gmail user id.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokensFile {
    pub access_token: Option<String>,
    pub expires_at_epoch: Option<i64>, // epoch seconds
}

impl TokensFile {
    /// The cached token if it is still valid at `now`.
    pub fn valid_token(&self, now: i64) -> Option<&str> {
        match (&self.access_token, self.expires_at_epoch) {
            (Some(at), Some(exp)) if now < exp => Some(at),
            _ => None,
        }
    }
}

/// `tokens-<user>.json`, with path separators in the user id replaced.
fn tokens_path_in(dir: &Path, user_id: &str) -> PathBuf {
    let user: String = user_id
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    dir.join(format!("tokens-{user}.json"))
}

pub fn save_tokens(user_id: &str, access_token: &str, expires_at_epoch: i64) -> Result<()> {
    save_tokens_to(
        &tokens_path_in(&config_dir()?, user_id),
        access_token,
        expires_at_epoch,
    )
}

pub fn load_tokens(user_id: &str) -> Result<Option<TokensFile>> {
    load_tokens_from(&tokens_path_in(&config_dir()?, user_id))
}

fn save_tokens_to(path: &Path, access_token: &str, expires_at_epoch: i64) -> Result<()> {
    let tf = TokensFile {
        access_token: Some(access_token.to_string()),
        expires_at_epoch: Some(expires_at_epoch),
    };
    fs::write(path, serde_json::to_string_pretty(&tf)?)?;
    Ok(())
}

fn load_tokens_from(path: &Path) -> Result<Option<TokensFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&s)?))
}
