use anyhow::Result;
use log::{info, warn};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::oauth::{self, Tokens};
use crate::auth::{token_store, tokens_file};
use crate::config::Config;

/// Lifetime assumed when the token endpoint omits `expires_in`.
const FALLBACK_LIFETIME_SECS: i64 = 3500;

#[derive(Clone)]
pub struct TokenManager {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub user_id: String,
}

impl TokenManager {
    pub fn from_config(cfg: &Config, user_id: &str) -> Result<Self> {
        let client_secret = token_store::load_client_secret(&cfg.client_id)?
            .or_else(|| std::env::var("OAUTH_CLIENT_SECRET").ok());

        Ok(Self {
            client_id: cfg.client_id.clone(),
            client_secret,
            redirect_uri: cfg.redirect_uri().to_string(),
            user_id: user_id.to_string(),
        })
    }

    /// Returns a valid access token: the cached one, a refreshed one, or one
    /// from the interactive PKCE flow, in that order.
    pub fn access_token(&self) -> Result<String> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64;

        if let Some(tf) = tokens_file::load_tokens(&self.user_id)?
            && let Some(at) = tf.valid_token(now)
        {
            info!("using cached access token");
            return Ok(at.to_string());
        }

        let tokens = match token_store::load_refresh_token(&self.user_id)? {
            Some(rt) => {
                info!("refreshing access token");
                let refreshed = oauth::refresh_access_token(
                    &self.client_id,
                    self.client_secret.as_deref(),
                    &rt,
                );
                match refreshed {
                    Ok(t) => t,
                    Err(e) => {
                        warn!("refresh failed: {e}, falling back to interactive auth");
                        self.interactive()?
                    }
                }
            }
            None => self.interactive()?,
        };

        self.persist(&tokens, now);
        Ok(tokens.access_token)
    }

    fn interactive(&self) -> Result<Tokens> {
        info!("no usable token; running interactive PKCE auth flow");
        oauth::perform_pkce_flow(
            &self.client_id,
            self.client_secret.as_deref(),
            &self.redirect_uri,
        )
    }

    /// Best-effort: a token that cannot be cached is still usable for this run.
    fn persist(&self, tokens: &Tokens, now: i64) {
        if let Some(rt) = &tokens.refresh_token
            && let Err(e) = token_store::save_refresh_token(&self.user_id, rt)
        {
            warn!("couldn't save refresh token to keyring: {e}");
        }

        let exp = tokens
            .expires_in
            .map(|s| now + s as i64)
            .unwrap_or(now + FALLBACK_LIFETIME_SECS);
        if let Err(e) = tokens_file::save_tokens(&self.user_id, &tokens.access_token, exp) {
            warn!("couldn't save tokens metadata: {e}");
        }
    }
}
