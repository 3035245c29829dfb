use anyhow::{Context, Result, anyhow};
use axum_extra::extract::cookie::Key;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::warn;

const DEFAULT_SESSION_TTL_MINUTES: i64 = 480;
const MIN_COOKIE_SECRET_BYTES: usize = 64;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub cookie_key: Key,
    pub cors_allowed_origins: Vec<String>,
    pub session_ttl: chrono::Duration,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let cookie_key = match lookup("COOKIE_SECRET_BASE64") {
            Some(secret) => {
                let bytes = STANDARD
                    .decode(secret.trim())
                    .context("invalid COOKIE_SECRET_BASE64")?;
                if bytes.len() < MIN_COOKIE_SECRET_BYTES {
                    return Err(anyhow!(
                        "COOKIE_SECRET_BASE64 must decode to at least {MIN_COOKIE_SECRET_BYTES} bytes"
                    ));
                }
                Key::try_from(&bytes[..MIN_COOKIE_SECRET_BYTES])
                    .map_err(|err| anyhow!("invalid cookie key: {err}"))?
            }
            None => {
                warn!("COOKIE_SECRET_BASE64 not set; sessions will not survive a restart");
                Key::generate()
            }
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();

        let ttl_minutes = match lookup("SESSION_TTL_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or_else(|| anyhow!("SESSION_TTL_MINUTES must be a positive integer"))?,
            None => DEFAULT_SESSION_TTL_MINUTES,
        };

        Ok(Self {
            cookie_key,
            cors_allowed_origins,
            session_ttl: chrono::Duration::minutes(ttl_minutes),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_env() {
        let config = load(&[]).unwrap();
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.session_ttl, chrono::Duration::minutes(480));
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let config = load(&[("CORS_ALLOWED_ORIGINS", " https://a.test, ,https://b.test ")]).unwrap();
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.test", "https://b.test"]
        );
    }

    #[test]
    fn short_cookie_secret_is_rejected() {
        let secret = STANDARD.encode([7u8; 16]);
        assert!(load(&[("COOKIE_SECRET_BASE64", secret.as_str())]).is_err());
        let secret = STANDARD.encode([7u8; 64]);
        assert!(load(&[("COOKIE_SECRET_BASE64", secret.as_str())]).is_ok());
    }

    #[test]
    fn session_ttl_must_be_positive() {
        assert!(load(&[("SESSION_TTL_MINUTES", "0")]).is_err());
        assert!(load(&[("SESSION_TTL_MINUTES", "soon")]).is_err());
        let config = load(&[("SESSION_TTL_MINUTES", "15")]).unwrap();
        assert_eq!(config.session_ttl, chrono::Duration::minutes(15));
    }
}
