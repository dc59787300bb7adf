use std::time::Duration;

use actix_web::cookie::Key;

pub const DEFAULT_WEBHOOK_URL: &str = "http://127.0.0.1:5678/webhook/studentsubmit";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_LOGIN_DELAY_MS: u64 = 2800;
const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LEAD_CACHE_TTL_SECS: u64 = 8 * 60 * 60;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub webhook_url: String,
    pub bind_addr: String,
    pub session_key: Option<String>,
    /// Pause before the login request is issued; matches the button animation.
    pub login_delay: Duration,
    pub webhook_timeout: Duration,
    /// How long a fetched lead batch stays usable for charts and export.
    pub lead_cache_ttl: Duration,
    pub cookie_secure: bool,
    pub static_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            webhook_url: DEFAULT_WEBHOOK_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            session_key: None,
            login_delay: Duration::from_millis(DEFAULT_LOGIN_DELAY_MS),
            webhook_timeout: Duration::from_secs(DEFAULT_WEBHOOK_TIMEOUT_SECS),
            lead_cache_ttl: Duration::from_secs(DEFAULT_LEAD_CACHE_TTL_SECS),
            cookie_secure: false,
            static_dir: "./static".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment (after `.env`, if present).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; unset or malformed values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let webhook_url = lookup("WEBHOOK_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.webhook_url);
        let bind_addr = lookup("BIND_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.bind_addr);
        let login_delay = parse_u64(&lookup, "LOGIN_DELAY_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.login_delay);
        let webhook_timeout = parse_u64(&lookup, "WEBHOOK_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.webhook_timeout);
        let lead_cache_ttl = parse_u64(&lookup, "LEAD_CACHE_TTL_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.lead_cache_ttl);
        let cookie_secure = lookup("COOKIE_SECURE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.cookie_secure);
        let static_dir = lookup("STATIC_DIR").unwrap_or(defaults.static_dir);

        Self {
            webhook_url,
            bind_addr,
            session_key: lookup("SESSION_KEY"),
            login_delay,
            webhook_timeout,
            lead_cache_ttl,
            cookie_secure,
            static_dir,
        }
    }

    /// Cookie signing key. Falls back to a random key, so sessions do not survive a restart.
    pub fn cookie_key(&self) -> Key {
        match &self.session_key {
            Some(val) if val.len() >= 64 => {
                log::info!("Using SESSION_KEY from environment");
                Key::from(val.as_bytes())
            }
            Some(val) => {
                log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
                Key::generate()
            }
            None => {
                log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
                Key::generate()
            }
        }
    }
}

fn parse_u64<F>(lookup: &F, name: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring malformed {name}={raw:?}");
            None
        }
    }
}
