use std::sync::Arc;

use actix_session::Session;

use crate::auth::csrf;
use crate::leads::LeadRecord;
use crate::leads::cache::LeadCache;

/// Session key holding the admin password, used verbatim as the bearer token.
pub const TOKEN_KEY: &str = "admin_token";
const CACHE_ID_KEY: &str = "lead_cache_id";
const FLASH_KEY: &str = "flash";

pub fn get_token(session: &Session) -> Option<String> {
    session.get::<String>(TOKEN_KEY).unwrap_or(None)
}

pub fn set_flash(session: &Session, message: &str) {
    let _ = session.insert(FLASH_KEY, message);
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH_KEY).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH_KEY);
    }
    flash
}

/// Everything one admin session carries: the token plus the handle to its
/// cached lead batch. Built on login, torn down on logout or when the
/// webhook stops accepting the token.
#[derive(Debug, Clone)]
pub struct SessionContext {
    token: String,
    cache_id: String,
}

impl SessionContext {
    /// Start a fresh admin session for a password the webhook accepted.
    pub fn establish(session: &Session, token: &str) -> Self {
        session.renew();
        let cache_id = csrf::generate_token();
        let _ = session.insert(TOKEN_KEY, token);
        let _ = session.insert(CACHE_ID_KEY, &cache_id);
        Self {
            token: token.to_string(),
            cache_id,
        }
    }

    /// The current admin session, if a token is stored.
    pub fn from_session(session: &Session) -> Option<Self> {
        let token = get_token(session)?;
        let cache_id = match session.get::<String>(CACHE_ID_KEY).unwrap_or(None) {
            Some(id) => id,
            None => {
                let id = csrf::generate_token();
                let _ = session.insert(CACHE_ID_KEY, &id);
                id
            }
        };
        Some(Self { token, cache_id })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn store_leads(&self, cache: &LeadCache, leads: Vec<LeadRecord>) -> Arc<Vec<LeadRecord>> {
        cache.put(&self.cache_id, leads)
    }

    pub fn leads(&self, cache: &LeadCache) -> Arc<Vec<LeadRecord>> {
        cache.get(&self.cache_id)
    }

    /// Drop the cached batch and clear the cookie.
    pub fn teardown(self, session: &Session, cache: &LeadCache) {
        cache.remove(&self.cache_id);
        session.purge();
    }
}

/// Tear down whatever admin state the session holds, if any.
pub fn end_admin_session(session: &Session, cache: &LeadCache) {
    match SessionContext::from_session(session) {
        Some(ctx) => ctx.teardown(session, cache),
        None => session.purge(),
    }
}
