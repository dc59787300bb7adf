use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{HttpResponse, cookie::Key, web};

use crate::auth;
use crate::auth::rate_limit::RateLimiter;
use crate::config::AppConfig;
use crate::handlers;
use crate::intake::phone::{DialCodePhoneValidator, PhoneValidator};
use crate::leads::cache::LeadCache;
use crate::webhook::{WebhookClient, WebhookError};

/// Shared services handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub webhook: WebhookClient,
    pub cache: LeadCache,
    pub limiter: RateLimiter,
    pub phone: Arc<dyn PhoneValidator>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, WebhookError> {
        let webhook = WebhookClient::new(config.webhook_url.clone(), config.webhook_timeout)?;
        let cache = LeadCache::with_ttl(config.lead_cache_ttl);
        Ok(Self {
            config,
            webhook,
            cache,
            limiter: RateLimiter::new(),
            phone: Arc::new(DialCodePhoneValidator),
        })
    }

    /// Register app data, static files and routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.config.clone()))
            .app_data(web::Data::new(self.webhook.clone()))
            .app_data(web::Data::new(self.cache.clone()))
            .app_data(web::Data::new(self.limiter.clone()))
            .app_data(web::Data::from(Arc::clone(&self.phone)))
            .service(actix_files::Files::new("/static", &self.config.static_dir));
        routes(cfg);
    }
}

pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(secure)
        .cookie_http_only(true)
        .build()
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Public intake form
        .route("/", web::get().to(handlers::intake_handlers::form_page))
        .route("/", web::post().to(handlers::intake_handlers::submit))
        .route("/intake/validate", web::post().to(handlers::intake_handlers::validate_field))
        // Admin login
        .route("/login", web::get().to(handlers::auth_handlers::login_page))
        .route("/login", web::post().to(handlers::auth_handlers::login_submit))
        .route("/logout", web::post().to(handlers::auth_handlers::logout))
        // Protected dashboard
        .service(
            web::scope("/dashboard")
                .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                .route("", web::get().to(handlers::dashboard::index))
                .route("/growth", web::get().to(handlers::dashboard::growth))
                .route("/export.csv", web::get().to(handlers::dashboard::export_csv))
                .route("/leads/delete", web::post().to(handlers::dashboard::delete_lead)),
        )
        // Default 404 handler (must be registered last)
        .default_service(web::to(|| async {
            let html = include_str!("../templates/errors/404.html");
            HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body(html)
        }));
}
