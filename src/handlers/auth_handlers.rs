use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::auth::csrf;
use crate::auth::rate_limit::RateLimiter;
use crate::auth::session::{SessionContext, end_admin_session, get_token};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::handlers::see_other;
use crate::leads::cache::LeadCache;
use crate::templates_structs::{APP_NAME, LoginTemplate};
use crate::webhook::WebhookClient;

#[derive(Deserialize)]
pub struct LoginForm {
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn login_form(session: &Session, error: Option<String>) -> Result<HttpResponse, AppError> {
    let csrf_token = csrf::get_or_create_token(session);
    render(LoginTemplate {
        error,
        app_name: APP_NAME.to_string(),
        csrf_token,
    })
}

pub async fn login_page(session: Session) -> Result<HttpResponse, AppError> {
    // Already holding a token: go straight to the dashboard
    if get_token(&session).is_some() {
        return Ok(see_other("/dashboard"));
    }
    login_form(&session, None)
}

pub async fn login_submit(
    req: HttpRequest,
    session: Session,
    form: web::Form<LoginForm>,
    limiter: web::Data<RateLimiter>,
    webhook: web::Data<WebhookClient>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    // Rate-limit check BEFORE any webhook traffic
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or_else(|| std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        return login_form(
            &session,
            Some("Too many failed login attempts. Please try again later.".to_string()),
        );
    }

    let password = form.password.trim();

    // Lets the button animation finish; not a backoff.
    if !config.login_delay.is_zero() {
        tokio::time::sleep(config.login_delay).await;
    }

    match webhook.authenticate(password).await {
        Ok(()) => {
            limiter.clear(ip);
            SessionContext::establish(&session, password);
            log::info!("admin login from {ip}");
            Ok(see_other("/dashboard"))
        }
        Err(e) => {
            if e.is_credential_error() {
                limiter.record_failure(ip);
            }
            log::warn!("admin login failed from {ip}: {e}");
            login_form(&session, Some(e.user_message()))
        }
    }
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
    cache: web::Data<LeadCache>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    end_admin_session(&session, &cache);
    Ok(see_other("/login"))
}
