//! Shared test infrastructure for HTTP-level tests.
//!
//! # Setup
//! - `mock_webhook()` - a wiremock server standing in for the lead webhook
//! - `test_state()` - app services pointed at that server, with no login delay
//! - `test_app!` - an initialized actix service with session middleware
//!
//! Session cookies are carried by hand: grab them with `session_cookie()`
//! and pass them on the next request.

#![allow(dead_code, unused_macros)]

use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lead_intake::app::AppState;
use lead_intake::config::AppConfig;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const ADMIN_PASS: &str = "correct horse";
pub const WEBHOOK_PATH: &str = "/webhook/studentsubmit";

static CSRF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"name="csrf_token" value="([0-9a-f]{64})""#).unwrap());

// ============================================================================
// SETUP
// ============================================================================

pub async fn mock_webhook() -> MockServer {
    MockServer::start().await
}

pub fn test_state(server: &MockServer) -> AppState {
    let config = AppConfig {
        webhook_url: format!("{}{}", server.uri(), WEBHOOK_PATH),
        login_delay: Duration::ZERO,
        webhook_timeout: Duration::from_secs(5),
        ..AppConfig::default()
    };
    AppState::new(config).expect("Failed to build app state")
}

/// Initialize the full app around an `AppState`.
macro_rules! test_app {
    ($state:expr) => {{
        let state = $state.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(lead_intake::app::session_middleware(
                    actix_web::cookie::Key::generate(),
                    false,
                ))
                .configure(move |cfg| state.configure(cfg)),
        )
        .await
    }};
}

// ============================================================================
// WEBHOOK STUBS
// ============================================================================

/// Respond to one `action` with the given status and JSON body.
pub async fn stub_action(server: &MockServer, action: &str, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .and(body_partial_json(json!({ "action": action })))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// `auth` accepts only `ADMIN_PASS`.
pub async fn stub_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .and(body_partial_json(json!({ "action": "auth", "password": ADMIN_PASS })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .with_priority(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .and(body_partial_json(json!({ "action": "auth" })))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": true, "message": "Invalid Password" })),
        )
        .mount(server)
        .await;
}

pub fn sample_leads() -> Value {
    json!({
        "leads": [
            {
                "timestamp": "2025-11-02T09:00:00.000Z",
                "fullName": "Mari Tamm",
                "email": "mari@example.ee",
                "phone": "+37255551234",
                "languageLevel": "A1",
                "Email Status": "Sent"
            },
            {
                "Timestamp": "2025-11-03T10:00:00.000Z",
                "Name": "O\"Brien",
                "Email": "ob@example.com",
                "Level": "B2",
                "Email Status": "Failed"
            }
        ]
    })
}

// ============================================================================
// HTTP HELPERS
// ============================================================================

pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "id")
        .map(|c| c.into_owned())
}

pub async fn body_string<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = actix_web::test::read_body(resp).await;
    String::from_utf8_lossy(&bytes).into_owned()
}

pub fn csrf_from(html: &str) -> String {
    CSRF_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .expect("page has no csrf token")
}

pub fn location<B>(resp: &ServiceResponse<B>) -> Option<String> {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
