//! Client for the workflow-automation webhook that stores leads and checks
//! the admin password. Every call is a JSON POST to one URL, told apart by
//! the `action` field.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Serialize;
use serde_json::{Value, json};

use crate::leads::{LeadRecord, is_truthy};

const EXCERPT_LEN: usize = 100;
const DEFAULT_AUTH_MESSAGE: &str = "Invalid Password";

#[derive(Debug)]
pub enum WebhookError {
    /// The request never got a response.
    Transport(reqwest::Error),
    /// Response body was not JSON.
    InvalidJson { status: u16, excerpt: String },
    /// The webhook answered with its `error` flag set.
    Rejected(String),
    /// The password was refused.
    InvalidCredentials(String),
    /// Email already registered.
    DuplicateEmail,
    /// Any other non-success status.
    Status(u16),
}

impl WebhookError {
    /// Whether the stored admin token must be discarded.
    pub fn is_credential_error(&self) -> bool {
        matches!(self, WebhookError::InvalidCredentials(_))
    }

    /// Short text suitable for showing in the page.
    pub fn user_message(&self) -> String {
        match self {
            WebhookError::Transport(_) => "Connection error".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for WebhookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookError::Transport(e) => write!(f, "Webhook request failed: {e}"),
            WebhookError::InvalidJson { excerpt, .. } => {
                write!(f, "Invalid JSON response: {excerpt}...")
            }
            WebhookError::Rejected(msg) => write!(f, "{msg}"),
            WebhookError::InvalidCredentials(msg) => write!(f, "{msg}"),
            WebhookError::DuplicateEmail => write!(f, "This email is already registered."),
            WebhookError::Status(code) => write!(f, "Webhook error: {code}"),
        }
    }
}

impl std::error::Error for WebhookError {}

impl From<reqwest::Error> for WebhookError {
    fn from(e: reqwest::Error) -> Self {
        WebhookError::Transport(e)
    }
}

/// Payload of the `formsubmit` action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub language_level: String,
    pub future_goal: String,
    pub estonian_knowledge: String,
    /// ISO-8601 UTC.
    pub timestamp: String,
}

/// A status code plus the body, parsed if it was JSON.
struct RawResponse {
    status: StatusCode,
    text: String,
}

impl RawResponse {
    fn json(&self) -> Result<Value, WebhookError> {
        serde_json::from_str(&self.text).map_err(|_| WebhookError::InvalidJson {
            status: self.status.as_u16(),
            excerpt: self.text.chars().take(EXCERPT_LEN).collect(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, WebhookError> {
        let http = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("lead-intake/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, body: &Value) -> Result<RawResponse, WebhookError> {
        let action = body.get("action").and_then(Value::as_str).unwrap_or("?");
        let response = self.http.post(&self.url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        log::debug!("webhook action={action} status={status}");
        Ok(RawResponse { status, text })
    }

    /// Check an admin password.
    pub async fn authenticate(&self, password: &str) -> Result<(), WebhookError> {
        let raw = self
            .post(&json!({ "action": "auth", "password": password }))
            .await?;
        // Any non-success status is a refusal, whatever the body looks like.
        if !raw.status.is_success() {
            let message = raw
                .json()
                .ok()
                .and_then(|d| error_message(&d))
                .unwrap_or_else(|| DEFAULT_AUTH_MESSAGE.to_string());
            return Err(WebhookError::InvalidCredentials(message));
        }

        let data = raw.json()?;
        if data.get("error").is_some_and(is_truthy) {
            let message = error_message(&data).unwrap_or_else(|| DEFAULT_AUTH_MESSAGE.to_string());
            return Err(WebhookError::InvalidCredentials(message));
        }
        Ok(())
    }

    /// Fetch every lead, in the order the webhook returns them.
    pub async fn fetch_leads(&self, token: &str) -> Result<Vec<LeadRecord>, WebhookError> {
        let raw = self
            .post(&json!({ "action": "get", "password": token }))
            .await?;
        log::debug!("webhook get response: {}", raw.text);

        if matches!(raw.status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            let message = raw
                .json()
                .ok()
                .and_then(|d| error_message(&d))
                .unwrap_or_else(|| DEFAULT_AUTH_MESSAGE.to_string());
            return Err(WebhookError::InvalidCredentials(message));
        }

        let data = raw.json()?;
        if data.get("error").is_some_and(is_truthy) {
            let message = error_message(&data).unwrap_or_else(|| "Unknown error".to_string());
            if message.to_lowercase().contains("password") {
                return Err(WebhookError::InvalidCredentials(message));
            }
            return Err(WebhookError::Rejected(message));
        }

        Ok(leads_from_response(data))
    }

    /// Ask the webhook to delete the lead with this email. Best effort: only
    /// transport failures are reported.
    pub async fn delete_lead(&self, token: &str, email: &str) -> Result<(), WebhookError> {
        let raw = self
            .post(&json!({ "action": "delete", "password": token, "email": email }))
            .await?;
        if !raw.status.is_success() {
            log::warn!("webhook delete for {email} answered {}", raw.status);
        }
        Ok(())
    }

    /// Store a new lead.
    pub async fn submit_lead(&self, submission: &LeadSubmission) -> Result<(), WebhookError> {
        let mut body = serde_json::to_value(submission)
            .map_err(|e| WebhookError::Rejected(e.to_string()))?;
        if let Some(obj) = body.as_object_mut() {
            obj.insert("action".to_string(), Value::from("formsubmit"));
        }

        let raw = self.post(&body).await?;
        // Success responses are not required to carry JSON.
        let data = raw.json().unwrap_or(Value::Null);

        if raw.status == StatusCode::CONFLICT
            || data.get("error").and_then(Value::as_str) == Some("duplicate_email")
        {
            return Err(WebhookError::DuplicateEmail);
        }
        if !raw.status.is_success() {
            return Err(WebhookError::Status(raw.status.as_u16()));
        }
        Ok(())
    }
}

fn error_message(data: &Value) -> Option<String> {
    data.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// `leads` may be missing, null, a list, or a single object.
fn leads_from_response(data: Value) -> Vec<LeadRecord> {
    match data {
        Value::Object(mut obj) => match obj.remove("leads") {
            Some(Value::Array(items)) => items.into_iter().map(LeadRecord::from).collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(single) => {
                log::warn!("Received non-array leads, wrapping in array");
                vec![LeadRecord::from(single)]
            }
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leads_shapes() {
        assert!(leads_from_response(json!({})).is_empty());
        assert!(leads_from_response(json!({"leads": null})).is_empty());
        assert_eq!(leads_from_response(json!({"leads": [{"a": 1}, {"b": 2}]})).len(), 2);
        let single = leads_from_response(json!({"leads": {"email": "x@y.z"}}));
        assert_eq!(single.len(), 1);
        assert!(single[0].get("email").is_some());
    }

    #[test]
    fn submission_uses_wire_names() {
        let sub = LeadSubmission {
            full_name: "Mari".into(),
            email: "m@example.ee".into(),
            phone: None,
            language_level: "A1".into(),
            future_goal: "work in Tallinn".into(),
            estonian_knowledge: "a few words".into(),
            timestamp: "2026-01-17T10:00:00.000Z".into(),
        };
        let v = serde_json::to_value(&sub).unwrap();
        assert_eq!(v["fullName"], "Mari");
        assert_eq!(v["estonianKnowledge"], "a few words");
        assert!(v["phone"].is_null());
    }

    #[test]
    fn invalid_json_excerpt_is_truncated() {
        let raw = RawResponse {
            status: StatusCode::OK,
            text: "x".repeat(500),
        };
        match raw.json() {
            Err(WebhookError::InvalidJson { excerpt, status }) => {
                assert_eq!(excerpt.len(), 100);
                assert_eq!(status, 200);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
