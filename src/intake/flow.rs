use chrono::{DateTime, SecondsFormat, Utc};

use super::phone::PhoneValidator;
use super::validate::{FieldErrors, FormField, IntakeForm, validate_all};
use crate::webhook::{LeadSubmission, WebhookClient, WebhookError};

pub const DUPLICATE_EMAIL_MESSAGE: &str = "This email is already registered.";
pub const FAILURE_NOTICE: &str = "There was an error submitting your form. Please try again.";

/// Where one intake submission stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    DuplicateEmail,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionEvent {
    Submit,
    ValidationFailed,
    ValidationPassed,
    Accepted,
    Duplicate,
    Error,
    Reset,
}

impl SubmissionState {
    /// Apply an event. Events that do not fit the current state leave it unchanged.
    pub fn on(self, event: SubmissionEvent) -> Self {
        use SubmissionEvent as E;
        use SubmissionState as S;
        match (self, event) {
            (S::Idle, E::Submit) => S::Validating,
            (S::Validating, E::ValidationFailed) => S::Idle,
            (S::Validating, E::ValidationPassed) => S::Submitting,
            (S::Submitting, E::Accepted) => S::Succeeded,
            (S::Submitting, E::Duplicate) => S::DuplicateEmail,
            (S::Submitting, E::Error) => S::Failed,
            (S::Succeeded | S::DuplicateEmail | S::Failed, E::Reset) => S::Idle,
            (state, _) => state,
        }
    }

    pub fn is_finished(self) -> bool {
        matches!(
            self,
            SubmissionState::Succeeded | SubmissionState::DuplicateEmail | SubmissionState::Failed
        )
    }
}

/// Result of running one submission through the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeOutcome {
    /// `Idle` when validation blocked the submit.
    pub state: SubmissionState,
    pub errors: FieldErrors,
    pub notice: Option<String>,
}

impl IntakeOutcome {
    pub fn succeeded(&self) -> bool {
        self.state == SubmissionState::Succeeded
    }
}

/// Build the webhook payload from a validated form.
pub fn build_submission(
    form: &IntakeForm,
    phone: &dyn PhoneValidator,
    now: DateTime<Utc>,
) -> LeadSubmission {
    let raw_phone = form.phone.trim();
    let phone = if raw_phone.is_empty() {
        None
    } else {
        phone
            .normalize(raw_phone, form.country())
            .or_else(|| Some(raw_phone.to_string()))
    };
    LeadSubmission {
        full_name: form.full_name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone,
        language_level: form.language_level.as_deref().unwrap_or("").trim().to_string(),
        future_goal: form.future_goal.trim().to_string(),
        estonian_knowledge: form.estonian_knowledge.trim().to_string(),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Validate and, if everything passes, post the lead.
pub async fn submit_intake(
    client: &WebhookClient,
    form: &IntakeForm,
    phone: &dyn PhoneValidator,
) -> IntakeOutcome {
    let mut state = SubmissionState::Idle.on(SubmissionEvent::Submit);

    let errors = validate_all(form, phone);
    if !errors.is_empty() {
        state = state.on(SubmissionEvent::ValidationFailed);
        log::debug!("intake blocked by {} invalid field(s)", errors.len());
        return IntakeOutcome { state, errors, notice: None };
    }
    state = state.on(SubmissionEvent::ValidationPassed);

    let submission = build_submission(form, phone, Utc::now());
    let mut errors = FieldErrors::default();
    let mut notice = None;

    state = match client.submit_lead(&submission).await {
        Ok(()) => {
            log::info!("intake accepted for {}", submission.email);
            state.on(SubmissionEvent::Accepted)
        }
        Err(WebhookError::DuplicateEmail) => {
            log::info!("intake rejected, duplicate email {}", submission.email);
            errors.set(FormField::Email, DUPLICATE_EMAIL_MESSAGE);
            state.on(SubmissionEvent::Duplicate)
        }
        Err(e) => {
            log::error!("intake submission failed: {e}");
            notice = Some(FAILURE_NOTICE.to_string());
            state.on(SubmissionEvent::Error)
        }
    };

    IntakeOutcome { state, errors, notice }
}
