use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::auth::csrf;
use crate::errors::{AppError, render};
use crate::intake::flow::submit_intake;
use crate::intake::phone::{DEFAULT_COUNTRY, PhoneValidator};
use crate::intake::validate::{self, FieldErrors, FormField, IntakeForm};
use crate::templates_structs::{APP_NAME, IntakeSuccessTemplate, IntakeTemplate};
use crate::webhook::WebhookClient;

/// Body of a single-field check, sent when a field loses focus.
#[derive(Deserialize)]
pub struct FieldCheck {
    pub field: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FieldCheckResult {
    pub field: String,
    pub valid: bool,
    pub message: Option<String>,
}

/// GET / — empty intake form.
pub async fn form_page(session: Session) -> Result<HttpResponse, AppError> {
    let csrf_token = csrf::get_or_create_token(&session);
    render(IntakeTemplate::new(
        APP_NAME,
        csrf_token,
        IntakeForm::default(),
        FieldErrors::default(),
    ))
}

/// POST / — validate, submit to the webhook, then show success or the form again.
pub async fn submit(
    session: Session,
    form: web::Form<IntakeForm>,
    webhook: web::Data<WebhookClient>,
    phone: web::Data<dyn PhoneValidator>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let form = form.into_inner();

    let outcome = submit_intake(&webhook, &form, phone.get_ref()).await;
    if outcome.succeeded() {
        let first_name = form
            .full_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        return render(IntakeSuccessTemplate {
            app_name: APP_NAME.to_string(),
            first_name,
        });
    }

    let csrf_token = csrf::get_or_create_token(&session);
    render(IntakeTemplate::new(APP_NAME, csrf_token, form, outcome.errors).with_notice(outcome.notice))
}

/// POST /intake/validate — check one field, for inline feedback.
pub async fn validate_field(
    body: web::Json<FieldCheck>,
    phone: web::Data<dyn PhoneValidator>,
) -> Result<HttpResponse, AppError> {
    let field = FormField::from_id(&body.field).ok_or(AppError::NotFound)?;
    let country = body.country.as_deref().unwrap_or(DEFAULT_COUNTRY);
    let message = validate::validate_field(field, &body.value, country, phone.get_ref());

    Ok(HttpResponse::Ok().json(FieldCheckResult {
        field: field.id().to_string(),
        valid: message.is_none(),
        message,
    }))
}
