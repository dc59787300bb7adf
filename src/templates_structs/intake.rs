use askama::Template;

use crate::intake::phone::PREFERRED_COUNTRIES;
use crate::intake::validate::{FieldErrors, IntakeForm, LANGUAGE_LEVELS, progress_percent};

pub struct LevelOption {
    pub value: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

pub struct CountryOption {
    pub code: &'static str,
    pub label: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "intake.html")]
pub struct IntakeTemplate {
    pub app_name: String,
    pub csrf_token: String,
    pub form: IntakeForm,
    pub errors: FieldErrors,
    pub notice: Option<String>,
    /// Element id to autofocus; empty for none.
    pub focus: String,
    pub progress: u32,
    pub levels: Vec<LevelOption>,
    pub countries: Vec<CountryOption>,
}

impl IntakeTemplate {
    pub fn new(app_name: &str, csrf_token: String, form: IntakeForm, errors: FieldErrors) -> Self {
        let levels = LANGUAGE_LEVELS
            .iter()
            .map(|&(value, label)| LevelOption {
                value,
                label,
                checked: form.level_is(value),
            })
            .collect();
        let country = form.country().to_string();
        let countries = PREFERRED_COUNTRIES
            .iter()
            .map(|c| CountryOption {
                code: c.code,
                label: format!("{} +{}", c.name, c.dial_code),
                selected: c.code.eq_ignore_ascii_case(&country),
            })
            .collect();
        Self {
            app_name: app_name.to_string(),
            csrf_token,
            focus: errors.first_id().to_string(),
            progress: progress_percent(&form),
            form,
            errors,
            notice: None,
            levels,
            countries,
        }
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }
}

#[derive(Template)]
#[template(path = "intake_success.html")]
pub struct IntakeSuccessTemplate {
    pub app_name: String,
    pub first_name: String,
}
