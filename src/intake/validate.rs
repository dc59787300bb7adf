use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::phone::{DEFAULT_COUNTRY, PhoneValidator};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

const MIN_NAME_LEN: usize = 2;
const MIN_DETAIL_LEN: usize = 10;

/// Radio options for the language-level question: (value, label).
pub const LANGUAGE_LEVELS: [(&str, &str); 5] = [
    ("A1", "A1 · Beginner"),
    ("A2", "A2 · Elementary"),
    ("B1", "B1 · Intermediate"),
    ("B2", "B2 · Upper intermediate"),
    ("C1+", "C1 or above"),
];

/// Intake form fields, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    FullName,
    Email,
    Phone,
    LanguageLevel,
    FutureGoal,
    EstonianKnowledge,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::FullName,
        FormField::Email,
        FormField::Phone,
        FormField::LanguageLevel,
        FormField::FutureGoal,
        FormField::EstonianKnowledge,
    ];

    /// The element id / form name used in the page.
    pub fn id(self) -> &'static str {
        match self {
            FormField::FullName => "fullName",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::LanguageLevel => "languageLevel",
            FormField::FutureGoal => "futureGoal",
            FormField::EstonianKnowledge => "estonianKnowledge",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }
}

/// Submitted intake form, as posted by the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntakeForm {
    #[serde(rename = "fullName", default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(rename = "phoneCountry", default)]
    pub phone_country: String,
    #[serde(rename = "languageLevel", default)]
    pub language_level: Option<String>,
    #[serde(rename = "futureGoal", default)]
    pub future_goal: String,
    #[serde(rename = "estonianKnowledge", default)]
    pub estonian_knowledge: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl IntakeForm {
    pub fn country(&self) -> &str {
        if self.phone_country.trim().is_empty() {
            DEFAULT_COUNTRY
        } else {
            self.phone_country.trim()
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::FullName => &self.full_name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::LanguageLevel => self.language_level.as_deref().unwrap_or(""),
            FormField::FutureGoal => &self.future_goal,
            FormField::EstonianKnowledge => &self.estonian_knowledge,
        }
    }

    /// Whether a language-level option is the selected one (for re-rendering).
    pub fn level_is(&self, option: &str) -> bool {
        self.language_level.as_deref() == Some(option)
    }
}

/// Validate one field. `None` means valid; otherwise the message to show.
pub fn validate_field(
    field: FormField,
    value: &str,
    country: &str,
    phone: &dyn PhoneValidator,
) -> Option<String> {
    let trimmed = value.trim();
    match field {
        FormField::FullName => {
            if trimmed.is_empty() {
                Some("Please enter your full name".to_string())
            } else if trimmed.chars().count() < MIN_NAME_LEN {
                Some(format!("Name must be at least {MIN_NAME_LEN} characters"))
            } else {
                None
            }
        }
        FormField::Email => {
            if trimmed.is_empty() {
                Some("Please enter your email address".to_string())
            } else if !EMAIL_RE.is_match(trimmed) {
                Some("Please enter a valid email address".to_string())
            } else {
                None
            }
        }
        // Optional, but must be a real number when given.
        FormField::Phone => {
            if !trimmed.is_empty() && !phone.is_valid(trimmed, country) {
                Some("Please enter a valid phone number".to_string())
            } else {
                None
            }
        }
        FormField::LanguageLevel => {
            if LANGUAGE_LEVELS.iter().any(|(v, _)| *v == trimmed) {
                None
            } else {
                Some("Please select your current language level".to_string())
            }
        }
        FormField::FutureGoal | FormField::EstonianKnowledge => {
            if trimmed.is_empty() {
                Some("This field is required".to_string())
            } else if trimmed.chars().count() < MIN_DETAIL_LEN {
                Some(format!(
                    "Please provide more detail (at least {MIN_DETAIL_LEN} characters)"
                ))
            } else {
                None
            }
        }
    }
}

/// Field errors from one validation pass, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(FormField, String)>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn set(&mut self, field: FormField, message: impl Into<String>) {
        let message = message.into();
        match self.0.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = message,
            None => self.0.push((field, message)),
        }
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    /// Lookup by element id, for templates.
    pub fn message(&self, id: &str) -> Option<&str> {
        FormField::from_id(id).and_then(|f| self.get(f))
    }

    /// The field to focus after a failed submit.
    pub fn first(&self) -> Option<FormField> {
        FormField::ALL.into_iter().find(|f| self.get(*f).is_some())
    }

    pub fn first_id(&self) -> &'static str {
        self.first().map(FormField::id).unwrap_or("")
    }
}

/// Re-validate every field.
pub fn validate_all(form: &IntakeForm, phone: &dyn PhoneValidator) -> FieldErrors {
    let mut errors = FieldErrors::default();
    for field in FormField::ALL {
        if let Some(message) = validate_field(field, form.value(field), form.country(), phone) {
            errors.set(field, message);
        }
    }
    errors
}

/// Share of the five required fields that are filled in, 0..=100.
pub fn progress_percent(form: &IntakeForm) -> u32 {
    const REQUIRED: [FormField; 5] = [
        FormField::FullName,
        FormField::Email,
        FormField::LanguageLevel,
        FormField::FutureGoal,
        FormField::EstonianKnowledge,
    ];
    let filled = REQUIRED
        .iter()
        .filter(|f| !form.value(**f).trim().is_empty())
        .count();
    (filled * 100 / REQUIRED.len()) as u32
}
