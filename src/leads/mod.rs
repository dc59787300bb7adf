//! Lead records as returned by the webhook, and the field normalizer that
//! copes with their inconsistent key spelling.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod cache;
pub mod charts;
pub mod export;
pub mod stats;
pub mod table;
pub mod timestamp;

pub use self::table::StatusBadge;

/// One raw lead as delivered by the webhook. Keys are not stable; read them
/// through [`LeadRecord::resolve`] rather than indexing directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct LeadRecord(Map<String, Value>);

impl From<Value> for LeadRecord {
    /// Non-object values degrade to an empty record.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => LeadRecord(map),
            _ => LeadRecord::default(),
        }
    }
}

impl From<LeadRecord> for Value {
    fn from(record: LeadRecord) -> Self {
        Value::Object(record.0)
    }
}

impl From<Map<String, Value>> for LeadRecord {
    fn from(map: Map<String, Value>) -> Self {
        LeadRecord(map)
    }
}

/// Logical fields of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadField {
    Timestamp,
    Name,
    Email,
    Phone,
    Level,
    Goal,
    Knowledge,
    EmailStatus,
}

impl LeadField {
    /// Candidate keys in lookup order.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            LeadField::Timestamp => &["timestamp", "Timestamp"],
            LeadField::Name => &["fullName", "name", "Name", "Full Name"],
            LeadField::Email => &["email", "Email"],
            LeadField::Phone => &["phone", "Phone"],
            LeadField::Level => &["languageLevel", "language_level", "Level", "Language Level"],
            LeadField::Goal => &["futureGoal", "Future Goal", "Goal"],
            LeadField::Knowledge => &["estonianKnowledge", "Estonian Knowledge", "Current Knowledge"],
            LeadField::EmailStatus => &["Email Status", "emailStatus"],
        }
    }

    /// Value shown when no candidate key holds anything.
    pub fn default_value(self) -> &'static str {
        match self {
            LeadField::Timestamp | LeadField::Email => "",
            LeadField::Name => "Unknown",
            LeadField::Phone | LeadField::Goal | LeadField::Knowledge => "-",
            LeadField::Level => "N/A",
            LeadField::EmailStatus => "Pending",
        }
    }
}

impl LeadRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// First present, non-empty value among the field's candidate keys.
    pub fn resolve(&self, field: LeadField) -> Option<String> {
        field
            .candidates()
            .iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(value_text)
    }

    pub fn value_or_default(&self, field: LeadField) -> String {
        self.resolve(field)
            .unwrap_or_else(|| field.default_value().to_string())
    }

    /// Parsed submission time, if the record carries a readable one.
    pub fn timestamp(&self) -> Option<DateTime<Local>> {
        self.resolve(LeadField::Timestamp)
            .and_then(|raw| timestamp::parse_timestamp(&raw))
    }

    /// Level string used for bucketing; empty when unknown.
    pub fn level(&self) -> String {
        self.resolve(LeadField::Level).unwrap_or_default()
    }

    pub fn normalize(&self) -> NormalizedLead {
        let timestamp = self.timestamp();
        let display_date = timestamp
            .map(|ts| ts.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let email_status = self.value_or_default(LeadField::EmailStatus);
        NormalizedLead {
            timestamp,
            display_date,
            name: self.value_or_default(LeadField::Name),
            email: self.value_or_default(LeadField::Email),
            phone: self.value_or_default(LeadField::Phone),
            level: self.value_or_default(LeadField::Level),
            goal: self.value_or_default(LeadField::Goal),
            knowledge: self.value_or_default(LeadField::Knowledge),
            badge: StatusBadge::for_status(&email_status),
            email_status,
        }
    }
}

/// Text of a JSON value, or `None` when it counts as absent
/// (null, false, empty or whitespace-only string).
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// A lead with every logical field resolved, ready for display.
#[derive(Debug, Clone)]
pub struct NormalizedLead {
    pub timestamp: Option<DateTime<Local>>,
    pub display_date: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub level: String,
    pub goal: String,
    pub knowledge: String,
    pub email_status: String,
    pub badge: StatusBadge,
}

/// Loose JSON truthiness, used for the webhook's `error` flag.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
