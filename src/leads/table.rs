use super::{LeadRecord, NormalizedLead};

/// Badge style for the email-delivery status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    Success,
    Warning,
    Default,
}

impl StatusBadge {
    /// Case-sensitive substring match; "Failed" takes precedence over "Sent".
    pub fn for_status(status: &str) -> Self {
        if status.contains("Failed") {
            StatusBadge::Warning
        } else if status.contains("Sent") {
            StatusBadge::Success
        } else {
            StatusBadge::Default
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            StatusBadge::Success => "status-converted",
            StatusBadge::Warning => "status-contacted",
            StatusBadge::Default => "status-new",
        }
    }
}

/// Rows for the leads table, newest first.
///
/// "Newest" means reversed fetch order: the webhook appends, so the last
/// element is assumed most recent. Timestamps are not consulted.
pub fn table_rows(leads: &[LeadRecord]) -> Vec<NormalizedLead> {
    leads.iter().rev().map(LeadRecord::normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn badge_selection() {
        assert_eq!(StatusBadge::for_status("Sent"), StatusBadge::Success);
        assert_eq!(StatusBadge::for_status("Email Sent OK"), StatusBadge::Success);
        assert_eq!(StatusBadge::for_status("Failed: bounce"), StatusBadge::Warning);
        assert_eq!(StatusBadge::for_status("Pending"), StatusBadge::Default);
        assert_eq!(StatusBadge::for_status("sent"), StatusBadge::Default);
        assert_eq!(StatusBadge::Warning.css_class(), "status-contacted");
    }

    #[test]
    fn rows_are_reversed_not_sorted() {
        let leads: Vec<LeadRecord> = vec![
            json!({"fullName": "First", "timestamp": "2026-01-20T00:00:00Z"}).into(),
            json!({"fullName": "Second", "timestamp": "2025-06-01T00:00:00Z"}).into(),
            json!({"fullName": "Third", "timestamp": "2026-03-01T00:00:00Z"}).into(),
        ];
        let names: Vec<String> = table_rows(&leads).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Third", "Second", "First"]);
    }
}
