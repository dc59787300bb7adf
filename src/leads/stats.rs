use chrono::{DateTime, Local};

use super::LeadRecord;

/// Summary numbers shown above the leads table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeadStats {
    pub total: usize,
    pub today: usize,
    pub a1_percent: u32,
}

pub fn compute(leads: &[LeadRecord]) -> LeadStats {
    compute_at(leads, Local::now())
}

/// Same as [`compute`], with "today" taken from `now`.
pub fn compute_at(leads: &[LeadRecord], now: DateTime<Local>) -> LeadStats {
    let total = leads.len();
    let today_date = now.date_naive();

    let today = leads
        .iter()
        .filter_map(LeadRecord::timestamp)
        .filter(|ts| ts.date_naive() == today_date)
        .count();

    let a1 = leads
        .iter()
        .filter(|lead| lead.level().to_uppercase().contains("A1"))
        .count();

    LeadStats {
        total,
        today,
        a1_percent: rounded_percent(a1, total),
    }
}

/// Percentage rounded half up; zero for an empty denominator.
fn rounded_percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part * 200 + total) / (2 * total)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 1, 17, 12, 0, 0).unwrap()
    }

    fn lead_at(ts: DateTime<Local>, level: &str) -> LeadRecord {
        json!({"timestamp": ts.to_rfc3339(), "languageLevel": level}).into()
    }

    #[test]
    fn empty_collection_is_all_zero() {
        assert_eq!(compute_at(&[], now()), LeadStats::default());
    }

    #[test]
    fn all_today_equals_total() {
        let leads = vec![
            lead_at(now() - Duration::hours(3), "A1"),
            lead_at(now() + Duration::hours(2), "B1"),
            lead_at(now() - Duration::minutes(5), "A2"),
        ];
        let stats = compute_at(&leads, now());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.today, 3);
    }

    #[test]
    fn yesterday_and_missing_timestamps_do_not_count_as_today() {
        let leads: Vec<LeadRecord> = vec![
            lead_at(now() - Duration::days(1), "A1"),
            json!({"languageLevel": "A1"}).into(),
            lead_at(now(), "A1"),
        ];
        assert_eq!(compute_at(&leads, now()).today, 1);
    }

    #[test]
    fn a1_percent_is_case_insensitive_and_rounded() {
        let leads = vec![
            lead_at(now(), "Beginner (a1)"),
            lead_at(now(), "B2"),
            lead_at(now(), "A2"),
        ];
        // 1/3 = 33.3%
        assert_eq!(compute_at(&leads, now()).a1_percent, 33);

        let halves = vec![lead_at(now(), "A1"), lead_at(now(), "B1")];
        assert_eq!(compute_at(&halves, now()).a1_percent, 50);
    }

    #[test]
    fn rounding_goes_half_up() {
        assert_eq!(rounded_percent(1, 8), 13); // 12.5
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(0, 0), 0);
    }
}
