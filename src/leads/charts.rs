use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Local, NaiveDate};
use serde::Serialize;

use super::LeadRecord;

const LABEL_FORMAT: &str = "%b %-d";
const DEFAULT_WINDOW_DAYS: u32 = 7;

/// How far back the growth chart looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartWindow {
    Days(u32),
    All,
}

impl Default for ChartWindow {
    fn default() -> Self {
        ChartWindow::Days(DEFAULT_WINDOW_DAYS)
    }
}

impl ChartWindow {
    /// Parse the dashboard's filter value (`"7"`, `"30"`, `"all"`); anything else is the default.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("all") => ChartWindow::All,
            Some(v) => v
                .parse::<u32>()
                .ok()
                .filter(|d| *d > 0)
                .map(ChartWindow::Days)
                .unwrap_or_default(),
            None => ChartWindow::default(),
        }
    }

    pub fn as_param(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChartWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartWindow::Days(d) => write!(f, "{d}"),
            ChartWindow::All => write!(f, "all"),
        }
    }
}

/// Leads per calendar day, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrowthSeries {
    pub labels: Vec<String>,
    pub data: Vec<usize>,
}

pub fn growth_series(leads: &[LeadRecord], window: ChartWindow) -> GrowthSeries {
    growth_series_at(leads, window, Local::now())
}

/// Group timestamps by local date. Days are keyed by the date itself, so
/// ordering never depends on the display label.
pub fn growth_series_at(
    leads: &[LeadRecord],
    window: ChartWindow,
    now: DateTime<Local>,
) -> GrowthSeries {
    // A window reaching past the representable range covers everything.
    let cutoff = match window {
        ChartWindow::Days(days) => Duration::try_days(i64::from(days))
            .and_then(|span| now.checked_sub_signed(span)),
        ChartWindow::All => None,
    };

    let mut grouped: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for ts in leads.iter().filter_map(LeadRecord::timestamp) {
        if cutoff.is_some_and(|c| ts < c) {
            continue;
        }
        *grouped.entry(ts.date_naive()).or_default() += 1;
    }

    if grouped.is_empty() {
        grouped.insert(now.date_naive(), 0);
    }

    let (labels, data) = grouped
        .into_iter()
        .map(|(date, count)| (date.format(LABEL_FORMAT).to_string(), count))
        .unzip();
    GrowthSeries { labels, data }
}

pub const LEVEL_BUCKETS: [&str; 5] = ["A1", "A2", "B1", "B2", "Other"];
pub const LEVEL_LABELS: [&str; 5] = [
    "A1 (Beginner)",
    "A2 (Elementary)",
    "B1 (Intermediate)",
    "B2 (Upper)",
    "Other",
];

/// Lead counts per language level, in [`LEVEL_BUCKETS`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelDistribution {
    pub labels: [&'static str; 5],
    pub counts: [usize; 5],
}

/// Each lead lands in exactly one bucket: the first of A1, A2, B1, B2 its
/// uppercased level contains, else Other.
pub fn level_distribution(leads: &[LeadRecord]) -> LevelDistribution {
    let mut counts = [0usize; 5];
    for lead in leads {
        counts[level_bucket(&lead.level())] += 1;
    }
    LevelDistribution {
        labels: LEVEL_LABELS,
        counts,
    }
}

fn level_bucket(level: &str) -> usize {
    let upper = level.to_uppercase();
    LEVEL_BUCKETS[..4]
        .iter()
        .position(|tag| upper.contains(tag))
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 1, 17, 12, 0, 0).unwrap()
    }

    fn lead_at(ts: DateTime<Local>) -> LeadRecord {
        json!({"timestamp": ts.to_rfc3339()}).into()
    }

    fn lead_level(level: &str) -> LeadRecord {
        json!({"Level": level}).into()
    }

    #[test]
    fn window_parsing() {
        assert_eq!(ChartWindow::parse(Some("30")), ChartWindow::Days(30));
        assert_eq!(ChartWindow::parse(Some("ALL")), ChartWindow::All);
        assert_eq!(ChartWindow::parse(Some("nope")), ChartWindow::Days(7));
        assert_eq!(ChartWindow::parse(Some("0")), ChartWindow::Days(7));
        assert_eq!(ChartWindow::parse(None), ChartWindow::Days(7));
        assert_eq!(ChartWindow::All.as_param(), "all");
    }

    #[test]
    fn empty_window_yields_single_zero_point() {
        let old = vec![lead_at(now() - Duration::days(40))];
        let series = growth_series_at(&old, ChartWindow::Days(7), now());
        assert_eq!(series.labels, vec!["Jan 17"]);
        assert_eq!(series.data, vec![0]);

        let none = growth_series_at(&[], ChartWindow::All, now());
        assert_eq!(none.data, vec![0]);
    }

    #[test]
    fn groups_by_day_and_filters_by_window() {
        let leads = vec![
            lead_at(now() - Duration::hours(1)),
            lead_at(now() - Duration::days(2)),
            lead_at(now() - Duration::hours(2)),
            lead_at(now() - Duration::days(10)),
        ];
        let week = growth_series_at(&leads, ChartWindow::Days(7), now());
        assert_eq!(week.labels, vec!["Jan 15", "Jan 17"]);
        assert_eq!(week.data, vec![1, 2]);

        let all = growth_series_at(&leads, ChartWindow::All, now());
        assert_eq!(all.labels, vec!["Jan 7", "Jan 15", "Jan 17"]);
        assert_eq!(all.data, vec![1, 1, 2]);
    }

    #[test]
    fn huge_window_covers_everything() {
        let leads = vec![
            lead_at(now() - Duration::days(400)),
            lead_at(now() - Duration::hours(1)),
        ];
        let window = ChartWindow::parse(Some("100000000"));
        assert_eq!(window, ChartWindow::Days(100_000_000));
        let series = growth_series_at(&leads, window, now());
        assert_eq!(series.data, vec![1, 1]);

        let widest = growth_series_at(&leads, ChartWindow::Days(u32::MAX), now());
        assert_eq!(widest, growth_series_at(&leads, ChartWindow::All, now()));
    }

    #[test]
    fn ordering_spans_year_boundary() {
        let leads = vec![
            lead_at(Local.with_ymd_and_hms(2026, 1, 2, 9, 0, 0).unwrap()),
            lead_at(Local.with_ymd_and_hms(2025, 12, 30, 9, 0, 0).unwrap()),
        ];
        let series = growth_series_at(&leads, ChartWindow::All, now());
        assert_eq!(series.labels, vec!["Dec 30", "Jan 2"]);
    }

    #[test]
    fn records_without_timestamp_are_skipped() {
        let leads: Vec<LeadRecord> = vec![json!({"fullName": "No Date"}).into(), lead_at(now())];
        let series = growth_series_at(&leads, ChartWindow::All, now());
        assert_eq!(series.data, vec![1]);
    }

    #[test]
    fn level_buckets_first_match() {
        let leads = vec![
            lead_level("Beginner (A1)"),
            lead_level("a2"),
            lead_level("B1 Intermediate"),
            lead_level("B2"),
            lead_level("C1"),
            lead_level("A1/A2"),
        ];
        let dist = level_distribution(&leads);
        assert_eq!(dist.counts, [2, 1, 1, 1, 1]);
        assert_eq!(dist.counts.iter().sum::<usize>(), leads.len());
    }

    #[test]
    fn empty_distribution_is_zero() {
        assert_eq!(level_distribution(&[]).counts, [0; 5]);
    }

    #[test]
    fn missing_level_is_other() {
        let leads: Vec<LeadRecord> = vec![json!({}).into()];
        assert_eq!(level_distribution(&leads).counts, [0, 0, 0, 0, 1]);
    }
}
