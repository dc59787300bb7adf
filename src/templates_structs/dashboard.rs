use askama::Template;

use crate::leads::NormalizedLead;
use crate::leads::charts::ChartWindow;
use crate::leads::stats::LeadStats;

use super::PageContext;

/// One choice in the growth-chart window selector.
pub struct WindowOption {
    pub value: String,
    pub label: &'static str,
    pub selected: bool,
}

impl WindowOption {
    pub fn all_for(current: ChartWindow) -> Vec<WindowOption> {
        [
            (ChartWindow::Days(7), "Last 7 days"),
            (ChartWindow::Days(30), "Last 30 days"),
            (ChartWindow::All, "All time"),
        ]
        .into_iter()
        .map(|(window, label)| WindowOption {
            value: window.as_param(),
            label,
            selected: window == current,
        })
        .collect()
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub rows: Vec<NormalizedLead>,
    pub stats: LeadStats,
    /// Replaces the table when the fetch failed.
    pub load_error: Option<String>,
    pub window_options: Vec<WindowOption>,
    pub growth_json: String,
    pub levels_json: String,
}
