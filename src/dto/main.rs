use serde::Serialize;

/// One row of the home page's revenue opportunity widget.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OpportunityRow {
    pub name: String,
    pub initials: String,
    pub action: String,
    pub value: f64,
    /// `$12K` / `$12.5K`.
    pub value_text: String,
    pub icon: &'static str,
    pub avatar_color: &'static str,
}

/// Data required to render the home dashboard.
#[derive(Debug, Serialize)]
pub struct IndexPageData {
    /// The three largest opportunities.
    pub top_opportunities: Vec<OpportunityRow>,
    /// Sum over every opportunity, e.g. `+$12,500`.
    pub total_text: String,
    /// Opportunities not listed in `top_opportunities`.
    pub remaining_count: usize,
    pub client_count: usize,
    pub billing: MetricPanel,
    pub payments: MetricPanel,
    pub action_required: Vec<ActionItem>,
    pub recent: Vec<RecentItem>,
}

/// One month of a dashboard bar chart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthBar {
    pub month: &'static str,
    pub value: u32,
    /// Bar height relative to the tallest bar of the series.
    pub height_percent: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricStat {
    pub label: &'static str,
    pub value: &'static str,
    pub detail: &'static str,
    pub progress_percent: Option<u32>,
}

/// Billing or payments panel: a twelve month chart and its headline figures.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricPanel {
    pub title: &'static str,
    pub subtitle: &'static str,
    /// CSS class of the bars.
    pub tone: &'static str,
    pub bars: Vec<MonthBar>,
    pub stats: Vec<MetricStat>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActionItem {
    pub icon: &'static str,
    pub count: u32,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecentItem {
    pub company: &'static str,
    pub kind: &'static str,
}
