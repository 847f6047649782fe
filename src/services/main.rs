use crate::domain::format::{compact_thousands, grouped};
use crate::domain::rules::{KeywordRule, first_keyword_match};
use crate::domain::types::SessionId;
use crate::domain::view_model::ClientViewModel;
use crate::dto::main::{
    ActionItem, IndexPageData, MetricPanel, MetricStat, MonthBar, OpportunityRow, RecentItem,
};
use crate::repository::SessionWriter;
use crate::services::ServiceResult;
use crate::services::dataset::ReviewDataset;

/// Opportunities listed by name on the dashboard.
const TOP_OPPORTUNITIES: usize = 3;

const AVATAR_COLORS: &[&str] = &[
    "#f97316", "#3b82f6", "#16a34a", "#8b5cf6", "#ef4444", "#0891b2",
];

const DEFAULT_ICON: &str = "⚡";

const OPPORTUNITY_ICONS: &[KeywordRule] = &[
    KeywordRule { keywords: &["schedule"], label: "⚡" },
    KeywordRule { keywords: &["upsell"], label: "📋" },
    KeywordRule { keywords: &["propose"], label: "📅" },
    KeywordRule { keywords: &["contract"], label: "📅" },
];

/// Financial year months, July first.
const MONTHS: [&str; 12] = [
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar", "Apr", "May", "Jun",
];
const BILLING_SERIES: [u32; 12] = [78, 52, 46, 42, 65, 56, 74, 88, 50, 46, 42, 42];
const PAYMENTS_SERIES: [u32; 12] = [82, 50, 40, 30, 56, 50, 44, 86, 60, 44, 40, 36];

/// Shortest bar drawn, so empty months stay visible.
const MIN_BAR_PERCENT: u32 = 4;

const BILLING_STATS: &[MetricStat] = &[
    MetricStat {
        label: "Unbilled",
        value: "$370",
        detail: "to bill on completion",
        progress_percent: None,
    },
    MetricStat {
        label: "Billed this financial year",
        value: "$46k",
        detail: "/ $58k",
        progress_percent: Some(79),
    },
    MetricStat {
        label: "Growth goal",
        value: "11%",
        detail: "complete / $8k",
        progress_percent: Some(11),
    },
];

const PAYMENTS_STATS: &[MetricStat] = &[
    MetricStat {
        label: "This month",
        value: "$50",
        detail: "/ $495",
        progress_percent: Some(10),
    },
    MetricStat {
        label: "Next month",
        value: "$495k",
        detail: "expected",
        progress_percent: None,
    },
    MetricStat {
        label: "This financial year",
        value: "$0",
        detail: "/ $6.4k",
        progress_percent: Some(0),
    },
];

const ACTION_REQUIRED: &[ActionItem] = &[
    ActionItem { icon: "$", count: 2, label: "Failed payments" },
    ActionItem { icon: "💳", count: 3, label: "Expiring credit card" },
    ActionItem { icon: "🏦", count: 1, label: "Bank account verification" },
];

const RECENT: &[RecentItem] = &[
    RecentItem { company: "John Jones Ltd", kind: "Proposal name" },
    RecentItem { company: "The boring company", kind: "First engagement proposal" },
    RecentItem { company: "ABC lightening shop house", kind: "Ongoing engagement proposal" },
    RecentItem { company: "John Jones Ltd", kind: "Accounting services proposal" },
    RecentItem { company: "Pete Andre business", kind: "New proposal" },
];

/// Scales a monthly series against its largest value.
fn month_bars(values: &[u32; 12]) -> Vec<MonthBar> {
    let max = values.iter().copied().max().unwrap_or(0).max(1);
    MONTHS
        .iter()
        .zip(values)
        .map(|(&month, &value)| MonthBar {
            month,
            value,
            height_percent: (value * 100 / max).max(MIN_BAR_PERCENT),
        })
        .collect()
}

fn billing_panel() -> MetricPanel {
    MetricPanel {
        title: "Billing",
        subtitle: "Invoiced through Ignition (incl. tax)",
        tone: "bar-billing",
        bars: month_bars(&BILLING_SERIES),
        stats: BILLING_STATS.to_vec(),
    }
}

fn payments_panel() -> MetricPanel {
    MetricPanel {
        title: "Payments",
        subtitle: "through Ignition payments (incl. tax)",
        tone: "bar-payments",
        bars: month_bars(&PAYMENTS_SERIES),
        stats: PAYMENTS_STATS.to_vec(),
    }
}

/// Upper-cased first letters of the first two words.
fn company_initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

fn opportunity_icon(action: &str) -> &'static str {
    first_keyword_match(OPPORTUNITY_ICONS, &action.to_lowercase()).unwrap_or(DEFAULT_ICON)
}

/// Clients with a positive opportunity value, largest first.
fn opportunities(clients: &[ClientViewModel]) -> Vec<OpportunityRow> {
    let mut rows: Vec<OpportunityRow> = clients
        .iter()
        .filter(|client| client.revenue_opportunity_value > 0.0)
        .map(|client| OpportunityRow {
            name: client.name.clone(),
            initials: company_initials(&client.name),
            action: client.suggested_action.clone(),
            value: client.revenue_opportunity_value,
            value_text: compact_thousands(client.revenue_opportunity_value),
            icon: opportunity_icon(&client.suggested_action),
            avatar_color: AVATAR_COLORS[0],
        })
        .collect();

    rows.sort_by(|a, b| b.value.total_cmp(&a.value));
    for (i, row) in rows.iter_mut().enumerate() {
        row.avatar_color = AVATAR_COLORS[i % AVATAR_COLORS.len()];
    }
    rows
}

/// Builds the dashboard and discards the browser's review session, if any.
pub fn load_index_page<R>(
    repo: &R,
    dataset: &ReviewDataset,
    session_id: Option<SessionId>,
) -> ServiceResult<IndexPageData>
where
    R: SessionWriter + ?Sized,
{
    if let Some(id) = session_id {
        let removed = repo.remove_session(id).map_err(|err| {
            log::error!("Failed to discard review session {id}: {err}");
            err
        })?;
        if removed {
            log::debug!("Discarded review session {id}");
        }
    }

    let mut rows = opportunities(&dataset.clients);
    let total: f64 = rows.iter().map(|row| row.value).sum();
    let remaining_count = rows.len().saturating_sub(TOP_OPPORTUNITIES);
    rows.truncate(TOP_OPPORTUNITIES);

    Ok(IndexPageData {
        top_opportunities: rows,
        total_text: format!("+${}", grouped(total)),
        remaining_count,
        client_count: dataset.clients.len(),
        billing: billing_panel(),
        payments: payments_panel(),
        action_required: ACTION_REQUIRED.to_vec(),
        recent: RECENT.to_vec(),
    })
}
