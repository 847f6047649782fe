//! Display-ready client cards derived from raw records.

use serde::Serialize;

use crate::domain::client::FixedFeeMaths;
use crate::domain::types::{ClientId, Priority, Tag};

/// Immutable card model consumed by the review session and templates.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ClientViewModel {
    pub id: ClientId,
    /// Company name.
    pub name: String,
    pub contact_name: String,
    pub contact_initials: String,
    pub status: String,
    pub assigned_partner: Option<String>,
    pub priority: Priority,
    pub priority_label: &'static str,
    pub priority_color: &'static str,
    pub tags: Vec<Tag>,
    pub contract_value: f64,
    pub contract_value_text: String,
    pub active_services: Option<u32>,
    pub next_bill_date: Option<String>,
    pub next_bill_amount: Option<f64>,
    pub monthly_revenue: f64,
    pub revenue_change: Option<f64>,
    pub payment_reliability: Option<f64>,
    pub payment_health: &'static str,
    pub last_engagement: String,
    pub activity_log: Vec<String>,
    pub customer_since: Option<String>,
    pub customer_since_year: Option<i32>,
    pub paid_invoices: u32,
    /// Failed plus unpaid invoices.
    pub late_payments: u32,
    pub coming_due_invoices: usize,
    pub outstanding_text: String,
    pub failed_payments: u32,
    pub expiring_cards: u32,
    /// Free-text reasoning behind the recommended action.
    pub details: String,
    /// Sanitised HTML fragments, one per sentence of `details`.
    pub reasoning_points: Vec<String>,
    pub suggested_action: String,
    pub action_label: String,
    pub revenue_opportunity_value: f64,
    pub fixed_fee_readiness: Option<serde_json::Value>,
    /// Present only when the fixed fee calculator applies to this card.
    pub fixed_fee_quote: Option<FixedFeeMaths>,
}

impl ClientViewModel {
    /// Sort key of the review queue.
    pub fn revenue_potential(&self) -> f64 {
        self.contract_value + self.revenue_opportunity_value
    }
}
