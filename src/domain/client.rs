//! Raw client records as delivered by the bundled dataset.
//!
//! Every field is optional at this level; the transformer decides which ones
//! are required and which fall back to defaults.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::types::{ClientFlag, RevenueDirection};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawClientRecord {
    pub company: Option<String>,
    /// Contact person.
    pub name: Option<String>,
    pub status: Option<String>,
    pub partner: Option<PersonRef>,
    pub manager: Option<PersonRef>,
    #[serde(default, deserialize_with = "null_or_default")]
    pub flags: Vec<ClientFlag>,
    #[serde(default, deserialize_with = "null_or_default")]
    pub computed: ComputedMetrics,
    pub active_service_count: Option<u32>,
    pub created_date: Option<String>,
    pub last_activity: Option<ActivityEntry>,
    #[serde(default, deserialize_with = "null_or_default")]
    pub activity: Vec<ActivityEntry>,
    pub invoices: Option<InvoiceCounters>,
    pub billing_schedule: Option<BillingSchedule>,
    pub recommended_action: Option<RecommendedAction>,
    /// Opaque readiness assessment passed through to the API.
    pub fixed_fee_readiness: Option<serde_json::Value>,
    pub confidence_engine: Option<ConfidenceEngine>,
    pub action_required: Option<ActionRequired>,
    pub revenue_opportunity: Option<RevenueOpportunity>,
}

impl RawClientRecord {
    pub fn has_flag(&self, flag: ClientFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Current contract value, zero when unknown.
    pub fn contract_value(&self) -> f64 {
        self.computed.contract_value.unwrap_or(0.0)
    }

    /// Estimated additional revenue, zero when unknown.
    pub fn opportunity_value(&self) -> f64 {
        self.revenue_opportunity
            .as_ref()
            .and_then(|o| o.total_opportunity_value)
            .unwrap_or(0.0)
    }
}

/// Treats an explicit `null` like a missing key.
fn null_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonRef {
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComputedMetrics {
    pub revenue_direction: Option<RevenueDirection>,
    pub contract_value: Option<f64>,
    /// Year over year change, in percent.
    pub revenue_change: Option<f64>,
    pub payment_score: Option<f64>,
    pub client_tenure: Option<String>,
    #[serde(default, deserialize_with = "null_or_default")]
    pub proposal_ending_soon: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    pub event: Option<String>,
    pub date: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct InvoiceCounters {
    #[serde(default, deserialize_with = "null_or_default")]
    pub paid: u32,
    #[serde(default, deserialize_with = "null_or_default")]
    pub failed: u32,
    #[serde(default, deserialize_with = "null_or_default")]
    pub unpaid: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillingSchedule {
    pub next_bill: Option<Bill>,
    #[serde(default, deserialize_with = "null_or_default")]
    pub upcoming_bills: Vec<Bill>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    pub date: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RecommendedAction {
    pub action: Option<String>,
    pub reasoning: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceEngine {
    #[serde(alias = "justinKurnMaths")]
    pub fixed_fee_maths: Option<FixedFeeMaths>,
}

/// Inputs of the fixed fee calculator shown on renewal proposals.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FixedFeeMaths {
    #[serde(default, deserialize_with = "null_or_default")]
    pub average_annual_billed_last3_years: f64,
    #[serde(default, deserialize_with = "null_or_default")]
    pub estimated_write_off_or_hidden_value: f64,
    #[serde(default, deserialize_with = "null_or_default")]
    pub suggested_fixed_fee: f64,
    #[serde(default, deserialize_with = "null_or_default")]
    pub uplift_amount: f64,
    #[serde(default, deserialize_with = "null_or_default")]
    pub uplift_percent: f64,
    pub note: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequired {
    #[serde(default, deserialize_with = "null_or_default")]
    pub failed_payments: u32,
    #[serde(default, deserialize_with = "null_or_default")]
    pub expiring_cards: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevenueOpportunity {
    pub total_opportunity_value: Option<f64>,
}
