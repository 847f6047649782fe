//! Maps raw client records into display-ready view models.
//!
//! The transformation is pure: "today" is passed in explicitly and nothing is
//! read from or written to the outside world. A record that lacks a required
//! field is rejected on its own without affecting the rest of the batch.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::domain::client::{FixedFeeMaths, RawClientRecord};
use crate::domain::format;
use crate::domain::labels::card_action_label;
use crate::domain::rules::{Rule, all_matches, first_match};
use crate::domain::types::{
    ClientFlag, ClientId, NonEmptyString, Priority, RevenueDirection, Tag, TypeConstraintError,
};
use crate::domain::view_model::ClientViewModel;

/// Why a single record could not be turned into a view model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error(transparent)]
    TypeConstraint(#[from] TypeConstraintError),
}

/// A record left out of the queue together with the reason.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Zero-based position in the input batch.
    pub index: usize,
    pub company: Option<String>,
    pub reason: String,
}

/// Result of transforming a batch.
#[derive(Debug, Default)]
pub struct TransformOutcome {
    /// View models sorted by descending revenue potential.
    pub clients: Vec<ClientViewModel>,
    pub rejected: Vec<RejectedRecord>,
}

/// Facts about a record that drive priority and tags.
#[derive(Debug, Clone, Copy)]
struct ClientSignals {
    overdue_payment: bool,
    outstanding_invoice: bool,
    direction: Option<RevenueDirection>,
    proposal_ending_soon: bool,
}

impl ClientSignals {
    fn of(raw: &RawClientRecord) -> Self {
        Self {
            overdue_payment: raw.has_flag(ClientFlag::OverduePayment),
            outstanding_invoice: raw.has_flag(ClientFlag::HasOutstandingInvoice),
            direction: raw.computed.revenue_direction,
            proposal_ending_soon: raw.computed.proposal_ending_soon,
        }
    }

    fn growing(&self) -> bool {
        self.direction == Some(RevenueDirection::Growing)
    }

    fn declining(&self) -> bool {
        self.direction == Some(RevenueDirection::Declining)
    }
}

const PRIORITY_RULES: &[Rule<ClientSignals, Priority>] = &[
    Rule {
        name: "payment problem",
        when: |s: &ClientSignals| s.overdue_payment || s.outstanding_invoice,
        then: Priority::Urgent,
    },
    Rule {
        name: "revenue moving",
        when: |s: &ClientSignals| s.declining() || s.growing(),
        then: Priority::High,
    },
];

const DEFAULT_PRIORITY: Priority = Priority::Low;

const TAG_RULES: &[Rule<ClientSignals, Tag>] = &[
    Rule {
        name: "growing",
        when: |s: &ClientSignals| s.growing(),
        then: Tag::RevenueGrowing,
    },
    Rule {
        name: "declining",
        when: |s: &ClientSignals| s.declining(),
        then: Tag::RevenueDeclining,
    },
    Rule {
        name: "overdue payment",
        when: |s: &ClientSignals| s.overdue_payment,
        then: Tag::LatePayment,
    },
    Rule {
        name: "outstanding invoice",
        when: |s: &ClientSignals| s.outstanding_invoice,
        then: Tag::PaymentFailed,
    },
    Rule {
        name: "proposal ending",
        when: |s: &ClientSignals| s.proposal_ending_soon,
        then: Tag::ProposalEndingSoon,
    },
];

const FALLBACK_TAG: Tag = Tag::UpsellReady;

fn priority_of(signals: &ClientSignals) -> Priority {
    first_match(PRIORITY_RULES, signals)
        .copied()
        .unwrap_or(DEFAULT_PRIORITY)
}

fn tags_of(signals: &ClientSignals) -> Vec<Tag> {
    let tags: Vec<Tag> = all_matches(TAG_RULES, signals).copied().collect();
    if tags.is_empty() {
        vec![FALLBACK_TAG]
    } else {
        tags
    }
}

/// Upper-cases the first character, `active` becomes `Active`.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn required(value: Option<&String>, field: &'static str) -> Result<NonEmptyString, TransformError> {
    value
        .map(String::as_str)
        .ok_or(TransformError::MissingField(field))
        .and_then(|v| NonEmptyString::new(v).map_err(|_| TransformError::MissingField(field)))
}

/// Whether the fixed fee calculator applies to a renewal proposal.
fn fixed_fee_quote(
    raw: &RawClientRecord,
    action: &str,
    late_payments: u32,
    failed_payments: u32,
    expiring_cards: u32,
) -> Option<FixedFeeMaths> {
    let maths = raw.confidence_engine.as_ref()?.fixed_fee_maths.as_ref()?;
    if late_payments > 0 || failed_payments > 0 || expiring_cards > 0 {
        return None;
    }
    let lowered = action.to_lowercase();
    let renewal_draft = lowered.starts_with("draft")
        && lowered.contains("fixed")
        && lowered.contains("renewal")
        && !lowered.contains("outstanding");
    renewal_draft.then(|| maths.clone())
}

/// Builds the view model of one record.
pub fn build_view_model(
    id: ClientId,
    raw: &RawClientRecord,
    today: NaiveDate,
) -> Result<ClientViewModel, TransformError> {
    let company = required(raw.company.as_ref(), "company")?;
    let contact = required(raw.name.as_ref(), "name")?;
    let recommended = raw
        .recommended_action
        .as_ref()
        .ok_or(TransformError::MissingField("recommendedAction"))?;
    let action = required(recommended.action.as_ref(), "recommendedAction.action")?;
    let details = recommended.reasoning.clone().unwrap_or_default();

    let signals = ClientSignals::of(raw);
    let priority = priority_of(&signals);

    let invoices = raw.invoices.clone().unwrap_or_default();
    let late_payments = invoices.failed + invoices.unpaid;
    let action_required = raw.action_required.clone().unwrap_or_default();

    let next_bill = raw
        .billing_schedule
        .as_ref()
        .and_then(|b| b.next_bill.as_ref());
    let next_bill_amount = next_bill.and_then(|b| b.amount);
    let monthly_revenue = next_bill_amount.unwrap_or(0.0);
    let coming_due_invoices = raw
        .billing_schedule
        .as_ref()
        .map_or(0, |b| b.upcoming_bills.len());

    let assigned_partner = raw
        .partner
        .as_ref()
        .and_then(|p| p.name.clone())
        .or_else(|| raw.manager.as_ref().and_then(|m| m.name.clone()));

    let contract_value = raw.contract_value();
    let payment_reliability = raw.computed.payment_score;

    let fixed_fee_quote = fixed_fee_quote(
        raw,
        action.as_str(),
        late_payments,
        action_required.failed_payments,
        action_required.expiring_cards,
    );

    Ok(ClientViewModel {
        id,
        contact_initials: format::initials(contact.as_str()),
        name: company.into_inner(),
        contact_name: contact.into_inner(),
        status: raw.status.as_deref().map(capitalize).unwrap_or_default(),
        assigned_partner,
        priority,
        priority_label: priority.label(),
        priority_color: priority.color(),
        tags: tags_of(&signals),
        contract_value,
        contract_value_text: format::thousands(contract_value),
        active_services: raw.active_service_count,
        next_bill_date: next_bill
            .and_then(|b| b.date.as_deref())
            .and_then(format::parse_date)
            .map(format::month_day),
        next_bill_amount,
        monthly_revenue,
        revenue_change: raw.computed.revenue_change,
        payment_reliability,
        payment_health: format::payment_health(payment_reliability.unwrap_or(0.0)),
        last_engagement: format::last_engagement(
            raw.last_activity.as_ref().and_then(|a| a.date.as_deref()),
            today,
        ),
        activity_log: raw
            .activity
            .iter()
            .take(2)
            .filter_map(|a| a.event.clone())
            .collect(),
        customer_since: raw.computed.client_tenure.clone(),
        customer_since_year: raw.created_date.as_deref().and_then(format::year_of),
        paid_invoices: invoices.paid,
        late_payments,
        coming_due_invoices,
        outstanding_text: format::outstanding(late_payments, monthly_revenue),
        failed_payments: action_required.failed_payments,
        expiring_cards: action_required.expiring_cards,
        reasoning_points: format::reasoning_points(&details),
        details,
        action_label: card_action_label(action.as_str()),
        suggested_action: action.into_inner(),
        revenue_opportunity_value: raw.opportunity_value(),
        fixed_fee_readiness: raw.fixed_fee_readiness.clone(),
        fixed_fee_quote,
    })
}

/// Stable sort by descending `contract value + opportunity value`.
pub fn sort_by_revenue_potential(clients: &mut [ClientViewModel]) {
    clients.sort_by(|a, b| b.revenue_potential().total_cmp(&a.revenue_potential()));
}

/// Transforms a batch of raw records.
///
/// Every record yields either one view model or one rejection, so
/// `clients.len() + rejected.len() == records.len()`.
pub fn transform(records: &[RawClientRecord], today: NaiveDate) -> TransformOutcome {
    let mut outcome = TransformOutcome::default();

    for (index, raw) in records.iter().enumerate() {
        let built = ClientId::from_position(index)
            .map_err(TransformError::from)
            .and_then(|id| build_view_model(id, raw, today));

        match built {
            Ok(client) => outcome.clients.push(client),
            Err(err) => {
                log::warn!("Skipping client record #{index}: {err}");
                outcome.rejected.push(RejectedRecord {
                    index,
                    company: raw.company.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    sort_by_revenue_potential(&mut outcome.clients);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::{
        ActionRequired, ActivityEntry, Bill, BillingSchedule, ConfidenceEngine, InvoiceCounters,
        PersonRef, RecommendedAction, RevenueOpportunity,
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
    }

    fn record(company: &str, contract: f64, opportunity: Option<f64>) -> RawClientRecord {
        let mut raw = RawClientRecord {
            company: Some(company.to_string()),
            name: Some("Jane Doe".to_string()),
            status: Some("active".to_string()),
            recommended_action: Some(RecommendedAction {
                action: Some("Schedule annual review".to_string()),
                reasoning: Some("Revenue is steady.".to_string()),
            }),
            revenue_opportunity: opportunity.map(|v| RevenueOpportunity {
                total_opportunity_value: Some(v),
            }),
            ..RawClientRecord::default()
        };
        raw.computed.contract_value = Some(contract);
        raw
    }

    fn with(
        flags: &[ClientFlag],
        direction: Option<RevenueDirection>,
        ending_soon: bool,
    ) -> RawClientRecord {
        let mut raw = record("Acme", 1000.0, None);
        raw.flags = flags.to_vec();
        raw.computed.revenue_direction = direction;
        raw.computed.proposal_ending_soon = ending_soon;
        raw
    }

    fn build(raw: &RawClientRecord) -> ClientViewModel {
        build_view_model(ClientId::new(1).unwrap(), raw, today()).unwrap()
    }

    #[test]
    fn priority_rules_in_isolation() {
        let urgent_overdue = with(&[ClientFlag::OverduePayment], None, false);
        let urgent_invoice = with(&[ClientFlag::HasOutstandingInvoice], None, false);
        let high_declining = with(&[], Some(RevenueDirection::Declining), false);
        let high_growing = with(&[], Some(RevenueDirection::Growing), false);
        let low_stable = with(&[], Some(RevenueDirection::Stable), false);
        let low_unknown = with(&[ClientFlag::Other], None, true);

        assert_eq!(build(&urgent_overdue).priority, Priority::Urgent);
        assert_eq!(build(&urgent_invoice).priority, Priority::Urgent);
        assert_eq!(build(&high_declining).priority, Priority::High);
        assert_eq!(build(&high_growing).priority, Priority::High);
        assert_eq!(build(&low_stable).priority, Priority::Low);
        assert_eq!(build(&low_unknown).priority, Priority::Low);
    }

    #[test]
    fn payment_flags_outrank_revenue_direction() {
        let raw = with(
            &[ClientFlag::OverduePayment],
            Some(RevenueDirection::Growing),
            false,
        );
        let client = build(&raw);
        assert_eq!(client.priority, Priority::Urgent);
        assert_eq!(client.priority_label, "Needs Attention");
    }

    #[test]
    fn tags_follow_fixed_order() {
        let raw = with(
            &[ClientFlag::HasOutstandingInvoice, ClientFlag::OverduePayment],
            Some(RevenueDirection::Declining),
            true,
        );
        assert_eq!(
            build(&raw).tags,
            vec![
                Tag::RevenueDeclining,
                Tag::LatePayment,
                Tag::PaymentFailed,
                Tag::ProposalEndingSoon,
            ]
        );
    }

    #[test]
    fn tags_fall_back_to_upsell_ready() {
        let raw = with(&[], Some(RevenueDirection::Stable), false);
        assert_eq!(build(&raw).tags, vec![Tag::UpsellReady]);
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let mut raw = record("Acme", 0.0, None);
        raw.computed.contract_value = None;
        raw.manager = Some(PersonRef {
            name: Some("Morgan".to_string()),
        });

        let client = build(&raw);
        assert_eq!(client.assigned_partner.as_deref(), Some("Morgan"));
        assert_eq!(client.last_engagement, "Unknown");
        assert_eq!(client.contract_value, 0.0);
        assert_eq!(client.monthly_revenue, 0.0);
        assert_eq!(client.revenue_opportunity_value, 0.0);
        assert_eq!(client.paid_invoices, 0);
        assert_eq!(client.late_payments, 0);
        assert_eq!(client.outstanding_text, "$0");
        assert_eq!(client.payment_health, "No payment method");
        assert!(client.customer_since_year.is_none());
        assert!(client.next_bill_date.is_none());
    }

    #[test]
    fn partner_takes_precedence_over_manager() {
        let mut raw = record("Acme", 0.0, None);
        raw.partner = Some(PersonRef {
            name: Some("Pat".to_string()),
        });
        raw.manager = Some(PersonRef {
            name: Some("Morgan".to_string()),
        });
        assert_eq!(build(&raw).assigned_partner.as_deref(), Some("Pat"));
    }

    #[test]
    fn derived_display_fields() {
        let mut raw = record("Acme", 84_000.0, Some(6_000.0));
        raw.status = Some("lead".to_string());
        raw.created_date = Some("2019-04-12".to_string());
        raw.last_activity = Some(ActivityEntry {
            event: None,
            date: Some("2025-03-20".to_string()),
        });
        raw.activity = vec![
            ActivityEntry {
                event: Some("Invoice paid".to_string()),
                date: None,
            },
            ActivityEntry {
                event: Some("Proposal viewed".to_string()),
                date: None,
            },
            ActivityEntry {
                event: Some("Email sent".to_string()),
                date: None,
            },
        ];
        raw.invoices = Some(InvoiceCounters {
            paid: 11,
            failed: 1,
            unpaid: 2,
        });
        raw.billing_schedule = Some(BillingSchedule {
            next_bill: Some(Bill {
                date: Some("2025-04-15".to_string()),
                amount: Some(700.0),
            }),
            upcoming_bills: vec![Bill::default(), Bill::default()],
        });

        let client = build(&raw);
        assert_eq!(client.status, "Lead");
        assert_eq!(client.contact_initials, "JD");
        assert_eq!(client.customer_since_year, Some(2019));
        assert_eq!(client.last_engagement, "1 week ago");
        assert_eq!(client.activity_log, vec!["Invoice paid", "Proposal viewed"]);
        assert_eq!(client.late_payments, 3);
        assert_eq!(client.outstanding_text, "$2.1k");
        assert_eq!(client.coming_due_invoices, 2);
        assert_eq!(client.next_bill_date.as_deref(), Some("April 15"));
        assert_eq!(client.contract_value_text, "$84k");
        assert_eq!(client.action_label, "Schedule Review");
        assert_eq!(client.revenue_potential(), 90_000.0);
    }

    #[test]
    fn fixed_fee_quote_only_for_clean_renewal_drafts() {
        let mut raw = record("Acme", 0.0, None);
        raw.recommended_action = Some(RecommendedAction {
            action: Some("Draft fixed-fee renewal proposal".to_string()),
            reasoning: None,
        });
        raw.confidence_engine = Some(ConfidenceEngine {
            fixed_fee_maths: Some(FixedFeeMaths {
                suggested_fixed_fee: 12_000.0,
                ..FixedFeeMaths::default()
            }),
        });
        assert!(build(&raw).fixed_fee_quote.is_some());

        raw.action_required = Some(ActionRequired {
            failed_payments: 0,
            expiring_cards: 1,
        });
        assert!(build(&raw).fixed_fee_quote.is_none());

        raw.action_required = None;
        raw.recommended_action = Some(RecommendedAction {
            action: Some("Draft fixed-fee renewal after outstanding invoice".to_string()),
            reasoning: None,
        });
        assert!(build(&raw).fixed_fee_quote.is_none());
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let mut no_action = record("Acme", 0.0, None);
        no_action.recommended_action = Some(RecommendedAction {
            action: Some("   ".to_string()),
            reasoning: None,
        });
        let mut no_company = record("Acme", 0.0, None);
        no_company.company = None;

        let id = ClientId::new(1).unwrap();
        assert_eq!(
            build_view_model(id, &no_action, today()),
            Err(TransformError::MissingField("recommendedAction.action"))
        );
        assert_eq!(
            build_view_model(id, &no_company, today()),
            Err(TransformError::MissingField("company"))
        );
    }

    #[test]
    fn transform_keeps_every_valid_record_once() {
        let records: Vec<_> = (0..7)
            .map(|i| record(&format!("Client {i}"), f64::from(i) * 1000.0, None))
            .collect();

        let outcome = transform(&records, today());
        assert_eq!(outcome.clients.len(), records.len());
        assert!(outcome.rejected.is_empty());

        let mut ids: Vec<i32> = outcome.clients.iter().map(|c| c.id.get()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=7).collect::<Vec<_>>());
        assert!(outcome.clients.iter().all(|c| !c.tags.is_empty()));
    }

    #[test]
    fn transform_sorts_descending_and_stably() {
        let records = vec![
            record("Tie A", 5_000.0, Some(5_000.0)),
            record("Small", 1_000.0, None),
            record("Big", 20_000.0, Some(1_000.0)),
            record("Tie B", 10_000.0, None),
            record("Tie C", 0.0, Some(10_000.0)),
        ];

        let names: Vec<String> = transform(&records, today())
            .clients
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Big", "Tie A", "Tie B", "Tie C", "Small"]);
    }

    #[test]
    fn rejected_records_do_not_abort_the_batch() {
        let mut broken = record("Broken", 50_000.0, None);
        broken.recommended_action = None;
        let records = vec![record("Fine", 1_000.0, None), broken, record("Also fine", 2_000.0, None)];

        let outcome = transform(&records, today());
        assert_eq!(outcome.clients.len(), 2);
        assert_eq!(
            outcome.rejected,
            vec![RejectedRecord {
                index: 1,
                company: Some("Broken".to_string()),
                reason: "missing required field `recommendedAction`".to_string(),
            }]
        );
        assert_eq!(outcome.clients[0].id.get(), 3);
    }

    #[test]
    fn empty_batch_transforms_to_empty_queue() {
        let outcome = transform(&[], today());
        assert!(outcome.clients.is_empty());
        assert!(outcome.rejected.is_empty());
    }
}
