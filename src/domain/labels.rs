//! Short imperative labels derived from the recommended action text.

use crate::domain::rules::{KeywordRule, Rule, first_keyword_match, first_match};
use crate::domain::view_model::ClientViewModel;

/// Label used when there is no client to act on.
pub const PLACEHOLDER_ACTION: &str = "Take Action";

/// Rules shared by the card label and the session's current label.
const SHARED_ACTION_RULES: &[KeywordRule] = &[
    KeywordRule { keywords: &["draft", "fixed"], label: "Draft Proposal" },
    KeywordRule { keywords: &["schedule", "review"], label: "Schedule Review" },
    KeywordRule { keywords: &["schedule", "meeting"], label: "Schedule Meeting" },
    KeywordRule { keywords: &["propose", "service"], label: "Propose Services" },
    KeywordRule { keywords: &["propose", "add-on"], label: "Propose Add-on" },
    KeywordRule { keywords: &["propose", "tax"], label: "Propose Add-on" },
    KeywordRule { keywords: &["propose", "expand"], label: "Propose Services" },
    KeywordRule { keywords: &["review"], label: "Review Account" },
    KeywordRule { keywords: &["cross-sell"], label: "Propose Services" },
    KeywordRule { keywords: &["upsell"], label: "Propose Services" },
    KeywordRule { keywords: &["complete", "verification"], label: "Complete Setup" },
    KeywordRule { keywords: &["update", "card"], label: "Update Card" },
    KeywordRule { keywords: &["update", "payment"], label: "Update Payment" },
    KeywordRule { keywords: &["request", "payment"], label: "Update Payment" },
];

/// Card-only tail evaluated after [`SHARED_ACTION_RULES`].
const CARD_PAYMENT_RULES: &[KeywordRule] = &[
    KeywordRule { keywords: &["resolve", "payment"], label: "Resolve Payment" },
    KeywordRule { keywords: &["reminder"], label: "Send Reminder" },
];

/// Words that let account state override the current label.
const PAYMENT_KEYWORDS: &[&str] = &["reminder", "payment", "resolve"];

/// Account-state overrides for payment related actions.
const PAYMENT_OVERRIDES: &[Rule<ClientViewModel, &str>] = &[
    Rule {
        name: "failed payments",
        when: |c: &ClientViewModel| c.failed_payments > 0,
        then: "Resolve Payment",
    },
    Rule {
        name: "expiring cards",
        when: |c: &ClientViewModel| c.expiring_cards > 0,
        then: "Update Card",
    },
    Rule {
        name: "overdue invoices",
        when: |c: &ClientViewModel| c.late_payments > 0,
        then: "Send Reminder",
    },
];

/// First two words of the action text, case preserved.
pub fn leading_words(action: &str) -> String {
    action.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}

/// Label for the action button on a client card.
pub fn card_action_label(action: &str) -> String {
    let lowered = action.to_lowercase();
    first_keyword_match(SHARED_ACTION_RULES, &lowered)
        .or_else(|| first_keyword_match(CARD_PAYMENT_RULES, &lowered))
        .map(str::to_string)
        .unwrap_or_else(|| leading_words(action))
}

/// Label for the primary button while `client` is on top of the deck.
pub fn current_action_label(client: &ClientViewModel) -> String {
    let action = client.suggested_action.as_str();
    let lowered = action.to_lowercase();

    if let Some(label) = first_keyword_match(SHARED_ACTION_RULES, &lowered) {
        return label.to_string();
    }

    if PAYMENT_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        if let Some(label) = first_match(PAYMENT_OVERRIDES, client) {
            return (*label).to_string();
        }
    }

    if client.payment_reliability == Some(0.0) {
        return "Add Payment".to_string();
    }

    leading_words(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::view_model::fixtures;

    fn card(action: &str) -> ClientViewModel {
        fixtures::card(1, action)
    }

    #[test]
    fn card_labels_follow_rule_order() {
        assert_eq!(
            card_action_label("Draft fixed-fee renewal proposal"),
            "Draft Proposal"
        );
        // "schedule" + "review" outranks the plain "review" rule.
        assert_eq!(
            card_action_label("Schedule quarterly review"),
            "Schedule Review"
        );
        assert_eq!(card_action_label("Review billing history"), "Review Account");
        assert_eq!(card_action_label("Propose tax planning"), "Propose Add-on");
        assert_eq!(card_action_label("Upsell payroll"), "Propose Services");
        assert_eq!(
            card_action_label("Resolve failed payment"),
            "Resolve Payment"
        );
        assert_eq!(card_action_label("Send payment reminder"), "Send Reminder");
    }

    #[test]
    fn card_label_falls_back_to_first_two_words() {
        assert_eq!(card_action_label("Call Jane about onboarding"), "Call Jane");
        assert_eq!(card_action_label("Celebrate"), "Celebrate");
    }

    #[test]
    fn current_label_shares_leading_rules() {
        let client = card("Update card details before renewal");
        assert_eq!(current_action_label(&client), "Update Card");
    }

    #[test]
    fn current_label_prefers_account_state_for_payment_actions() {
        let mut client = card("Resolve outstanding payment");
        client.failed_payments = 1;
        client.expiring_cards = 1;
        client.late_payments = 2;
        assert_eq!(current_action_label(&client), "Resolve Payment");

        client.failed_payments = 0;
        assert_eq!(current_action_label(&client), "Update Card");

        client.expiring_cards = 0;
        assert_eq!(current_action_label(&client), "Send Reminder");

        client.late_payments = 0;
        assert_eq!(current_action_label(&client), "Resolve outstanding");
    }

    #[test]
    fn current_label_ignores_account_state_for_other_actions() {
        let mut client = card("Call Jane about onboarding");
        client.failed_payments = 3;
        assert_eq!(current_action_label(&client), "Call Jane");
    }

    #[test]
    fn current_label_suggests_adding_payment_method() {
        let mut client = card("Call Jane about onboarding");
        client.payment_reliability = Some(0.0);
        assert_eq!(current_action_label(&client), "Add Payment");

        client.payment_reliability = None;
        assert_eq!(current_action_label(&client), "Call Jane");
    }

    #[test]
    fn card_and_current_labels_differ_on_reminders() {
        let client = card("Send reminder");
        assert_eq!(card_action_label(&client.suggested_action), "Send Reminder");
        assert_eq!(current_action_label(&client), "Send reminder");
    }
}
