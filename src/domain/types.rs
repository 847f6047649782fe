//! Strongly-typed value objects used by the review domain.
//!
//! These wrappers and enums enforce basic invariants (positive identifiers,
//! non-empty text, closed vocabularies) so that once a value reaches the
//! session layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value is not part of the expected vocabulary.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Provided uuid failed format validation.
    #[error("invalid uuid value")]
    InvalidUuid,
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(
    ClientId,
    "Stable identifier of a client: its 1-based position in the source batch."
);

impl ClientId {
    /// Derives the identifier from a zero-based batch position.
    pub fn from_position(index: usize) -> Result<Self, TypeConstraintError> {
        let value = i32::try_from(index + 1)
            .map_err(|_| TypeConstraintError::InvalidValue(format!("position {index}")))?;
        Self::new(value)
    }
}

/// Identifier of a browser-bound review session.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn get(self) -> Uuid {
        self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = TypeConstraintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| TypeConstraintError::InvalidUuid)
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Review category of a client.
///
/// `Medium` is part of the vocabulary shown to reviewers but no derivation
/// rule produces it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Human readable category label.
    pub const fn label(self) -> &'static str {
        match self {
            Priority::Urgent => "Needs Attention",
            Priority::High => "High Priority",
            Priority::Medium => "Medium Priority",
            Priority::Low => "On Track",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Priority::Urgent => "#dc2626",
            Priority::High => "#ea580c",
            Priority::Medium => "#ca8a04",
            Priority::Low => "#16a34a",
        }
    }
}

/// Revenue trend computed upstream for a client.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RevenueDirection {
    Growing,
    Declining,
    Stable,
    #[serde(other)]
    Unknown,
}

/// Categorical flags attached to a raw client record.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClientFlag {
    OverduePayment,
    HasOutstandingInvoice,
    #[serde(other)]
    Other,
}

/// Display labels attached to a client card.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Tag {
    #[serde(rename = "Revenue growing")]
    RevenueGrowing,
    #[serde(rename = "Revenue declining")]
    RevenueDeclining,
    #[serde(rename = "Late payment")]
    LatePayment,
    #[serde(rename = "Payment failed")]
    PaymentFailed,
    #[serde(rename = "Proposal ending soon")]
    ProposalEndingSoon,
    #[serde(rename = "Upsell ready")]
    UpsellReady,
}

impl Tag {
    pub const fn label(self) -> &'static str {
        match self {
            Tag::RevenueGrowing => "Revenue growing",
            Tag::RevenueDeclining => "Revenue declining",
            Tag::LatePayment => "Late payment",
            Tag::PaymentFailed => "Payment failed",
            Tag::ProposalEndingSoon => "Proposal ending soon",
            Tag::UpsellReady => "Upsell ready",
        }
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Decision a reviewer makes about the client on top of the deck.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Plan for later.
    Engage,
    Skip,
    /// Act now.
    Action,
}

impl Decision {
    pub const fn as_str(self) -> &'static str {
        match self {
            Decision::Engage => "engage",
            Decision::Skip => "skip",
            Decision::Action => "action",
        }
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = TypeConstraintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "engage" | "right" => Ok(Decision::Engage),
            "skip" | "left" => Ok(Decision::Skip),
            "action" | "up" => Ok(Decision::Action),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// Fire-once milestones of a review session.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Achievement {
    #[serde(rename = "first-5")]
    FirstFive,
    #[serde(rename = "actioned-focus")]
    ActionedFocus,
}

impl Achievement {
    pub const fn key(self) -> &'static str {
        match self {
            Achievement::FirstFive => "first-5",
            Achievement::ActionedFocus => "actioned-focus",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Achievement::FirstFive => "First 5 Complete",
            Achievement::ActionedFocus => "Action Master",
        }
    }

    /// Message shown to the reviewer when the milestone fires.
    pub const fn celebration(self) -> &'static str {
        match self {
            Achievement::FirstFive => "Great progress! 5 clients reviewed",
            Achievement::ActionedFocus => "Nice! 3 clients actioned",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_id_rejects_non_positive_values() {
        assert_eq!(ClientId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(ClientId::new(-3), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(ClientId::new(7).unwrap().get(), 7);
    }

    #[test]
    fn client_id_from_position_is_one_based() {
        assert_eq!(ClientId::from_position(0).unwrap().get(), 1);
        assert_eq!(ClientId::from_position(41).unwrap().get(), 42);
    }

    #[test]
    fn decision_parses_names_and_swipe_directions() {
        assert_eq!("engage".parse::<Decision>(), Ok(Decision::Engage));
        assert_eq!("RIGHT".parse::<Decision>(), Ok(Decision::Engage));
        assert_eq!(" left ".parse::<Decision>(), Ok(Decision::Skip));
        assert_eq!("up".parse::<Decision>(), Ok(Decision::Action));
        assert!("down".parse::<Decision>().is_err());
    }

    #[test]
    fn session_id_round_trips_through_display() {
        let id = SessionId::generate();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(
            "not-a-uuid".parse::<SessionId>(),
            Err(TypeConstraintError::InvalidUuid)
        );
    }

    #[test]
    fn unknown_flags_and_directions_deserialize_leniently() {
        let flags: Vec<ClientFlag> =
            serde_json::from_str(r#"["overdue_payment", "vip"]"#).unwrap();
        assert_eq!(flags, vec![ClientFlag::OverduePayment, ClientFlag::Other]);

        let direction: RevenueDirection = serde_json::from_str(r#""sideways""#).unwrap();
        assert_eq!(direction, RevenueDirection::Unknown);
    }

    #[test]
    fn tags_serialize_as_display_labels() {
        let json = serde_json::to_string(&vec![Tag::LatePayment, Tag::UpsellReady]).unwrap();
        assert_eq!(json, r#"["Late payment","Upsell ready"]"#);
    }
}
