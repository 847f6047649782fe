//! Snapshot of a review session as rendered by the review page and API.

use serde::Serialize;

use crate::domain::session::{CARD_WINDOW, ReviewSession, SessionState};
use crate::domain::types::{Achievement, ClientId};
use crate::domain::view_model::ClientViewModel;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AchievementBadge {
    pub key: &'static str,
    pub title: &'static str,
}

impl From<Achievement> for AchievementBadge {
    fn from(achievement: Achievement) -> Self {
        Self {
            key: achievement.key(),
            title: achievement.title(),
        }
    }
}

/// Entry of one of the three decision columns.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BucketEntry {
    pub id: ClientId,
    pub name: String,
    pub contact_initials: String,
    pub contract_value_text: String,
}

impl From<&ClientViewModel> for BucketEntry {
    fn from(client: &ClientViewModel) -> Self {
        Self {
            id: client.id,
            name: client.name.clone(),
            contact_initials: client.contact_initials.clone(),
            contract_value_text: client.contract_value_text.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewPageData {
    /// Cursor the page was rendered at; echoed back by every form.
    pub cursor: usize,
    pub total: usize,
    pub remaining: usize,
    pub progress_percent: f64,
    pub state: SessionState,
    pub is_complete: bool,
    pub can_undo: bool,
    pub current_action_label: String,
    /// Top of the deck first.
    pub cards: Vec<ClientViewModel>,
    pub actioned: Vec<BucketEntry>,
    pub engaged: Vec<BucketEntry>,
    pub skipped: Vec<BucketEntry>,
    pub achievements: Vec<AchievementBadge>,
}

impl From<&ReviewSession> for ReviewPageData {
    fn from(session: &ReviewSession) -> Self {
        Self {
            cursor: session.cursor(),
            total: session.len(),
            remaining: session.remaining_count(),
            progress_percent: session.progress_percent(),
            state: session.state(),
            is_complete: session.is_complete(),
            can_undo: session.cursor() > 0,
            current_action_label: session.current_action_label(),
            cards: session.upcoming(CARD_WINDOW).to_vec(),
            actioned: session.actioned().map(BucketEntry::from).collect(),
            engaged: session.engaged().map(BucketEntry::from).collect(),
            skipped: session.skipped().map(BucketEntry::from).collect(),
            achievements: session
                .achievements()
                .iter()
                .copied()
                .map(AchievementBadge::from)
                .collect(),
        }
    }
}
