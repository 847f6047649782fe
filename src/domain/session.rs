//! Review session: a cursor over a fixed queue of client cards and three
//! buckets that partition every client the reviewer has decided on.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::domain::client::RawClientRecord;
use crate::domain::labels::{PLACEHOLDER_ACTION, current_action_label};
use crate::domain::rules::{Rule, all_matches};
use crate::domain::transform::{RejectedRecord, TransformOutcome, transform};
use crate::domain::types::{Achievement, ClientId, Decision};
use crate::domain::view_model::ClientViewModel;

/// Queue shared read-only between all sessions built from one dataset.
pub type ClientQueue = Arc<[ClientViewModel]>;

/// Number of cards stacked on screen.
pub const CARD_WINDOW: usize = 3;

/// Rejected session transitions. None of them changes state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("every client has already been reviewed")]
    AlreadyComplete,
    #[error("there is no decision to undo")]
    NothingToUndo,
    #[error("stale request: expected cursor {expected}, session is at {actual}")]
    StaleCursor { expected: usize, actual: usize },
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Active,
    Complete,
}

/// What a successful decision did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionReport {
    pub client_id: ClientId,
    pub decision: Decision,
    pub cursor: usize,
    /// Achievements that fired on this decision.
    pub achievements: Vec<Achievement>,
    pub state: SessionState,
}

/// Bucket contents as queue positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Buckets {
    engaged: Vec<usize>,
    skipped: Vec<usize>,
    actioned: Vec<usize>,
}

impl Buckets {
    fn for_decision(&mut self, decision: Decision) -> &mut Vec<usize> {
        match decision {
            Decision::Engage => &mut self.engaged,
            Decision::Skip => &mut self.skipped,
            Decision::Action => &mut self.actioned,
        }
    }

    fn total(&self) -> usize {
        self.engaged.len() + self.skipped.len() + self.actioned.len()
    }
}

const ACHIEVEMENT_RULES: &[Rule<ReviewSession, Achievement>] = &[
    Rule {
        name: "fifth decision",
        when: |s: &ReviewSession| s.cursor == 5,
        then: Achievement::FirstFive,
    },
    Rule {
        name: "third action",
        when: |s: &ReviewSession| s.buckets.actioned.len() == 3,
        then: Achievement::ActionedFocus,
    },
];

#[derive(Clone, Debug)]
pub struct ReviewSession {
    queue: ClientQueue,
    cursor: usize,
    buckets: Buckets,
    achievements: Vec<Achievement>,
    /// Bumped on every accepted transition.
    version: u64,
}

impl ReviewSession {
    /// Starts a session over an already sorted queue.
    pub fn new(queue: ClientQueue) -> Self {
        Self {
            queue,
            cursor: 0,
            buckets: Buckets::default(),
            achievements: Vec::new(),
            version: 0,
        }
    }

    /// Transforms `records` and starts a session over the result, returning
    /// the records that could not be turned into cards alongside it.
    pub fn from_records(
        records: &[RawClientRecord],
        today: NaiveDate,
    ) -> (Self, Vec<RejectedRecord>) {
        let TransformOutcome { clients, rejected } = transform(records, today);
        (Self::new(Arc::from(clients)), rejected)
    }

    pub fn queue(&self) -> &[ClientViewModel] {
        &self.queue
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn state(&self) -> SessionState {
        if self.cursor < self.queue.len() {
            SessionState::Active
        } else {
            SessionState::Complete
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == SessionState::Complete
    }

    pub fn remaining_count(&self) -> usize {
        self.queue.len() - self.cursor
    }

    /// Share of the queue already decided, 0 for an empty queue.
    pub fn progress_percent(&self) -> f64 {
        if self.queue.is_empty() {
            return 0.0;
        }
        100.0 * self.cursor as f64 / self.queue.len() as f64
    }

    /// Client on top of the deck.
    pub fn current(&self) -> Option<&ClientViewModel> {
        self.queue.get(self.cursor)
    }

    /// Up to `size` undecided clients starting at the cursor.
    pub fn upcoming(&self, size: usize) -> &[ClientViewModel] {
        let end = (self.cursor + size).min(self.queue.len());
        &self.queue[self.cursor..end]
    }

    pub fn current_action_label(&self) -> String {
        self.current()
            .map(current_action_label)
            .unwrap_or_else(|| PLACEHOLDER_ACTION.to_string())
    }

    pub fn engaged(&self) -> impl Iterator<Item = &ClientViewModel> {
        self.resolve(&self.buckets.engaged)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ClientViewModel> {
        self.resolve(&self.buckets.skipped)
    }

    pub fn actioned(&self) -> impl Iterator<Item = &ClientViewModel> {
        self.resolve(&self.buckets.actioned)
    }

    pub fn bucket_len(&self, decision: Decision) -> usize {
        match decision {
            Decision::Engage => self.buckets.engaged.len(),
            Decision::Skip => self.buckets.skipped.len(),
            Decision::Action => self.buckets.actioned.len(),
        }
    }

    /// Bucket currently holding `id`, if it has been decided.
    pub fn decision_for(&self, id: ClientId) -> Option<Decision> {
        [Decision::Engage, Decision::Skip, Decision::Action]
            .into_iter()
            .find(|&d| {
                let bucket = match d {
                    Decision::Engage => &self.buckets.engaged,
                    Decision::Skip => &self.buckets.skipped,
                    Decision::Action => &self.buckets.actioned,
                };
                bucket.iter().any(|&pos| self.queue[pos].id == id)
            })
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn has_achievement(&self, achievement: Achievement) -> bool {
        self.achievements.contains(&achievement)
    }

    fn resolve<'a>(&'a self, positions: &'a [usize]) -> impl Iterator<Item = &'a ClientViewModel> {
        positions.iter().map(move |&pos| &self.queue[pos])
    }

    /// Files the current client under `decision` and advances the cursor.
    pub fn decide(&mut self, decision: Decision) -> Result<DecisionReport, SessionError> {
        let Some(current) = self.current() else {
            return Err(SessionError::AlreadyComplete);
        };
        let client_id = current.id;

        self.buckets.for_decision(decision).push(self.cursor);
        self.cursor += 1;
        debug_assert_eq!(self.cursor, self.buckets.total());

        let fired: Vec<Achievement> = all_matches(ACHIEVEMENT_RULES, &*self)
            .copied()
            .filter(|a| !self.achievements.contains(a))
            .collect();
        self.achievements.extend(fired.iter().copied());
        self.version += 1;

        Ok(DecisionReport {
            client_id,
            decision,
            cursor: self.cursor,
            achievements: fired,
            state: self.state(),
        })
    }

    /// [`ReviewSession::decide`] guarded by the cursor the caller rendered.
    pub fn decide_at(
        &mut self,
        expected_cursor: usize,
        decision: Decision,
    ) -> Result<DecisionReport, SessionError> {
        self.check_cursor(expected_cursor)?;
        self.decide(decision)
    }

    /// Takes back the most recent decision. Achievements stay recorded.
    pub fn undo(&mut self) -> Result<ClientId, SessionError> {
        if self.cursor == 0 {
            return Err(SessionError::NothingToUndo);
        }
        let previous = self.cursor - 1;
        let id = self.queue[previous].id;
        let queue = &self.queue;

        for bucket in [
            &mut self.buckets.engaged,
            &mut self.buckets.skipped,
            &mut self.buckets.actioned,
        ] {
            bucket.retain(|&pos| queue[pos].id != id);
        }
        self.cursor = previous;
        self.version += 1;
        debug_assert_eq!(self.cursor, self.buckets.total());

        Ok(id)
    }

    /// [`ReviewSession::undo`] guarded by the cursor the caller rendered.
    pub fn undo_at(&mut self, expected_cursor: usize) -> Result<ClientId, SessionError> {
        self.check_cursor(expected_cursor)?;
        self.undo()
    }

    /// Back to the first client with empty buckets and no achievements.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.buckets = Buckets::default();
        self.achievements.clear();
        self.version += 1;
    }

    fn check_cursor(&self, expected: usize) -> Result<(), SessionError> {
        if expected == self.cursor {
            Ok(())
        } else {
            Err(SessionError::StaleCursor {
                expected,
                actual: self.cursor,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::view_model::fixtures::card;

    fn session(size: i32) -> ReviewSession {
        let queue: Vec<_> = (1..=size).map(|id| card(id, "Call the client")).collect();
        ReviewSession::new(queue.into())
    }

    fn bucket_ids(session: &ReviewSession) -> (Vec<i32>, Vec<i32>, Vec<i32>) {
        (
            session.engaged().map(|c| c.id.get()).collect(),
            session.skipped().map(|c| c.id.get()).collect(),
            session.actioned().map(|c| c.id.get()).collect(),
        )
    }

    #[test]
    fn six_client_walkthrough() {
        let mut session = session(6);

        for step in 1..=5 {
            let report = session.decide(Decision::Action).unwrap();
            assert_eq!(report.cursor, step);
            if step == 3 {
                assert_eq!(report.achievements, vec![Achievement::ActionedFocus]);
                assert!(session.has_achievement(Achievement::ActionedFocus));
            }
            if step == 5 {
                assert_eq!(report.achievements, vec![Achievement::FirstFive]);
                assert!(session.has_achievement(Achievement::FirstFive));
            }
        }

        let report = session.decide(Decision::Engage).unwrap();
        assert_eq!(report.state, SessionState::Complete);
        assert!(report.achievements.is_empty());

        assert_eq!(session.cursor(), 6);
        assert!(session.is_complete());
        assert_eq!(session.bucket_len(Decision::Action), 5);
        assert_eq!(session.bucket_len(Decision::Engage), 1);
        assert_eq!(session.bucket_len(Decision::Skip), 0);
        assert_eq!(session.progress_percent(), 100.0);
        assert_eq!(session.remaining_count(), 0);
        assert_eq!(session.current_action_label(), PLACEHOLDER_ACTION);
    }

    #[test]
    fn empty_queue_starts_complete() {
        let mut session = session(0);
        assert_eq!(session.state(), SessionState::Complete);
        assert_eq!(session.progress_percent(), 0.0);
        assert_eq!(session.remaining_count(), 0);
        assert!(session.upcoming(CARD_WINDOW).is_empty());
        assert_eq!(session.decide(Decision::Skip), Err(SessionError::AlreadyComplete));
        assert_eq!(session.undo(), Err(SessionError::NothingToUndo));
    }

    #[test]
    fn decide_then_undo_restores_cursor_and_buckets() {
        for decision in [Decision::Engage, Decision::Skip, Decision::Action] {
            let mut session = session(4);
            session.decide(Decision::Skip).unwrap();
            session.decide(Decision::Action).unwrap();
            let before = (session.cursor(), bucket_ids(&session));

            let report = session.decide(decision).unwrap();
            assert_eq!(session.decision_for(report.client_id), Some(decision));
            assert_eq!(session.undo(), Ok(report.client_id));

            assert_eq!((session.cursor(), bucket_ids(&session)), before);
            assert_eq!(session.decision_for(report.client_id), None);
        }
    }

    #[test]
    fn undo_at_start_is_rejected_without_change() {
        let mut session = session(2);
        assert_eq!(session.undo(), Err(SessionError::NothingToUndo));
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn decide_when_complete_is_rejected_without_change() {
        let mut session = session(1);
        session.decide(Decision::Skip).unwrap();
        let before = bucket_ids(&session);

        assert_eq!(
            session.decide(Decision::Action),
            Err(SessionError::AlreadyComplete)
        );
        assert_eq!(session.cursor(), 1);
        assert_eq!(bucket_ids(&session), before);
    }

    #[test]
    fn undo_after_completion_reopens_the_session() {
        let mut session = session(1);
        session.decide(Decision::Engage).unwrap();
        assert!(session.is_complete());

        session.undo().unwrap();
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.remaining_count(), 1);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut session = session(8);
        for decision in [
            Decision::Action,
            Decision::Action,
            Decision::Action,
            Decision::Skip,
            Decision::Engage,
        ] {
            session.decide(decision).unwrap();
        }
        assert_eq!(session.achievements().len(), 2);

        let version = session.version();
        session.reset();
        assert!(session.version() > version);
        assert_eq!(session.cursor(), 0);
        assert_eq!(bucket_ids(&session), (vec![], vec![], vec![]));
        assert!(session.achievements().is_empty());
        assert_eq!(session.len(), 8);
        assert_eq!(session.current().map(|c| c.id.get()), Some(1));
    }

    #[test]
    fn first_five_fires_exactly_once() {
        let mut session = session(10);
        let mut fired = 0;
        for _ in 0..5 {
            fired += session
                .decide(Decision::Skip)
                .unwrap()
                .achievements
                .iter()
                .filter(|a| **a == Achievement::FirstFive)
                .count();
        }
        // Dropping back below five and crossing it again does not re-fire.
        session.undo().unwrap();
        for _ in 0..5 {
            fired += session
                .decide(Decision::Skip)
                .unwrap()
                .achievements
                .iter()
                .filter(|a| **a == Achievement::FirstFive)
                .count();
        }
        assert_eq!(fired, 1);
        assert_eq!(session.achievements(), &[Achievement::FirstFive]);
    }

    #[test]
    fn actioned_focus_counts_only_the_actioned_bucket() {
        let mut session = session(6);
        session.decide(Decision::Action).unwrap();
        session.decide(Decision::Skip).unwrap();
        session.decide(Decision::Action).unwrap();
        assert!(!session.has_achievement(Achievement::ActionedFocus));

        let report = session.decide(Decision::Action).unwrap();
        assert_eq!(report.achievements, vec![Achievement::ActionedFocus]);
    }

    #[test]
    fn undo_keeps_fired_achievements() {
        let mut session = session(4);
        for _ in 0..3 {
            session.decide(Decision::Action).unwrap();
        }
        session.undo().unwrap();
        assert!(session.has_achievement(Achievement::ActionedFocus));
    }

    #[test]
    fn stale_cursor_is_rejected() {
        let mut session = session(3);
        session.decide_at(0, Decision::Skip).unwrap();

        // A second submission rendered at the same cursor arrives late.
        assert_eq!(
            session.decide_at(0, Decision::Skip),
            Err(SessionError::StaleCursor {
                expected: 0,
                actual: 1
            })
        );
        assert_eq!(session.cursor(), 1);

        assert_eq!(
            session.undo_at(0),
            Err(SessionError::StaleCursor {
                expected: 0,
                actual: 1
            })
        );
        assert!(session.undo_at(1).is_ok());
    }

    #[test]
    fn upcoming_window_starts_at_cursor() {
        let mut session = session(5);
        session.decide(Decision::Skip).unwrap();
        let ids: Vec<i32> = session.upcoming(CARD_WINDOW).iter().map(|c| c.id.get()).collect();
        assert_eq!(ids, vec![2, 3, 4]);

        session.decide(Decision::Skip).unwrap();
        session.decide(Decision::Skip).unwrap();
        let ids: Vec<i32> = session.upcoming(CARD_WINDOW).iter().map(|c| c.id.get()).collect();
        assert_eq!(ids, vec![4, 5]);
        assert_eq!(session.progress_percent(), 60.0);
    }

    #[test]
    fn from_records_builds_sorted_queue() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let (session, rejected) = ReviewSession::from_records(&[], today);
        assert!(session.is_complete());
        assert!(rejected.is_empty());
    }
}
