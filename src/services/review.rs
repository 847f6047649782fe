//! Review session use cases: showing the deck and applying decisions.
//!
//! Every transition loads the session, applies it and writes it back with an
//! optimistic version check, so two requests racing on one session cannot
//! both succeed.

use crate::domain::gesture::{KeyCommand, SwipeGesture};
use crate::domain::session::{DecisionReport, ReviewSession, SessionError};
use crate::domain::types::{ClientId, Decision, SessionId};
use crate::dto::review::ReviewPageData;
use crate::repository::{SessionReader, SessionWriter};
use crate::services::dataset::ReviewDataset;
use crate::services::{ServiceError, ServiceResult};

/// What a key press ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Decided(DecisionReport),
    Undone(ClientId),
    /// Unmapped key, or the session is already complete.
    Ignored,
}

fn load_session<R>(repo: &R, id: SessionId) -> ServiceResult<ReviewSession>
where
    R: SessionReader + ?Sized,
{
    repo.get_session(id)
        .map_err(|err| {
            log::error!("Failed to load review session {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)
}

/// Applies `apply` to the stored session and persists the result.
fn transition<R, T, F>(repo: &R, id: SessionId, apply: F) -> ServiceResult<T>
where
    R: SessionReader + SessionWriter + ?Sized,
    F: FnOnce(&mut ReviewSession) -> Result<T, SessionError>,
{
    let mut session = load_session(repo, id)?;
    let version = session.version();

    let outcome = apply(&mut session).map_err(|err| {
        log::warn!("Rejected transition on session {id}: {err}");
        err
    })?;

    repo.save_session(id, &session, Some(version))
        .map_err(|err| {
            log::error!("Failed to save review session {id}: {err}");
            err
        })?;

    Ok(outcome)
}

fn log_report(id: SessionId, report: &DecisionReport) {
    log::debug!(
        "Session {id}: client {} -> {} (cursor {})",
        report.client_id,
        report.decision,
        report.cursor
    );
    for achievement in &report.achievements {
        log::info!("Session {id} unlocked `{}`", achievement.key());
    }
}

/// Returns the browser's session, starting a new one when `session_id` is
/// absent or no longer stored.
pub fn load_review_page<R>(
    repo: &R,
    dataset: &ReviewDataset,
    session_id: Option<SessionId>,
) -> ServiceResult<(SessionId, ReviewPageData)>
where
    R: SessionReader + SessionWriter + ?Sized,
{
    if let Some(id) = session_id {
        match load_session(repo, id) {
            Ok(session) => return Ok((id, ReviewPageData::from(&session))),
            Err(ServiceError::NotFound) => {}
            Err(err) => return Err(err),
        }
    }

    let id = SessionId::generate();
    let session = dataset.start_session();
    repo.save_session(id, &session, None).map_err(|err| {
        log::error!("Failed to create review session: {err}");
        err
    })?;
    log::info!("Started review session {id} over {} clients", session.len());

    Ok((id, ReviewPageData::from(&session)))
}

/// Snapshot of an existing session.
pub fn load_review_snapshot<R>(repo: &R, session_id: SessionId) -> ServiceResult<ReviewPageData>
where
    R: SessionReader + ?Sized,
{
    let session = load_session(repo, session_id)?;
    Ok(ReviewPageData::from(&session))
}

/// Files the current client, provided the session is still at `cursor`.
pub fn submit_decision<R>(
    repo: &R,
    session_id: SessionId,
    cursor: usize,
    decision: Decision,
) -> ServiceResult<DecisionReport>
where
    R: SessionReader + SessionWriter + ?Sized,
{
    let report = transition(repo, session_id, |session| {
        session.decide_at(cursor, decision)
    })?;
    log_report(session_id, &report);
    Ok(report)
}

/// Classifies a released drag. Returns `None` when the card snaps back.
pub fn submit_swipe<R>(
    repo: &R,
    session_id: SessionId,
    cursor: usize,
    gesture: SwipeGesture,
    threshold: f64,
) -> ServiceResult<Option<DecisionReport>>
where
    R: SessionReader + SessionWriter + ?Sized,
{
    match gesture.classify(threshold) {
        Some(decision) => submit_decision(repo, session_id, cursor, decision).map(Some),
        None => Ok(None),
    }
}

/// Handles a keyboard shortcut.
pub fn submit_key<R>(
    repo: &R,
    session_id: SessionId,
    cursor: usize,
    key: &str,
    modifier: bool,
) -> ServiceResult<KeyOutcome>
where
    R: SessionReader + SessionWriter + ?Sized,
{
    let Some(command) = KeyCommand::from_key(key, modifier) else {
        return Ok(KeyOutcome::Ignored);
    };

    if load_session(repo, session_id)?.is_complete() {
        return Ok(KeyOutcome::Ignored);
    }

    match command {
        KeyCommand::Decide(decision) => {
            submit_decision(repo, session_id, cursor, decision).map(KeyOutcome::Decided)
        }
        KeyCommand::Undo => undo_decision(repo, session_id, cursor).map(KeyOutcome::Undone),
    }
}

/// Takes back the most recent decision.
pub fn undo_decision<R>(repo: &R, session_id: SessionId, cursor: usize) -> ServiceResult<ClientId>
where
    R: SessionReader + SessionWriter + ?Sized,
{
    let client_id = transition(repo, session_id, |session| session.undo_at(cursor))?;
    log::debug!("Session {session_id}: undid client {client_id}");
    Ok(client_id)
}

/// Starts the review over.
pub fn reset_session<R>(repo: &R, session_id: SessionId) -> ServiceResult<()>
where
    R: SessionReader + SessionWriter + ?Sized,
{
    transition(repo, session_id, |session| {
        session.reset();
        Ok(())
    })?;
    log::debug!("Session {session_id}: reset");
    Ok(())
}
