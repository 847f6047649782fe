//! Start-up factory for the review dataset.

use chrono::NaiveDate;

use crate::domain::session::{ClientQueue, ReviewSession};
use crate::domain::transform::{RejectedRecord, transform};
use crate::repository::ClientReader;
use crate::services::ServiceResult;

/// Transformed clients shared by every review session of the process.
#[derive(Clone, Debug)]
pub struct ReviewDataset {
    /// Cards sorted by revenue potential.
    pub clients: ClientQueue,
    pub rejected: Vec<RejectedRecord>,
    /// Reference date the relative times were computed against.
    pub today: NaiveDate,
}

impl ReviewDataset {
    /// Starts a fresh session over the shared queue.
    pub fn start_session(&self) -> ReviewSession {
        ReviewSession::new(self.clients.clone())
    }
}

/// Reads every raw record and transforms the batch.
pub fn load_dataset<R>(repo: &R, today: NaiveDate) -> ServiceResult<ReviewDataset>
where
    R: ClientReader + ?Sized,
{
    let records = repo.list_client_records().map_err(|err| {
        log::error!("Failed to load client records: {err}");
        err
    })?;

    let outcome = transform(&records, today);
    log::info!(
        "Loaded {} clients ({} rejected)",
        outcome.clients.len(),
        outcome.rejected.len()
    );

    Ok(ReviewDataset {
        clients: outcome.clients.into(),
        rejected: outcome.rejected,
        today,
    })
}
