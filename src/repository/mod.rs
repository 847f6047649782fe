//! Storage seams: where raw client records come from and where review
//! sessions live between requests.

use crate::domain::client::RawClientRecord;
use crate::domain::session::ReviewSession;
use crate::domain::types::SessionId;
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod json;
pub mod memory;
#[cfg(feature = "test-mocks")]
pub mod mock;

pub use json::JsonClientRepository;
pub use memory::InMemorySessionStore;

pub trait ClientReader {
    /// Raw records in dataset order.
    fn list_client_records(&self) -> RepositoryResult<Vec<RawClientRecord>>;
}

pub trait SessionReader {
    fn get_session(&self, id: SessionId) -> RepositoryResult<Option<ReviewSession>>;
}

pub trait SessionWriter {
    /// Stores `session` under `id`.
    ///
    /// With `expected_version` set, the write only succeeds while the stored
    /// session still has that version; otherwise it fails with
    /// [`errors::RepositoryError::Conflict`].
    fn save_session(
        &self,
        id: SessionId,
        session: &ReviewSession,
        expected_version: Option<u64>,
    ) -> RepositoryResult<()>;

    /// Drops the session, returning whether one existed.
    fn remove_session(&self, id: SessionId) -> RepositoryResult<bool>;
}
