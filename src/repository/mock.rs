//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::client::RawClientRecord;
use crate::domain::session::ReviewSession;
use crate::domain::types::SessionId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ClientReader, SessionReader, SessionWriter};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn list_client_records(&self) -> RepositoryResult<Vec<RawClientRecord>>;
    }

    impl SessionReader for Repository {
        fn get_session(&self, id: SessionId) -> RepositoryResult<Option<ReviewSession>>;
    }

    impl SessionWriter for Repository {
        fn save_session(
            &self,
            id: SessionId,
            session: &ReviewSession,
            expected_version: Option<u64>,
        ) -> RepositoryResult<()>;
        fn remove_session(&self, id: SessionId) -> RepositoryResult<bool>;
    }
}
