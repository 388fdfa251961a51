use super::domain::{ApplicationId, StatusUpdate, SubmittedApplication};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, record: SubmittedApplication)
        -> Result<SubmittedApplication, RepositoryError>;
    /// Appends to the status history; earlier entries are never rewritten.
    fn append_status(
        &self,
        id: &ApplicationId,
        update: StatusUpdate,
    ) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<SubmittedApplication>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
