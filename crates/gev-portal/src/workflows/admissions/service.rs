use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::{
    ApplicationId, ApplicationPayload, ApplicationStatus, StatusUpdate, SubmittedApplication,
};
use super::progression::{StatusProgression, SUBMITTED_NOTES};
use super::repository::{ApplicationRepository, RepositoryError};
use crate::workflows::catalog::{Catalog, Institution};

/// Collaborator serving the catalog and storing submitted applications.
pub struct AdmissionsService<R> {
    catalog: Arc<Catalog>,
    repository: Arc<R>,
    progression: Option<StatusProgression>,
}

static LAST_ISSUED_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Issues `GEV-<unix-millis>`, bumping past the last issued value so two
/// submissions in the same millisecond still receive distinct ids.
fn next_application_id(now: DateTime<Utc>) -> ApplicationId {
    let candidate = now.timestamp_millis();
    let mut previous = LAST_ISSUED_MILLIS.load(Ordering::Relaxed);
    loop {
        let issued = candidate.max(previous + 1);
        match LAST_ISSUED_MILLIS.compare_exchange_weak(
            previous,
            issued,
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => return ApplicationId(format!("GEV-{issued}")),
            Err(actual) => previous = actual,
        }
    }
}

impl<R> AdmissionsService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(catalog: Arc<Catalog>, repository: Arc<R>) -> Self {
        Self {
            catalog,
            repository,
            progression: None,
        }
    }

    /// Attaches a progression runner that appends review updates after each submission.
    pub fn with_progression(mut self, progression: StatusProgression) -> Self {
        self.progression = Some(progression);
        self
    }

    pub fn institutions(&self) -> Vec<Institution> {
        self.catalog.institutions().to_vec()
    }

    /// Store a new application with its initial "Submitted" entry.
    pub fn submit(
        &self,
        payload: ApplicationPayload,
    ) -> Result<SubmittedApplication, AdmissionsServiceError> {
        let submission_date = Utc::now();
        let application_id = next_application_id(submission_date);

        let record = SubmittedApplication {
            application_id: application_id.clone(),
            submission_date,
            status_history: vec![StatusUpdate {
                timestamp: submission_date,
                status: ApplicationStatus::Submitted,
                notes: SUBMITTED_NOTES.to_string(),
            }],
            payload,
        };

        let stored = self.repository.insert(record)?;
        info!(
            %application_id,
            programs = stored.payload.selected_programs.len(),
            documents = stored.payload.documents.len(),
            "application submitted"
        );

        if let Some(progression) = &self.progression {
            progression.start(application_id);
        }

        Ok(stored)
    }

    /// Fetch an application with its full status history.
    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<SubmittedApplication, AdmissionsServiceError> {
        match self.repository.fetch(application_id)? {
            Some(record) => Ok(record),
            None => {
                warn!(%application_id, "application lookup missed");
                Err(RepositoryError::NotFound.into())
            }
        }
    }
}

/// Error raised by the admissions service.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionsServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AdmissionsServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(RepositoryError::NotFound))
    }
}
