use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::admissions::domain::{
    AccommodationPreference, ApplicationId, ApplicationPayload, ApplicationStatus,
    DocumentRecord, GuardianContact, SelectedProgram, ServiceId, StatusUpdate,
    SubmittedApplication, VisaType,
};
use crate::workflows::admissions::progression::{ScheduledUpdate, StatusProgressionPolicy};
use crate::workflows::admissions::repository::{ApplicationRepository, RepositoryError};
use crate::workflows::admissions::{admissions_router, AdmissionsService};
use crate::workflows::catalog::Catalog;

pub(super) fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::embedded().expect("embedded catalog parses"))
}

pub(super) fn selected_mba() -> SelectedProgram {
    let catalog = catalog();
    let institution = catalog
        .institution("University of Cambridge")
        .expect("cambridge present");
    let program = institution
        .program("Masters in Business Administration")
        .expect("mba present")
        .clone();
    SelectedProgram {
        selected_scholarships: program.scholarships.iter().take(1).cloned().collect(),
        program,
        institution_name: institution.name.clone(),
        university_application_fee: institution.base_fee(),
        edited_cost: None,
    }
}

pub(super) fn payload() -> ApplicationPayload {
    ApplicationPayload {
        full_name: "Ayesha Khan".to_string(),
        email: "ayesha@example.com".to_string(),
        selected_programs: vec![selected_mba()],
        visa_type: VisaType::Study,
        accommodation_preference: AccommodationPreference::OnCampus,
        documents: vec![DocumentRecord {
            document_type: "Passport".to_string(),
            file_name: Some("passport.pdf".to_string()),
        }],
        selected_services: vec![ServiceId::Visa.resolve()],
        contact: GuardianContact::default(),
    }
}

pub(super) fn build_service() -> (AdmissionsService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AdmissionsService::new(catalog(), repository.clone());
    (service, repository)
}

pub(super) fn router_with_service(service: AdmissionsService<MemoryRepository>) -> axum::Router {
    admissions_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ApplicationId, SubmittedApplication>>>,
}

impl MemoryRepository {
    pub(super) fn history(&self, id: &ApplicationId) -> Vec<ApplicationStatus> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .map(|record| record.status_history.iter().map(|u| u.status).collect())
            .unwrap_or_default()
    }
}

impl ApplicationRepository for MemoryRepository {
    fn insert(
        &self,
        record: SubmittedApplication,
    ) -> Result<SubmittedApplication, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.application_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.application_id.clone(), record.clone());
        Ok(record)
    }

    fn append_status(
        &self,
        id: &ApplicationId,
        update: StatusUpdate,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.status_history.push(update);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<SubmittedApplication>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct ConflictRepository;

impl ApplicationRepository for ConflictRepository {
    fn insert(
        &self,
        _record: SubmittedApplication,
    ) -> Result<SubmittedApplication, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn append_status(
        &self,
        _id: &ApplicationId,
        _update: StatusUpdate,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<SubmittedApplication>, RepositoryError> {
        Ok(None)
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(
        &self,
        _record: SubmittedApplication,
    ) -> Result<SubmittedApplication, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn append_status(
        &self,
        _id: &ApplicationId,
        _update: StatusUpdate,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<SubmittedApplication>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Deterministic schedule: review after `review`, acceptance after `decision`.
pub(super) struct FixedPolicy {
    pub(super) review: Duration,
    pub(super) decision: Duration,
}

impl StatusProgressionPolicy for FixedPolicy {
    fn schedule(&self, _application_id: &ApplicationId) -> Vec<ScheduledUpdate> {
        vec![
            ScheduledUpdate {
                after: self.decision,
                status: ApplicationStatus::Accepted,
                notes: "accepted".to_string(),
            },
            ScheduledUpdate {
                after: self.review,
                status: ApplicationStatus::UnderReview,
                notes: "reviewing".to_string(),
            },
        ]
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
