//! One applicant's portal session: catalog, selection, form, submission, tracking.

use std::sync::Arc;

use tracing::{info, warn};

use super::costs::CostSummary;
use super::documents::{DocumentLedger, UploadSimulation};
use super::fetch::PendingFetch;
use super::form::ApplicantForm;
use super::progress::{ProgressInput, ProgressReport};
use super::selection::{InstitutionGroup, SelectionAction, SelectionStore};
use super::services::ServiceSelection;
use super::submission::{self, SubmissionError, SubmissionFlow};
use super::tracker::{TrackerState, TrackingError};
use crate::workflows::admissions::{
    AdmissionsGateway, ApplicationId, ApplicationPayload, GatewayError, SubmittedApplication,
};
use crate::workflows::catalog::{
    CatalogFilter, ComparisonError, ComparisonList, Institution, ProgramKey,
};

const CATALOG_FALLBACK_MESSAGE: &str = "Failed to fetch university data. Please try again later.";

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogState {
    Loading,
    Ready(Vec<Institution>),
    Failed(String),
}

type CatalogFetch = PendingFetch<Result<Vec<Institution>, GatewayError>>;
type TrackingFetch = PendingFetch<Result<SubmittedApplication, GatewayError>>;

pub struct PortalSession<G> {
    gateway: Arc<G>,
    catalog: CatalogState,
    catalog_fetch: Option<CatalogFetch>,
    comparison: ComparisonList,
    form: ApplicantForm,
    selection: SelectionStore,
    services: ServiceSelection,
    documents: DocumentLedger,
    submission: SubmissionFlow,
    tracker: TrackerState,
    tracking_fetch: Option<TrackingFetch>,
}

impl<G> PortalSession<G>
where
    G: AdmissionsGateway + 'static,
{
    pub fn new(gateway: Arc<G>, uploads: UploadSimulation) -> Self {
        Self {
            gateway,
            catalog: CatalogState::Loading,
            catalog_fetch: None,
            comparison: ComparisonList::default(),
            form: ApplicantForm::default(),
            selection: SelectionStore::default(),
            services: ServiceSelection::default(),
            documents: DocumentLedger::new(uploads),
            submission: SubmissionFlow::default(),
            tracker: TrackerState::default(),
            tracking_fetch: None,
        }
    }

    /// Replaces the default scholarship pre-selection (e.g. with `no_scholarships`).
    pub fn with_selection(mut self, selection: SelectionStore) -> Self {
        self.selection = selection;
        self
    }

    /// Starts fetching the catalog in the background. Must be called inside a
    /// tokio runtime.
    pub fn begin_catalog_load(&mut self) {
        let gateway = self.gateway.clone();
        self.catalog = CatalogState::Loading;
        self.catalog_fetch = Some(PendingFetch::spawn(async move {
            gateway.fetch_institutions().await
        }));
    }

    /// Waits for the pending catalog fetch and records its outcome.
    pub async fn finish_catalog_load(&mut self) -> &CatalogState {
        let Some(fetch) = self.catalog_fetch.take() else {
            return &self.catalog;
        };
        self.catalog = match fetch.join().await {
            Some(Ok(institutions)) => {
                info!(institutions = institutions.len(), "catalog loaded");
                CatalogState::Ready(institutions)
            }
            Some(Err(err)) => {
                warn!(error = %err, "catalog load failed");
                let message = err.to_string();
                CatalogState::Failed(if message.trim().is_empty() {
                    CATALOG_FALLBACK_MESSAGE.to_string()
                } else {
                    message
                })
            }
            None => {
                warn!("catalog load aborted");
                CatalogState::Failed(CATALOG_FALLBACK_MESSAGE.to_string())
            }
        };
        &self.catalog
    }

    pub async fn load_catalog(&mut self) -> &CatalogState {
        self.begin_catalog_load();
        self.finish_catalog_load().await
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    /// Institutions of a loaded catalog; empty while loading or after a failure.
    pub fn institutions(&self) -> &[Institution] {
        match &self.catalog {
            CatalogState::Ready(institutions) => institutions,
            _ => &[],
        }
    }

    pub fn institution(&self, name: &str) -> Option<&Institution> {
        self.institutions()
            .iter()
            .find(|institution| institution.name == name)
    }

    pub fn browse(&self, filter: &CatalogFilter) -> Vec<&Institution> {
        filter.apply(self.institutions())
    }

    pub fn toggle_comparison(&mut self, key: ProgramKey) -> Result<(), ComparisonError> {
        self.comparison.toggle(key)
    }

    pub fn comparison(&self) -> &ComparisonList {
        &self.comparison
    }

    pub fn dispatch(&mut self, action: SelectionAction) {
        let current = std::mem::take(&mut self.selection);
        self.selection = current.reduce(action);
    }

    /// Toggles a catalog program by name; false if the catalog does not list it.
    pub fn toggle_program(&mut self, institution_name: &str, program_name: &str) -> bool {
        let action = self.institution(institution_name).and_then(|institution| {
            institution
                .program(program_name)
                .map(|program| SelectionAction::toggle_program(program, institution))
        });
        match action {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => false,
        }
    }

    /// Toggles one of a selected program's catalog scholarships by name.
    pub fn toggle_scholarship(&mut self, key: &ProgramKey, scholarship_name: &str) -> bool {
        let scholarship = self
            .selection
            .get(key)
            .and_then(|selection| selection.program.scholarship(scholarship_name))
            .cloned();
        match scholarship {
            Some(scholarship) => {
                self.dispatch(SelectionAction::ToggleScholarship {
                    key: key.clone(),
                    scholarship,
                });
                true
            }
            None => false,
        }
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn form(&self) -> &ApplicantForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ApplicantForm {
        &mut self.form
    }

    pub fn services(&self) -> &ServiceSelection {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut ServiceSelection {
        &mut self.services
    }

    pub fn documents(&self) -> &DocumentLedger {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut DocumentLedger {
        &mut self.documents
    }

    pub fn progress(&self) -> ProgressReport {
        ProgressReport::evaluate(&ProgressInput::from_parts(
            &self.form,
            &self.selection,
            &self.documents,
            &self.services,
        ))
    }

    pub fn costs(&self) -> Option<CostSummary> {
        CostSummary::for_selection(&self.selection, &self.services)
    }

    pub fn preview(&self) -> Vec<InstitutionGroup<'_>> {
        self.selection.by_institution()
    }

    pub fn submission(&self) -> &SubmissionFlow {
        &self.submission
    }

    pub fn request_confirmation(&mut self) -> Result<(), SubmissionError> {
        self.submission
            .request_confirmation(&self.form, &self.documents)
    }

    pub fn cancel_confirmation(&mut self) {
        self.submission.cancel();
    }

    /// Payload that confirming right now would send.
    pub fn payload(&self) -> ApplicationPayload {
        submission::package(&self.form, &self.selection, &self.services, &self.documents)
    }

    pub async fn confirm(&mut self) -> Result<ApplicationId, SubmissionError> {
        let payload = self.payload();
        self.submission.confirm(self.gateway.as_ref(), payload).await
    }

    /// Clears the form, documents and selection and returns to editing.
    pub fn start_new_application(&mut self) {
        self.form = ApplicantForm::default();
        self.services = ServiceSelection::default();
        self.documents.clear();
        self.dispatch(SelectionAction::Clear);
        self.submission.start_new();
    }

    pub fn tracker(&self) -> &TrackerState {
        &self.tracker
    }

    pub fn set_tracking_input(&mut self, input: impl Into<String>) {
        self.tracker.set_input(input);
    }

    /// Starts a background lookup of the typed id. Must be called inside a tokio
    /// runtime.
    pub fn begin_tracking(&mut self) -> Result<(), TrackingError> {
        let id = self.tracker.begin()?;
        let gateway = self.gateway.clone();
        self.tracking_fetch = Some(PendingFetch::spawn(async move {
            gateway.application_status(&id).await
        }));
        Ok(())
    }

    pub async fn finish_tracking(&mut self) -> Result<&SubmittedApplication, TrackingError> {
        let Some(fetch) = self.tracking_fetch.take() else {
            if let Some(err) = self.tracker.error() {
                return Err(err.clone());
            }
            return self.tracker.tracked().ok_or(TrackingError::EmptyId);
        };
        match fetch.join().await {
            Some(result) => self.tracker.resolve(result),
            None => {
                self.tracker.abandon();
                Err(TrackingError::Unavailable("lookup aborted".to_string()))
            }
        }
    }

    pub async fn track(&mut self, input: &str) -> Result<&SubmittedApplication, TrackingError> {
        self.set_tracking_input(input);
        self.begin_tracking()?;
        self.finish_tracking().await
    }
}
