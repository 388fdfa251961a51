//! Confirmation flow and payload packaging for the application form.

use tracing::{info, warn};

use super::documents::{DocumentId, DocumentLedger};
use super::form::{is_well_formed_email, ApplicantForm};
use super::selection::SelectionStore;
use super::services::ServiceSelection;
use crate::workflows::admissions::{
    AdmissionsGateway, ApplicationId, ApplicationPayload, GatewayError,
};

const SUBMIT_FALLBACK_MESSAGE: &str = "Failed to submit application.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter your full name.")]
    MissingName,
    #[error("Please enter your email address.")]
    MissingEmail,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please enter a valid contact email address.")]
    InvalidContactEmail,
    #[error("Please specify the type of document {0}.")]
    MissingOtherType(DocumentId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("the application is not awaiting confirmation")]
    NotAwaitingConfirmation,
    #[error("{0}")]
    Rejected(String),
}

impl From<GatewayError> for SubmissionError {
    fn from(err: GatewayError) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            Self::Rejected(SUBMIT_FALLBACK_MESSAGE.to_string())
        } else {
            Self::Rejected(message)
        }
    }
}

/// Checks the fields required before the confirmation step.
pub fn validate(form: &ApplicantForm, documents: &DocumentLedger) -> Result<(), ValidationError> {
    if form.full_name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if form.normalized_email().is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !is_well_formed_email(form.normalized_email()) {
        return Err(ValidationError::InvalidEmail);
    }
    let contact_email = form.contact.contact_email.trim();
    if !contact_email.is_empty() && !is_well_formed_email(contact_email) {
        return Err(ValidationError::InvalidContactEmail);
    }
    if let Some(document) = documents.incomplete_other().next() {
        return Err(ValidationError::MissingOtherType(document.id));
    }
    Ok(())
}

/// Freezes the form, the selection and the documents into a submission payload.
pub fn package(
    form: &ApplicantForm,
    selection: &SelectionStore,
    services: &ServiceSelection,
    documents: &DocumentLedger,
) -> ApplicationPayload {
    ApplicationPayload {
        full_name: form.full_name.clone(),
        email: form.normalized_email().to_string(),
        selected_programs: selection.selected_programs(),
        visa_type: services.visa_type(),
        accommodation_preference: form.accommodation,
        documents: documents.records(),
        selected_services: services.resolved(),
        contact: form.contact.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Editing { error: Option<String> },
    ConfirmPending,
    Submitted { application_id: ApplicationId },
}

impl Default for SubmissionState {
    fn default() -> Self {
        Self::Editing { error: None }
    }
}

/// `Editing -> ConfirmPending -> Submitted`, with cancel and failure paths back to editing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFlow {
    state: SubmissionState,
}

impl SubmissionFlow {
    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn application_id(&self) -> Option<&ApplicationId> {
        match &self.state {
            SubmissionState::Submitted { application_id } => Some(application_id),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SubmissionState::Editing { error } => error.as_deref(),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, SubmissionState::Editing { .. })
    }

    /// Validates the form and moves to the confirmation step.
    pub fn request_confirmation(
        &mut self,
        form: &ApplicantForm,
        documents: &DocumentLedger,
    ) -> Result<(), SubmissionError> {
        if !self.is_editing() {
            return Err(SubmissionError::NotAwaitingConfirmation);
        }
        validate(form, documents)?;
        self.state = SubmissionState::ConfirmPending;
        Ok(())
    }

    pub fn cancel(&mut self) {
        if self.state == SubmissionState::ConfirmPending {
            self.state = SubmissionState::Editing { error: None };
        }
    }

    /// Sends the confirmed payload. On failure the flow returns to editing with
    /// the error message; the caller's form and selection stay untouched.
    pub async fn confirm<G>(
        &mut self,
        gateway: &G,
        payload: ApplicationPayload,
    ) -> Result<ApplicationId, SubmissionError>
    where
        G: AdmissionsGateway,
    {
        if self.state != SubmissionState::ConfirmPending {
            return Err(SubmissionError::NotAwaitingConfirmation);
        }
        match gateway.submit_application(payload).await {
            Ok(receipt) => {
                info!(application_id = %receipt.application_id, "application confirmed");
                self.state = SubmissionState::Submitted {
                    application_id: receipt.application_id.clone(),
                };
                Ok(receipt.application_id)
            }
            Err(err) => {
                let err = SubmissionError::from(err);
                warn!(error = %err, "application submission failed");
                self.state = SubmissionState::Editing {
                    error: Some(err.to_string()),
                };
                Err(err)
            }
        }
    }

    /// Back to a blank editing state; the caller clears the form and selection.
    pub fn start_new(&mut self) {
        self.state = SubmissionState::default();
    }
}
