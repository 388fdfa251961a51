//! Admissions collaborator: catalog serving, application intake, status history.
//!
//! The portal only talks to this module through [`AdmissionsGateway`]; the HTTP
//! router exposes the same three operations to remote clients.

pub mod domain;
pub mod gateway;
pub mod progression;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AccommodationPreference, ApplicationId, ApplicationPayload, ApplicationStatus,
    DocumentRecord, GuardianContact, SelectedProgram, ServiceId, StatusUpdate, SubmissionReceipt,
    SubmittedApplication, SupportService, VisaType,
};
pub use gateway::{AdmissionsGateway, GatewayError, GatewayLatency, LocalGateway};
pub use progression::{
    ScheduledUpdate, SimulatedReviewPolicy, StatusEvent, StatusProgression,
    StatusProgressionPolicy,
};
pub use repository::{ApplicationRepository, RepositoryError};
pub use router::admissions_router;
pub use service::{AdmissionsService, AdmissionsServiceError};
