//! Applicant-facing portal core: selection reducer, derived progress and
//! costs, documents, submission and tracking.

pub mod costs;
pub mod documents;
pub mod fetch;
pub mod form;
pub mod progress;
pub mod selection;
pub mod services;
pub mod session;
pub mod submission;
pub mod tracker;

pub use costs::CostSummary;
pub use documents::{
    DocumentId, DocumentKind, DocumentLedger, DocumentUpload, UploadSimulation, UploadStatus,
};
pub use fetch::PendingFetch;
pub use form::{is_well_formed_email, ApplicantForm};
pub use progress::{ProgressInput, ProgressReport, ProgressSection};
pub use selection::{
    coerce_fee, first_catalog_scholarship, no_scholarships, InstitutionGroup, ProgramSelection,
    SelectionAction, SelectionStore,
};
pub use services::ServiceSelection;
pub use session::{CatalogState, PortalSession};
pub use submission::{SubmissionError, SubmissionFlow, SubmissionState, ValidationError};
pub use tracker::{presentation, StatusIcon, StatusPresentation, StatusTone, TrackerState, TrackingError};
