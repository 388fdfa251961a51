//! Application status lookup by id.

use tracing::debug;

use crate::workflows::admissions::{
    AdmissionsGateway, ApplicationId, ApplicationStatus, GatewayError, StatusUpdate,
    SubmittedApplication,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackingError {
    #[error("Please enter an Application ID.")]
    EmptyId,
    #[error("Application ID not found. Please check the ID and try again.")]
    NotFound,
    #[error("{0}")]
    Unavailable(String),
}

impl From<GatewayError> for TrackingError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound => Self::NotFound,
            GatewayError::Unavailable(reason) => Self::Unavailable(reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    CheckCircle,
    Clock,
    ExclamationCircle,
    AcademicCap,
    XCircle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Positive,
    Informational,
    Attention,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPresentation {
    pub icon: StatusIcon,
    pub tone: StatusTone,
}

/// Indexed by `ApplicationStatus` discriminant.
const STATUS_PRESENTATION: [StatusPresentation; 5] = [
    StatusPresentation {
        icon: StatusIcon::CheckCircle,
        tone: StatusTone::Positive,
    },
    StatusPresentation {
        icon: StatusIcon::Clock,
        tone: StatusTone::Informational,
    },
    StatusPresentation {
        icon: StatusIcon::ExclamationCircle,
        tone: StatusTone::Attention,
    },
    StatusPresentation {
        icon: StatusIcon::AcademicCap,
        tone: StatusTone::Positive,
    },
    StatusPresentation {
        icon: StatusIcon::XCircle,
        tone: StatusTone::Negative,
    },
];

pub fn presentation(status: ApplicationStatus) -> StatusPresentation {
    STATUS_PRESENTATION[status as usize]
}

/// Tracker panel state. A failed lookup records its error but keeps whatever
/// application was tracked before.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerState {
    input: String,
    tracked: Option<SubmittedApplication>,
    error: Option<TrackingError>,
    loading: bool,
}

impl TrackerState {
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Validates the typed id and marks a lookup as started.
    pub fn begin(&mut self) -> Result<ApplicationId, TrackingError> {
        let id = self.input.trim();
        if id.is_empty() {
            self.error = Some(TrackingError::EmptyId);
            return Err(TrackingError::EmptyId);
        }
        self.error = None;
        self.loading = true;
        Ok(ApplicationId(id.to_string()))
    }

    /// Folds a lookup result into the panel.
    pub fn resolve(
        &mut self,
        result: Result<SubmittedApplication, GatewayError>,
    ) -> Result<&SubmittedApplication, TrackingError> {
        self.loading = false;
        match result {
            Ok(application) => {
                self.error = None;
                let tracked = self.tracked.insert(application);
                Ok(&*tracked)
            }
            Err(err) => {
                let err = TrackingError::from(err);
                debug!(input = %self.input, error = %err, "tracking lookup failed");
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub async fn track<G>(&mut self, gateway: &G) -> Result<&SubmittedApplication, TrackingError>
    where
        G: AdmissionsGateway,
    {
        let id = self.begin()?;
        let result = gateway.application_status(&id).await;
        self.resolve(result)
    }

    /// Abandons an in-flight lookup without touching the tracked application.
    pub fn abandon(&mut self) {
        self.loading = false;
    }

    pub fn tracked(&self) -> Option<&SubmittedApplication> {
        self.tracked.as_ref()
    }

    pub fn error(&self) -> Option<&TrackingError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn current_status(&self) -> Option<ApplicationStatus> {
        self.tracked
            .as_ref()
            .and_then(SubmittedApplication::current_status)
            .map(|update| update.status)
    }

    /// History of the tracked application, most recent first.
    pub fn timeline(&self) -> Vec<&StatusUpdate> {
        self.tracked
            .iter()
            .flat_map(|application| application.timeline())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presentation_table_follows_status_order() {
        assert_eq!(
            presentation(ApplicationStatus::Submitted).icon,
            StatusIcon::CheckCircle
        );
        assert_eq!(
            presentation(ApplicationStatus::UnderReview).icon,
            StatusIcon::Clock
        );
        assert_eq!(
            presentation(ApplicationStatus::ActionRequired).tone,
            StatusTone::Attention
        );
        assert_eq!(
            presentation(ApplicationStatus::Accepted).icon,
            StatusIcon::AcademicCap
        );
        assert_eq!(
            presentation(ApplicationStatus::Rejected).tone,
            StatusTone::Negative
        );
    }

    #[test]
    fn blank_input_is_rejected_before_lookup() {
        let mut tracker = TrackerState::default();
        tracker.set_input("   ");

        assert_eq!(tracker.begin(), Err(TrackingError::EmptyId));
        assert_eq!(
            tracker.error().map(ToString::to_string).as_deref(),
            Some("Please enter an Application ID.")
        );
        assert!(!tracker.is_loading());
    }

    #[test]
    fn begin_trims_the_typed_id() {
        let mut tracker = TrackerState::default();
        tracker.set_input("  GEV-17 ");

        assert_eq!(tracker.begin(), Ok(ApplicationId("GEV-17".to_string())));
        assert!(tracker.is_loading());
    }

    #[test]
    fn not_found_maps_to_user_message() {
        let mut tracker = TrackerState::default();
        tracker.set_input("GEV-1");
        tracker.begin().expect("non-empty");

        let err = tracker.resolve(Err(GatewayError::NotFound)).expect_err("missing");
        assert_eq!(
            err.to_string(),
            "Application ID not found. Please check the ID and try again."
        );
        assert!(tracker.tracked().is_none());
        assert!(tracker.timeline().is_empty());
    }
}
