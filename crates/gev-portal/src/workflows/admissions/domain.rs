use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::catalog::{Program, ProgramCost, ProgramKey, Scholarship};

/// Identifier handed back on submission (`GEV-<unix-millis>`); opaque to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review state recorded in an application's status history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Submitted,
    #[serde(rename = "Under Review")]
    UnderReview,
    #[serde(rename = "Action Required")]
    ActionRequired,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Submitted,
            Self::UnderReview,
            Self::ActionRequired,
            Self::Accepted,
            Self::Rejected,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::UnderReview => "Under Review",
            Self::ActionRequired => "Action Required",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }

    /// Outcomes the review process can finish with.
    pub const fn terminal() -> [Self; 3] {
        [Self::Accepted, Self::Rejected, Self::ActionRequired]
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub timestamp: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisaType {
    #[default]
    None,
    Study,
    Tourist,
}

impl VisaType {
    /// Visa types that pull the visa support service into the selection.
    pub const fn requires_visa_service(self) -> bool {
        matches!(self, Self::Study | Self::Tourist)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Some(Self::None),
            "study" => Some(Self::Study),
            "tourist" => Some(Self::Tourist),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccommodationPreference {
    OnCampus,
    OffCampus,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceId {
    Visa,
    TestPrep,
    AirportPickup,
    PreDeparture,
}

struct ServiceEntry {
    id: ServiceId,
    name: &'static str,
    description: &'static str,
    cost: f64,
}

/// Support services offered alongside applications; costs in PKR.
const SERVICE_CATALOG: [ServiceEntry; 4] = [
    ServiceEntry {
        id: ServiceId::Visa,
        name: "Visa Service",
        description: "Comprehensive guidance and support through your entire visa application process.",
        cost: 50_000.0,
    },
    ServiceEntry {
        id: ServiceId::TestPrep,
        name: "Test Preparation",
        description: "Assistance for tests like IELTS, TOEFL, etc.",
        cost: 35_000.0,
    },
    ServiceEntry {
        id: ServiceId::AirportPickup,
        name: "Airport Pickup",
        description: "Reliable pickup service from the airport to your accommodation.",
        cost: 10_000.0,
    },
    ServiceEntry {
        id: ServiceId::PreDeparture,
        name: "Pre-departure Briefing",
        description: "A complete guide on what to expect and how to prepare for your new journey.",
        cost: 7_500.0,
    },
];

impl ServiceId {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Visa,
            Self::TestPrep,
            Self::AirportPickup,
            Self::PreDeparture,
        ]
    }

    fn entry(self) -> &'static ServiceEntry {
        &SERVICE_CATALOG[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    pub fn cost(self) -> f64 {
        self.entry().cost
    }

    pub fn resolve(self) -> SupportService {
        let entry = self.entry();
        SupportService {
            id: entry.id,
            name: entry.name.to_string(),
            description: entry.description.to_string(),
            cost: entry.cost,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "visa" => Some(Self::Visa),
            "testprep" => Some(Self::TestPrep),
            "airportpickup" => Some(Self::AirportPickup),
            "predeparture" => Some(Self::PreDeparture),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportService {
    pub id: ServiceId,
    pub name: String,
    pub description: String,
    pub cost: f64,
}

/// A program as it appears on an application, with its institution-wide fee
/// and scholarship choices materialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedProgram {
    #[serde(flatten)]
    pub program: Program,
    pub institution_name: String,
    pub selected_scholarships: Vec<Scholarship>,
    pub university_application_fee: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_cost: Option<ProgramCost>,
}

impl SelectedProgram {
    pub fn key(&self) -> ProgramKey {
        ProgramKey::new(self.program.name.clone(), self.institution_name.clone())
    }

    pub fn effective_cost(&self) -> &ProgramCost {
        self.edited_cost.as_ref().unwrap_or(&self.program.cost)
    }
}

/// Document reference carried on a submission; only the first attached file is named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    #[serde(rename = "type")]
    pub document_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Parent or guardian reachable about the application. All fields optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianContact {
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub contact_message: String,
}

impl GuardianContact {
    pub fn is_empty(&self) -> bool {
        [
            &self.contact_name,
            &self.contact_email,
            &self.contact_phone,
            &self.contact_message,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }
}

/// Everything the applicant confirmed, exactly as packaged by the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    pub full_name: String,
    pub email: String,
    pub selected_programs: Vec<SelectedProgram>,
    pub visa_type: VisaType,
    pub accommodation_preference: AccommodationPreference,
    pub documents: Vec<DocumentRecord>,
    pub selected_services: Vec<SupportService>,
    #[serde(flatten)]
    pub contact: GuardianContact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedApplication {
    pub application_id: ApplicationId,
    pub submission_date: DateTime<Utc>,
    pub status_history: Vec<StatusUpdate>,
    #[serde(flatten)]
    pub payload: ApplicationPayload,
}

impl SubmittedApplication {
    /// Latest entry of the status history.
    pub fn current_status(&self) -> Option<&StatusUpdate> {
        self.status_history.last()
    }

    /// Status history, most recent first.
    pub fn timeline(&self) -> impl Iterator<Item = &StatusUpdate> {
        self.status_history.iter().rev()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub application_id: ApplicationId,
}
