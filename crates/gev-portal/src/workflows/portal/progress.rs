use super::documents::DocumentLedger;
use super::form::{applicant_info_complete, ApplicantForm};
use super::selection::SelectionStore;
use super::services::ServiceSelection;
use crate::workflows::admissions::AccommodationPreference;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressSection {
    ApplicantInfo,
    SelectedPrograms,
    Documents,
    Accommodation,
    SupportServices,
}

impl ProgressSection {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::ApplicantInfo,
            Self::SelectedPrograms,
            Self::Documents,
            Self::Accommodation,
            Self::SupportServices,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ApplicantInfo => "Applicant Information",
            Self::SelectedPrograms => "Selected Programs",
            Self::Documents => "Documents",
            Self::Accommodation => "Accommodation",
            Self::SupportServices => "Support Services",
        }
    }
}

/// Raw facts the completion percentage is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressInput<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub selected_programs: usize,
    pub has_uploaded_document: bool,
    pub accommodation: AccommodationPreference,
    pub selected_services: usize,
}

impl<'a> ProgressInput<'a> {
    pub fn from_parts(
        form: &'a ApplicantForm,
        selection: &SelectionStore,
        documents: &DocumentLedger,
        services: &ServiceSelection,
    ) -> Self {
        Self {
            full_name: &form.full_name,
            email: &form.email,
            selected_programs: selection.len(),
            has_uploaded_document: documents.has_success(),
            accommodation: form.accommodation,
            selected_services: services.len(),
        }
    }
}

/// Completion flags of the five form sections, each worth 20%.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressReport {
    sections: [(ProgressSection, bool); 5],
}

impl ProgressReport {
    pub fn evaluate(input: &ProgressInput<'_>) -> Self {
        let done = |section: ProgressSection| match section {
            ProgressSection::ApplicantInfo => {
                applicant_info_complete(input.full_name, input.email)
            }
            ProgressSection::SelectedPrograms => input.selected_programs > 0,
            ProgressSection::Documents => input.has_uploaded_document,
            ProgressSection::Accommodation => input.accommodation != AccommodationPreference::None,
            ProgressSection::SupportServices => input.selected_services > 0,
        };
        Self {
            sections: ProgressSection::ordered().map(|section| (section, done(section))),
        }
    }

    pub fn is_complete(&self, section: ProgressSection) -> bool {
        self.sections
            .iter()
            .any(|(candidate, done)| *candidate == section && *done)
    }

    pub fn sections(&self) -> &[(ProgressSection, bool)] {
        &self.sections
    }

    pub fn completed(&self) -> usize {
        self.sections.iter().filter(|(_, done)| *done).count()
    }

    /// Rounded percentage, always a multiple of 20.
    pub fn percent(&self) -> u8 {
        let total = self.sections.len();
        ((self.completed() * 100 + total / 2) / total) as u8
    }
}
