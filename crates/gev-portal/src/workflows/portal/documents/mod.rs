//! Applicant documents: declared type, simulated upload, submission records.

mod ledger;
mod simulator;
mod upload;

use std::fmt;

use crate::workflows::admissions::DocumentRecord;

pub use ledger::DocumentLedger;
pub use simulator::{UploadSimulation, UploadTask};
pub use upload::{
    UploadEvent, UploadProgress, UploadState, UploadStatus, UPLOAD_FAILED_MESSAGE,
};

/// Creation-time id in unix millis, strictly increasing within a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// No type chosen yet.
    #[default]
    Unspecified,
    Passport,
    Visa,
    Cv,
    Transcript,
    PersonalStatement,
    ReferenceLetters,
    /// Free-text subtype typed by the applicant.
    Other(String),
}

impl DocumentKind {
    /// Type labels offered in the document picker.
    pub const CHOICES: [&'static str; 7] = [
        "Passport",
        "Visa",
        "CV",
        "Transcript",
        "Personal Statement",
        "Reference Letter(s)",
        "Other",
    ];

    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Passport" => Self::Passport,
            "Visa" => Self::Visa,
            "CV" => Self::Cv,
            "Transcript" => Self::Transcript,
            "Personal Statement" => Self::PersonalStatement,
            "Reference Letter(s)" => Self::ReferenceLetters,
            "Other" => Self::Other(String::new()),
            other => match other.strip_prefix("Other:") {
                Some(subtype) => Self::Other(subtype.trim().to_string()),
                None => Self::Unspecified,
            },
        }
    }

    /// Type string carried on the submitted record (`Other: <subtype>` for custom types).
    pub fn label(&self) -> String {
        match self {
            Self::Unspecified => String::new(),
            Self::Passport => "Passport".to_string(),
            Self::Visa => "Visa".to_string(),
            Self::Cv => "CV".to_string(),
            Self::Transcript => "Transcript".to_string(),
            Self::PersonalStatement => "Personal Statement".to_string(),
            Self::ReferenceLetters => "Reference Letter(s)".to_string(),
            Self::Other(subtype) => format!("Other: {subtype}"),
        }
    }

    /// `Other` needs a non-blank subtype before the form can be confirmed.
    pub fn is_incomplete_other(&self) -> bool {
        matches!(self, Self::Other(subtype) if subtype.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub id: DocumentId,
    pub kind: DocumentKind,
    pub upload: UploadState,
}

impl DocumentUpload {
    pub fn new(id: DocumentId) -> Self {
        Self {
            id,
            kind: DocumentKind::Unspecified,
            upload: UploadState::default(),
        }
    }

    pub fn record(&self) -> DocumentRecord {
        DocumentRecord {
            document_type: self.kind.label(),
            file_name: self.upload.first_file_name().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_documents_carry_their_subtype() {
        let mut document = DocumentUpload::new(DocumentId(1));
        document.kind = DocumentKind::Other("Bank Statement".to_string());
        document
            .upload
            .select(vec!["statement.pdf".to_string(), "page2.pdf".to_string()]);

        assert_eq!(
            document.record(),
            DocumentRecord {
                document_type: "Other: Bank Statement".to_string(),
                file_name: Some("statement.pdf".to_string()),
            }
        );
    }

    #[test]
    fn records_without_files_omit_the_name() {
        let mut document = DocumentUpload::new(DocumentId(2));
        document.kind = DocumentKind::Passport;
        assert_eq!(document.record().file_name, None);
        assert_eq!(document.record().document_type, "Passport");
    }

    #[test]
    fn parses_picker_labels() {
        for label in DocumentKind::CHOICES.iter().take(6) {
            assert_eq!(DocumentKind::parse(label).label(), *label);
        }
        assert_eq!(DocumentKind::parse("Other"), DocumentKind::Other(String::new()));
        assert_eq!(
            DocumentKind::parse("Other: Portfolio"),
            DocumentKind::Other("Portfolio".to_string())
        );
        assert_eq!(DocumentKind::parse("Diploma"), DocumentKind::Unspecified);
    }

    #[test]
    fn blank_other_subtype_is_incomplete() {
        assert!(DocumentKind::Other("  ".to_string()).is_incomplete_other());
        assert!(!DocumentKind::Other("Portfolio".to_string()).is_incomplete_other());
        assert!(!DocumentKind::Cv.is_incomplete_other());
    }
}
