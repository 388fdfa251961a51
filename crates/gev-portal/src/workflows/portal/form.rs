use crate::workflows::admissions::{AccommodationPreference, GuardianContact};

/// Free-text fields of the application form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicantForm {
    pub full_name: String,
    pub email: String,
    pub accommodation: AccommodationPreference,
    pub contact: GuardianContact,
}

impl ApplicantForm {
    pub fn applicant_info_complete(&self) -> bool {
        applicant_info_complete(&self.full_name, &self.email)
    }

    /// Email as it is validated and submitted: surrounding whitespace dropped.
    pub fn normalized_email(&self) -> &str {
        self.email.trim()
    }
}

/// Shared by form validation and the progress calculator so both agree on
/// padded input.
pub(crate) fn applicant_info_complete(full_name: &str, email: &str) -> bool {
    !full_name.trim().is_empty() && is_well_formed_email(email.trim())
}

/// `local@domain.tld` shape: no whitespace anywhere, exactly one `@` with text
/// before it, and a `.` after it with text on both sides.
pub fn is_well_formed_email(raw: &str) -> bool {
    if raw.is_empty() || raw.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .match_indices('.')
            .any(|(dot, _)| dot > 0 && dot + 1 < domain.len())
}
