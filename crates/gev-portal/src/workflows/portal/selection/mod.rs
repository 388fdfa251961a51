//! Program selection reducer and fee handling.

mod fee;
mod policy;
mod store;

pub use fee::{coerce_fee, sanitize_fee};
pub use policy::{first_catalog_scholarship, no_scholarships, ScholarshipPolicy};
pub use store::{InstitutionGroup, ProgramSelection, SelectionAction, SelectionStore};
