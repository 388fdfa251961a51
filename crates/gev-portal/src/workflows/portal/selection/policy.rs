use crate::workflows::catalog::{Program, Scholarship};

/// Picks the scholarships pre-selected when a program is first added.
pub type ScholarshipPolicy = fn(&Program) -> Vec<Scholarship>;

/// Pre-selects the program's first catalog scholarship, if it has any.
pub fn first_catalog_scholarship(program: &Program) -> Vec<Scholarship> {
    program.scholarships.iter().take(1).cloned().collect()
}

pub fn no_scholarships(_program: &Program) -> Vec<Scholarship> {
    Vec::new()
}
