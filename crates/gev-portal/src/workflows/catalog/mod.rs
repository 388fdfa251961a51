mod comparison;
pub mod domain;
mod filter;

use std::io::Read;
use std::path::Path;

pub use comparison::{ComparisonError, ComparisonList, MAX_COMPARED_PROGRAMS};
pub use domain::{
    CostField, Institution, InstitutionDetails, Program, ProgramCost, ProgramKey, ProgramType,
    Scholarship,
};
pub use filter::{CareerGoal, CatalogFacets, CatalogFilter, StudyLocation};

const SEED_CATALOG: &str = include_str!("seed.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("institution '{0}' is listed more than once")]
    DuplicateInstitution(String),
    #[error("program '{program}' is listed more than once for '{institution}'")]
    DuplicateProgram { institution: String, program: String },
}

/// Read-only institution catalog loaded once per process.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    institutions: Vec<Institution>,
}

impl Catalog {
    /// Catalog bundled with the crate.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_reader(SEED_CATALOG.as_bytes())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let institutions: Vec<Institution> = serde_json::from_reader(reader)?;
        Self::new(institutions)
    }

    /// Builds a catalog, rejecting duplicate institution names and duplicate
    /// program names within an institution.
    pub fn new(institutions: Vec<Institution>) -> Result<Self, CatalogError> {
        for (index, institution) in institutions.iter().enumerate() {
            if institutions[..index]
                .iter()
                .any(|other| other.name == institution.name)
            {
                return Err(CatalogError::DuplicateInstitution(institution.name.clone()));
            }

            for (program_index, program) in institution.programs.iter().enumerate() {
                if institution.programs[..program_index]
                    .iter()
                    .any(|other| other.name == program.name)
                {
                    return Err(CatalogError::DuplicateProgram {
                        institution: institution.name.clone(),
                        program: program.name.clone(),
                    });
                }
            }
        }

        Ok(Self { institutions })
    }

    pub fn institutions(&self) -> &[Institution] {
        &self.institutions
    }

    pub fn institution(&self, name: &str) -> Option<&Institution> {
        self.institutions
            .iter()
            .find(|institution| institution.name == name)
    }
}
