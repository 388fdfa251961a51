use serde::{Deserialize, Serialize};

/// Partner institution offering one or more programs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub name: String,
    pub location: String,
    pub region: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<InstitutionDetails>,
    pub programs: Vec<Program>,
}

impl Institution {
    /// Base application fee charged once per institution; absent fees count as zero.
    pub fn base_fee(&self) -> f64 {
        self.application_fee.unwrap_or(0.0)
    }

    /// Country segment of the location ("Cambridge, UK" -> "UK").
    pub fn country(&self) -> &str {
        self.location
            .rsplit(", ")
            .next()
            .unwrap_or(self.location.as_str())
    }

    pub fn program(&self, name: &str) -> Option<&Program> {
        self.programs.iter().find(|program| program.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionDetails {
    pub history: String,
    pub notable_alumni: Vec<String>,
    pub campus_facilities: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgramType {
    Masters,
    Bachelors,
    Course,
}

impl ProgramType {
    pub const fn ordered() -> [Self; 3] {
        [Self::Bachelors, Self::Masters, Self::Course]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Masters => "Masters",
            Self::Bachelors => "Bachelors",
            Self::Course => "Course",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "masters" | "master" => Some(Self::Masters),
            "bachelors" | "bachelor" => Some(Self::Bachelors),
            "course" | "courses" => Some(Self::Course),
            _ => None,
        }
    }
}

/// Tuition and living-expense figures as published; never parsed as numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramCost {
    pub tuition: String,
    pub living_expenses: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CostField {
    Tuition,
    LivingExpenses,
}

impl ProgramCost {
    pub fn set(&mut self, field: CostField, value: String) {
        match field {
            CostField::Tuition => self.tuition = value,
            CostField::LivingExpenses => self.living_expenses = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub name: String,
    #[serde(rename = "type")]
    pub program_type: ProgramType,
    pub duration: String,
    pub prerequisites: String,
    pub application_deadline: String,
    pub cost: ProgramCost,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scholarships: Vec<Scholarship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Program {
    pub fn scholarship(&self, name: &str) -> Option<&Scholarship> {
        self.scholarships
            .iter()
            .find(|scholarship| scholarship.name == name)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scholarship {
    pub name: String,
    pub description: String,
    pub amount: String,
    pub eligibility: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_fee: Option<f64>,
}

impl Scholarship {
    pub fn fee(&self) -> f64 {
        self.application_fee.unwrap_or(0.0)
    }
}

/// Composite identity of a program across the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramKey {
    pub name: String,
    pub institution_name: String,
}

impl ProgramKey {
    pub fn new(name: impl Into<String>, institution_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            institution_name: institution_name.into(),
        }
    }
}

impl std::fmt::Display for ProgramKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.institution_name)
    }
}
