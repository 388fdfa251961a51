use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{Institution, ProgramType};

const HOME_COUNTRY: &str = "Pakistan";
const HOME_REGION: &str = "Asia";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CareerGoal {
    Business,
    Stem,
    Sports,
    Arts,
}

impl CareerGoal {
    pub const fn ordered() -> [Self; 4] {
        [Self::Business, Self::Stem, Self::Sports, Self::Arts]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Business => "Entrepreneur / Business Leader",
            Self::Stem => "Tech Innovator / Engineer",
            Self::Sports => "Pro Athlete",
            Self::Arts => "Creative Artist / Designer",
        }
    }

    /// Program tag the goal narrows the catalog to.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::Stem => "STEM",
            Self::Sports => "Sports",
            Self::Arts => "Arts",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ordered().into_iter().find(|goal| {
            goal.tag().eq_ignore_ascii_case(raw) || goal.label().eq_ignore_ascii_case(raw)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyLocation {
    InPakistan,
    Abroad,
}

impl StudyLocation {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "in pakistan" | "pakistan" | "home" => Some(Self::InPakistan),
            "abroad" => Some(Self::Abroad),
            _ => None,
        }
    }
}

/// Browser filters; `None` means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub region: Option<String>,
    pub country: Option<String>,
    pub program_type: Option<ProgramType>,
    pub scholarships_only: bool,
    pub tag: Option<String>,
    pub study_location: Option<StudyLocation>,
}

impl CatalogFilter {
    /// Preset applied when a visitor picks a career goal and study location.
    pub fn for_career_goal(goal: Option<CareerGoal>, location: StudyLocation) -> Self {
        let (region, country) = match location {
            StudyLocation::InPakistan => {
                (Some(HOME_REGION.to_string()), Some(HOME_COUNTRY.to_string()))
            }
            StudyLocation::Abroad => (None, None),
        };

        Self {
            region,
            country,
            tag: goal.map(|goal| goal.tag().to_string()),
            study_location: Some(location),
            ..Self::default()
        }
    }

    pub fn matches(&self, institution: &Institution) -> bool {
        let abroad_only = self.study_location == Some(StudyLocation::Abroad)
            && self.region.is_none()
            && self.country.is_none();
        if abroad_only && institution.location.contains(HOME_COUNTRY) {
            return false;
        }

        let region_match = self
            .region
            .as_deref()
            .map_or(true, |region| institution.region == region);
        let country_match = self
            .country
            .as_deref()
            .map_or(true, |country| institution.location.contains(country));
        let type_match = self.program_type.map_or(true, |program_type| {
            institution
                .programs
                .iter()
                .any(|program| program.program_type == program_type)
        });
        let scholarship_match = !self.scholarships_only
            || institution
                .programs
                .iter()
                .any(|program| !program.scholarships.is_empty());
        let tag_match = self.tag.as_deref().map_or(true, |tag| {
            institution.programs.iter().any(|program| program.has_tag(tag))
        });

        region_match && country_match && type_match && scholarship_match && tag_match
    }

    pub fn apply<'a>(&self, institutions: &'a [Institution]) -> Vec<&'a Institution> {
        institutions
            .iter()
            .filter(|institution| self.matches(institution))
            .collect()
    }
}

/// Distinct, sorted values offered by the browser's filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogFacets {
    pub regions: Vec<String>,
    pub countries: Vec<String>,
    pub tags: Vec<String>,
}

impl CatalogFacets {
    pub fn from_institutions(institutions: &[Institution]) -> Self {
        let regions: BTreeSet<&str> = institutions
            .iter()
            .map(|institution| institution.region.as_str())
            .collect();
        let countries: BTreeSet<&str> = institutions.iter().map(Institution::country).collect();
        let tags: BTreeSet<&str> = institutions
            .iter()
            .flat_map(|institution| institution.programs.iter())
            .flat_map(|program| program.tags.iter().map(String::as_str))
            .collect();

        Self {
            regions: regions.into_iter().map(str::to_string).collect(),
            countries: countries.into_iter().map(str::to_string).collect(),
            tags: tags.into_iter().map(str::to_string).collect(),
        }
    }
}
