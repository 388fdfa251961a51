use clap::Args;
use gev_portal::config::AppConfig;
use gev_portal::error::AppError;
use gev_portal::workflows::catalog::{
    CareerGoal, Catalog, CatalogFacets, CatalogFilter, Institution, ProgramType, StudyLocation,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Read institutions from this JSON file instead of the configured catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Only institutions in this region (e.g. "Europe")
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// Only institutions whose location mentions this country
    #[arg(long)]
    pub(crate) country: Option<String>,
    /// Only institutions offering a program of this type (bachelors, masters, course)
    #[arg(long, value_parser = parse_program_type)]
    pub(crate) program_type: Option<ProgramType>,
    /// Only institutions with at least one scholarship on offer
    #[arg(long)]
    pub(crate) with_scholarships: bool,
    /// Only institutions with a program carrying this tag
    #[arg(long)]
    pub(crate) tag: Option<String>,
    /// Career goal preset (business, stem, sports, arts)
    #[arg(long, value_parser = parse_career_goal)]
    pub(crate) goal: Option<CareerGoal>,
    /// Study location preset (in-pakistan, abroad)
    #[arg(long, value_parser = parse_study_location)]
    pub(crate) location: Option<StudyLocation>,
    /// Print the listing as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InstitutionListing {
    pub(crate) name: String,
    pub(crate) location: String,
    pub(crate) region: String,
    pub(crate) application_fee: f64,
    pub(crate) programs: Vec<ProgramListing>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProgramListing {
    pub(crate) name: String,
    pub(crate) program_type: &'static str,
    pub(crate) duration: String,
    pub(crate) application_deadline: String,
    pub(crate) tuition: String,
    pub(crate) scholarships: Vec<String>,
}

fn parse_program_type(raw: &str) -> Result<ProgramType, String> {
    ProgramType::parse(raw).ok_or_else(|| format!("unknown program type '{raw}'"))
}

fn parse_career_goal(raw: &str) -> Result<CareerGoal, String> {
    CareerGoal::parse(raw).ok_or_else(|| format!("unknown career goal '{raw}'"))
}

fn parse_study_location(raw: &str) -> Result<StudyLocation, String> {
    StudyLocation::parse(raw).ok_or_else(|| format!("unknown study location '{raw}'"))
}

impl CatalogArgs {
    /// Starts from the career-goal preset, then applies explicit filters on top.
    pub(crate) fn filter(&self) -> CatalogFilter {
        let mut filter = match self.location {
            Some(location) => CatalogFilter::for_career_goal(self.goal, location),
            None => CatalogFilter {
                tag: self.goal.map(|goal| goal.tag().to_string()),
                ..CatalogFilter::default()
            },
        };

        if let Some(region) = &self.region {
            filter.region = Some(region.clone());
        }
        if let Some(country) = &self.country {
            filter.country = Some(country.clone());
        }
        if let Some(tag) = &self.tag {
            filter.tag = Some(tag.clone());
        }
        filter.program_type = self.program_type;
        filter.scholarships_only = self.with_scholarships;
        filter
    }
}

pub(crate) fn build_listing(catalog: &Catalog, filter: &CatalogFilter) -> Vec<InstitutionListing> {
    filter
        .apply(catalog.institutions())
        .into_iter()
        .map(institution_listing)
        .collect()
}

fn institution_listing(institution: &Institution) -> InstitutionListing {
    InstitutionListing {
        name: institution.name.clone(),
        location: institution.location.clone(),
        region: institution.region.clone(),
        application_fee: institution.base_fee(),
        programs: institution
            .programs
            .iter()
            .map(|program| ProgramListing {
                name: program.name.clone(),
                program_type: program.program_type.label(),
                duration: program.duration.clone(),
                application_deadline: program.application_deadline.clone(),
                tuition: program.cost.tuition.clone(),
                scholarships: program
                    .scholarships
                    .iter()
                    .map(|scholarship| scholarship.name.clone())
                    .collect(),
            })
            .collect(),
    }
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = &args.catalog {
        config.portal.catalog_path = Some(path.clone());
    }
    let catalog = config.portal.load_catalog()?;
    let listing = build_listing(&catalog, &args.filter());

    if args.json {
        let rendered = serde_json::to_string_pretty(&listing).map_err(std::io::Error::from)?;
        println!("{rendered}");
        return Ok(());
    }

    if listing.is_empty() {
        println!("No institutions match the selected filters.");
        print_facets(&CatalogFacets::from_institutions(catalog.institutions()));
        return Ok(());
    }

    for institution in &listing {
        println!(
            "{} ({}, {}) - application fee PKR {:.0}",
            institution.name, institution.location, institution.region, institution.application_fee
        );
        for program in &institution.programs {
            println!(
                "  - {} [{}] {} | deadline {} | tuition {}",
                program.name,
                program.program_type,
                program.duration,
                program.application_deadline,
                program.tuition
            );
            for scholarship in &program.scholarships {
                println!("      scholarship: {scholarship}");
            }
        }
    }
    println!("{} institution(s) listed", listing.len());
    Ok(())
}

fn print_facets(facets: &CatalogFacets) {
    println!("Available regions: {}", facets.regions.join(", "));
    println!("Available countries: {}", facets.countries.join(", "));
    println!("Available tags: {}", facets.tags.join(", "));
}
