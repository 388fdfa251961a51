use crate::infra::InMemoryApplicationRepository;
use chrono::Utc;
use clap::Args;
use gev_portal::config::AppConfig;
use gev_portal::error::AppError;
use gev_portal::workflows::admissions::{
    AccommodationPreference, AdmissionsService, LocalGateway, ServiceId, SimulatedReviewPolicy,
    StatusProgression, VisaType,
};
use gev_portal::workflows::catalog::{CareerGoal, CatalogFilter, ProgramKey, StudyLocation};
use gev_portal::workflows::portal::{
    coerce_fee, presentation, CatalogState, DocumentKind, PortalSession, SelectionAction,
    UploadSimulation,
};
use std::sync::Arc;
use std::time::Duration;

const DEMO_PICKS: [(&str, &str); 3] = [
    ("University of Cambridge", "Masters in Business Administration"),
    ("University of Cambridge", "Bachelors in Mathematics"),
    ("LUMS", "MBA"),
];

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Stop after submission instead of waiting for review updates.
    #[arg(long)]
    pub(crate) skip_tracking: bool,
    /// Delay before the simulated "Under Review" update, in milliseconds.
    #[arg(long, default_value_t = 300)]
    pub(crate) review_delay_ms: u64,
    /// Visa type on the application (none, study, tourist).
    #[arg(long, default_value = "study", value_parser = parse_visa_type)]
    pub(crate) visa_type: VisaType,
    /// Support service to request; repeat for several (testPrep, airportPickup, preDeparture).
    #[arg(long = "service", default_value = "airportPickup", value_parser = parse_service)]
    pub(crate) services: Vec<ServiceId>,
    /// Declared document type, e.g. "Passport" or "Other: Portfolio".
    #[arg(long, default_value = "Passport")]
    pub(crate) document: String,
}

fn parse_visa_type(raw: &str) -> Result<VisaType, String> {
    VisaType::parse(raw).ok_or_else(|| format!("unknown visa type '{raw}'"))
}

fn parse_service(raw: &str) -> Result<ServiceId, String> {
    ServiceId::parse(raw).ok_or_else(|| format!("unknown support service '{raw}'"))
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        skip_tracking,
        review_delay_ms,
        visa_type,
        services,
        document,
    } = args;

    let config = AppConfig::load()?;
    let catalog = Arc::new(config.portal.load_catalog()?);
    let review_delay = Duration::from_millis(review_delay_ms);
    let decision_delay = review_delay * 2;

    let repository = Arc::new(InMemoryApplicationRepository::default());
    let progression = StatusProgression::spawn(
        Arc::new(SimulatedReviewPolicy::new(review_delay, decision_delay)),
        repository.clone(),
    );
    let admissions =
        Arc::new(AdmissionsService::new(catalog, repository).with_progression(progression));
    let gateway = Arc::new(LocalGateway::new(admissions));
    let uploads =
        UploadSimulation::new(Duration::from_millis(10), 25, Duration::from_millis(20), 1.0);
    let mut session = PortalSession::new(gateway, uploads);

    println!("University application portal demo");
    match session.load_catalog().await {
        CatalogState::Ready(institutions) => {
            println!("- catalog loaded: {} institutions", institutions.len())
        }
        CatalogState::Failed(message) => {
            println!("- catalog unavailable: {message}");
            return Ok(());
        }
        CatalogState::Loading => {}
    }

    let preset = CatalogFilter::for_career_goal(Some(CareerGoal::Business), StudyLocation::Abroad);
    let matches: Vec<&str> = session
        .browse(&preset)
        .into_iter()
        .map(|institution| institution.name.as_str())
        .collect();
    println!(
        "- business programs abroad: {} institution(s) [{}]",
        matches.len(),
        matches.join(", ")
    );

    println!("\nSelecting programs");
    for (institution, program) in DEMO_PICKS {
        if session.toggle_program(institution, program) {
            println!("  + {program} @ {institution}");
        } else {
            println!("  ! {program} @ {institution} is not in the catalog");
        }
    }
    for (institution, program) in DEMO_PICKS {
        if let Err(err) = session.toggle_comparison(ProgramKey::new(program, institution)) {
            println!("  ! cannot compare {program}: {err}");
        }
    }
    if let Ok(compared) = session.comparison().ready() {
        println!("\nComparing {} programs", compared.len());
        for key in compared {
            let program = session
                .institution(&key.institution_name)
                .and_then(|institution| institution.program(&key.name));
            if let Some(program) = program {
                println!(
                    "  {} @ {} | {} | {} | tuition {}",
                    program.name,
                    key.institution_name,
                    program.program_type.label(),
                    program.duration,
                    program.cost.tuition
                );
            }
        }
    }

    session.dispatch(SelectionAction::SetUniversityFee {
        institution_name: "LUMS".to_string(),
        fee: coerce_fee("7500"),
    });

    let form = session.form_mut();
    form.full_name = "Ayesha Khan".to_string();
    form.email = "ayesha@example.com".to_string();
    form.accommodation = AccommodationPreference::OnCampus;
    session.services_mut().set_visa_type(visa_type);
    for service in services {
        if !session.services_mut().toggle(service) {
            println!("  ! {} is fixed by the visa type", service.name());
        }
    }

    let documents = session.documents_mut();
    let passport = documents.add(Utc::now());
    documents.set_kind(passport, DocumentKind::parse(&document));
    documents.select_files(passport, vec!["passport.pdf".to_string()]);
    documents.settle().await;
    if let Some(document) = session.documents().get(passport) {
        println!(
            "\nDocument {} ({}) upload {}",
            document.id,
            document.kind.label(),
            document.upload.status().label()
        );
    }

    let progress = session.progress();
    println!("\nApplication progress: {}%", progress.percent());
    for (section, complete) in progress.sections() {
        let mark = if *complete { "x" } else { " " };
        println!("  [{mark}] {}", section.label());
    }

    println!("\nPreview");
    for group in session.preview() {
        println!(
            "  {} (application fee PKR {:.0})",
            group.institution_name, group.university_fee
        );
        for selection in &group.programs {
            let scholarships: Vec<&str> = selection
                .selected_scholarships
                .iter()
                .map(|scholarship| scholarship.name.as_str())
                .collect();
            println!(
                "    - {} | tuition {} | scholarships: {}",
                selection.program.name,
                selection.effective_cost().tuition,
                if scholarships.is_empty() {
                    "none".to_string()
                } else {
                    scholarships.join(", ")
                }
            );
        }
    }

    match session.costs() {
        Some(costs) => println!(
            "\nCosts (PKR): universities {:.0} | scholarships {:.0} | services {:.0} | total {:.0}",
            costs.university_fees, costs.scholarship_fees, costs.service_fees, costs.total
        ),
        None => println!("\nNo fees due"),
    }

    if let Err(err) = session.request_confirmation() {
        println!("\nSubmission blocked: {err}");
        return Ok(());
    }
    let application_id = match session.confirm().await {
        Ok(application_id) => application_id,
        Err(err) => {
            println!("\nSubmission failed: {err}");
            return Ok(());
        }
    };
    println!("\nSubmitted application {application_id}");

    if skip_tracking {
        return Ok(());
    }

    tokio::time::sleep(decision_delay + Duration::from_millis(100)).await;
    match session.track(application_id.as_str()).await {
        Ok(application) => {
            println!("Status history for {}", application.application_id);
            for update in application.timeline() {
                let style = presentation(update.status);
                println!(
                    "  {} {:<16} {:?} - {}",
                    update.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    update.status.label(),
                    style.icon,
                    update.notes
                );
            }
        }
        Err(err) => println!("Tracking failed: {err}"),
    }

    Ok(())
}
