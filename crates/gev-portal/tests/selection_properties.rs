use gev_portal::workflows::admissions::{AccommodationPreference, ServiceId, VisaType};
use gev_portal::workflows::catalog::{
    Institution, Program, ProgramCost, ProgramKey, ProgramType, Scholarship,
};
use gev_portal::workflows::portal::{
    CostSummary, ProgressInput, ProgressReport, SelectionStore, ServiceSelection,
};

fn scholarship(name: &str) -> Scholarship {
    Scholarship {
        name: name.to_string(),
        description: "Merit award".to_string(),
        amount: "Full tuition".to_string(),
        eligibility: "Top applicants".to_string(),
        application_deadline: None,
        application_fee: None,
    }
}

fn program(name: &str, scholarships: Vec<Scholarship>) -> Program {
    Program {
        name: name.to_string(),
        program_type: ProgramType::Masters,
        duration: "2 years".to_string(),
        prerequisites: "Bachelors degree".to_string(),
        application_deadline: "2025-06-30".to_string(),
        cost: ProgramCost {
            tuition: "PKR 1,000,000".to_string(),
            living_expenses: "PKR 400,000".to_string(),
        },
        scholarships,
        tags: vec!["Business".to_string()],
    }
}

fn institution(name: &str, fee: f64, programs: Vec<Program>) -> Institution {
    Institution {
        name: name.to_string(),
        location: "Lahore, Pakistan".to_string(),
        region: "Asia".to_string(),
        description: String::new(),
        image_url: None,
        application_fee: Some(fee),
        details: None,
        programs,
    }
}

#[test]
fn toggling_twice_restores_the_prior_store() {
    let first = institution(
        "I1",
        1000.0,
        vec![program("P1", vec![scholarship("S1")]), program("P2", Vec::new())],
    );
    let second = institution("I2", 250.0, vec![program("P1", Vec::new())]);

    let base = SelectionStore::default().toggle_program(&first.programs[1], &first);
    let toggled = base
        .clone()
        .toggle_program(&first.programs[0], &first)
        .toggle_program(&first.programs[0], &first);
    assert_eq!(toggled, base);

    let store = base
        .toggle_program(&second.programs[0], &second)
        .toggle_program(&first.programs[0], &first)
        .toggle_program(&second.programs[0], &second)
        .toggle_program(&second.programs[0], &second);
    let mut keys: Vec<ProgramKey> = store.programs().iter().map(|entry| entry.key()).collect();
    let total = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), total);
    assert_eq!(total, 3);
}

#[test]
fn university_fee_is_shared_by_all_programs_of_an_institution() {
    let shared = institution(
        "Shared",
        100.0,
        vec![program("A1", Vec::new()), program("A2", Vec::new())],
    );
    let other = institution("Other", 50.0, vec![program("B1", Vec::new())]);

    let store = SelectionStore::default()
        .toggle_program(&shared.programs[0], &shared)
        .toggle_program(&shared.programs[1], &shared)
        .toggle_program(&other.programs[0], &other)
        .set_university_fee("Shared", 500.0);

    let selected = store.selected_programs();
    let fees: Vec<(String, f64)> = selected
        .iter()
        .map(|entry| (entry.institution_name.clone(), entry.university_application_fee))
        .collect();
    assert_eq!(
        fees,
        vec![
            ("Shared".to_string(), 500.0),
            ("Shared".to_string(), 500.0),
            ("Other".to_string(), 50.0),
        ]
    );

    let costs = CostSummary::compute(&selected, &[]).expect("fees due");
    assert_eq!(costs.university_fees, 550.0);
}

#[test]
fn university_fees_count_each_institution_once() {
    let a = institution(
        "A",
        100.0,
        vec![program("A1", Vec::new()), program("A2", Vec::new())],
    );
    let b = institution("B", 50.0, vec![program("B1", Vec::new())]);

    let store = SelectionStore::default()
        .toggle_program(&a.programs[0], &a)
        .toggle_program(&a.programs[1], &a)
        .toggle_program(&b.programs[0], &b);

    let costs = CostSummary::compute(&store.selected_programs(), &[ServiceId::PreDeparture])
        .expect("fees due");
    assert_eq!(costs.university_fees, 150.0);
    assert_eq!(costs.service_fees, 7_500.0);
    assert_eq!(costs.total, 7_650.0);
}

#[test]
fn progress_moves_in_fifths() {
    let none = ProgressInput {
        full_name: "",
        email: "",
        selected_programs: 0,
        has_uploaded_document: false,
        accommodation: AccommodationPreference::None,
        selected_services: 0,
    };
    assert_eq!(ProgressReport::evaluate(&none).percent(), 0);

    let three = ProgressInput {
        full_name: "Jane Doe",
        email: "jane@x.com",
        selected_programs: 2,
        accommodation: AccommodationPreference::OffCampus,
        ..none
    };
    assert_eq!(ProgressReport::evaluate(&three).percent(), 60);

    let all = ProgressInput {
        has_uploaded_document: true,
        selected_services: 1,
        ..three
    };
    assert_eq!(ProgressReport::evaluate(&all).percent(), 100);
}

#[test]
fn visa_type_change_overrides_manual_service_choices() {
    let mut services = ServiceSelection::default();
    services.toggle(ServiceId::Visa);
    services.toggle(ServiceId::Visa);
    assert!(!services.is_selected(ServiceId::Visa));

    services.set_visa_type(VisaType::Study);
    assert!(services.is_selected(ServiceId::Visa));
    assert!(!services.toggle(ServiceId::Visa));
    assert!(services.is_selected(ServiceId::Visa));

    services.set_visa_type(VisaType::None);
    assert!(!services.is_selected(ServiceId::Visa));

    services.toggle(ServiceId::Visa);
    assert!(services.is_selected(ServiceId::Visa));
    services.set_visa_type(VisaType::Tourist);
    services.set_visa_type(VisaType::None);
    assert!(!services.is_selected(ServiceId::Visa));
}

#[test]
fn program_with_one_scholarship_round_trip() {
    let i1 = institution("I1", 1000.0, vec![program("P1", vec![scholarship("S1")])]);
    let p1 = &i1.programs[0];
    let key = ProgramKey::new("P1", "I1");

    let store = SelectionStore::default().toggle_program(p1, &i1);
    let selected = store.selected_programs();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].university_application_fee, 1000.0);
    assert_eq!(selected[0].selected_scholarships, vec![scholarship("S1")]);

    let store = store.toggle_scholarship(&key, &p1.scholarships[0]);
    assert!(store
        .get(&key)
        .expect("P1 selected")
        .selected_scholarships
        .is_empty());

    let store = store.toggle_program(p1, &i1);
    assert!(store.is_empty());
    assert_eq!(store.university_fee("I1"), None);
}
