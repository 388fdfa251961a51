use std::collections::BTreeMap;

use super::fee::sanitize_fee;
use super::policy::{first_catalog_scholarship, ScholarshipPolicy};
use crate::workflows::admissions::SelectedProgram;
use crate::workflows::catalog::{
    CostField, Institution, Program, ProgramCost, ProgramKey, Scholarship,
};

/// A program held in the store. The institution fee lives in the store's fee
/// map, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramSelection {
    pub program: Program,
    pub institution_name: String,
    pub selected_scholarships: Vec<Scholarship>,
    pub edited_cost: Option<ProgramCost>,
}

impl ProgramSelection {
    pub fn key(&self) -> ProgramKey {
        ProgramKey::new(self.program.name.clone(), self.institution_name.clone())
    }

    fn is(&self, key: &ProgramKey) -> bool {
        self.program.name == key.name && self.institution_name == key.institution_name
    }

    pub fn effective_cost(&self) -> &ProgramCost {
        self.edited_cost.as_ref().unwrap_or(&self.program.cost)
    }

    pub fn has_scholarship(&self, name: &str) -> bool {
        self.selected_scholarships
            .iter()
            .any(|scholarship| scholarship.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionAction {
    ToggleProgram {
        program: Program,
        institution_name: String,
        catalog_fee: f64,
    },
    ToggleScholarship {
        key: ProgramKey,
        scholarship: Scholarship,
    },
    SetUniversityFee {
        institution_name: String,
        fee: f64,
    },
    SetScholarshipFee {
        key: ProgramKey,
        scholarship_name: String,
        fee: f64,
    },
    SetEditedCost {
        key: ProgramKey,
        field: CostField,
        value: String,
    },
    Clear,
}

impl SelectionAction {
    pub fn toggle_program(program: &Program, institution: &Institution) -> Self {
        Self::ToggleProgram {
            program: program.clone(),
            institution_name: institution.name.clone(),
            catalog_fee: institution.base_fee(),
        }
    }
}

/// Programs picked for the in-progress application.
///
/// Every operation consumes the current snapshot and returns the next one.
/// The university fee is keyed by institution, so all selected programs of
/// one institution always share it; an entry exists exactly while at least
/// one of that institution's programs is selected.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    programs: Vec<ProgramSelection>,
    institution_fees: BTreeMap<String, f64>,
    default_policy: ScholarshipPolicy,
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::with_policy(first_catalog_scholarship)
    }
}

impl PartialEq for SelectionStore {
    fn eq(&self, other: &Self) -> bool {
        self.programs == other.programs && self.institution_fees == other.institution_fees
    }
}

impl SelectionStore {
    pub fn with_policy(default_policy: ScholarshipPolicy) -> Self {
        Self {
            programs: Vec::new(),
            institution_fees: BTreeMap::new(),
            default_policy,
        }
    }

    pub fn reduce(mut self, action: SelectionAction) -> Self {
        match action {
            SelectionAction::ToggleProgram {
                program,
                institution_name,
                catalog_fee,
            } => {
                let key = ProgramKey::new(program.name.clone(), institution_name.clone());
                match self.position(&key) {
                    Some(index) => {
                        self.programs.remove(index);
                        if !self.has_institution(&institution_name) {
                            self.institution_fees.remove(&institution_name);
                        }
                    }
                    None => {
                        self.institution_fees
                            .entry(institution_name.clone())
                            .or_insert_with(|| sanitize_fee(catalog_fee));
                        let mut selected_scholarships = (self.default_policy)(&program);
                        selected_scholarships
                            .retain(|chosen| program.scholarship(&chosen.name).is_some());
                        self.programs.push(ProgramSelection {
                            program,
                            institution_name,
                            selected_scholarships,
                            edited_cost: None,
                        });
                    }
                }
            }
            SelectionAction::ToggleScholarship { key, scholarship } => {
                if let Some(selection) = self.find_mut(&key) {
                    let existing = selection
                        .selected_scholarships
                        .iter()
                        .position(|chosen| chosen.name == scholarship.name);
                    match existing {
                        Some(index) => {
                            selection.selected_scholarships.remove(index);
                        }
                        None => {
                            if let Some(offered) = selection.program.scholarship(&scholarship.name)
                            {
                                let offered = offered.clone();
                                selection.selected_scholarships.push(offered);
                            }
                        }
                    }
                }
            }
            SelectionAction::SetUniversityFee {
                institution_name,
                fee,
            } => {
                if let Some(current) = self.institution_fees.get_mut(&institution_name) {
                    *current = sanitize_fee(fee);
                }
            }
            SelectionAction::SetScholarshipFee {
                key,
                scholarship_name,
                fee,
            } => {
                if let Some(selection) = self.find_mut(&key) {
                    if let Some(scholarship) = selection
                        .selected_scholarships
                        .iter_mut()
                        .find(|chosen| chosen.name == scholarship_name)
                    {
                        scholarship.application_fee = Some(sanitize_fee(fee));
                    }
                }
            }
            SelectionAction::SetEditedCost { key, field, value } => {
                if let Some(ProgramSelection {
                    program,
                    edited_cost,
                    ..
                }) = self.find_mut(&key)
                {
                    edited_cost
                        .get_or_insert_with(|| program.cost.clone())
                        .set(field, value);
                }
            }
            SelectionAction::Clear => {
                self.programs.clear();
                self.institution_fees.clear();
            }
        }
        self
    }

    pub fn toggle_program(self, program: &Program, institution: &Institution) -> Self {
        self.reduce(SelectionAction::toggle_program(program, institution))
    }

    pub fn toggle_scholarship(self, key: &ProgramKey, scholarship: &Scholarship) -> Self {
        self.reduce(SelectionAction::ToggleScholarship {
            key: key.clone(),
            scholarship: scholarship.clone(),
        })
    }

    pub fn set_university_fee(self, institution_name: &str, fee: f64) -> Self {
        self.reduce(SelectionAction::SetUniversityFee {
            institution_name: institution_name.to_string(),
            fee,
        })
    }

    pub fn set_scholarship_fee(self, key: &ProgramKey, scholarship_name: &str, fee: f64) -> Self {
        self.reduce(SelectionAction::SetScholarshipFee {
            key: key.clone(),
            scholarship_name: scholarship_name.to_string(),
            fee,
        })
    }

    pub fn set_edited_cost(self, key: &ProgramKey, field: CostField, value: impl Into<String>) -> Self {
        self.reduce(SelectionAction::SetEditedCost {
            key: key.clone(),
            field,
            value: value.into(),
        })
    }

    pub fn clear(self) -> Self {
        self.reduce(SelectionAction::Clear)
    }

    pub fn programs(&self) -> &[ProgramSelection] {
        &self.programs
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn get(&self, key: &ProgramKey) -> Option<&ProgramSelection> {
        self.programs.iter().find(|selection| selection.is(key))
    }

    pub fn contains(&self, key: &ProgramKey) -> bool {
        self.get(key).is_some()
    }

    pub fn university_fee(&self, institution_name: &str) -> Option<f64> {
        self.institution_fees.get(institution_name).copied()
    }

    /// Institution fees of every institution with a selected program.
    pub fn institution_fees(&self) -> impl Iterator<Item = (&str, f64)> {
        self.institution_fees
            .iter()
            .map(|(name, fee)| (name.as_str(), *fee))
    }

    /// Snapshot of the selection with the shared fee copied onto each program.
    pub fn selected_programs(&self) -> Vec<SelectedProgram> {
        self.programs
            .iter()
            .map(|selection| SelectedProgram {
                program: selection.program.clone(),
                institution_name: selection.institution_name.clone(),
                selected_scholarships: selection.selected_scholarships.clone(),
                university_application_fee: self
                    .university_fee(&selection.institution_name)
                    .unwrap_or(0.0),
                edited_cost: selection.edited_cost.clone(),
            })
            .collect()
    }

    /// Selected programs grouped by institution in first-selected order.
    pub fn by_institution(&self) -> Vec<InstitutionGroup<'_>> {
        let mut groups: Vec<InstitutionGroup<'_>> = Vec::new();
        for selection in &self.programs {
            match groups
                .iter_mut()
                .find(|group| group.institution_name == selection.institution_name)
            {
                Some(group) => group.programs.push(selection),
                None => groups.push(InstitutionGroup {
                    institution_name: &selection.institution_name,
                    university_fee: self
                        .university_fee(&selection.institution_name)
                        .unwrap_or(0.0),
                    programs: vec![selection],
                }),
            }
        }
        groups
    }

    fn position(&self, key: &ProgramKey) -> Option<usize> {
        self.programs.iter().position(|selection| selection.is(key))
    }

    fn find_mut(&mut self, key: &ProgramKey) -> Option<&mut ProgramSelection> {
        self.programs.iter_mut().find(|selection| selection.is(key))
    }

    fn has_institution(&self, institution_name: &str) -> bool {
        self.programs
            .iter()
            .any(|selection| selection.institution_name == institution_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstitutionGroup<'a> {
    pub institution_name: &'a str,
    pub university_fee: f64,
    pub programs: Vec<&'a ProgramSelection>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::catalog::ProgramType;
    use crate::workflows::portal::selection::policy::no_scholarships;

    fn scholarship(name: &str, fee: Option<f64>) -> Scholarship {
        Scholarship {
            name: name.to_string(),
            description: "merit award".to_string(),
            amount: "50%".to_string(),
            eligibility: "Top applicants".to_string(),
            application_deadline: None,
            application_fee: fee,
        }
    }

    fn program(name: &str, scholarships: Vec<Scholarship>) -> Program {
        Program {
            name: name.to_string(),
            program_type: ProgramType::Masters,
            duration: "2 years".to_string(),
            prerequisites: "Bachelors degree".to_string(),
            application_deadline: "January 15".to_string(),
            cost: ProgramCost {
                tuition: "PKR 1,000,000 / year".to_string(),
                living_expenses: "PKR 300,000 / year".to_string(),
            },
            scholarships,
            tags: Vec::new(),
        }
    }

    fn institution(name: &str, fee: Option<f64>, programs: Vec<Program>) -> Institution {
        Institution {
            name: name.to_string(),
            location: "Lahore, Pakistan".to_string(),
            region: "Asia".to_string(),
            description: String::new(),
            image_url: None,
            application_fee: fee,
            details: None,
            programs,
        }
    }

    fn fixture() -> Institution {
        institution(
            "I1",
            Some(1000.0),
            vec![
                program("P1", vec![scholarship("S1", Some(50.0))]),
                program("P2", vec![scholarship("S2", None), scholarship("S3", None)]),
                program("P3", Vec::new()),
            ],
        )
    }

    #[test]
    fn toggling_program_and_scholarship_walks_through_expected_states() {
        let i1 = fixture();
        let p1 = &i1.programs[0];
        let key = ProgramKey::new("P1", "I1");

        let store = SelectionStore::default().toggle_program(p1, &i1);
        let snapshot = store.selected_programs();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].university_application_fee, 1000.0);
        assert_eq!(snapshot[0].selected_scholarships, vec![scholarship("S1", Some(50.0))]);

        let store = store.toggle_scholarship(&key, &p1.scholarships[0]);
        assert!(store.selected_programs()[0].selected_scholarships.is_empty());

        let store = store.toggle_program(p1, &i1);
        assert!(store.is_empty());
        assert_eq!(store.university_fee("I1"), None);
    }

    #[test]
    fn toggling_twice_restores_prior_state() {
        let i1 = fixture();
        let start = SelectionStore::default()
            .toggle_program(&i1.programs[1], &i1)
            .set_university_fee("I1", 900.0);

        let round_trip = start
            .clone()
            .toggle_program(&i1.programs[0], &i1)
            .toggle_program(&i1.programs[0], &i1);

        assert_eq!(round_trip, start);
        assert_eq!(round_trip.university_fee("I1"), Some(900.0));
    }

    #[test]
    fn toggle_sequences_never_duplicate_keys() {
        let i1 = fixture();
        let mut store = SelectionStore::default();
        for index in [0, 1, 0, 2, 0, 1, 1, 2] {
            store = store.toggle_program(&i1.programs[index], &i1);
            let mut keys: Vec<_> = store.programs().iter().map(|s| s.key()).collect();
            let before = keys.len();
            keys.sort();
            keys.dedup();
            assert_eq!(keys.len(), before);
        }
        assert_eq!(store.len(), 2);
        assert!(store.contains(&ProgramKey::new("P1", "I1")));
        assert!(store.contains(&ProgramKey::new("P2", "I1")));
    }

    #[test]
    fn university_fee_edit_applies_to_every_program_of_the_institution() {
        let i1 = fixture();
        let store = SelectionStore::default()
            .toggle_program(&i1.programs[0], &i1)
            .toggle_program(&i1.programs[1], &i1)
            .set_university_fee("I1", 750.0);

        assert!(store
            .selected_programs()
            .iter()
            .all(|selected| selected.university_application_fee == 750.0));
    }

    #[test]
    fn later_programs_share_an_already_edited_fee() {
        let i1 = fixture();
        let store = SelectionStore::default()
            .toggle_program(&i1.programs[0], &i1)
            .set_university_fee("I1", 1.0)
            .toggle_program(&i1.programs[2], &i1);

        let fees: Vec<f64> = store
            .selected_programs()
            .iter()
            .map(|selected| selected.university_application_fee)
            .collect();
        assert_eq!(fees, vec![1.0, 1.0]);
    }

    #[test]
    fn fee_edits_for_unselected_institutions_are_ignored() {
        let store = SelectionStore::default().set_university_fee("Nowhere", 10.0);
        assert_eq!(store.university_fee("Nowhere"), None);
        assert_eq!(store, SelectionStore::default());
    }

    #[test]
    fn invalid_fees_collapse_to_zero() {
        let i1 = fixture();
        let key = ProgramKey::new("P1", "I1");
        let store = SelectionStore::default()
            .toggle_program(&i1.programs[0], &i1)
            .set_university_fee("I1", -5.0)
            .set_scholarship_fee(&key, "S1", f64::NAN);

        assert_eq!(store.university_fee("I1"), Some(0.0));
        assert_eq!(
            store.get(&key).expect("selected").selected_scholarships[0].application_fee,
            Some(0.0)
        );
    }

    #[test]
    fn scholarship_fee_targets_only_the_named_scholarship() {
        let i1 = fixture();
        let key = ProgramKey::new("P2", "I1");
        let store = SelectionStore::default()
            .toggle_program(&i1.programs[1], &i1)
            .toggle_scholarship(&key, &scholarship("S3", None))
            .set_scholarship_fee(&key, "S3", 120.0);

        let selection = store.get(&key).expect("selected");
        assert_eq!(selection.selected_scholarships[0].application_fee, None);
        assert_eq!(selection.selected_scholarships[1].application_fee, Some(120.0));
    }

    #[test]
    fn scholarships_outside_the_catalog_cannot_be_selected() {
        let i1 = fixture();
        let key = ProgramKey::new("P1", "I1");
        let store = SelectionStore::default()
            .toggle_program(&i1.programs[0], &i1)
            .toggle_scholarship(&key, &scholarship("Invented", Some(1.0)));

        assert_eq!(store.get(&key).expect("selected").selected_scholarships.len(), 1);
        assert!(!store.get(&key).expect("selected").has_scholarship("Invented"));
    }

    #[test]
    fn edited_cost_is_cloned_on_first_edit_and_mutated_after() {
        let i1 = fixture();
        let key = ProgramKey::new("P1", "I1");
        let store = SelectionStore::default()
            .toggle_program(&i1.programs[0], &i1)
            .set_edited_cost(&key, CostField::Tuition, "PKR 900,000 / year")
            .set_edited_cost(&key, CostField::LivingExpenses, "PKR 100,000 / year");

        let selection = store.get(&key).expect("selected");
        assert_eq!(
            selection.edited_cost,
            Some(ProgramCost {
                tuition: "PKR 900,000 / year".to_string(),
                living_expenses: "PKR 100,000 / year".to_string(),
            })
        );
        assert_eq!(selection.program.cost, i1.programs[0].cost);
    }

    #[test]
    fn unknown_keys_are_no_ops() {
        let i1 = fixture();
        let store = SelectionStore::default().toggle_program(&i1.programs[0], &i1);
        let ghost = ProgramKey::new("Ghost", "I1");

        let after = store
            .clone()
            .toggle_scholarship(&ghost, &scholarship("S1", None))
            .set_scholarship_fee(&ghost, "S1", 10.0)
            .set_edited_cost(&ghost, CostField::Tuition, "free");

        assert_eq!(after, store);
    }

    #[test]
    fn default_policy_is_swappable() {
        let i1 = fixture();
        let store = SelectionStore::with_policy(no_scholarships).toggle_program(&i1.programs[0], &i1);
        assert!(store.programs()[0].selected_scholarships.is_empty());
    }

    #[test]
    fn clear_drops_selections_and_fees() {
        let i1 = fixture();
        let store = SelectionStore::default()
            .toggle_program(&i1.programs[0], &i1)
            .clear();
        assert!(store.is_empty());
        assert_eq!(store.institution_fees().count(), 0);
    }

    #[test]
    fn groups_programs_by_institution_in_selection_order() {
        let i1 = fixture();
        let i2 = institution("I2", None, vec![program("Q1", Vec::new())]);
        let store = SelectionStore::default()
            .toggle_program(&i2.programs[0], &i2)
            .toggle_program(&i1.programs[0], &i1)
            .toggle_program(&i1.programs[2], &i1);

        let groups = store.by_institution();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].institution_name, "I2");
        assert_eq!(groups[0].university_fee, 0.0);
        assert_eq!(groups[1].programs.len(), 2);
        assert_eq!(groups[1].university_fee, 1000.0);
    }
}
