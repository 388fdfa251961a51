use std::collections::BTreeMap;

use super::selection::SelectionStore;
use super::services::ServiceSelection;
use crate::workflows::admissions::{SelectedProgram, ServiceId};

/// Fee totals shown before submission; all amounts in PKR.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostSummary {
    pub university_fees: f64,
    pub scholarship_fees: f64,
    pub service_fees: f64,
    pub total: f64,
}

impl CostSummary {
    /// Returns `None` when everything sums to zero, so there is nothing to show.
    pub fn compute(programs: &[SelectedProgram], services: &[ServiceId]) -> Option<Self> {
        let mut per_institution = BTreeMap::new();
        for program in programs {
            per_institution
                .entry(program.institution_name.as_str())
                .or_insert(program.university_application_fee);
        }
        let university_fees: f64 = per_institution.values().sum();

        let scholarship_fees = programs
            .iter()
            .flat_map(|program| &program.selected_scholarships)
            .map(|scholarship| scholarship.fee())
            .sum();

        let service_fees = services.iter().map(|id| id.cost()).sum();

        Self::from_parts(university_fees, scholarship_fees, service_fees)
    }

    pub fn for_selection(selection: &SelectionStore, services: &ServiceSelection) -> Option<Self> {
        let ids: Vec<ServiceId> = services.ids().collect();
        Self::compute(&selection.selected_programs(), &ids)
    }

    fn from_parts(university_fees: f64, scholarship_fees: f64, service_fees: f64) -> Option<Self> {
        let total = university_fees + scholarship_fees + service_fees;
        if total == 0.0 {
            return None;
        }
        Some(Self {
            university_fees,
            scholarship_fees,
            service_fees,
            total,
        })
    }
}
