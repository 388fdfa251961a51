use std::collections::BTreeSet;

use crate::workflows::admissions::{ServiceId, SupportService, VisaType};

/// Support services picked on the form, coupled to the chosen visa type.
///
/// While the visa type requires it, the visa service is always selected and
/// manual toggles of it are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceSelection {
    visa_type: VisaType,
    selected: BTreeSet<ServiceId>,
}

impl ServiceSelection {
    pub fn visa_type(&self) -> VisaType {
        self.visa_type
    }

    /// Changing the visa type forces the visa service in (study, tourist) or out (none).
    pub fn set_visa_type(&mut self, visa_type: VisaType) {
        if visa_type == self.visa_type {
            return;
        }
        self.visa_type = visa_type;
        if visa_type.requires_visa_service() {
            self.selected.insert(ServiceId::Visa);
        } else {
            self.selected.remove(&ServiceId::Visa);
        }
    }

    /// Flips a service; returns false when the toggle was refused.
    pub fn toggle(&mut self, id: ServiceId) -> bool {
        if id == ServiceId::Visa && self.visa_type.requires_visa_service() {
            return false;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        true
    }

    pub fn is_selected(&self, id: ServiceId) -> bool {
        self.selected.contains(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ServiceId> + '_ {
        self.selected.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Full service records in catalog order.
    pub fn resolved(&self) -> Vec<SupportService> {
        self.ids().map(ServiceId::resolve).collect()
    }

    pub fn total_cost(&self) -> f64 {
        self.ids().map(ServiceId::cost).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn study_visa_forces_the_visa_service_over_manual_toggles() {
        let mut services = ServiceSelection::default();
        services.set_visa_type(VisaType::Study);
        assert!(services.is_selected(ServiceId::Visa));

        assert!(!services.toggle(ServiceId::Visa));
        assert!(services.is_selected(ServiceId::Visa));

        services.set_visa_type(VisaType::None);
        assert!(!services.is_selected(ServiceId::Visa));
    }

    #[test]
    fn reverting_to_none_removes_a_manually_selected_visa_service() {
        let mut services = ServiceSelection::default();
        assert!(services.toggle(ServiceId::Visa));
        services.set_visa_type(VisaType::Tourist);
        services.set_visa_type(VisaType::None);

        assert!(!services.is_selected(ServiceId::Visa));
    }

    #[test]
    fn manual_visa_toggle_allowed_without_a_visa_type() {
        let mut services = ServiceSelection::default();
        assert!(services.toggle(ServiceId::Visa));
        assert!(services.is_selected(ServiceId::Visa));
        assert!(services.toggle(ServiceId::Visa));
        assert!(services.is_empty());
    }

    #[test]
    fn resolves_services_in_catalog_order() {
        let mut services = ServiceSelection::default();
        services.toggle(ServiceId::PreDeparture);
        services.toggle(ServiceId::TestPrep);

        let names: Vec<String> = services.resolved().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Test Preparation", "Pre-departure Briefing"]);
        assert_eq!(services.total_cost(), 42_500.0);
    }
}
