//! Dependent selector state: the patient-population and clinical-phenotype
//! dropdowns, repopulated from the taxonomy whenever the indication changes.

use serde::Serialize;

use crate::taxonomy::{normalize_token, Taxonomy};

pub const POPULATION_PLACEHOLDER: &str = "Select a patient population...";
pub const PHENOTYPE_PLACEHOLDER: &str = "Select a clinical phenotype...";

/// One selectable entry: the normalized submission value plus the original
/// human-readable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorOption {
    pub value: String,
    pub label: String,
}

/// State of a single dependent dropdown. The placeholder is always the first
/// option and carries an empty value; selecting it means "unselected".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorState {
    pub options: Vec<SelectorOption>,
    pub enabled: bool,
    pub selected: usize,
}

impl SelectorState {
    fn new(placeholder: &str) -> Self {
        Self {
            options: vec![SelectorOption {
                value: String::new(),
                label: placeholder.to_string(),
            }],
            enabled: false,
            selected: 0,
        }
    }

    fn repopulate(&mut self, placeholder: &str, labels: &[String], enabled: bool) {
        self.options.clear();
        self.options.push(SelectorOption {
            value: String::new(),
            label: placeholder.to_string(),
        });
        for label in labels {
            self.options.push(SelectorOption {
                value: normalize_token(label),
                label: label.clone(),
            });
        }
        self.selected = 0;
        self.enabled = enabled;
    }

    /// Select the option carrying `value`. Returns false (leaving the
    /// selection untouched) when no option matches or the selector is
    /// disabled.
    pub fn select_value(&mut self, value: &str) -> bool {
        if !self.enabled {
            return false;
        }
        match self.options.iter().position(|option| option.value == value) {
            Some(index) if index > 0 => {
                self.selected = index;
                true
            }
            _ => false,
        }
    }

    /// The submission token of the current selection, or None when the
    /// placeholder is selected.
    pub fn selected_value(&self) -> Option<&str> {
        let option = self.options.get(self.selected)?;
        if option.value.is_empty() {
            None
        } else {
            Some(option.value.as_str())
        }
    }
}

/// The pair of dropdowns driven by the indication selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependentSelectors {
    pub population: SelectorState,
    pub phenotype: SelectorState,
}

impl DependentSelectors {
    pub fn new() -> Self {
        Self {
            population: SelectorState::new(POPULATION_PLACEHOLDER),
            phenotype: SelectorState::new(PHENOTYPE_PLACEHOLDER),
        }
    }

    /// Rebuild both selectors for `indication`. An indication missing from
    /// the taxonomy (including the empty string) yields placeholder-only,
    /// disabled selectors, so a stale selection from a previous indication
    /// can never be submitted.
    pub fn on_indication_changed(&mut self, taxonomy: &Taxonomy, indication: &str) {
        let enabled = !indication.is_empty();
        let (populations, phenotypes) = match taxonomy.profile(indication) {
            Some(profile) => (profile.populations.as_slice(), profile.phenotypes.as_slice()),
            None => (&[][..], &[][..]),
        };
        self.population
            .repopulate(POPULATION_PLACEHOLDER, populations, enabled);
        self.phenotype
            .repopulate(PHENOTYPE_PLACEHOLDER, phenotypes, enabled);
    }
}

impl Default for DependentSelectors {
    fn default() -> Self {
        Self::new()
    }
}
