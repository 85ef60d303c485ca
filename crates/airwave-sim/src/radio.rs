//! Virtual radio station catalog
//!
//! A [`VirtualRadio`] owns a fixed list of simulated programs and answers
//! lookups by selector. It is built once and never mutated, so a shared
//! reference can be read from any number of threads.

use std::collections::{BTreeSet, HashMap};

use airwave_selector::{
    match_key, selectors_match, Identifier, IdentifierType, ProgramFilter, ProgramSelector,
};
use tracing::{debug, info, warn};

use crate::catalog::CatalogConfig;
use crate::error::{LookupError, RegistryError};
use crate::program::VirtualProgram;

/// A simulated catalog of tunable programs
#[derive(Debug, Clone)]
pub struct VirtualRadio {
    /// Display name of the catalog
    name: String,
    /// Programs in registration order
    programs: Vec<VirtualProgram>,
    /// Match key of every primary and secondary identifier -> program positions
    index: HashMap<Identifier, Vec<usize>>,
}

impl VirtualRadio {
    /// Build a catalog, rejecting entries that denote the same program
    pub fn new(
        name: impl Into<String>,
        programs: impl IntoIterator<Item = VirtualProgram>,
    ) -> Result<Self, RegistryError> {
        let mut radio = Self {
            name: name.into(),
            programs: Vec::new(),
            index: HashMap::new(),
        };

        for program in programs {
            if let Some(existing) = radio.matching(&program.selector).first() {
                warn!(
                    "Catalog {}: {} collides with {}",
                    radio.name, program.selector, existing.selector
                );
                return Err(RegistryError::DuplicateSelector {
                    existing: existing.selector.clone(),
                    duplicate: program.selector,
                });
            }
            radio.insert(program);
        }

        info!(
            "Built virtual radio {} with {} programs",
            radio.name,
            radio.programs.len()
        );
        Ok(radio)
    }

    /// Build a catalog from its configuration
    pub fn from_config(config: CatalogConfig) -> Result<Self, RegistryError> {
        let programs = config
            .programs
            .into_iter()
            .map(|entry| entry.into_program())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(config.name, programs)
    }

    /// The built-in AM/FM catalog
    pub fn default_amfm() -> Result<Self, RegistryError> {
        Self::from_config(CatalogConfig::amfm())
    }

    /// The built-in DAB catalog
    pub fn default_dab() -> Result<Self, RegistryError> {
        Self::from_config(CatalogConfig::dab())
    }

    fn insert(&mut self, program: VirtualProgram) {
        let position = self.programs.len();
        let keys: BTreeSet<Identifier> = program.selector.identifiers().map(match_key).collect();
        for key in keys {
            self.index.entry(key).or_default().push(position);
        }
        self.programs.push(program);
    }

    /// Get the catalog's display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All programs in registration order
    pub fn program_list(&self) -> &[VirtualProgram] {
        &self.programs
    }

    /// Number of programs
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Whether the catalog holds no programs
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// The single program matching the selector
    pub fn get_program_at(
        &self,
        selector: &ProgramSelector,
    ) -> Result<&VirtualProgram, LookupError> {
        let found = self.matching(selector);
        match found.as_slice() {
            [program] => {
                debug!("Lookup {} -> {}", selector, program.program_name);
                Ok(program)
            }
            [] => {
                debug!("Lookup {} -> not found", selector);
                Err(LookupError::NotFound(selector.clone()))
            }
            many => {
                debug!("Lookup {} -> {} candidates", selector, many.len());
                Err(LookupError::Ambiguous {
                    selector: selector.clone(),
                    matches: many.len(),
                })
            }
        }
    }

    /// Every program matching the selector, in registration order
    pub fn lookup_all(&self, selector: &ProgramSelector) -> Vec<&VirtualProgram> {
        self.matching(selector)
    }

    /// Programs passing the filter, in registration order
    pub fn program_list_filtered(&self, filter: &ProgramFilter) -> Vec<&VirtualProgram> {
        self.programs
            .iter()
            .filter(|p| filter.accepts(&p.selector))
            .collect()
    }

    /// Every identifier type used as primary or secondary by any program
    pub fn used_identifier_types(&self) -> BTreeSet<IdentifierType> {
        self.programs
            .iter()
            .flat_map(|p| p.selector.identifiers().map(|id| id.id_type))
            .collect()
    }

    /// Candidates come from the key index; the matching rules confirm them
    fn matching(&self, selector: &ProgramSelector) -> Vec<&VirtualProgram> {
        let candidates: BTreeSet<usize> = selector
            .identifiers()
            .filter_map(|id| self.index.get(&match_key(id)))
            .flatten()
            .copied()
            .collect();

        candidates
            .into_iter()
            .map(|pos| &self.programs[pos])
            .filter(|p| selectors_match(&p.selector, selector))
            .collect()
    }

    /// Get a summary of the catalog
    pub fn summary(&self) -> String {
        format!("{} ({} programs)", self.name, self.programs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airwave_selector::{make_amfm_selector, make_hd_selector};

    fn program(selector: ProgramSelector, name: &str) -> VirtualProgram {
        VirtualProgram::new(selector, name, format!("Artist {name}"), format!("Title {name}"))
    }

    fn test_radio() -> VirtualRadio {
        VirtualRadio::new(
            "Test radio",
            [
                program(make_amfm_selector(560).unwrap(), "ProgramAm1"),
                program(make_amfm_selector(94_900).unwrap(), "ProgramFm1"),
                program(make_hd_selector(0xA000_0001, 0, 98_500).unwrap(), "ProgramFmHd1"),
                program(make_hd_selector(0xA000_0001, 1, 98_500).unwrap(), "ProgramFmHd2"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_create_virtual_radio() {
        let radio = test_radio();
        assert_eq!(radio.name(), "Test radio");
        assert_eq!(radio.len(), 4);
        assert!(!radio.is_empty());
        assert_eq!(radio.summary(), "Test radio (4 programs)");
    }

    #[test]
    fn test_program_list_keeps_registration_order() {
        let radio = test_radio();
        let names: Vec<_> = radio
            .program_list()
            .iter()
            .map(|p| p.program_name.as_str())
            .collect();
        assert_eq!(
            names,
            ["ProgramAm1", "ProgramFm1", "ProgramFmHd1", "ProgramFmHd2"]
        );
    }

    #[test]
    fn test_lookup_registered_selector() {
        let radio = test_radio();
        for p in radio.program_list() {
            let found = radio.get_program_at(&p.selector).unwrap();
            assert_eq!(found.program_name, p.program_name);
        }
    }

    #[test]
    fn test_lookup_unregistered() {
        let radio = test_radio();
        let query = make_amfm_selector(700).unwrap();
        assert_eq!(
            radio.get_program_at(&query),
            Err(LookupError::NotFound(query))
        );
    }

    #[test]
    fn test_frequency_lookup_is_ambiguous() {
        let radio = test_radio();
        let query = make_amfm_selector(98_500).unwrap();
        assert!(matches!(
            radio.get_program_at(&query),
            Err(LookupError::Ambiguous { matches: 2, .. })
        ));
        assert_eq!(radio.lookup_all(&query).len(), 2);
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = VirtualRadio::new(
            "Dup",
            [
                program(make_amfm_selector(560).unwrap(), "A"),
                program(make_amfm_selector(560).unwrap(), "B"),
            ],
        );
        assert!(matches!(
            result,
            Err(RegistryError::DuplicateSelector { .. })
        ));
    }

    #[test]
    fn test_analog_and_hd_on_same_carrier_collide() {
        let result = VirtualRadio::new(
            "Dup",
            [
                program(make_hd_selector(0xA000_0001, 0, 98_500).unwrap(), "HD"),
                program(make_amfm_selector(98_500).unwrap(), "Analog"),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_used_identifier_types() {
        let types = test_radio().used_identifier_types();
        assert!(types.contains(&IdentifierType::AmFmFrequencyKhz));
        assert!(types.contains(&IdentifierType::HdStationIdExt));
        assert!(types.contains(&IdentifierType::HdFrequencyKhz));
        assert!(types.contains(&IdentifierType::HdSubchannel));
        assert!(!types.contains(&IdentifierType::DabSidExt));
    }

    #[test]
    fn test_filtered_list() {
        let radio = test_radio();
        let hd = radio.program_list_filtered(&ProgramFilter::with_types([
            IdentifierType::HdStationIdExt,
        ]));
        assert_eq!(hd.len(), 2);
        assert_eq!(radio.program_list_filtered(&ProgramFilter::all()).len(), 4);
    }

    #[test]
    fn test_empty_catalog_allowed() {
        let radio = VirtualRadio::new("Empty", Vec::new()).unwrap();
        assert!(radio.is_empty());
    }
}
