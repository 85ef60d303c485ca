//! Integration tests for the tuner facade
//!
//! These tests verify end-to-end behavior of the tuner including:
//! - Capability advertisement derived from the catalog
//! - Region configuration in narrow and full mode
//! - Image lookup
//! - Selector lookup and disambiguation of shared HD carriers
//! - Tuning, seeking, stepping and catalog replacement

use std::sync::Arc;
use std::thread;

use airwave_hal::{
    BroadcastRadio, ConfigFlag, DeemphasisFlags, HalError, MemoryImageStore, RdsFlags,
    ResultCode, TunerEvent, INVALID_IMAGE,
};
use airwave_selector::{
    make_amfm_selector, make_dab_selector, make_hd_selector, IdentifierType, ProgramFilter,
    ProgramSelector,
};
use airwave_sim::{RegistryError, VirtualProgram, VirtualRadio};

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use super::*;

    pub const AM_FREQ_1: u32 = 560;
    pub const AM_FREQ_2: u32 = 680;
    pub const AM_HD_FREQ: u32 = 1_170;
    pub const AM_HD_SID: u64 = 0xB000_0001;
    pub const FM_FREQ_1: u32 = 94_900;
    pub const FM_HD_SID_1: u64 = 0xA000_0001;
    pub const FM_HD_SID_2: u64 = 0xA000_0002;
    pub const FM_HD_FREQ_1: u32 = 98_500;
    pub const FM_FREQ_2: u32 = 99_100;
    pub const FM_HD_FREQ_2: u32 = 101_100;

    pub fn am(khz: u32) -> ProgramSelector {
        make_amfm_selector(khz).unwrap()
    }

    pub fn hd(sid: u64, sub: u32, khz: u32) -> ProgramSelector {
        make_hd_selector(sid, sub, khz).unwrap()
    }

    fn entry(selector: ProgramSelector, suffix: &str) -> VirtualProgram {
        VirtualProgram::new(
            selector,
            format!("Program{suffix}"),
            format!("Artist{suffix}"),
            format!("Title{suffix}"),
        )
    }

    /// The AM/FM catalog every test runs against
    pub fn mock_catalog() -> VirtualRadio {
        VirtualRadio::new(
            "AM/FM radio mock for test",
            [
                entry(am(AM_FREQ_1), "Am1"),
                entry(am(AM_FREQ_2), "Am2"),
                entry(am(FM_FREQ_1), "Fm1"),
                entry(am(FM_FREQ_2), "Fm2"),
                entry(hd(AM_HD_SID, 0, AM_HD_FREQ), "AmHd1"),
                entry(hd(FM_HD_SID_1, 0, FM_HD_FREQ_1), "FmHd1"),
                entry(hd(FM_HD_SID_1, 1, FM_HD_FREQ_1), "FmHd2"),
                entry(hd(FM_HD_SID_2, 0, FM_HD_FREQ_2), "FmHd3"),
                entry(hd(FM_HD_SID_2, 1, FM_HD_FREQ_2), "FmHd4"),
            ],
        )
        .unwrap()
    }

    /// Tuner over the mock catalog with one registered image
    pub fn mock_radio() -> BroadcastRadio {
        let mut images = MemoryImageStore::new();
        images.insert(42, vec![0x89, b'P', b'N', b'G']);
        BroadcastRadio::new(mock_catalog(), Arc::new(images)).unwrap()
    }

    pub fn current_name(radio: &BroadcastRadio) -> Option<String> {
        radio
            .current_program()
            .and_then(|info| info.program_name().map(str::to_string))
    }

    pub fn has_tune_failed(events: &[TunerEvent]) -> bool {
        events
            .iter()
            .any(|e| matches!(e, TunerEvent::TuneFailed { .. }))
    }
}

// ============================================================================
// Properties Tests
// ============================================================================

mod properties_tests {
    use super::*;

    #[test]
    fn supported_types_not_empty() {
        let radio = helpers::mock_radio();
        let props = radio.get_properties().unwrap();
        assert!(!props.supported_identifier_types.is_empty());
    }

    #[test]
    fn supported_types_cover_every_program() {
        let radio = helpers::mock_radio();
        let props = radio.get_properties().unwrap();

        for program in radio.get_program_list() {
            for id in program.selector.identifiers() {
                assert!(
                    props.supports(id.id_type),
                    "{} not advertised",
                    id.id_type
                );
            }
        }
    }

    #[test]
    fn amfm_frequency_advertised() {
        let props = helpers::mock_radio().get_properties().unwrap();
        assert!(props.supports(IdentifierType::AmFmFrequencyKhz));
        assert!(!props.supports(IdentifierType::DabSidExt));
    }

    #[test]
    fn sorted_types_are_stable() {
        let props = helpers::mock_radio().get_properties().unwrap();
        let sorted = props.sorted_identifier_types();
        assert_eq!(sorted.len(), props.supported_identifier_types.len());
        assert!(sorted.windows(2).all(|w| w[0] < w[1]));
    }
}

// ============================================================================
// Region Configuration Tests
// ============================================================================

mod region_tests {
    use super::*;

    #[test]
    fn narrow_config_is_baseline() {
        let config = helpers::mock_radio().get_am_fm_region_config(false);
        assert_eq!(config.fm_deemphasis, DeemphasisFlags::D50);
        assert_eq!(config.fm_rds, RdsFlags::RDS);
    }

    #[test]
    fn full_config_has_every_mode() {
        let config = helpers::mock_radio().get_am_fm_region_config(true);
        assert_eq!(
            config.fm_deemphasis,
            DeemphasisFlags::D50 | DeemphasisFlags::D75
        );
        assert_eq!(config.fm_rds, RdsFlags::RDS | RdsFlags::RBDS);
    }

    #[test]
    fn full_config_strictly_contains_narrow() {
        let radio = helpers::mock_radio();
        let narrow = radio.get_am_fm_region_config(false);
        let full = radio.get_am_fm_region_config(true);

        assert!(full.fm_deemphasis.contains(narrow.fm_deemphasis));
        assert!(full.fm_rds.contains(narrow.fm_rds));
        assert_ne!(full.fm_deemphasis, narrow.fm_deemphasis);
        assert_ne!(full.fm_rds, narrow.fm_rds);
        assert!(narrow.is_subset_of(&full));
    }

    #[test]
    fn dab_table_not_empty() {
        assert!(!helpers::mock_radio().get_dab_region_config().is_empty());
    }
}

// ============================================================================
// Image Tests
// ============================================================================

mod image_tests {
    use super::*;

    #[test]
    fn invalid_image_is_empty() {
        let img = helpers::mock_radio().get_image(INVALID_IMAGE).unwrap();
        assert!(img.is_empty());
    }

    #[test]
    fn registered_image_returned() {
        let img = helpers::mock_radio().get_image(42).unwrap();
        assert_eq!(img, vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn unknown_image_not_found() {
        let result = helpers::mock_radio().get_image(7);
        assert!(matches!(result, Err(HalError::NotFound(_))));
    }
}

// ============================================================================
// Lookup Tests
// ============================================================================

mod lookup_tests {
    use super::*;
    use helpers::*;

    #[test]
    fn every_registered_selector_round_trips() {
        let radio = mock_radio();
        for program in radio.get_program_list() {
            let found = radio.lookup(&program.selector).unwrap();
            assert_eq!(found, program);
        }
    }

    #[test]
    fn am_lookup() {
        let found = mock_radio().lookup(&am(AM_FREQ_1)).unwrap();
        assert_eq!(found.program_name, "ProgramAm1");
    }

    #[test]
    fn unregistered_frequency_not_found() {
        let result = mock_radio().lookup(&am(700));
        assert!(matches!(result, Err(HalError::NotFound(_))));
        assert!(result.unwrap_err().is_query_outcome());
    }

    #[test]
    fn shared_hd_carrier_is_ambiguous() {
        let result = mock_radio().lookup(&am(FM_HD_FREQ_1));
        match result {
            Err(HalError::Ambiguous { matches, .. }) => assert_eq!(matches, 2),
            other => panic!("expected ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn subchannel_qualified_query_is_unique() {
        let radio = mock_radio();
        let sub0 = radio.lookup(&hd(FM_HD_SID_1, 0, FM_HD_FREQ_1)).unwrap();
        let sub1 = radio.lookup(&hd(FM_HD_SID_1, 1, FM_HD_FREQ_1)).unwrap();
        assert_eq!(sub0.program_name, "ProgramFmHd1");
        assert_eq!(sub1.program_name, "ProgramFmHd2");
    }

    #[test]
    fn single_hd_on_am_carrier_resolves_by_frequency() {
        let found = mock_radio().lookup(&am(AM_HD_FREQ)).unwrap();
        assert_eq!(found.program_name, "ProgramAmHd1");
    }

    #[test]
    fn duplicate_catalog_rejected() {
        let result = VirtualRadio::new(
            "dup",
            [
                VirtualProgram::new(am(AM_FREQ_1), "A", "", ""),
                VirtualProgram::new(hd(FM_HD_SID_1, 0, FM_HD_FREQ_1), "B", "", ""),
                VirtualProgram::new(am(AM_FREQ_1), "C", "", ""),
            ],
        );
        assert!(matches!(
            result,
            Err(RegistryError::DuplicateSelector { .. })
        ));
    }

    #[test]
    fn filtered_program_list() {
        let radio = mock_radio();
        let hd_only = radio.program_list(&ProgramFilter::with_types([
            IdentifierType::HdStationIdExt,
        ]));
        assert_eq!(hd_only.len(), 5);

        let on_carrier = radio.program_list(&ProgramFilter::with_identifiers([
            *am(FM_HD_FREQ_2).primary_id(),
        ]));
        let names: Vec<_> = on_carrier.iter().map(|p| p.program_name.as_str()).collect();
        assert_eq!(names, ["ProgramFmHd3", "ProgramFmHd4"]);
    }

    #[test]
    fn concurrent_readers() {
        let radio = Arc::new(mock_radio());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let radio = Arc::clone(&radio);
                thread::spawn(move || {
                    for _ in 0..100 {
                        assert!(radio.lookup(&am(FM_FREQ_1)).is_ok());
                        assert!(radio.get_properties().is_ok());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }
}

// ============================================================================
// Tuning Tests
// ============================================================================

mod tuning_tests {
    use super::*;
    use helpers::*;

    #[test]
    fn tune_registered_program() {
        let radio = mock_radio();
        let info = radio.tune(&am(FM_FREQ_2)).unwrap();
        assert_eq!(info.program_name(), Some("ProgramFm2"));
        assert_eq!(current_name(&radio).as_deref(), Some("ProgramFm2"));

        let events = radio.drain_events();
        assert!(matches!(
            events.as_slice(),
            [TunerEvent::CurrentProgramInfoChanged(_)]
        ));
    }

    #[test]
    fn tune_ambiguous_fails_and_keeps_current() {
        let radio = mock_radio();
        radio.tune(&am(AM_FREQ_2)).unwrap();
        radio.drain_events();

        let result = radio.tune(&am(FM_HD_FREQ_1));
        assert!(matches!(result, Err(HalError::Ambiguous { .. })));
        assert_eq!(current_name(&radio).as_deref(), Some("ProgramAm2"));

        let events = radio.drain_events();
        assert!(helpers::has_tune_failed(&events));
        assert!(events.iter().any(|e| matches!(
            e,
            TunerEvent::TuneFailed {
                result: ResultCode::InvalidArguments,
                ..
            }
        )));
    }

    #[test]
    fn tune_unsupported_technology() {
        let radio = mock_radio();
        let dab = make_dab_selector(0xE1C221, 0xCE15, 225_648).unwrap();
        let result = radio.tune(&dab);
        assert_eq!(
            result.unwrap_err(),
            HalError::NotSupported(IdentifierType::DabSidExt)
        );
    }

    #[test]
    fn tune_hd_reports_physical_carrier() {
        let radio = mock_radio();
        let info = radio.tune(&hd(FM_HD_SID_2, 1, FM_HD_FREQ_2)).unwrap();
        assert_eq!(info.physically_tuned_to.value, u64::from(FM_HD_FREQ_2));
        assert_eq!(
            info.physically_tuned_to.id_type,
            IdentifierType::AmFmFrequencyKhz
        );
    }

    #[test]
    fn seek_up_walks_frequency_order() {
        let radio = mock_radio();
        radio.tune(&am(AM_FREQ_1)).unwrap();

        let names: Vec<_> = (0..3)
            .map(|_| radio.seek(true, false).unwrap())
            .map(|info| info.program_name().unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, ["ProgramAm2", "ProgramAmHd1", "ProgramFm1"]);
    }

    #[test]
    fn seek_skips_subchannels() {
        let radio = mock_radio();
        radio.tune(&hd(FM_HD_SID_1, 0, FM_HD_FREQ_1)).unwrap();

        let info = radio.seek(true, true).unwrap();
        assert_eq!(info.program_name(), Some("ProgramFm2"));

        radio.tune(&hd(FM_HD_SID_1, 0, FM_HD_FREQ_1)).unwrap();
        let info = radio.seek(true, false).unwrap();
        assert_eq!(info.program_name(), Some("ProgramFmHd2"));
    }

    #[test]
    fn seek_wraps_around() {
        let radio = mock_radio();
        radio.tune(&hd(FM_HD_SID_2, 1, FM_HD_FREQ_2)).unwrap();
        let info = radio.seek(true, false).unwrap();
        assert_eq!(info.program_name(), Some("ProgramAm1"));

        let info = radio.seek(false, false).unwrap();
        assert_eq!(info.program_name(), Some("ProgramFmHd4"));
    }

    #[test]
    fn seek_without_current_starts_at_edge() {
        let radio = mock_radio();
        let info = radio.seek(false, false).unwrap();
        assert_eq!(info.program_name(), Some("ProgramFmHd4"));
    }

    #[test]
    fn bare_frequency_tunes_hd_only_catalog() {
        let catalog = VirtualRadio::new(
            "HD only",
            [VirtualProgram::new(hd(AM_HD_SID, 0, AM_HD_FREQ), "AmHd", "", "")],
        )
        .unwrap();
        let radio = BroadcastRadio::new(catalog, Arc::new(MemoryImageStore::new())).unwrap();

        let props = radio.get_properties().unwrap();
        assert!(!props.supports(IdentifierType::AmFmFrequencyKhz));
        assert!(props.can_query(IdentifierType::AmFmFrequencyKhz));

        assert_eq!(radio.lookup(&am(AM_HD_FREQ)).unwrap().program_name, "AmHd");
        let info = radio.tune(&am(AM_HD_FREQ)).unwrap();
        assert_eq!(info.program_name(), Some("AmHd"));
        assert!(!has_tune_failed(&radio.drain_events()));
    }

    #[test]
    fn step_lands_on_registered_program() {
        let radio = mock_radio();
        radio.tune(&am(99_000)).unwrap();
        let info = radio.step(true).unwrap();
        assert_eq!(info.program_name(), Some("ProgramFm2"));
    }

    #[test]
    fn step_on_hd_not_supported() {
        let radio = mock_radio();
        radio.tune(&hd(FM_HD_SID_1, 0, FM_HD_FREQ_1)).unwrap();
        assert_eq!(
            radio.step(true).unwrap_err(),
            HalError::NotSupported(IdentifierType::HdStationIdExt)
        );
    }

    #[test]
    fn config_flag_events_only_on_change() {
        let radio = mock_radio();
        radio.set_config_flag(ConfigFlag::RdsAf, false);
        assert!(radio.drain_events().is_empty());

        radio.set_config_flag(ConfigFlag::RdsAf, true);
        radio.set_config_flag(ConfigFlag::RdsAf, true);
        assert_eq!(radio.drain_events().len(), 1);
        assert!(radio.get_config_flag(ConfigFlag::RdsAf));
        assert!(!radio.get_config_flag(ConfigFlag::DabFmLinking));
    }

    #[test]
    fn cancel_is_harmless() {
        let radio = mock_radio();
        radio.cancel();
        assert!(radio.current_program().is_none());
        assert!(radio.drain_events().is_empty());
    }
}

// ============================================================================
// Catalog Replacement Tests
// ============================================================================

mod catalog_tests {
    use super::*;

    #[test]
    fn replace_catalog_swaps_snapshot() {
        let radio = helpers::mock_radio();
        let before = radio.catalog();

        radio
            .replace_catalog(VirtualRadio::default_dab().unwrap())
            .unwrap();

        assert_eq!(before.len(), 9);
        assert_eq!(radio.catalog().len(), 4);
        let props = radio.get_properties().unwrap();
        assert!(props.supports(IdentifierType::DabSidExt));
        assert!(!props.supports(IdentifierType::HdStationIdExt));

        let events = radio.drain_events();
        assert_eq!(
            events,
            vec![TunerEvent::ProgramListUpdated {
                name: "DAB radio".to_string(),
                programs: 4
            }]
        );
    }

    fn named_catalog(name: &str) -> VirtualRadio {
        VirtualRadio::new(
            name,
            [VirtualProgram::new(helpers::am(helpers::FM_FREQ_1), name, "", "")],
        )
        .unwrap()
    }

    #[test]
    fn tuning_never_reports_replaced_catalog() {
        let radio = Arc::new(
            BroadcastRadio::new(named_catalog("A"), Arc::new(MemoryImageStore::new())).unwrap(),
        );

        let swapper = {
            let radio = Arc::clone(&radio);
            thread::spawn(move || {
                for i in 0..200 {
                    let name = if i % 2 == 0 { "B" } else { "A" };
                    radio.replace_catalog(named_catalog(name)).unwrap();
                }
            })
        };
        let tuners: Vec<_> = [false, true]
            .into_iter()
            .map(|seeking| {
                let radio = Arc::clone(&radio);
                thread::spawn(move || {
                    for _ in 0..200 {
                        if seeking {
                            radio.seek(true, false).unwrap();
                        } else {
                            radio.tune(&helpers::am(helpers::FM_FREQ_1)).unwrap();
                        }
                    }
                })
            })
            .collect();
        swapper.join().unwrap();
        for t in tuners {
            t.join().unwrap();
        }

        // Every program change must come from the catalog announced last
        let mut catalog = "A".to_string();
        for event in radio.drain_events() {
            match event {
                TunerEvent::ProgramListUpdated { name, .. } => catalog = name,
                TunerEvent::CurrentProgramInfoChanged(info) => {
                    assert_eq!(info.program_name(), Some(catalog.as_str()));
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
    }

    #[test]
    fn replace_with_empty_rejected() {
        let radio = helpers::mock_radio();
        let empty = VirtualRadio::new("empty", Vec::new()).unwrap();
        assert_eq!(radio.replace_catalog(empty), Err(HalError::EmptyCatalog));
        assert_eq!(radio.catalog().len(), 9);
    }

    #[test]
    fn empty_catalog_is_fatal() {
        let empty = VirtualRadio::new("empty", Vec::new()).unwrap();
        let result = BroadcastRadio::new(empty, Arc::new(MemoryImageStore::new()));
        let err = result.err().unwrap();
        assert_eq!(err, HalError::EmptyCatalog);
        assert_eq!(err.result(), ResultCode::InternalError);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod proptest_tests {
    use super::*;
    use airwave_selector::selectors_match;
    use proptest::prelude::*;

    fn fm_frequency() -> impl Strategy<Value = u32> {
        (875u32..=1080u32).prop_map(|x| x * 100)
    }

    fn mw_frequency() -> impl Strategy<Value = u32> {
        (53u32..=170u32).prop_map(|x| x * 10)
    }

    fn hd_selector() -> impl Strategy<Value = ProgramSelector> {
        (1u64..=u64::from(u32::MAX), 0u32..=7u32, fm_frequency())
            .prop_map(|(sid, sub, khz)| make_hd_selector(sid, sub, khz).unwrap())
    }

    fn any_selector() -> impl Strategy<Value = ProgramSelector> {
        prop_oneof![
            fm_frequency().prop_map(|khz| make_amfm_selector(khz).unwrap()),
            mw_frequency().prop_map(|khz| make_amfm_selector(khz).unwrap()),
            hd_selector(),
        ]
    }

    proptest! {
        #[test]
        fn matching_is_symmetric(a in any_selector(), b in any_selector()) {
            prop_assert_eq!(selectors_match(&a, &b), selectors_match(&b, &a));
        }

        #[test]
        fn selector_matches_itself(a in any_selector()) {
            prop_assert!(selectors_match(&a, &a));
        }

        #[test]
        fn frequency_query_matches_hd_on_carrier(sel in hd_selector()) {
            let khz = sel.frequency_khz().unwrap();
            prop_assert!(selectors_match(&make_amfm_selector(khz).unwrap(), &sel));
        }

        #[test]
        fn hd_subchannels_never_collide(
            sid in 1u64..=u64::from(u32::MAX),
            khz in fm_frequency(),
            a in 0u32..=7u32,
            b in 0u32..=7u32,
        ) {
            let sa = make_hd_selector(sid, a, khz).unwrap();
            let sb = make_hd_selector(sid, b, khz).unwrap();
            prop_assert_eq!(selectors_match(&sa, &sb), a == b);
        }

        #[test]
        fn registered_programs_round_trip(
            freqs in prop::collection::btree_set(fm_frequency(), 1..12)
        ) {
            let programs = freqs.iter().map(|&khz| {
                VirtualProgram::new(make_amfm_selector(khz).unwrap(), khz.to_string(), "", "")
            });
            let catalog = VirtualRadio::new("prop", programs).unwrap();
            let radio = BroadcastRadio::new(catalog, Arc::new(MemoryImageStore::new())).unwrap();

            for program in radio.get_program_list() {
                prop_assert_eq!(radio.lookup(&program.selector).unwrap(), program);
            }
        }

        #[test]
        fn properties_cover_catalog(
            sels in prop::collection::vec(any_selector(), 1..10)
        ) {
            // Keep only selectors that do not collide with an earlier one
            let mut unique: Vec<ProgramSelector> = Vec::new();
            for sel in sels {
                if !unique.iter().any(|u| selectors_match(u, &sel)) {
                    unique.push(sel);
                }
            }
            let catalog = VirtualRadio::new(
                "prop",
                unique.iter().cloned().map(|s| VirtualProgram::new(s, "p", "a", "t")),
            ).unwrap();
            let radio = BroadcastRadio::new(catalog, Arc::new(MemoryImageStore::new())).unwrap();
            let props = radio.get_properties().unwrap();

            for program in radio.get_program_list() {
                for id in program.selector.identifiers() {
                    prop_assert!(props.supports(id.id_type));
                }
            }
        }
    }
}
