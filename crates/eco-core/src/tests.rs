//! Unit tests for eco-core primitives.

#[cfg(test)]
mod ids {
    use crate::{FieldId, RoleId};

    #[test]
    fn index_roundtrip() {
        let id = FieldId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(FieldId::try_from(42usize).unwrap(), id);
        assert!(RoleId::try_from(70_000usize).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(FieldId(7).to_string(), "FieldId(7)");
        assert_eq!(RoleId(1).to_string(), "RoleId(1)");
    }
}

#[cfg(test)]
mod time {
    use crate::{Calendar, EcoError, SimConfig};

    #[test]
    fn next_advances_one_month() {
        let c = Calendar::start_of(2024);
        assert_eq!(c.next(), Calendar { year: 2024, month: 1 });
    }

    #[test]
    fn december_rolls_over() {
        let c = Calendar { year: 2024, month: 11 };
        assert_eq!(c.next(), Calendar { year: 2025, month: 0 });
    }

    #[test]
    fn ordering_is_year_then_month() {
        assert!(Calendar { year: 2024, month: 11 } < Calendar { year: 2025, month: 0 });
        assert!(Calendar { year: 2024, month: 3 } > Calendar { year: 2024, month: 2 });
    }

    #[test]
    fn twelve_steps_is_one_year() {
        let mut c = Calendar { year: 2024, month: 5 };
        for _ in 0..12 {
            c = c.next();
        }
        assert_eq!(c, Calendar { year: 2025, month: 5 });
    }

    #[test]
    fn months_until() {
        let a = Calendar::start_of(2024);
        assert_eq!(a.months_until(Calendar::start_of(2030)), 72);
        assert_eq!(a.months_until(Calendar { year: 2024, month: 3 }), 3);
        assert_eq!(Calendar::start_of(2030).months_until(a), 0);
    }

    #[test]
    fn invalid_month_rejected() {
        assert!(matches!(
            Calendar::new(2024, 12),
            Err(EcoError::InvalidCalendar { year: 2024, month: 12 })
        ));
        assert!(Calendar::new(2024, 11).is_ok());
    }

    #[test]
    fn display() {
        assert_eq!(Calendar { year: 2024, month: 3 }.to_string(), "2024-03");
    }

    #[test]
    fn config_total_ticks() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.total_ticks(), 72);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_end_before_start_rejected() {
        let cfg = SimConfig {
            start: Calendar::start_of(2030),
            end:   Calendar::start_of(2024),
            ..SimConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(EcoError::Config(_))));
    }

    #[test]
    fn config_bad_month_rejected() {
        let cfg = SimConfig {
            end: Calendar { year: 2030, month: 14 },
            ..SimConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(EcoError::InvalidCalendar { .. })));
    }
}

#[cfg(test)]
mod state {
    use crate::{Calendar, EcoError, FieldSpec, Readings, SharedState, StateSchema};

    fn schema() -> StateSchema {
        let mut s = StateSchema::new();
        s.register(FieldSpec::count("deer", 2.0).non_negative()).unwrap();
        s.register(FieldSpec::level("height", 5.0).non_negative()).unwrap();
        s
    }

    #[test]
    fn ids_in_registration_order() {
        let s = schema();
        assert_eq!(s.id("deer").unwrap().index(), 0);
        assert_eq!(s.id("height").unwrap().index(), 1);
        assert!(s.id("wolves").is_none());
        assert_eq!(s.names(), ["deer", "height"]);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut s = schema();
        let err = s.register(FieldSpec::count("deer", 0.0)).unwrap_err();
        assert!(matches!(err, EcoError::DuplicateField(ref n) if n == "deer"));
    }

    #[test]
    fn inverted_bounds_rejected() {
        let mut s = StateSchema::new();
        let spec = FieldSpec::level("x", 0.0).with_min(1.0).with_max(-1.0);
        assert!(matches!(s.register(spec), Err(EcoError::InvalidBounds { .. })));
    }

    #[test]
    fn initial_outside_bounds_rejected() {
        let mut s = StateSchema::new();
        let spec = FieldSpec::count("deer", -3.0).non_negative();
        assert!(matches!(s.register(spec), Err(EcoError::InitialOutOfBounds { .. })));
    }

    #[test]
    fn initial_values_visible_through_view() {
        let st = SharedState::new(
            schema(),
            Calendar::start_of(2024),
            Readings { temperature: 60.5, precipitation: 3.0 },
        );
        let v = st.view();
        assert_eq!(v.calendar(), Calendar::start_of(2024));
        assert_eq!(v.readings().temperature, 60.5);
        assert_eq!(v.count(st.schema().id("deer").unwrap()), 2);
        assert_eq!(v.get("height").unwrap(), 5.0);
        assert_eq!(v.snapshot(), vec![2.0, 5.0]);
    }

    #[test]
    fn commit_rounds_counts() {
        let st = SharedState::new(schema(), Calendar::default(), Readings::default());
        let deer = st.schema().id("deer").unwrap();
        let out = st.commit(deer, 3.6);
        assert_eq!(out.stored, 4.0);
        assert!(!out.clamped);
        assert_eq!(st.view().count(deer), 4);
    }

    #[test]
    fn commit_clamps_negative() {
        let st = SharedState::new(schema(), Calendar::default(), Readings::default());
        let height = st.schema().id("height").unwrap();
        let out = st.commit(height, -2.5);
        assert_eq!(out.stored, 0.0);
        assert!(out.clamped);
    }

    #[test]
    fn commit_nan_falls_back_to_min() {
        let st = SharedState::new(schema(), Calendar::default(), Readings::default());
        let height = st.schema().id("height").unwrap();
        let out = st.commit(height, f64::NAN);
        assert_eq!(out.stored, 0.0);
        assert!(out.clamped);
    }

    #[test]
    fn clamp_respects_max() {
        let spec = FieldSpec::count("permits", 0.0).non_negative().with_max(10.0);
        assert_eq!(spec.clamp(12.2), 10.0);
        assert_eq!(spec.clamp(f64::INFINITY), 10.0);
    }

    #[test]
    fn unbounded_infinity_falls_back_to_zero() {
        let spec = FieldSpec::level("x", 0.0);
        assert_eq!(spec.clamp(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn calendar_and_readings_setters() {
        let st = SharedState::new(schema(), Calendar::default(), Readings::default());
        st.set_calendar(Calendar { year: 2025, month: 7 });
        st.set_readings(Readings { temperature: 41.0, precipitation: 9.5 });
        let v = st.view();
        assert_eq!(v.calendar(), Calendar { year: 2025, month: 7 });
        assert_eq!(v.readings(), Readings { temperature: 41.0, precipitation: 9.5 });
    }

    #[test]
    fn unknown_lookups_error() {
        let st = SharedState::new(schema(), Calendar::default(), Readings::default());
        assert!(matches!(st.view().get("wolves"), Err(EcoError::UnknownFieldName(_))));
        assert!(matches!(
            st.view().try_value(crate::FieldId(9)),
            Err(EcoError::FieldNotFound(_))
        ));
    }
}

#[cfg(test)]
mod clamp_props {
    use proptest::prelude::*;

    use crate::{Calendar, FieldSpec, Readings, SharedState, StateSchema};

    proptest! {
        /// A non-negative count fed any sequence of deltas never stores a
        /// negative value.
        #[test]
        fn non_negative_count_never_negative(deltas in proptest::collection::vec(-50i32..50, 0..64)) {
            let mut schema = StateSchema::new();
            let id = schema.register(FieldSpec::count("deer", 1.0).non_negative()).unwrap();
            let st = SharedState::new(schema, Calendar::default(), Readings::default());
            for d in deltas {
                let next = st.view().value(id) + d as f64;
                st.commit(id, next);
                prop_assert!(st.view().value(id) >= 0.0);
            }
        }

        #[test]
        fn clamp_stays_in_bounds(v in proptest::num::f64::ANY, lo in -100.0f64..0.0, span in 0.0f64..100.0) {
            let spec = FieldSpec::level("x", lo).with_min(lo).with_max(lo + span);
            let c = spec.clamp(v);
            prop_assert!(c >= lo && c <= lo + span);
        }
    }
}

#[cfg(test)]
mod rng {
    use crate::{RandomSource, RoleId, SeededRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SeededRng::new(12345);
        let mut r2 = SeededRng::new(12345);
        for _ in 0..100 {
            assert_eq!(r1.next_in(-10.0, 10.0), r2.next_in(-10.0, 10.0));
        }
    }

    #[test]
    fn different_roles_differ() {
        let mut r0 = SeededRng::for_role(1, RoleId(0));
        let mut r1 = SeededRng::for_role(1, RoleId(1));
        let mut obs = SeededRng::for_observer(1);
        let a = r0.next_in(0.0, 1.0);
        let b = r1.next_in(0.0, 1.0);
        let c = obs.next_in(0.0, 1.0);
        assert_ne!(a, b, "seeds for adjacent roles should diverge");
        assert_ne!(a, c);
    }

    #[test]
    fn next_in_bounds() {
        let mut rng = SeededRng::new(0);
        for _ in 0..1000 {
            let v = rng.next_in(-2.0, 2.0);
            assert!((-2.0..2.0).contains(&v));
        }
    }

    #[test]
    fn empty_range_returns_low() {
        let mut rng = SeededRng::new(0);
        assert_eq!(rng.next_in(3.0, 3.0), 3.0);
        assert_eq!(rng.next_in(5.0, 1.0), 5.0);
    }

    #[test]
    fn child_is_deterministic() {
        let mut a = SeededRng::new(9);
        let mut b = SeededRng::new(9);
        let mut ca = a.child(3);
        let mut cb = b.child(3);
        assert_eq!(ca.next_in(0.0, 1.0), cb.next_in(0.0, 1.0));
    }

    #[test]
    fn boxed_source_delegates() {
        let mut boxed: Box<dyn RandomSource> = Box::new(SeededRng::new(4));
        let mut plain = SeededRng::new(4);
        assert_eq!(boxed.next_in(0.0, 1.0), plain.next_in(0.0, 1.0));
    }
}
