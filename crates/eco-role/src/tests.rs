//! Unit tests for eco-role.

use eco_core::{Calendar, FieldId, FieldSpec, Readings, SharedState, StateSchema};

fn state() -> (SharedState, FieldId, FieldId) {
    let mut schema = StateSchema::new();
    let a = schema.register(FieldSpec::count("a", 2.0)).unwrap();
    let b = schema.register(FieldSpec::level("b", 0.5)).unwrap();
    let st = SharedState::new(
        schema,
        Calendar { year: 2024, month: 4 },
        Readings { temperature: 55.0, precipitation: 7.0 },
    );
    (st, a, b)
}

#[cfg(test)]
mod update {
    use super::*;
    use crate::Update;

    #[test]
    fn set_overwrites_same_field() {
        let mut u = Update::new();
        u.set(FieldId(0), 1.0).set(FieldId(0), 3.0);
        assert_eq!(u.len(), 1);
        assert_eq!(u.get(FieldId(0)), Some(3.0));
    }

    #[test]
    fn builder_keeps_insertion_order() {
        let u = Update::new().with(FieldId(2), 1.0).with(FieldId(0), 2.0);
        let writes: Vec<_> = u.iter().collect();
        assert_eq!(writes, vec![(FieldId(2), 1.0), (FieldId(0), 2.0)]);
    }

    #[test]
    fn empty_by_default() {
        assert!(Update::default().is_empty());
        assert_eq!(Update::new().get(FieldId(1)), None);
    }
}

#[cfg(test)]
mod context {
    use super::*;
    use crate::TickContext;

    #[test]
    fn copies_calendar_and_readings() {
        let (st, a, b) = state();
        let ctx = TickContext::new(3, st.view());
        assert_eq!(ctx.tick, 3);
        assert_eq!(ctx.calendar, Calendar { year: 2024, month: 4 });
        assert_eq!(ctx.readings.temperature, 55.0);
        assert_eq!(ctx.count(a), 2);
        assert_eq!(ctx.value(b), 0.5);
    }
}

#[cfg(test)]
mod roles {
    use super::*;
    use crate::{FnRole, IdleRole, Role, TickContext, Update};

    #[test]
    fn idle_role_owns_nothing() {
        let (st, _, _) = state();
        let mut r = IdleRole;
        assert!(r.owned_fields().is_empty());
        assert!(r.compute(&TickContext::new(1, st.view())).is_empty());
    }

    #[test]
    fn fn_role_reads_snapshot() {
        let (st, a, _) = state();
        let mut r = FnRole::new("inc", vec![a], move |ctx: &TickContext<'_>| {
            Update::new().with(a, ctx.value(a) + 1.0)
        });
        assert_eq!(r.name(), "inc");
        assert_eq!(r.owned_fields(), vec![a]);
        let u = r.compute(&TickContext::new(1, st.view()));
        assert_eq!(u.get(a), Some(3.0));
    }

    #[test]
    fn fn_role_can_keep_private_state() {
        let (st, a, _) = state();
        let mut calls = 0u32;
        let mut r = FnRole::new("calls", vec![a], move |_ctx: &TickContext<'_>| {
            calls += 1;
            Update::new().with(a, calls as f64)
        });
        let view = st.view();
        r.compute(&TickContext::new(1, view));
        let u = r.compute(&TickContext::new(2, view));
        assert_eq!(u.get(a), Some(2.0));
    }

    #[test]
    fn boxed_role_delegates() {
        let mut boxed: Box<dyn Role> = Box::new(IdleRole);
        assert_eq!(boxed.name(), "idle");
        let (st, _, _) = state();
        assert!(boxed.compute(&TickContext::new(1, st.view())).is_empty());
    }
}

#[cfg(test)]
mod environment {
    use eco_core::SeededRng;

    use super::*;
    use crate::{ConstantEnvironment, Environment};

    #[test]
    fn constant_environment_ignores_month() {
        let r = Readings { temperature: 40.0, precipitation: 10.0 };
        let mut env = ConstantEnvironment(r);
        let mut rng = SeededRng::new(1);
        assert_eq!(env.readings(Calendar::start_of(2024), &mut rng), r);
        assert_eq!(env.readings(Calendar { year: 2024, month: 7 }, &mut rng), r);
    }
}
