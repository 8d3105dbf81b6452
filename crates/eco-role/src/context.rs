//! Read-only tick snapshot passed to every role.

use eco_core::{Calendar, FieldId, Readings, StateView};

/// What a role sees during Compute.
///
/// Built by each worker at the top of the tick, after the previous tick's
/// observe barrier.  `calendar` and `readings` are copied out of the state
/// once; quantities are read through `state` on demand.  Every role in the
/// same tick sees the same values.
pub struct TickContext<'a> {
    /// 1-based index of the tick being computed.
    pub tick: u64,

    /// Calendar position at the start of the tick.
    pub calendar: Calendar,

    /// Environment readings for `calendar`.
    pub readings: Readings,

    /// Read-only access to every quantity.
    pub state: StateView<'a>,
}

impl<'a> TickContext<'a> {
    /// Snapshot `state` for tick number `tick`.
    #[inline]
    pub fn new(tick: u64, state: StateView<'a>) -> Self {
        Self {
            tick,
            calendar: state.calendar(),
            readings: state.readings(),
            state,
        }
    }

    /// Shorthand for `self.state.value(field)`.
    #[inline]
    pub fn value(&self, field: FieldId) -> f64 {
        self.state.value(field)
    }

    /// Shorthand for `self.state.count(field)`.
    #[inline]
    pub fn count(&self, field: FieldId) -> i64 {
        self.state.count(field)
    }
}
