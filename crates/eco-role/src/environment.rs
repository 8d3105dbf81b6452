//! Environment hook called once per tick by the observer.

use eco_core::{Calendar, RandomSource, Readings};

/// Produces the temperature and precipitation for a month.
///
/// Called during Observe, after the calendar has advanced, with the new
/// calendar position and the observer's own random source.  It is also called
/// once at build time for the start month.
pub trait Environment: Send {
    fn readings(&mut self, calendar: Calendar, rng: &mut dyn RandomSource) -> Readings;
}

/// The same readings every month; draws nothing from `rng`.
#[derive(Copy, Clone, Debug, Default)]
pub struct ConstantEnvironment(pub Readings);

impl Environment for ConstantEnvironment {
    fn readings(&mut self, _calendar: Calendar, _rng: &mut dyn RandomSource) -> Readings {
        self.0
    }
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    fn readings(&mut self, calendar: Calendar, rng: &mut dyn RandomSource) -> Readings {
        (**self).readings(calendar, rng)
    }
}
