//! Simulation time model.
//!
//! # Design
//!
//! One tick is one simulated month.  The canonical position is a
//! `Calendar { year, month }` with a zero-based month (`0..=11`), so January
//! is month 0 and December is month 11.  Field order makes the derived `Ord`
//! compare by year first, which is what the termination check relies on.

use std::fmt;

use crate::{EcoError, EcoResult};

/// Months per simulated year.
pub const MONTHS_PER_YEAR: u8 = 12;

// ── Calendar ──────────────────────────────────────────────────────────────────

/// A simulated calendar position.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Calendar {
    pub year:  i32,
    /// Zero-based month, `0..=11`.
    pub month: u8,
}

impl Calendar {
    /// Validated constructor.
    pub fn new(year: i32, month: u8) -> EcoResult<Self> {
        let cal = Calendar { year, month };
        if !cal.is_valid() {
            return Err(EcoError::InvalidCalendar { year, month });
        }
        Ok(cal)
    }

    /// Month 0 of `year`.
    #[inline]
    pub const fn start_of(year: i32) -> Self {
        Calendar { year, month: 0 }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.month < MONTHS_PER_YEAR
    }

    /// The position one month later; month 11 rolls over to month 0 of the
    /// next year.
    #[inline]
    pub fn next(self) -> Self {
        if self.month + 1 >= MONTHS_PER_YEAR {
            Calendar { year: self.year + 1, month: 0 }
        } else {
            Calendar { year: self.year, month: self.month + 1 }
        }
    }

    /// Whole months from `self` to `later`; 0 if `later` is not after `self`.
    pub fn months_until(self, later: Calendar) -> u64 {
        let a = self.year as i64 * MONTHS_PER_YEAR as i64 + self.month as i64;
        let b = later.year as i64 * MONTHS_PER_YEAR as i64 + later.month as i64;
        (b - a).max(0) as u64
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed
/// to the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Calendar position of the initial state.
    pub start: Calendar,

    /// Terminal position (exclusive).  Workers stop at the top of the first
    /// tick whose calendar is `>= end`.
    pub end: Calendar,

    /// Root RNG seed.  The same seed always produces identical records.
    pub seed: u64,

    /// Busy-wait iterations a barrier participant spends before it starts
    /// yielding its time slice.  0 yields immediately.
    pub spin_limit: u32,
}

impl SimConfig {
    /// Number of ticks a run from `start` to `end` will execute.
    #[inline]
    pub fn total_ticks(&self) -> u64 {
        self.start.months_until(self.end)
    }

    /// Reject malformed calendars and an `end` before `start`.
    pub fn validate(&self) -> EcoResult<()> {
        for cal in [self.start, self.end] {
            if !cal.is_valid() {
                return Err(EcoError::InvalidCalendar { year: cal.year, month: cal.month });
            }
        }
        if self.end < self.start {
            return Err(EcoError::Config(format!(
                "end {} is before start {}",
                self.end, self.start
            )));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start:      Calendar::start_of(2024),
            end:        Calendar::start_of(2030),
            seed:       0,
            spin_limit: 64,
        }
    }
}
