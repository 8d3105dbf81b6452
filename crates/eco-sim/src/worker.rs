//! The per-thread tick protocol.
//!
//! ```text
//! Idle ─▶ Computing ─▶ AwaitComputeBarrier ─▶ Committing ─▶ AwaitCommitBarrier
//!   │        ▲                                                     │
//!   │        └──── AwaitObserveBarrier ◀──── Observing ◀───────────┘
//!   │                      │
//!   └──────────────────────┴─▶ Terminal
//! ```
//!
//! Role workers compute and commit, and pass straight through Observing.
//! The observer worker computes and commits nothing, and does all the
//! Observing.  Both run the termination check at the top of every tick
//! against the calendar published by the previous observe barrier, so every
//! worker leaves on the same tick.

use eco_barrier::RendezvousBarrier;
use eco_core::{Calendar, FieldId, RandomSource, SharedState};
use eco_role::{Environment, Role, TickContext, Update};

use crate::{ReportSink, SimResult, TickRecord};

// ── Phase ─────────────────────────────────────────────────────────────────────

/// Where a worker is in the current tick.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    Computing,
    AwaitComputeBarrier,
    Committing,
    AwaitCommitBarrier,
    Observing,
    AwaitObserveBarrier,
    Terminal,
}

impl Phase {
    /// `true` if `next` is a legal successor of `self`.
    pub fn may_precede(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (Idle, Computing)
                | (Idle, Terminal)
                | (Computing, AwaitComputeBarrier)
                | (AwaitComputeBarrier, Committing)
                | (Committing, AwaitCommitBarrier)
                | (AwaitCommitBarrier, Observing)
                | (Observing, AwaitObserveBarrier)
                | (AwaitObserveBarrier, Computing)
                | (AwaitObserveBarrier, Terminal)
        )
    }
}

/// Current phase plus the label used in trace output.
struct PhaseTracker<'a> {
    who:   &'a str,
    phase: Phase,
}

impl<'a> PhaseTracker<'a> {
    fn new(who: &'a str) -> Self {
        Self { who, phase: Phase::Idle }
    }

    #[inline]
    fn enter(&mut self, next: Phase) {
        debug_assert!(
            self.phase.may_precede(next),
            "{}: illegal transition {:?} -> {:?}",
            self.who,
            self.phase,
            next
        );
        log::trace!("{}: {:?} -> {:?}", self.who, self.phase, next);
        self.phase = next;
    }
}

// ── Shared between both worker kinds ──────────────────────────────────────────

/// What every worker borrows for the length of a run.
#[derive(Copy, Clone)]
pub(crate) struct Lockstep<'a> {
    pub state:      &'a SharedState,
    pub barrier:    &'a RendezvousBarrier,
    pub end:        Calendar,
    /// Ticks completed before this run started.
    pub first_tick: u64,
}

impl Lockstep<'_> {
    #[inline]
    fn finished(&self) -> bool {
        self.state.view().calendar() >= self.end
    }
}

// ── RoleWorker ────────────────────────────────────────────────────────────────

pub(crate) struct RoleWorker<'a> {
    pub role:  &'a mut dyn Role,
    pub owned: &'a [FieldId],
    pub step:  Lockstep<'a>,
}

impl RoleWorker<'_> {
    /// Run ticks until the calendar reaches `end`; return the tick count.
    pub fn run(self) -> SimResult<u64> {
        let RoleWorker { role, owned, step } = self;
        let _guard = step.barrier.poison_guard();
        let name = role.name().to_owned();
        let mut tracker = PhaseTracker::new(&name);
        let mut tick = step.first_tick;

        loop {
            if step.finished() {
                tracker.enter(Phase::Terminal);
                break;
            }
            tick += 1;

            tracker.enter(Phase::Computing);
            let update = role.compute(&TickContext::new(tick, step.state.view()));

            tracker.enter(Phase::AwaitComputeBarrier);
            step.barrier.wait()?;

            tracker.enter(Phase::Committing);
            commit(&name, owned, step.state, &update);

            tracker.enter(Phase::AwaitCommitBarrier);
            step.barrier.wait()?;

            tracker.enter(Phase::Observing);
            tracker.enter(Phase::AwaitObserveBarrier);
            step.barrier.wait()?;
        }
        Ok(tick - step.first_tick)
    }
}

/// Write `update` into `state`.
///
/// # Panics
/// Panics if `update` names a field outside `owned`.
fn commit(role: &str, owned: &[FieldId], state: &SharedState, update: &Update) {
    for (field, value) in update.iter() {
        assert!(
            owned.contains(&field),
            "role {role:?} wrote {field}, which it does not own"
        );
        let outcome = state.commit(field, value);
        if outcome.clamped {
            log::debug!(
                "{role}: clamped {field} from {value} to {}",
                outcome.stored
            );
        }
    }
}

// ── ObserverWorker ────────────────────────────────────────────────────────────

pub(crate) struct ObserverWorker<'a, S: ReportSink> {
    pub environment: &'a mut dyn Environment,
    pub rng:         &'a mut dyn RandomSource,
    pub sink:        &'a mut S,
    pub step:        Lockstep<'a>,
}

impl<S: ReportSink> ObserverWorker<'_, S> {
    pub fn run(self) -> SimResult<u64> {
        let ObserverWorker { environment, rng, sink, step } = self;
        let _guard = step.barrier.poison_guard();
        let mut tracker = PhaseTracker::new("observer");
        let mut tick = step.first_tick;

        loop {
            if step.finished() {
                tracker.enter(Phase::Terminal);
                break;
            }
            tick += 1;

            tracker.enter(Phase::Computing);
            tracker.enter(Phase::AwaitComputeBarrier);
            step.barrier.wait()?;

            tracker.enter(Phase::Committing);
            tracker.enter(Phase::AwaitCommitBarrier);
            step.barrier.wait()?;

            tracker.enter(Phase::Observing);
            let next = step.state.view().calendar().next();
            step.state.set_calendar(next);
            step.state.set_readings(environment.readings(next, rng));

            let record = TickRecord::capture(tick, step.state.view());
            log::debug!(
                "tick {tick} -> {}: T={:.2} P={:.2} {:?}",
                record.calendar,
                record.readings.temperature,
                record.readings.precipitation,
                record.values
            );
            sink.on_record(&record);

            tracker.enter(Phase::AwaitObserveBarrier);
            step.barrier.wait()?;
        }
        Ok(tick - step.first_tick)
    }
}
