//! The `Sim` struct and its run loop.

use std::thread;

use eco_barrier::RendezvousBarrier;
use eco_core::{FieldId, RandomSource, RoleId, SharedState, SimConfig};
use eco_role::{Environment, Role};

use crate::worker::{Lockstep, ObserverWorker, RoleWorker};
use crate::{ReportSink, RunSummary, SimError, SimResult, TickRecord};

/// The simulation driver.
///
/// `Sim` owns the shared state, the fixed set of roles and the barrier that
/// sequences them.  [`run`][Self::run] starts one scoped thread per role plus
/// one observer thread and returns once all of them have reached the
/// terminal calendar position.  Every tick goes through three barrier rounds:
///
/// 1. **Compute**: each role reads the pre-tick snapshot and returns an
///    `Update`.
/// 2. **Commit**: each role's worker writes its update into the fields the
///    role owns.
/// 3. **Observe**: the observer advances the calendar, draws the next
///    month's readings, and reports a [`TickRecord`].
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (start, end, seed, spin limit).
    pub config: SimConfig,

    /// Calendar, readings and quantities.  Readable between runs through
    /// `state.view()`.
    pub state: SharedState,

    pub(crate) roles:       Vec<Box<dyn Role>>,
    /// `owned[i]` are the fields `roles[i]` may commit.
    pub(crate) owned:       Vec<Vec<FieldId>>,
    pub(crate) environment: Box<dyn Environment>,
    pub(crate) rng:         Box<dyn RandomSource>,
    pub(crate) barrier:     RendezvousBarrier,

    /// Ticks completed over all runs.
    pub(crate) ticks_run:   u64,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until the calendar reaches `config.end`.
    ///
    /// Reports the current state as a tick record before any worker starts,
    /// then one record per tick.  Calling `run` again after it returned is a
    /// no-op apart from that first record.
    pub fn run<S: ReportSink + Send>(&mut self, sink: &mut S) -> SimResult<RunSummary> {
        let start = self.state.view().calendar();
        log::info!(
            "run: {} roles + observer, {start} -> {}, {} ticks",
            self.roles.len(),
            self.config.end,
            start.months_until(self.config.end)
        );

        sink.on_start(self.state.schema());
        sink.on_record(&TickRecord::capture(self.ticks_run, self.state.view()));

        let ticks = self.run_workers(sink)?;
        self.ticks_run += ticks;

        let summary = RunSummary {
            ticks,
            final_calendar: self.state.view().calendar(),
            barrier_rounds: self.barrier.rounds(),
        };
        sink.on_finish(&summary);
        log::info!(
            "run complete: {} ticks, final calendar {}, {} barrier rounds",
            summary.ticks,
            summary.final_calendar,
            summary.barrier_rounds
        );
        Ok(summary)
    }

    /// Number of roles (the barrier has one more party: the observer).
    #[inline]
    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    /// Role names in registration order.
    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.name()).collect()
    }

    /// The id of the first role called `name`: its registration index.
    pub fn role_id(&self, name: &str) -> Option<RoleId> {
        let i = self.roles.iter().position(|r| r.name() == name)?;
        RoleId::try_from(i).ok()
    }

    /// Ticks completed over all runs.
    #[inline]
    pub fn ticks_run(&self) -> u64 {
        self.ticks_run
    }

    #[inline]
    pub fn barrier(&self) -> &RendezvousBarrier {
        &self.barrier
    }

    // ── Workers ───────────────────────────────────────────────────────────

    fn run_workers<S: ReportSink + Send>(&mut self, sink: &mut S) -> SimResult<u64> {
        let names: Vec<String> = self.roles.iter().map(|r| r.name().to_owned()).collect();
        let step = Lockstep {
            state:      &self.state,
            barrier:    &self.barrier,
            end:        self.config.end,
            first_tick: self.ticks_run,
        };
        let owned = &self.owned;
        let roles = &mut self.roles;
        let environment = self.environment.as_mut();
        let rng = self.rng.as_mut();

        let (role_results, observer_result) = thread::scope(|s| {
            let role_handles: Vec<_> = roles
                .iter_mut()
                .zip(owned)
                .map(|(role, owned)| {
                    let worker = RoleWorker { role: role.as_mut(), owned, step };
                    s.spawn(move || worker.run())
                })
                .collect();

            let observer = ObserverWorker { environment, rng, sink, step };
            let observer_handle = s.spawn(move || observer.run());

            let role_results: Vec<_> = role_handles.into_iter().map(|h| h.join()).collect();
            (role_results, observer_handle.join())
        });

        // A panic explains any poisoned-barrier errors it caused, so report
        // it first.
        for (name, result) in names.iter().zip(&role_results) {
            if result.is_err() {
                log::error!("worker for role {name:?} panicked");
                return Err(SimError::WorkerPanicked { role: name.clone() });
            }
        }
        let observer_ticks = observer_result
            .map_err(|_| SimError::WorkerPanicked { role: "observer".to_owned() })??;

        for result in role_results.into_iter().flatten() {
            let ticks = result?;
            debug_assert_eq!(ticks, observer_ticks, "workers disagreed on tick count");
        }
        Ok(observer_ticks)
    }
}
