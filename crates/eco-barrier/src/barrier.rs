//! [`RendezvousBarrier`] and its wait strategy.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};
use std::{hint, thread};

use crate::{BarrierError, BarrierResult};

// ── SpinPolicy ────────────────────────────────────────────────────────────────

/// How a blocked participant waits.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SpinPolicy {
    /// Busy-wait iterations before falling back to `thread::yield_now`.
    pub spin_limit: u32,
}

impl SpinPolicy {
    /// Yield on every check; best when there are more parties than cores.
    pub const YIELD: SpinPolicy = SpinPolicy { spin_limit: 0 };

    pub const fn new(spin_limit: u32) -> Self {
        SpinPolicy { spin_limit }
    }
}

impl Default for SpinPolicy {
    fn default() -> Self {
        SpinPolicy { spin_limit: 64 }
    }
}

/// Per-call wait state.
struct Backoff {
    spins: u32,
    limit: u32,
}

impl Backoff {
    fn new(policy: SpinPolicy) -> Self {
        Self { spins: 0, limit: policy.spin_limit }
    }

    #[inline]
    fn pause(&mut self) {
        if self.spins < self.limit {
            self.spins += 1;
            hint::spin_loop();
        } else {
            thread::yield_now();
        }
    }
}

// ── WaitOutcome ───────────────────────────────────────────────────────────────

/// What a successful [`RendezvousBarrier::wait`] reports.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct WaitOutcome {
    /// `true` for exactly one participant per round: the last to arrive.
    pub leader: bool,
    /// 1-based index of the round this call completed.
    pub round:  u64,
}

// ── RendezvousBarrier ─────────────────────────────────────────────────────────

/// A reusable barrier for a fixed number of participants.
///
/// Every participant must call [`wait`][Self::wait] exactly once per round.
/// A participant count other than [`parties`][Self::parties] is a programming
/// error and may deadlock.
///
/// # Invariants
///
/// - `0 <= arrived <= parties`
/// - `0 <= departed <= parties - 1`
/// - round k+1 admits no arrival until round k's `departed == parties - 1`
pub struct RendezvousBarrier {
    parties:  usize,
    lock:     Mutex<()>,
    arrived:  AtomicUsize,
    departed: AtomicUsize,
    rounds:   AtomicU64,
    poisoned: AtomicBool,
    spin:     SpinPolicy,
}

impl RendezvousBarrier {
    /// A barrier for `parties` participants with the default spin policy.
    pub fn new(parties: usize) -> BarrierResult<Self> {
        Self::with_policy(parties, SpinPolicy::default())
    }

    /// A barrier for `parties` participants that waits according to `spin`.
    pub fn with_policy(parties: usize, spin: SpinPolicy) -> BarrierResult<Self> {
        if parties == 0 {
            return Err(BarrierError::NoParties);
        }
        Ok(Self {
            parties,
            lock:     Mutex::new(()),
            arrived:  AtomicUsize::new(0),
            departed: AtomicUsize::new(0),
            rounds:   AtomicU64::new(0),
            poisoned: AtomicBool::new(false),
            spin,
        })
    }

    #[inline]
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Rounds released so far.
    #[inline]
    pub fn rounds(&self) -> u64 {
        self.rounds.load(Ordering::Acquire)
    }

    #[inline]
    pub fn spin_policy(&self) -> SpinPolicy {
        self.spin
    }

    /// Block until all `parties` participants have called `wait` for this
    /// round.
    ///
    /// Returns `Err(Poisoned)` instead of blocking once the barrier has been
    /// poisoned; a poisoned barrier never completes another round.
    pub fn wait(&self) -> BarrierResult<WaitOutcome> {
        if self.is_poisoned() {
            return Err(BarrierError::Poisoned);
        }

        let guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_poisoned() {
            return Err(BarrierError::Poisoned);
        }

        let arrived = self.arrived.fetch_add(1, Ordering::AcqRel) + 1;
        debug_assert!(arrived <= self.parties, "more participants than parties");

        if arrived == self.parties {
            let round = self.rounds.fetch_add(1, Ordering::AcqRel) + 1;
            self.departed.store(0, Ordering::Relaxed);
            self.arrived.store(0, Ordering::Release);

            // A poisoned non-leader only leaves without departing once it
            // holds the lock, which stays ours until this loop ends.
            let mut backoff = Backoff::new(self.spin);
            while self.departed.load(Ordering::Acquire) != self.parties - 1 {
                backoff.pause();
            }
            drop(guard);

            log::trace!("barrier round {round} released ({} parties)", self.parties);
            return Ok(WaitOutcome { leader: true, round });
        }
        drop(guard);

        let mut backoff = Backoff::new(self.spin);
        while self.arrived.load(Ordering::Acquire) != 0 {
            if self.is_poisoned() {
                // Holding the lock proves no leader is releasing this round,
                // so our arrival can be withdrawn.  Without it a release may
                // be in flight and must still be acknowledged.
                if let Some(_guard) = self.try_lock_arrivals() {
                    if self.arrived.load(Ordering::Acquire) == 0 {
                        break;
                    }
                    self.arrived.fetch_sub(1, Ordering::AcqRel);
                    return Err(BarrierError::Poisoned);
                }
            }
            backoff.pause();
        }

        // The leader still holds the lock, so `rounds` cannot move yet.
        let round = self.rounds.load(Ordering::Acquire);
        self.departed.fetch_add(1, Ordering::AcqRel);
        Ok(WaitOutcome { leader: false, round })
    }

    fn try_lock_arrivals(&self) -> Option<MutexGuard<'_, ()>> {
        match self.lock.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(e)) => Some(e.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    /// Mark the barrier unusable.  Blocked and future waiters get
    /// `Err(Poisoned)`.
    pub fn poison(&self) {
        self.poisoned.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned.load(Ordering::SeqCst)
    }

    /// A guard that poisons the barrier if the current thread unwinds while
    /// it is alive.  Workers hold one for their whole loop.
    pub fn poison_guard(&self) -> PoisonGuard<'_> {
        PoisonGuard { barrier: self }
    }
}

impl std::fmt::Debug for RendezvousBarrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendezvousBarrier")
            .field("parties", &self.parties)
            .field("arrived", &self.arrived.load(Ordering::Relaxed))
            .field("departed", &self.departed.load(Ordering::Relaxed))
            .field("rounds", &self.rounds.load(Ordering::Relaxed))
            .field("poisoned", &self.is_poisoned())
            .finish()
    }
}

// ── PoisonGuard ───────────────────────────────────────────────────────────────

/// See [`RendezvousBarrier::poison_guard`].
pub struct PoisonGuard<'a> {
    barrier: &'a RendezvousBarrier,
}

impl Drop for PoisonGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.barrier.poison();
        }
    }
}
