//! `eco-barrier` — the rendezvous barrier that sequences every tick.
//!
//! # Two-stage release
//!
//! ```text
//! wait():
//!   lock
//!   arrived += 1
//!   if arrived == parties:            ← last arrival ("leader")
//!       departed = 0
//!       arrived  = 0                  ← release signal
//!       spin until departed == parties - 1
//!       unlock                        ← next round may start arriving
//!   else:
//!       unlock
//!       spin until arrived == 0
//!       departed += 1
//! ```
//!
//! The leader keeps the arrival lock until every other participant has
//! confirmed its departure.  Without that confirmation a fast participant
//! could loop round into the next `wait()` and bump `arrived` before a slow
//! one had seen the reset, so the slow one would keep spinning on a non-zero
//! count (deadlock) or the round would release one participant short.
//!
//! Waiting spins for [`SpinPolicy::spin_limit`] iterations, then yields the
//! time slice on every further check.

pub mod barrier;
pub mod error;

#[cfg(test)]
mod tests;

pub use barrier::{PoisonGuard, RendezvousBarrier, SpinPolicy, WaitOutcome};
pub use error::{BarrierError, BarrierResult};
