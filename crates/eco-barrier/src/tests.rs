//! Tests for the rendezvous barrier.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crate::{BarrierError, RendezvousBarrier, SpinPolicy, WaitOutcome};

/// Run `parties` threads through `rounds` waits; return every outcome.
fn run_rounds(barrier: &RendezvousBarrier, parties: usize, rounds: usize) -> Vec<Vec<WaitOutcome>> {
    thread::scope(|s| {
        let handles: Vec<_> = (0..parties)
            .map(|_| {
                s.spawn(move || {
                    (0..rounds)
                        .map(|_| barrier.wait().expect("barrier poisoned"))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

#[cfg(test)]
mod construction {
    use super::*;

    #[test]
    fn zero_parties_rejected() {
        assert_eq!(RendezvousBarrier::new(0).unwrap_err(), BarrierError::NoParties);
    }

    #[test]
    fn reports_parties_and_policy() {
        let b = RendezvousBarrier::with_policy(3, SpinPolicy::YIELD).unwrap();
        assert_eq!(b.parties(), 3);
        assert_eq!(b.spin_policy().spin_limit, 0);
        assert_eq!(b.rounds(), 0);
        assert!(!b.is_poisoned());
    }
}

#[cfg(test)]
mod rounds {
    use super::*;

    #[test]
    fn single_party_never_blocks() {
        let b = RendezvousBarrier::new(1).unwrap();
        for expected in 1..=5 {
            let out = b.wait().unwrap();
            assert!(out.leader);
            assert_eq!(out.round, expected);
        }
    }

    #[test]
    fn exactly_one_leader_per_round() {
        let parties = 4;
        let rounds = 50;
        let b = RendezvousBarrier::new(parties).unwrap();
        let outcomes = run_rounds(&b, parties, rounds);

        for r in 0..rounds {
            let leaders = outcomes.iter().filter(|o| o[r].leader).count();
            assert_eq!(leaders, 1, "round {r} had {leaders} leaders");
            for o in &outcomes {
                assert_eq!(o[r].round, r as u64 + 1);
            }
        }
        assert_eq!(b.rounds(), rounds as u64);
    }

    #[test]
    fn nobody_leaves_before_everyone_arrives() {
        let parties = 6;
        let rounds = 200;
        let b = RendezvousBarrier::with_policy(parties, SpinPolicy::YIELD).unwrap();
        let arrivals = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..parties {
                s.spawn(|| {
                    for r in 1..=rounds {
                        arrivals.fetch_add(1, Ordering::SeqCst);
                        b.wait().unwrap();
                        // Everyone from this round has arrived; nobody can
                        // start the next round before the second wait.
                        let seen = arrivals.load(Ordering::SeqCst);
                        assert_eq!(seen, r * parties, "round {r} released with {seen} arrivals");
                        b.wait().unwrap();
                    }
                });
            }
        });
        assert_eq!(arrivals.load(Ordering::SeqCst), parties * rounds);
        assert_eq!(b.rounds(), 2 * rounds as u64);
    }

    #[test]
    fn reusable_with_same_threads() {
        let b = RendezvousBarrier::new(3).unwrap();
        run_rounds(&b, 3, 1);
        run_rounds(&b, 3, 1);
        assert_eq!(b.rounds(), 2);
    }

    #[test]
    fn more_parties_than_cores() {
        let parties = 32;
        let b = RendezvousBarrier::with_policy(parties, SpinPolicy::YIELD).unwrap();
        let outcomes = run_rounds(&b, parties, 10);
        assert_eq!(outcomes.len(), parties);
        assert_eq!(b.rounds(), 10);
    }
}

#[cfg(test)]
mod poisoning {
    use super::*;

    #[test]
    fn poisoned_barrier_rejects_waiters() {
        let b = RendezvousBarrier::new(2).unwrap();
        b.poison();
        assert_eq!(b.wait().unwrap_err(), BarrierError::Poisoned);
    }

    #[test]
    fn panicking_participant_releases_blocked_peer() {
        let b = RendezvousBarrier::new(2).unwrap();
        let (peer, crashed) = thread::scope(|s| {
            let peer = s.spawn(|| b.wait());
            let crashed = s.spawn(|| {
                let _guard = b.poison_guard();
                panic!("role failed");
            });
            (peer.join().unwrap(), crashed.join())
        });
        assert!(crashed.is_err());
        assert_eq!(peer.unwrap_err(), BarrierError::Poisoned);
        assert!(b.is_poisoned());
    }

    #[test]
    fn outside_poison_withdraws_blocked_arrivals() {
        let b = RendezvousBarrier::new(3).unwrap();
        let results = thread::scope(|s| {
            let waiters: Vec<_> = (0..2).map(|_| s.spawn(|| b.wait())).collect();
            while !format!("{b:?}").contains("arrived: 2") {
                thread::yield_now();
            }
            b.poison();
            waiters.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>()
        });
        assert!(results.iter().all(|r| *r == Err(BarrierError::Poisoned)));
        assert!(format!("{b:?}").contains("arrived: 0"), "{b:?}");
    }

    #[test]
    fn poison_racing_a_round_never_strands_a_peer() {
        for _ in 0..2_000 {
            let b = RendezvousBarrier::with_policy(2, SpinPolicy::YIELD).unwrap();
            let (first, second) = thread::scope(|s| {
                let first = s.spawn(|| b.wait());
                let second = s.spawn(|| b.wait());
                s.spawn(|| b.poison());
                (first.join().unwrap(), second.join().unwrap())
            });
            // A round either completes for both parties or for neither.
            assert_eq!(first.is_ok(), second.is_ok(), "{first:?} / {second:?}");
        }
    }

    #[test]
    fn guard_without_panic_leaves_barrier_usable() {
        let b = RendezvousBarrier::new(1).unwrap();
        {
            let _guard = b.poison_guard();
        }
        assert!(!b.is_poisoned());
        assert!(b.wait().is_ok());
    }
}

#[cfg(test)]
mod props {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(12))]

        /// Any party count completes two rounds with one leader each.
        #[test]
        fn any_party_count_completes(parties in 1usize..10) {
            let b = RendezvousBarrier::new(parties).unwrap();
            let outcomes = run_rounds(&b, parties, 2);
            for r in 0..2 {
                prop_assert_eq!(outcomes.iter().filter(|o| o[r].leader).count(), 1);
            }
            prop_assert_eq!(b.rounds(), 2);
        }
    }
}
