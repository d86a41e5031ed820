//! Integration tests for PedestrianLatch across threads

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use crosswalk_signal::PedestrianLatch;

static SHARED: PedestrianLatch = PedestrianLatch::new();

#[test]
fn static_latch_round_trip() {
    assert!(!SHARED.take());
    SHARED.raise();
    assert!(SHARED.take());
    assert!(!SHARED.take());
}

#[test]
fn raise_before_take_is_always_observed() {
    let latch = Arc::new(PedestrianLatch::new());

    for _ in 0..200 {
        let (done, raised) = mpsc::channel();
        let raiser = {
            let latch = Arc::clone(&latch);
            thread::spawn(move || {
                latch.raise();
                done.send(()).unwrap();
            })
        };

        raised.recv().unwrap();
        assert!(latch.take());
        assert!(!latch.take());
        raiser.join().unwrap();
    }
}

#[test]
fn concurrent_raises_collapse_to_one_request() {
    let latch = Arc::new(PedestrianLatch::new());

    let raisers: Vec<_> = (0..8)
        .map(|_| {
            let latch = Arc::clone(&latch);
            thread::spawn(move || {
                for _ in 0..100 {
                    latch.raise();
                }
            })
        })
        .collect();

    for raiser in raisers {
        raiser.join().unwrap();
    }

    assert!(latch.take());
    assert!(!latch.take());
}

#[test]
fn concurrent_take_consumes_each_request_at_most_once() {
    const RAISES: usize = 500;

    let latch = Arc::new(PedestrianLatch::new());
    let finished = Arc::new(AtomicBool::new(false));
    let consumed = Arc::new(AtomicUsize::new(0));

    let consumer = {
        let latch = Arc::clone(&latch);
        let finished = Arc::clone(&finished);
        let consumed = Arc::clone(&consumed);
        thread::spawn(move || {
            while !finished.load(Ordering::Acquire) {
                if latch.take() {
                    consumed.fetch_add(1, Ordering::Relaxed);
                }
                thread::yield_now();
            }
        })
    };

    for _ in 0..RAISES {
        latch.raise();
        thread::yield_now();
    }
    finished.store(true, Ordering::Release);
    consumer.join().unwrap();

    // The last raise is either consumed already or still pending
    let leftover = usize::from(latch.take());
    let total = consumed.load(Ordering::Relaxed) + leftover;
    assert!(total >= 1);
    assert!(total <= RAISES);
    assert!(!latch.take());
}
