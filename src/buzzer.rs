//! Time-bounded audible cue, independent of the phase tick.
//!
//! Provides [`Buzzer`], which turns a [`ToneOutput`] on when armed and back
//! off once its deadline has passed. Arming happens on the coarse tick and
//! polling on the fine tick; both may run in different interrupt contexts, so
//! every method takes `&self` and does its read-modify-write of the schedule
//! and the output write inside one critical section.

use core::cell::{Cell, RefCell};
use critical_section::Mutex;

use crate::config::CUE_DUTY;
use crate::fmt::debug;
use crate::output::ToneOutput;
use crate::time::{TimeDuration, TimeInstant, TimeSource};

/// The (active, deadline) pair. `Sounding` carries the arm instant and the
/// requested length; the deadline is `armed_at + duration`.
#[derive(Clone, Copy)]
pub enum BuzzerSchedule<I: TimeInstant> {
    Silent,
    Sounding { armed_at: I, duration: I::Duration },
}

impl<I: TimeInstant> BuzzerSchedule<I> {
    /// Whether the deadline has been reached at `now`.
    fn expired(&self, now: I) -> bool {
        match self {
            BuzzerSchedule::Silent => false,
            BuzzerSchedule::Sounding { armed_at, duration } => {
                now.duration_since(*armed_at) >= *duration
            }
        }
    }
}

/// Drives a PWM audio output for a bounded time.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `P` - Tone output implementation type
/// * `T` - Time source implementation type
pub struct Buzzer<'t, I: TimeInstant, P: ToneOutput, T: TimeSource<I>> {
    output: Mutex<RefCell<P>>,
    schedule: Mutex<Cell<BuzzerSchedule<I>>>,
    time_source: &'t T,
    duty: f32,
}

impl<'t, I: TimeInstant, P: ToneOutput, T: TimeSource<I>> Buzzer<'t, I, P, T> {
    /// Creates a silent buzzer that sounds at the reference 50% duty.
    pub fn new(output: P, time_source: &'t T) -> Self {
        Self::with_duty(output, time_source, CUE_DUTY)
    }

    /// Creates a silent buzzer with a custom audible duty (clamped to 0.0-1.0).
    pub fn with_duty(mut output: P, time_source: &'t T, duty: f32) -> Self {
        output.set_duty(0.0);

        Self {
            output: Mutex::new(RefCell::new(output)),
            schedule: Mutex::new(Cell::new(BuzzerSchedule::Silent)),
            time_source,
            duty: duty.clamp(0.0, 1.0),
        }
    }

    /// Starts sounding now and schedules silence after `duration`.
    ///
    /// Re-arming while active replaces the deadline.
    pub fn arm(&self, duration: I::Duration) {
        critical_section::with(|cs| {
            let armed_at = self.time_source.now();
            self.output.borrow_ref_mut(cs).set_duty(self.duty);
            self.schedule
                .borrow(cs)
                .set(BuzzerSchedule::Sounding { armed_at, duration });
        });
    }

    /// Silences the output if the deadline has passed.
    ///
    /// Returns `true` only on the poll that actually silenced it.
    pub fn poll(&self) -> bool {
        critical_section::with(|cs| {
            let schedule = self.schedule.borrow(cs);
            if !schedule.get().expired(self.time_source.now()) {
                return false;
            }

            self.output.borrow_ref_mut(cs).set_duty(0.0);
            schedule.set(BuzzerSchedule::Silent);
            debug!("buzzer silenced");
            true
        })
    }

    /// Silences immediately, regardless of the deadline.
    pub fn silence(&self) {
        critical_section::with(|cs| {
            self.output.borrow_ref_mut(cs).set_duty(0.0);
            self.schedule.borrow(cs).set(BuzzerSchedule::Silent);
        });
    }

    /// Returns true while the cue is sounding.
    pub fn is_active(&self) -> bool {
        critical_section::with(|cs| {
            matches!(self.schedule.borrow(cs).get(), BuzzerSchedule::Sounding { .. })
        })
    }

    /// Returns the silence deadline, if sounding.
    ///
    /// `None` also when the deadline is not representable by `I`.
    pub fn deadline(&self) -> Option<I> {
        critical_section::with(|cs| match self.schedule.borrow(cs).get() {
            BuzzerSchedule::Silent => None,
            BuzzerSchedule::Sounding { armed_at, duration } => armed_at.checked_add(duration),
        })
    }

    /// Time left until the deadline, `ZERO` when silent or overdue.
    pub fn remaining(&self) -> I::Duration {
        critical_section::with(|cs| match self.schedule.borrow(cs).get() {
            BuzzerSchedule::Silent => I::Duration::ZERO,
            BuzzerSchedule::Sounding { armed_at, duration } => {
                duration.saturating_sub(self.time_source.now().duration_since(armed_at))
            }
        })
    }

    /// Consumes the buzzer and returns the tone output.
    pub fn release(self) -> P {
        self.output.into_inner().into_inner()
    }
}
