//! Periodic drivers for the coarse phase tick and the fine buzzer poll.
//!
//! [`Cadence`] is a single self-rescheduling periodic driver; it fires at most
//! once per call, so its handler can never overlap itself. [`TickScheduler`]
//! pairs a coarse and a fine cadence and dispatches them to a
//! [`SignalController`] and its [`Buzzer`](crate::Buzzer). Platforms with
//! hardware alarms can instead drive `tick` and `poll` from two interrupts at
//! [`COARSE_PERIOD_MS`] and [`FINE_PERIOD_MS`].

use crate::config::{COARSE_PERIOD_MS, ConfigError, FINE_PERIOD_MS};
use crate::controller::SignalController;
use crate::output::{SignalLights, ToneOutput};
use crate::phase::TickOutcome;
use crate::time::{TimeDuration, TimeInstant, TimeSource};

/// A fixed-period driver anchored at its start instant.
#[derive(Clone, Copy)]
pub struct Cadence<I: TimeInstant> {
    period: I::Duration,
    last: Option<I>,
}

impl<I: TimeInstant> Cadence<I> {
    /// Creates a stopped cadence.
    pub fn new(period: I::Duration) -> Result<Self, ConfigError> {
        if period == I::Duration::ZERO {
            return Err(ConfigError::ZeroPeriod);
        }

        Ok(Self { period, last: None })
    }

    /// Anchors the cadence; the first firing is one period after `now`.
    pub fn start(&mut self, now: I) {
        self.last = Some(now);
    }

    /// Returns `true` if a firing is due at `now` and reschedules.
    ///
    /// Firings missed by more than one period are dropped rather than
    /// replayed back to back; the schedule stays aligned to the original
    /// anchor. The anchor moves in whole periods of the duration's own
    /// resolution, one step per missed period.
    pub fn poll(&mut self, now: I) -> bool {
        let Some(mut anchor) = self.last else {
            return false;
        };

        let mut behind = now.duration_since(anchor);
        if behind < self.period {
            return false;
        }

        while behind >= self.period {
            match anchor.checked_add(self.period) {
                Some(next) => anchor = next,
                None => {
                    anchor = now;
                    break;
                }
            }
            behind = behind.saturating_sub(self.period);
        }

        self.last = Some(anchor);
        true
    }

    /// Time until the next firing; `ZERO` when due, the full period when
    /// not started.
    pub fn remaining(&self, now: I) -> I::Duration {
        match self.last {
            None => self.period,
            Some(last) => self.period.saturating_sub(now.duration_since(last)),
        }
    }
}

/// Result of one [`TickScheduler::service`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServiceReport<D> {
    /// Outcome of the coarse tick, if it was due.
    pub coarse: Option<TickOutcome>,
    /// Whether the fine tick ran and silenced the buzzer.
    pub silenced: bool,
    /// Delay until the next driver is due.
    pub next_in: D,
}

/// Coarse and fine periodic drivers.
pub struct TickScheduler<I: TimeInstant> {
    coarse: Cadence<I>,
    fine: Cadence<I>,
}

impl<I: TimeInstant> TickScheduler<I> {
    /// Creates a scheduler with the reference 1000 ms / 100 ms periods.
    pub fn new() -> Self {
        Self {
            coarse: Cadence {
                period: I::Duration::from_millis(COARSE_PERIOD_MS),
                last: None,
            },
            fine: Cadence {
                period: I::Duration::from_millis(FINE_PERIOD_MS),
                last: None,
            },
        }
    }

    /// Creates a scheduler with custom periods.
    pub fn with_periods(coarse: I::Duration, fine: I::Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            coarse: Cadence::new(coarse)?,
            fine: Cadence::new(fine)?,
        })
    }

    /// Anchors both drivers at `now`.
    pub fn start(&mut self, now: I) {
        self.coarse.start(now);
        self.fine.start(now);
    }

    /// Runs whichever drivers are due at `now`, coarse first.
    ///
    /// The relative order does not matter: the coarse tick only ever arms the
    /// buzzer, and an arm at `now` cannot be expired by a poll at `now`
    /// unless the cue duration is zero.
    pub fn service<L, P, T>(
        &mut self,
        now: I,
        controller: &mut SignalController<'_, I, L, P, T>,
    ) -> ServiceReport<I::Duration>
    where
        L: SignalLights,
        P: ToneOutput,
        T: TimeSource<I>,
    {
        let coarse = if self.coarse.poll(now) {
            Some(controller.tick())
        } else {
            None
        };

        let silenced = self.fine.poll(now) && controller.buzzer().poll();

        ServiceReport {
            coarse,
            silenced,
            next_in: self.next_in(now),
        }
    }

    /// Delay until the earlier of the two drivers is due.
    pub fn next_in(&self, now: I) -> I::Duration {
        let coarse = self.coarse.remaining(now);
        let fine = self.fine.remaining(now);
        if coarse < fine { coarse } else { fine }
    }
}

impl<I: TimeInstant> Default for TickScheduler<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
    struct Ms(u64);

    impl TimeDuration for Ms {
        const ZERO: Self = Ms(0);

        fn as_millis(&self) -> u64 {
            self.0
        }

        fn from_millis(millis: u64) -> Self {
            Ms(millis)
        }

        fn saturating_sub(self, other: Self) -> Self {
            Ms(self.0.saturating_sub(other.0))
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct At(u64);

    impl TimeInstant for At {
        type Duration = Ms;

        fn duration_since(&self, earlier: Self) -> Ms {
            Ms(self.0.saturating_sub(earlier.0))
        }

        fn checked_add(self, duration: Ms) -> Option<Self> {
            self.0.checked_add(duration.0).map(At)
        }
    }

    #[test]
    fn zero_period_rejected() {
        assert!(matches!(Cadence::<At>::new(Ms(0)), Err(ConfigError::ZeroPeriod)));
    }

    #[test]
    fn unstarted_cadence_never_fires() {
        let mut cadence = Cadence::<At>::new(Ms(100)).unwrap();
        assert!(!cadence.poll(At(1000)));
        assert_eq!(cadence.remaining(At(1000)), Ms(100));
    }

    #[test]
    fn fires_once_per_period() {
        let mut cadence = Cadence::<At>::new(Ms(100)).unwrap();
        cadence.start(At(0));
        assert!(!cadence.poll(At(99)));
        assert!(cadence.poll(At(100)));
        assert!(!cadence.poll(At(100)));
        assert!(!cadence.poll(At(150)));
        assert_eq!(cadence.remaining(At(150)), Ms(50));
        assert!(cadence.poll(At(200)));
    }

    #[test]
    fn late_poll_stays_aligned_to_anchor() {
        let mut cadence = Cadence::<At>::new(Ms(100)).unwrap();
        cadence.start(At(0));
        assert!(cadence.poll(At(130)));
        assert_eq!(cadence.remaining(At(130)), Ms(70));
        assert!(cadence.poll(At(200)));
    }

    #[test]
    fn missed_periods_are_dropped() {
        let mut cadence = Cadence::<At>::new(Ms(100)).unwrap();
        cadence.start(At(0));
        assert!(cadence.poll(At(450)));
        assert!(!cadence.poll(At(460)));
        assert!(cadence.poll(At(500)));
    }

    /// Microsecond resolution, coarser millisecond view.
    #[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
    struct Us(u64);

    impl TimeDuration for Us {
        const ZERO: Self = Us(0);

        fn as_millis(&self) -> u64 {
            self.0 / 1000
        }

        fn from_millis(millis: u64) -> Self {
            Us(millis * 1000)
        }

        fn saturating_sub(self, other: Self) -> Self {
            Us(self.0.saturating_sub(other.0))
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct AtUs(u64);

    impl TimeInstant for AtUs {
        type Duration = Us;

        fn duration_since(&self, earlier: Self) -> Us {
            Us(self.0.saturating_sub(earlier.0))
        }

        fn checked_add(self, duration: Us) -> Option<Self> {
            self.0.checked_add(duration.0).map(AtUs)
        }
    }

    #[test]
    fn fractional_millisecond_period_keeps_its_rate() {
        let mut cadence = Cadence::<AtUs>::new(Us(1500)).unwrap();
        cadence.start(AtUs(0));

        let fired = (1..=150u64)
            .filter(|&step| cadence.poll(AtUs(step * 100)))
            .count();

        assert_eq!(fired, 10);
        assert_eq!(cadence.remaining(AtUs(15_000)), Us(1500));
    }

    #[test]
    fn fractional_millisecond_period_stays_aligned_after_stall() {
        let mut cadence = Cadence::<AtUs>::new(Us(1500)).unwrap();
        cadence.start(AtUs(0));

        // Anchor lands on 4500, not on a whole-millisecond multiple
        assert!(cadence.poll(AtUs(5200)));
        assert_eq!(cadence.remaining(AtUs(5200)), Us(800));
        assert!(!cadence.poll(AtUs(5999)));
        assert!(cadence.poll(AtUs(6000)));
    }

    #[test]
    fn next_in_keeps_sub_millisecond_remainder() {
        let mut scheduler = TickScheduler::<AtUs>::new();
        scheduler.start(AtUs(0));
        assert_eq!(scheduler.next_in(AtUs(99_600)), Us(400));
        assert_eq!(scheduler.next_in(AtUs(99_999)), Us(1));
    }

    #[test]
    fn next_in_picks_earlier_driver() {
        let mut scheduler = TickScheduler::<At>::new();
        scheduler.start(At(0));
        assert_eq!(scheduler.next_in(At(0)), Ms(100));
        assert_eq!(scheduler.next_in(At(40)), Ms(60));
    }
}
