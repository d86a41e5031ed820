//! RP2040 timer binding for the crosswalk controller.
//!
//! Cadences and the buzzer deadline run on the free-running 64-bit
//! microsecond counter. Durations keep the full microsecond resolution so the
//! main loop can sleep until the next tick instead of rounding to whole
//! milliseconds.

use crosswalk_signal::{TimeDuration, TimeInstant, TimeSource};
use fugit::{MicrosDurationU64, TimerInstantU64};
use rp_pico::hal::Timer;

/// RP2040 timer counter rate.
const COUNTER_HZ: u32 = 1_000_000;

/// Span between two counter readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Micros(MicrosDurationU64);

impl Micros {
    /// Microseconds as accepted by `Delay::delay_us`, saturating.
    pub fn as_delay_us(self) -> u32 {
        u32::try_from(self.0.to_micros()).unwrap_or(u32::MAX)
    }
}

impl TimeDuration for Micros {
    const ZERO: Self = Micros(MicrosDurationU64::from_ticks(0));

    fn as_millis(&self) -> u64 {
        self.0.to_millis()
    }

    fn from_millis(millis: u64) -> Self {
        Micros(MicrosDurationU64::millis(millis))
    }

    fn saturating_sub(self, other: Self) -> Self {
        self.0.checked_sub(other.0).map_or(Self::ZERO, Micros)
    }
}

/// A counter reading.
///
/// The counter does not wrap within the lifetime of the device, so an
/// earlier reading taken after a later one yields a zero span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Stamp(TimerInstantU64<COUNTER_HZ>);

impl TimeInstant for Stamp {
    type Duration = Micros;

    fn duration_since(&self, earlier: Self) -> Micros {
        self.0
            .checked_duration_since(earlier.0)
            .map_or(Micros::ZERO, Micros)
    }

    fn checked_add(self, duration: Micros) -> Option<Self> {
        self.0.checked_add_duration(duration.0).map(Stamp)
    }
}

/// Clock shared by the scheduler and the buzzer.
pub struct CounterClock {
    timer: Timer,
}

impl CounterClock {
    pub fn new(timer: Timer) -> Self {
        Self { timer }
    }
}

impl TimeSource<Stamp> for CounterClock {
    fn now(&self) -> Stamp {
        Stamp(self.timer.get_counter())
    }
}
