//! Signal phases and the pure coarse-tick transition function.

use crate::config::PhaseTimings;
use crate::output::LightPattern;

/// The phase currently shown by the signal head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalPhase {
    /// Red. Traffic stops.
    #[default]
    Stopped,
    /// Green. Traffic may proceed.
    Go,
    /// Red and green together (amber-equivalent) after `Go`.
    Caution,
    /// Red and green together, all traffic held for a pedestrian crossing.
    Pedestrian,
}

impl SignalPhase {
    /// All phases, in their normal cycle order followed by `Pedestrian`.
    pub const ALL: [SignalPhase; 4] = [
        SignalPhase::Stopped,
        SignalPhase::Go,
        SignalPhase::Caution,
        SignalPhase::Pedestrian,
    ];

    /// The phase entered when this one expires.
    #[inline]
    pub const fn successor(self) -> SignalPhase {
        match self {
            SignalPhase::Stopped => SignalPhase::Go,
            SignalPhase::Go => SignalPhase::Caution,
            SignalPhase::Caution | SignalPhase::Pedestrian => SignalPhase::Stopped,
        }
    }

    /// Lamp pattern for this phase.
    #[inline]
    pub const fn lights(self) -> LightPattern {
        match self {
            SignalPhase::Stopped => LightPattern::new(true, false),
            SignalPhase::Go => LightPattern::new(false, true),
            SignalPhase::Caution | SignalPhase::Pedestrian => LightPattern::new(true, true),
        }
    }

    /// Whether entering this phase sounds the crossing cue.
    #[inline]
    pub const fn arms_cue(self) -> bool {
        matches!(self, SignalPhase::Stopped)
    }

    /// Human-readable name used in the status line.
    ///
    /// `Pedestrian` shows the caution lamps and is announced as caution.
    pub const fn label(self) -> &'static str {
        match self {
            SignalPhase::Stopped => "Vermelho - Pare",
            SignalPhase::Go => "Verde - Siga",
            SignalPhase::Caution | SignalPhase::Pedestrian => "Amarelo - Atenção",
        }
    }
}

impl core::fmt::Display for SignalPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SignalPhase {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.label())
    }
}

/// What a single coarse tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Countdown decremented, phase unchanged.
    Held {
        /// Ticks left in the current phase.
        remaining: u8,
    },
    /// Countdown expired and the successor phase was entered.
    Advanced { from: SignalPhase, to: SignalPhase },
    /// A pending pedestrian request forced the `Pedestrian` phase.
    Preempted { from: SignalPhase },
}

impl TickOutcome {
    /// The phase entered by this tick, if any.
    pub fn entered(&self) -> Option<SignalPhase> {
        match self {
            TickOutcome::Held { .. } => None,
            TickOutcome::Advanced { to, .. } => Some(*to),
            TickOutcome::Preempted { .. } => Some(SignalPhase::Pedestrian),
        }
    }
}

/// Phase plus remaining coarse ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseState {
    pub phase: SignalPhase,
    pub countdown: u8,
}

impl PhaseState {
    /// Start of `phase` with a full countdown.
    #[inline]
    pub fn enter(phase: SignalPhase, timings: &PhaseTimings) -> Self {
        Self {
            phase,
            countdown: timings.ticks(phase),
        }
    }

    /// Evaluates one coarse tick.
    ///
    /// `request_pending` must already reflect the latch; a request is only
    /// honoured outside `Pedestrian`. Pre-emption skips the decrement.
    pub fn advance(self, request_pending: bool, timings: &PhaseTimings) -> (PhaseState, TickOutcome) {
        if request_pending && self.phase != SignalPhase::Pedestrian {
            return (
                PhaseState::enter(SignalPhase::Pedestrian, timings),
                TickOutcome::Preempted { from: self.phase },
            );
        }

        let remaining = self.countdown.saturating_sub(1);
        if remaining > 0 {
            return (
                PhaseState {
                    phase: self.phase,
                    countdown: remaining,
                },
                TickOutcome::Held { remaining },
            );
        }

        let next = self.phase.successor();
        (
            PhaseState::enter(next, timings),
            TickOutcome::Advanced {
                from: self.phase,
                to: next,
            },
        )
    }
}
