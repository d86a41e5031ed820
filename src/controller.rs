//! Traffic signal controller with pedestrian pre-emption.
//!
//! Provides [`SignalController`], which owns the signal lamps and the
//! phase/countdown state, consumes crossing requests from a
//! [`PedestrianLatch`] and arms a shared [`Buzzer`] on every entry to
//! `Stopped`.

use crate::buzzer::Buzzer;
use crate::config::SignalConfig;
use crate::fmt::{debug, info};
use crate::latch::PedestrianLatch;
use crate::output::{SignalLights, ToneOutput};
use crate::phase::{PhaseState, SignalPhase, TickOutcome};
use crate::time::{TimeInstant, TimeSource};

/// Renders the transition log line, e.g. `Estado: Verde - Siga`.
///
/// # Errors
/// Returns `core::fmt::Error` if the line does not fit the buffer.
pub fn status_line(phase: SignalPhase) -> Result<heapless::String<48>, core::fmt::Error> {
    use core::fmt::Write;

    let mut line = heapless::String::new();
    write!(line, "Estado: {}", phase.label())?;
    Ok(line)
}

/// Drives a signal head through its phases on the coarse tick.
///
/// The controller owns the lamps and borrows the latch and the buzzer, both
/// of which are also reachable from other execution contexts.
///
/// # Type Parameters
/// * `'a` - Lifetime of the latch, buzzer and time source references
/// * `I` - Time instant type
/// * `L` - Signal lamp implementation type
/// * `P` - Tone output implementation type
/// * `T` - Time source implementation type
pub struct SignalController<'a, I, L, P, T>
where
    I: TimeInstant,
    L: SignalLights,
    P: ToneOutput,
    T: TimeSource<I>,
{
    lights: L,
    latch: &'a PedestrianLatch,
    buzzer: &'a Buzzer<'a, I, P, T>,
    config: SignalConfig<I::Duration>,
    state: PhaseState,
}

impl<'a, I, L, P, T> SignalController<'a, I, L, P, T>
where
    I: TimeInstant,
    L: SignalLights,
    P: ToneOutput,
    T: TimeSource<I>,
{
    /// Creates a controller with the reference configuration.
    pub fn new(lights: L, latch: &'a PedestrianLatch, buzzer: &'a Buzzer<'a, I, P, T>) -> Self {
        Self::with_config(lights, latch, buzzer, SignalConfig::reference())
    }

    /// Creates a controller in `Stopped` with a full countdown.
    ///
    /// No output is written until [`start`](Self::start) is called.
    pub fn with_config(
        lights: L,
        latch: &'a PedestrianLatch,
        buzzer: &'a Buzzer<'a, I, P, T>,
        config: SignalConfig<I::Duration>,
    ) -> Self {
        let state = PhaseState::enter(SignalPhase::Stopped, config.timings());

        Self {
            lights,
            latch,
            buzzer,
            config,
            state,
        }
    }

    /// Shows the initial phase: applies its lamp pattern and sounds the
    /// crossing cue, without touching the countdown.
    pub fn start(&mut self) {
        self.show(self.state.phase);
    }

    /// Evaluates one coarse tick.
    ///
    /// A pending request pre-empts into `Pedestrian` unless that phase is
    /// already showing, in which case the request stays latched for a later
    /// tick. Outputs are written only when a phase is entered.
    pub fn tick(&mut self) -> TickOutcome {
        let request_pending = self.state.phase != SignalPhase::Pedestrian && self.latch.take();

        let (state, outcome) = self.state.advance(request_pending, self.config.timings());
        self.state = state;

        if let TickOutcome::Preempted { from } = outcome {
            debug!("crossing request pre-empted {}", from);
        }

        if let Some(phase) = outcome.entered() {
            self.show(phase);
        }

        outcome
    }

    fn show(&mut self, phase: SignalPhase) {
        if phase.arms_cue() {
            self.buzzer.arm(self.config.cue_duration());
        }

        phase.lights().apply(&mut self.lights);
        info!("Estado: {}", phase);
    }

    /// Returns the phase currently shown.
    pub fn phase(&self) -> SignalPhase {
        self.state.phase
    }

    /// Returns the coarse ticks left in the current phase.
    pub fn countdown(&self) -> u8 {
        self.state.countdown
    }

    /// Returns the lamp driver.
    pub fn lights(&self) -> &L {
        &self.lights
    }

    /// Returns the buzzer this controller arms.
    pub fn buzzer(&self) -> &'a Buzzer<'a, I, P, T> {
        self.buzzer
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &SignalConfig<I::Duration> {
        &self.config
    }
}
