//! Timing constants and controller configuration.

use crate::phase::SignalPhase;
use crate::time::TimeDuration;

/// Period of the coarse (phase) tick.
pub const COARSE_PERIOD_MS: u64 = 1000;

/// Period of the fine (buzzer poll) tick.
pub const FINE_PERIOD_MS: u64 = 100;

/// How long the crossing cue sounds on entry to `Stopped`.
pub const CUE_DURATION_MS: u64 = 100;

/// Audible duty cycle of the crossing cue.
pub const CUE_DUTY: f32 = 0.5;

/// PWM frequency the buzzer channel should be configured for.
pub const TONE_FREQUENCY_HZ: u32 = 1000;

/// Phase lengths, in coarse ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseTimings {
    pub stopped: u8,
    pub go: u8,
    pub caution: u8,
    pub pedestrian: u8,
}

impl PhaseTimings {
    /// 10 s red, 10 s green, 3 s caution, 3 s crossing.
    pub const REFERENCE: Self = Self {
        stopped: 10,
        go: 10,
        caution: 3,
        pedestrian: 3,
    };

    /// Ticks spent in `phase`.
    #[inline]
    pub const fn ticks(&self, phase: SignalPhase) -> u8 {
        match phase {
            SignalPhase::Stopped => self.stopped,
            SignalPhase::Go => self.go,
            SignalPhase::Caution => self.caution,
            SignalPhase::Pedestrian => self.pedestrian,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for phase in SignalPhase::ALL {
            if self.ticks(phase) == 0 {
                return Err(ConfigError::ZeroPhaseTicks(phase));
            }
        }
        Ok(())
    }
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A phase was given a length of zero ticks.
    ZeroPhaseTicks(SignalPhase),

    /// A periodic driver was given a zero period.
    ZeroPeriod,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroPhaseTicks(phase) => {
                write!(f, "phase {:?} must last at least one tick", phase)
            }
            ConfigError::ZeroPeriod => {
                write!(f, "tick period must be non-zero")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Controller configuration: phase lengths plus the crossing cue length.
///
/// The cue's loudness is a property of the [`Buzzer`](crate::Buzzer), set
/// with [`Buzzer::with_duty`](crate::Buzzer::with_duty).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalConfig<D: TimeDuration> {
    timings: PhaseTimings,
    cue_duration: D,
}

impl<D: TimeDuration> SignalConfig<D> {
    /// Reference timings and a 100 ms cue.
    pub fn reference() -> Self {
        Self {
            timings: PhaseTimings::REFERENCE,
            cue_duration: D::from_millis(CUE_DURATION_MS),
        }
    }

    /// Starts a builder seeded with the reference values.
    pub fn builder() -> SignalConfigBuilder<D> {
        SignalConfigBuilder {
            config: Self::reference(),
        }
    }

    pub fn timings(&self) -> &PhaseTimings {
        &self.timings
    }

    pub fn cue_duration(&self) -> D {
        self.cue_duration
    }
}

impl<D: TimeDuration> Default for SignalConfig<D> {
    fn default() -> Self {
        Self::reference()
    }
}

/// Builder for [`SignalConfig`].
#[derive(Debug, Clone, Copy)]
pub struct SignalConfigBuilder<D: TimeDuration> {
    config: SignalConfig<D>,
}

impl<D: TimeDuration> SignalConfigBuilder<D> {
    /// Sets all phase lengths at once.
    pub fn timings(mut self, timings: PhaseTimings) -> Self {
        self.config.timings = timings;
        self
    }

    /// Sets the length of a single phase.
    pub fn phase_ticks(mut self, phase: SignalPhase, ticks: u8) -> Self {
        let timings = &mut self.config.timings;
        match phase {
            SignalPhase::Stopped => timings.stopped = ticks,
            SignalPhase::Go => timings.go = ticks,
            SignalPhase::Caution => timings.caution = ticks,
            SignalPhase::Pedestrian => timings.pedestrian = ticks,
        }
        self
    }

    pub fn cue_duration(mut self, duration: D) -> Self {
        self.config.cue_duration = duration;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<SignalConfig<D>, ConfigError> {
        self.config.timings.validate()?;
        Ok(self.config)
    }
}
