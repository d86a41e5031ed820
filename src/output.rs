//! Output capabilities the controller drives.
//!
//! Implement these for your hardware (GPIO for the lamps, a PWM channel for
//! the buzzer). Both are infallible from the controller's point of view:
//! handle any hardware errors internally.

/// A named digital output of the signal head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignalOutput {
    Red,
    Green,
}

/// Trait for abstracting the signal lamps.
pub trait SignalLights {
    /// Drives the given output on (`true`) or off (`false`).
    ///
    /// Active-low wiring is the implementor's concern; `true` always means lit.
    fn set_level(&mut self, output: SignalOutput, on: bool);
}

/// Trait for abstracting a PWM-driven audio output.
pub trait ToneOutput {
    /// Sets the duty cycle as a fraction in the range 0.0-1.0.
    ///
    /// Implementations should convert this to their native duty range.
    /// 0.0 silences the output.
    fn set_duty(&mut self, duty: f32);
}

/// The (red, green) lamp combination shown for a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightPattern {
    pub red: bool,
    pub green: bool,
}

impl LightPattern {
    /// Creates a new pattern.
    #[inline]
    pub const fn new(red: bool, green: bool) -> Self {
        Self { red, green }
    }

    /// Writes both outputs, red first.
    pub fn apply<L: SignalLights>(&self, lights: &mut L) {
        lights.set_level(SignalOutput::Red, self.red);
        lights.set_level(SignalOutput::Green, self.green);
    }
}
