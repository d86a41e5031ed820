use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;
use crosswalk_signal::{SignalLights, SignalOutput, ToneOutput};

/// Signal lamps on two GPIO outputs
///
/// Implements the SignalLights trait, handling active-low wiring so the
/// controller can always use `true` for lit.
pub struct PinLights<R, G>
where
    R: OutputPin,
    G: OutputPin,
{
    red: R,
    green: G,
    active_low: bool,
}

impl<R, G> PinLights<R, G>
where
    R: OutputPin,
    G: OutputPin,
{
    /// Create a new lamp driver
    ///
    /// # Arguments
    /// * `red` - GPIO for the red lamp
    /// * `green` - GPIO for the green lamp
    /// * `active_low` - true if a lamp lights when its pin is driven low
    pub fn new(red: R, green: G, active_low: bool) -> Self {
        Self {
            red,
            green,
            active_low,
        }
    }
}

impl<R, G> SignalLights for PinLights<R, G>
where
    R: OutputPin,
    G: OutputPin,
{
    fn set_level(&mut self, output: SignalOutput, on: bool) {
        let state = PinState::from(on != self.active_low);
        // RP2040 GPIO writes are infallible
        match output {
            SignalOutput::Red => {
                let _ = self.red.set_state(state);
            }
            SignalOutput::Green => {
                let _ = self.green.set_state(state);
            }
        }
    }
}

/// Passive buzzer on a PWM channel
///
/// The channel's slice must already be configured for the tone frequency;
/// this wrapper only sets the duty cycle.
pub struct PwmTone<C: SetDutyCycle> {
    channel: C,
    max_duty: u16,
}

impl<C: SetDutyCycle> PwmTone<C> {
    pub fn new(channel: C) -> Self {
        let max_duty = channel.max_duty_cycle();
        Self { channel, max_duty }
    }

    /// Convert float (0.0-1.0) to PWM duty cycle
    fn float_to_duty(&self, value: f32) -> u16 {
        let value_clamped = value.clamp(0.0, 1.0);
        (value_clamped * self.max_duty as f32) as u16
    }
}

impl<C: SetDutyCycle> ToneOutput for PwmTone<C> {
    fn set_duty(&mut self, duty: f32) {
        let _ = self.channel.set_duty_cycle(self.float_to_duty(duty));
    }
}
